use std::fs;
use std::path::Path;

use predikt_core::{PrediktError, PrediktResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a fitted object to a JSON file, creating parent directories.
///
/// An existing file is overwritten in place.
pub fn save_artifact<T: Serialize>(value: &T, path: impl AsRef<Path>) -> PrediktResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(value).map_err(|e| PrediktError::Serialization(e.to_string()))?;
    fs::write(path, json).map_err(|e| PrediktError::Io(format!("{}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), "saved artifact");
    Ok(())
}

/// Load a fitted object from a JSON file.
pub fn load_artifact<T: DeserializeOwned>(path: impl AsRef<Path>) -> PrediktResult<T> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| PrediktError::Io(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&json)
        .map_err(|e| PrediktError::Serialization(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Weights {
        name: String,
        w: Vec<f64>,
    }

    #[test]
    fn test_save_creates_dirs_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("nested").join("w.json");
        let w = Weights {
            name: "lin".into(),
            w: vec![1.5, -2.0],
        };
        save_artifact(&w, &path).unwrap();
        let back: Weights = load_artifact(&path).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_artifact::<Weights>(&missing), Err(PrediktError::Io(_))));

        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "{not json").unwrap();
        assert!(matches!(
            load_artifact::<Weights>(&garbage),
            Err(PrediktError::Serialization(_))
        ));
    }
}
