use std::path::{Path, PathBuf};

/// Pick where a model artifact lives.
///
/// An explicit path always wins. Otherwise the container location is used if
/// something exists there, falling back to `relative` beside the running
/// executable (or the working directory when the executable path is unknown).
pub fn resolve_artifact(explicit: Option<&Path>, container: &Path, relative: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if container.exists() {
        return container.to_path_buf();
    }
    exe_dir().join(relative)
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins() {
        let dir = tempfile::tempdir().unwrap();
        let got = resolve_artifact(Some(Path::new("/tmp/x.json")), dir.path(), Path::new("models/m.json"));
        assert_eq!(got, PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn test_container_then_exe_dir() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("model.json");
        std::fs::write(&container, "{}").unwrap();
        assert_eq!(resolve_artifact(None, &container, Path::new("models/m.json")), container);

        let missing = dir.path().join("absent.json");
        let got = resolve_artifact(None, &missing, Path::new("models/m.json"));
        assert!(got.ends_with("models/m.json"));
        assert_ne!(got, missing);
    }
}
