use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use predikt_core::{PrediktError, PrediktResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sink for run parameters, metrics and model snapshots.
pub trait ExperimentTracker {
    fn log_param(&mut self, key: &str, value: &str) -> PrediktResult<()>;

    fn log_metric(&mut self, key: &str, value: f64) -> PrediktResult<()>;

    /// Store a serialized model under `name`.
    fn log_artifact(&mut self, name: &str, artifact: &serde_json::Value) -> PrediktResult<()>;

    /// Close the run. Further logging is undefined.
    fn finish(&mut self, status: RunStatus) -> PrediktResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NoopTracker;

impl ExperimentTracker for NoopTracker {
    fn log_param(&mut self, _key: &str, _value: &str) -> PrediktResult<()> {
        Ok(())
    }

    fn log_metric(&mut self, _key: &str, _value: f64) -> PrediktResult<()> {
        Ok(())
    }

    fn log_artifact(&mut self, _name: &str, _artifact: &serde_json::Value) -> PrediktResult<()> {
        Ok(())
    }

    fn finish(&mut self, _status: RunStatus) -> PrediktResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub experiment: String,
    pub status: RunStatus,
    pub start_time: i64,
    pub end_time: Option<i64>,
}

/// Local run store laid out as
/// `<root>/<experiment>/<run-id>/{meta.json, params/, metrics/, artifacts/}`.
///
/// Each metric file holds one `<unix-millis> <value>` line per logged value.
#[derive(Debug)]
pub struct FileTracker {
    run_dir: PathBuf,
    meta: RunMeta,
}

fn io_err(path: &Path, e: std::io::Error) -> PrediktError {
    PrediktError::Io(format!("{}: {}", path.display(), e))
}

fn slug(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

impl FileTracker {
    /// Create a fresh run directory for `experiment` under `root`.
    pub fn start(root: impl AsRef<Path>, experiment: &str) -> PrediktResult<Self> {
        let run_id = Uuid::new_v4().simple().to_string();
        let run_dir = root.as_ref().join(slug(experiment)).join(&run_id);
        for sub in ["params", "metrics", "artifacts"] {
            let dir = run_dir.join(sub);
            fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        }
        let tracker = FileTracker {
            run_dir,
            meta: RunMeta {
                run_id,
                experiment: experiment.to_string(),
                status: RunStatus::Running,
                start_time: Utc::now().timestamp_millis(),
                end_time: None,
            },
        };
        tracker.write_meta()?;
        tracing::info!(run_id = %tracker.meta.run_id, dir = %tracker.run_dir.display(), "started tracking run");
        Ok(tracker)
    }

    pub fn run_id(&self) -> &str {
        &self.meta.run_id
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    fn write_meta(&self) -> PrediktResult<()> {
        let path = self.run_dir.join("meta.json");
        let json =
            serde_json::to_string_pretty(&self.meta).map_err(|e| PrediktError::Serialization(e.to_string()))?;
        fs::write(&path, json).map_err(|e| io_err(&path, e))
    }
}

impl ExperimentTracker for FileTracker {
    fn log_param(&mut self, key: &str, value: &str) -> PrediktResult<()> {
        let path = self.run_dir.join("params").join(key);
        fs::write(&path, value).map_err(|e| io_err(&path, e))
    }

    fn log_metric(&mut self, key: &str, value: f64) -> PrediktResult<()> {
        let path = self.run_dir.join("metrics").join(key);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;
        writeln!(file, "{} {}", Utc::now().timestamp_millis(), value).map_err(|e| io_err(&path, e))
    }

    fn log_artifact(&mut self, name: &str, artifact: &serde_json::Value) -> PrediktResult<()> {
        let dir = self.run_dir.join("artifacts").join(name);
        fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        let path = dir.join("model.json");
        let json =
            serde_json::to_string_pretty(artifact).map_err(|e| PrediktError::Serialization(e.to_string()))?;
        fs::write(&path, json).map_err(|e| io_err(&path, e))
    }

    fn finish(&mut self, status: RunStatus) -> PrediktResult<()> {
        self.meta.status = status;
        self.meta.end_time = Some(Utc::now().timestamp_millis());
        self.write_meta()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_tracker_layout() {
        let root = tempfile::tempdir().unwrap();
        let mut tracker = FileTracker::start(root.path(), "Gender Classification").unwrap();
        tracker.log_param("max_iter", "1000").unwrap();
        tracker.log_metric("accuracy", 0.5).unwrap();
        tracker.log_metric("accuracy", 0.75).unwrap();
        tracker
            .log_artifact("gender_classifier", &serde_json::json!({"bias": 0.1}))
            .unwrap();
        tracker.finish(RunStatus::Finished).unwrap();

        let run = root.path().join("gender_classification").join(tracker.run_id());
        assert_eq!(run, tracker.run_dir());
        assert_eq!(fs::read_to_string(run.join("params/max_iter")).unwrap(), "1000");

        let metrics = fs::read_to_string(run.join("metrics/accuracy")).unwrap();
        let values: Vec<&str> = metrics.lines().map(|l| l.split(' ').nth(1).unwrap()).collect();
        assert_eq!(values, vec!["0.5", "0.75"]);

        assert!(run.join("artifacts/gender_classifier/model.json").exists());
        let meta: RunMeta = serde_json::from_str(&fs::read_to_string(run.join("meta.json")).unwrap()).unwrap();
        assert_eq!(meta.status, RunStatus::Finished);
        assert!(meta.end_time.is_some());
    }

    #[test]
    fn test_run_ids_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let a = FileTracker::start(root.path(), "x").unwrap();
        let b = FileTracker::start(root.path(), "x").unwrap();
        assert_ne!(a.run_id(), b.run_id());
    }
}
