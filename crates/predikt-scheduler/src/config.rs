use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub id: String,
    pub schedule: Schedule,
    pub start_date: DateTime<Utc>,
    /// Program followed by its arguments, run without a shell.
    pub command: Vec<String>,
}

/// `[scheduler]` section of `predikt.toml`, overridable with `PREDIKT_SCHEDULER_*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub job: JobConfig,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            job: JobConfig {
                id: "flight_price_training_pipeline".to_string(),
                schedule: Schedule::Daily,
                start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
                command: vec!["flight-train".to_string()],
            },
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl SchedulerConfig {
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        predikt_serve::load_section("scheduler", &SchedulerConfig::default(), file, "PREDIKT_SCHEDULER_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.job.schedule, Schedule::Daily);
        assert_eq!(cfg.job.start_date.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_file_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "predikt.toml",
                r#"
                [scheduler.job]
                command = ["flight-train", "--config", "/etc/predikt.toml"]
                "#,
            )?;
            jail.set_env("PREDIKT_SCHEDULER_JOB__SCHEDULE", "@every 30s");
            let cfg = SchedulerConfig::load(None)?;
            assert_eq!(cfg.job.schedule, Schedule::Every(Duration::from_secs(30)));
            assert_eq!(cfg.job.command.len(), 3);
            assert_eq!(cfg.job.id, "flight_price_training_pipeline");
            Ok(())
        });
    }
}
