use chrono::Utc;
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::config::JobConfig;
use crate::error::SchedulerError;

/// Start the job's command and return immediately.
///
/// The child is reaped on a background task that only logs how it ended.
pub fn spawn_job(job: &JobConfig) -> Result<u32, SchedulerError> {
    let (program, args) = job
        .command
        .split_first()
        .ok_or_else(|| SchedulerError::EmptyCommand(job.id.clone()))?;

    let mut child = Command::new(program)
        .args(args)
        .kill_on_drop(false)
        .spawn()
        .map_err(|source| SchedulerError::Spawn {
            job: job.id.clone(),
            source,
        })?;
    let pid = child.id().unwrap_or_default();
    info!(job = %job.id, pid, command = ?job.command, "started job");

    let id = job.id.clone();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => info!(job = %id, pid, "job finished"),
            Ok(status) => warn!(job = %id, pid, code = ?status.code(), "job failed"),
            Err(e) => error!(job = %id, pid, error = %e, "could not wait on job"),
        }
    });
    Ok(pid)
}

/// Sleep until each tick and fire the job. Spawn failures are logged and the
/// loop carries on with the next tick.
pub async fn run_forever(job: JobConfig) {
    loop {
        let now = Utc::now();
        let next = job.schedule.next_after(now, job.start_date);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(job = %job.id, next = %next, "waiting for next tick");
        tokio::time::sleep(wait).await;

        if let Err(e) = spawn_job(&job) {
            error!(error = %e, "tick skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Schedule;

    fn job(command: &[&str]) -> JobConfig {
        JobConfig {
            id: "test_job".into(),
            schedule: Schedule::Hourly,
            start_date: Utc::now(),
            command: command.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_empty_command() {
        assert!(matches!(spawn_job(&job(&[])), Err(SchedulerError::EmptyCommand(_))));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = spawn_job(&job(&["/definitely/not/a/trainer"])).unwrap_err();
        assert!(matches!(err, SchedulerError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawns_without_waiting() {
        let started = std::time::Instant::now();
        let pid = spawn_job(&job(&["sleep", "2"])).unwrap();
        assert!(pid > 0);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }
}
