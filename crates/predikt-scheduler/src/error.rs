use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid schedule '{0}': expected @daily, @hourly or @every <secs>s")]
    InvalidSchedule(String),

    #[error("job '{0}' has an empty command")]
    EmptyCommand(String),

    #[error("failed to spawn job '{job}': {source}")]
    Spawn {
        job: String,
        #[source]
        source: std::io::Error,
    },
}
