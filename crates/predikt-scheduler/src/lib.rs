//! Minimal cron-like runner: one job, one schedule, no retries, no catch-up.

pub mod config;
pub mod error;
pub mod runner;
pub mod schedule;

pub use config::{JobConfig, SchedulerConfig};
pub use error::SchedulerError;
pub use runner::{run_forever, spawn_job};
pub use schedule::Schedule;
