//! Gender classification from a person's name, company, age and code.

pub mod artifacts;
pub mod config;
pub mod service;
pub mod tracker;
pub mod trainer;

#[cfg(test)]
pub(crate) mod testdata;

pub use artifacts::GenderArtifacts;
pub use config::GenderConfig;
pub use service::{router, GenderContext};
pub use tracker::{ExperimentTracker, FileTracker, NoopTracker};
