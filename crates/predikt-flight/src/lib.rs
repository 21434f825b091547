//! Flight ticket price regression: trainer, HTTP predictor and terminal client.

pub mod client;
pub mod config;
pub mod features;
pub mod service;
pub mod trainer;

#[cfg(test)]
pub(crate) mod testdata;

pub use config::FlightConfig;
pub use service::{router, FlightContext, REQUIRED_FIELDS};
pub use trainer::{train, TrainingReport};
