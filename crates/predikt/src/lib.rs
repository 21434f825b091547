//! # predikt
//!
//! Two small train → serialize → serve flows built on a compact ML toolkit.
//!
//! ## Modules
//!
//! - **core**: `Matrix`, typed `Frame`, `FeatureRecord`, shared error type
//! - **linalg**: LU solve, symmetric eigendecomposition, minimum-norm least squares
//! - **preprocessing**: StandardScaler, LabelEncoder, OneHotEncoder, ColumnTransformer, PCA, splits
//! - **linear**: LinearRegression, Ridge, LogisticRegression
//! - **tree**: DecisionTreeRegressor (CART)
//! - **metrics**: R², MAE, RMSE, accuracy, classification report
//! - **io**: CSV into frames, JSON model artifacts
//! - **pipeline**: Transformer / Estimator traits, regressor registry, Pipeline
//! - **embed**: text embedders (hashing, optional MiniLM)
//! - **serve**: HTTP error mapping, config loading, tracing, server runner
//! - **flight**: flight price trainer, service and client
//! - **gender**: gender classifier trainer, tracker and service
//! - **scheduler**: periodic trainer runs

/// Matrices, frames and records.
pub use predikt_core as core;

/// Linear algebra.
pub use predikt_linalg as linalg;

/// Data preprocessing.
pub use predikt_preprocessing as preprocessing;

/// Linear models.
pub use predikt_linear as linear;

/// Tree models.
pub use predikt_tree as tree;

/// Evaluation metrics.
pub use predikt_metrics as metrics;

/// Dataset and artifact I/O.
pub use predikt_io as io;

/// Model pipelines.
pub use predikt_pipeline as pipeline;

/// Text embedding.
pub use predikt_embed as embed;

/// HTTP serving plumbing.
pub use predikt_serve as serve;

/// Flight price prediction.
pub use predikt_flight as flight;

/// Gender classification.
pub use predikt_gender as gender;

/// Scheduled training.
pub use predikt_scheduler as scheduler;

/// Commonly used types.
pub mod prelude {
    pub use predikt_core::{Column, FeatureRecord, Frame, Matrix, PrediktError, PrediktResult, Value};
    pub use predikt_pipeline::{Estimator, Pipeline, RegressorSpec, Transformer};
    pub use predikt_preprocessing::{ColumnTransformer, LabelEncoder, StandardScaler, PCA};
}
