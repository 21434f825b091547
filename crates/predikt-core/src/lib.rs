pub mod error;
pub mod matrix;
pub mod frame;
pub mod record;

pub use error::{PrediktError, PrediktResult};
pub use frame::{Column, ColumnKind, Frame};
pub use matrix::Matrix;
pub use record::{FeatureRecord, Value};
