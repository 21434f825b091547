pub mod classification;
pub mod regression;

pub use classification::*;
pub use regression::*;

use predikt_core::{PrediktError, PrediktResult};

fn check_lengths(n_true: usize, n_pred: usize) -> PrediktResult<()> {
    if n_true != n_pred {
        return Err(PrediktError::DimensionMismatch(format!(
            "y_true has {} elements, y_pred has {}",
            n_true, n_pred
        )));
    }
    if n_true == 0 {
        return Err(PrediktError::EmptyInput("metrics need at least one sample".into()));
    }
    Ok(())
}
