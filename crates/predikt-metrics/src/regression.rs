use predikt_core::PrediktResult;
use serde::{Deserialize, Serialize};

use crate::check_lengths;

/// Mean Squared Error.
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> PrediktResult<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    Ok(sum / y_true.len() as f64)
}

/// Root Mean Squared Error.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> PrediktResult<f64> {
    Ok(mse(y_true, y_pred)?.sqrt())
}

/// Mean Absolute Error.
pub fn mae(y_true: &[f64], y_pred: &[f64]) -> PrediktResult<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    let sum: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
    Ok(sum / y_true.len() as f64)
}

/// R² (coefficient of determination).
///
/// A constant target scores 1.0 on a perfect prediction and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> PrediktResult<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    let mean_true = y_true.iter().sum::<f64>() / y_true.len() as f64;

    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p) * (t - p)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean_true) * (t - mean_true)).sum();

    if ss_tot < 1e-15 {
        return Ok(if ss_res < 1e-15 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// The three numbers every regression candidate is judged by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionScores {
    pub r2: f64,
    pub mae: f64,
    pub rmse: f64,
}

impl RegressionScores {
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> PrediktResult<Self> {
        Ok(RegressionScores {
            r2: r2_score(y_true, y_pred)?,
            mae: mae(y_true, y_pred)?,
            rmse: rmse(y_true, y_pred)?,
        })
    }
}
