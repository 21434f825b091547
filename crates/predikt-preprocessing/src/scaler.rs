use predikt_core::{Matrix, PrediktError, PrediktResult};
use serde::{Deserialize, Serialize};

/// Standardize features by removing the mean and scaling to unit variance.
///
/// Columns with zero variance keep a scale of 1 so they map to 0 instead of NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Option<Vec<f64>>,
    pub scale: Option<Vec<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        StandardScaler::default()
    }

    /// Compute mean and std from training data (rows are samples).
    pub fn fit(&mut self, x: &Matrix) -> PrediktResult<()> {
        if x.rows() == 0 {
            return Err(PrediktError::EmptyInput("StandardScaler.fit on 0 rows".into()));
        }
        self.mean = Some(x.column_means());
        self.scale = Some(
            x.column_stds()
                .into_iter()
                .map(|s| if s < f64::EPSILON { 1.0 } else { s })
                .collect(),
        );
        Ok(())
    }

    /// Transform data using fitted mean and std.
    pub fn transform(&self, x: &Matrix) -> PrediktResult<Matrix> {
        let (Some(mean), Some(scale)) = (self.mean.as_ref(), self.scale.as_ref()) else {
            return Err(PrediktError::NotFitted("StandardScaler"));
        };
        if x.cols() != mean.len() {
            return Err(PrediktError::DimensionMismatch(format!(
                "StandardScaler was fitted on {} features, got {}",
                mean.len(),
                x.cols()
            )));
        }

        let mut data = Vec::with_capacity(x.rows() * x.cols());
        for row in x.iter_rows() {
            data.extend(
                row.iter()
                    .zip(mean)
                    .zip(scale)
                    .map(|((v, m), s)| (v - m) / s),
            );
        }
        Matrix::new(data, x.rows(), x.cols())
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&mut self, x: &Matrix) -> PrediktResult<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn n_features(&self) -> usize {
        self.mean.as_ref().map(Vec::len).unwrap_or(0)
    }
}
