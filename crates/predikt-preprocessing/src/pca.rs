use predikt_core::{Matrix, PrediktError, PrediktResult};
use predikt_linalg::symmetric_eigen;
use serde::{Deserialize, Serialize};

/// Principal Component Analysis (PCA).
///
/// Reduces dimensionality by projecting data onto the top-k principal
/// components (directions of maximum variance). The covariance matrix is
/// eigendecomposed in full, so the fit is deterministic: the same input
/// always yields the same components, including their signs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PCA {
    pub n_components: usize,
    pub components: Option<Matrix>, // [n_components, n_features]
    pub mean: Option<Vec<f64>>,
    pub explained_variance: Option<Vec<f64>>,
    total_variance: f64,
}

impl PCA {
    pub fn new(n_components: usize) -> Self {
        PCA {
            n_components,
            components: None,
            mean: None,
            explained_variance: None,
            total_variance: 0.0,
        }
    }

    pub fn fit(&mut self, x: &Matrix) -> PrediktResult<()> {
        let (n, p) = x.shape();
        let k = self.n_components;
        if k == 0 || k > n.min(p) {
            return Err(PrediktError::InvalidParameter(format!(
                "n_components={} must be between 1 and min(n_samples, n_features)={}",
                k,
                n.min(p)
            )));
        }

        let mean = x.column_means();
        let centered = center(x, &mean)?;

        // Sample covariance: Xcᵀ Xc / (n - 1)
        let denom = (n.saturating_sub(1)).max(1) as f64;
        let cov = centered.transpose().matmul(&centered)?.map(|v| v / denom);

        let eig = symmetric_eigen(&cov)?;
        let mut components = Vec::with_capacity(k * p);
        for c in 0..k {
            components.extend(eig.vectors.column(c)?);
        }

        self.total_variance = eig.values.iter().map(|v| v.max(0.0)).sum();
        self.explained_variance = Some(eig.values[..k].iter().map(|v| v.max(0.0)).collect());
        self.components = Some(Matrix::new(components, k, p)?);
        self.mean = Some(mean);
        Ok(())
    }

    /// Transform data by projecting onto principal components.
    pub fn transform(&self, x: &Matrix) -> PrediktResult<Matrix> {
        let (Some(mean), Some(components)) = (self.mean.as_ref(), self.components.as_ref()) else {
            return Err(PrediktError::NotFitted("PCA"));
        };
        if x.cols() != mean.len() {
            return Err(PrediktError::DimensionMismatch(format!(
                "PCA was fitted on {} features, got {}",
                mean.len(),
                x.cols()
            )));
        }
        center(x, mean)?.matmul(&components.transpose())
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&mut self, x: &Matrix) -> PrediktResult<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Explained variance ratio for each component.
    pub fn explained_variance_ratio(&self) -> Option<Vec<f64>> {
        self.explained_variance.as_ref().map(|ev| {
            if self.total_variance > 0.0 {
                ev.iter().map(|&v| v / self.total_variance).collect()
            } else {
                vec![0.0; ev.len()]
            }
        })
    }
}

fn center(x: &Matrix, mean: &[f64]) -> PrediktResult<Matrix> {
    let mut data = Vec::with_capacity(x.rows() * x.cols());
    for row in x.iter_rows() {
        data.extend(row.iter().zip(mean).map(|(v, m)| v - m));
    }
    Matrix::new(data, x.rows(), x.cols())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn correlated() -> Matrix {
        Matrix::from_rows(&[
            vec![2.5, 2.4],
            vec![0.5, 0.7],
            vec![2.2, 2.9],
            vec![1.9, 2.2],
            vec![3.1, 3.0],
            vec![2.3, 2.7],
            vec![2.0, 1.6],
            vec![1.0, 1.1],
            vec![1.5, 1.6],
            vec![1.1, 0.9],
        ])
        .unwrap()
    }

    #[test]
    fn test_pca() {
        let mut pca = PCA::new(1);
        let x_reduced = pca.fit_transform(&correlated()).unwrap();
        assert_eq!(x_reduced.shape(), (10, 1));

        // Well-known values for this dataset
        let ev = pca.explained_variance.as_ref().unwrap();
        assert_abs_diff_eq!(ev[0], 1.28402771, epsilon = 1e-6);
        let ratio = pca.explained_variance_ratio().unwrap();
        assert_abs_diff_eq!(ratio[0], 0.96318131, epsilon = 1e-6);
        assert_abs_diff_eq!(x_reduced.get(0, 0).unwrap().abs(), 0.82797019, epsilon = 1e-6);
    }

    #[test]
    fn test_pca_is_deterministic() {
        let mut a = PCA::new(2);
        let mut b = PCA::new(2);
        let xa = a.fit_transform(&correlated()).unwrap();
        let xb = b.fit_transform(&correlated()).unwrap();
        assert_eq!(xa, xb);
    }

    #[test]
    fn test_too_many_components() {
        let mut pca = PCA::new(3);
        assert!(matches!(
            pca.fit(&correlated()),
            Err(PrediktError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_transform_before_fit() {
        let pca = PCA::new(1);
        assert!(pca.transform(&correlated()).is_err());
    }
}
