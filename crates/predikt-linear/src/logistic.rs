use predikt_core::{Matrix, PrediktError, PrediktResult};
use serde::{Deserialize, Serialize};

/// Logistic Regression: binary classification via gradient descent.
///
/// Minimises the mean log-loss plus `||w||² / (2·C·n)`, the per-sample form
/// of the usual `C`-weighted objective. The intercept is not penalised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub weights: Option<Vec<f64>>,
    pub bias: f64,
    pub c: f64,
    pub learning_rate: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        LogisticRegression {
            weights: None,
            bias: 0.0,
            c: 1.0,
            learning_rate: 0.1,
            max_iter: 1000,
            tol: 1e-6,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, max_iter: usize) -> Self {
        LogisticRegression {
            learning_rate,
            max_iter,
            ..Default::default()
        }
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Fit on class labels `0` / `1`.
    pub fn fit(&mut self, x: &Matrix, y: &[usize]) -> PrediktResult<()> {
        let (n, p) = x.shape();
        if n == 0 {
            return Err(PrediktError::EmptyInput("cannot fit on 0 samples".into()));
        }
        if n != y.len() {
            return Err(PrediktError::DimensionMismatch(format!(
                "X has {} rows but y has {} elements",
                n,
                y.len()
            )));
        }
        if let Some(bad) = y.iter().find(|&&c| c > 1) {
            return Err(PrediktError::InvalidParameter(format!(
                "LogisticRegression is binary, got class {}",
                bad
            )));
        }
        if self.c <= 0.0 {
            return Err(PrediktError::InvalidParameter(format!("C must be positive, got {}", self.c)));
        }

        let n_f = n as f64;
        let mut w = vec![0.0; p];
        let mut b = 0.0;

        for _iter in 0..self.max_iter {
            let mut dw = vec![0.0; p];
            let mut db = 0.0;

            for (row, &yi) in x.iter_rows().zip(y) {
                let z = b + row.iter().zip(&w).map(|(a, c)| a * c).sum::<f64>();
                let error = sigmoid(z) - yi as f64;
                for (d, &v) in dw.iter_mut().zip(row) {
                    *d += error * v;
                }
                db += error;
            }

            let mut max_grad: f64 = (db / n_f).abs();
            for (wj, dj) in w.iter_mut().zip(&dw) {
                let grad = dj / n_f + *wj / (self.c * n_f);
                *wj -= self.learning_rate * grad;
                max_grad = max_grad.max(grad.abs());
            }
            b -= self.learning_rate * (db / n_f);

            if max_grad < self.tol {
                break;
            }
        }

        self.weights = Some(w);
        self.bias = b;
        Ok(())
    }

    /// Probability of class `1` for each row.
    pub fn predict_proba(&self, x: &Matrix) -> PrediktResult<Vec<f64>> {
        let w = self
            .weights
            .as_ref()
            .ok_or(PrediktError::NotFitted("LogisticRegression"))?;
        if x.cols() != w.len() {
            return Err(PrediktError::DimensionMismatch(format!(
                "model was fitted on {} features, got {}",
                w.len(),
                x.cols()
            )));
        }
        Ok(x
            .iter_rows()
            .map(|row| sigmoid(self.bias + row.iter().zip(w).map(|(a, c)| a * c).sum::<f64>()))
            .collect())
    }

    /// Predict class labels (threshold = 0.5).
    pub fn predict(&self, x: &Matrix) -> PrediktResult<Vec<usize>> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| usize::from(p >= 0.5))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_regression() {
        // Linearly separable data
        let x = Matrix::from_rows(&[
            vec![0.0, 0.0],
            vec![0.5, 0.5],
            vec![1.0, 1.0],
            vec![5.0, 5.0],
            vec![5.5, 5.5],
            vec![6.0, 6.0],
        ])
        .unwrap();
        let y = [0, 0, 0, 1, 1, 1];

        let mut model = LogisticRegression::new(0.1, 1000);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.predict(&x).unwrap(), y.to_vec());
        let proba = model.predict_proba(&x).unwrap();
        assert!(proba[0] < 0.5 && proba[5] > 0.5);
    }

    #[test]
    fn test_rejects_multiclass() {
        let x = Matrix::from_rows(&[vec![0.0], vec![1.0]]).unwrap();
        let mut model = LogisticRegression::default();
        assert!(model.fit(&x, &[0, 2]).is_err());
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-15);
    }
}
