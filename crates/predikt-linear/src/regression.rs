use predikt_core::{Matrix, PrediktError, PrediktResult};
use predikt_linalg::{lstsq_min_norm, solve};
use serde::{Deserialize, Serialize};

fn check_xy(x: &Matrix, y: &[f64]) -> PrediktResult<()> {
    if x.rows() == 0 {
        return Err(PrediktError::EmptyInput("cannot fit on 0 samples".into()));
    }
    if x.rows() != y.len() {
        return Err(PrediktError::DimensionMismatch(format!(
            "X has {} rows but y has {} elements",
            x.rows(),
            y.len()
        )));
    }
    Ok(())
}

/// Center X column-wise and y, returning the means used.
fn center(x: &Matrix, y: &[f64]) -> PrediktResult<(Matrix, Vec<f64>, Vec<f64>, f64)> {
    let x_mean = x.column_means();
    let y_mean = y.iter().sum::<f64>() / y.len() as f64;
    let mut data = Vec::with_capacity(x.rows() * x.cols());
    for row in x.iter_rows() {
        data.extend(row.iter().zip(&x_mean).map(|(v, m)| v - m));
    }
    let yc = y.iter().map(|v| v - y_mean).collect();
    Ok((Matrix::new(data, x.rows(), x.cols())?, yc, x_mean, y_mean))
}

fn linear_predict(weights: &[f64], bias: f64, x: &Matrix) -> PrediktResult<Vec<f64>> {
    if x.cols() != weights.len() {
        return Err(PrediktError::DimensionMismatch(format!(
            "model was fitted on {} features, got {}",
            weights.len(),
            x.cols()
        )));
    }
    Ok(x.matvec(weights)?.into_iter().map(|v| v + bias).collect())
}

/// Ordinary Least Squares linear regression.
///
/// Fits `y = Xw + b` by minimum-norm least squares on centered data, so
/// collinear designs (a complete one-hot block, duplicated columns) still
/// yield a unique, finite solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub weights: Option<Vec<f64>>,
    pub bias: f64,
    pub fit_intercept: bool,
}

impl LinearRegression {
    pub fn new(fit_intercept: bool) -> Self {
        LinearRegression {
            weights: None,
            bias: 0.0,
            fit_intercept,
        }
    }

    pub fn fit(&mut self, x: &Matrix, y: &[f64]) -> PrediktResult<()> {
        check_xy(x, y)?;
        if self.fit_intercept {
            let (xc, yc, x_mean, y_mean) = center(x, y)?;
            let w = lstsq_min_norm(&xc, &yc)?;
            self.bias = y_mean - w.iter().zip(&x_mean).map(|(a, b)| a * b).sum::<f64>();
            self.weights = Some(w);
        } else {
            self.weights = Some(lstsq_min_norm(x, y)?);
            self.bias = 0.0;
        }
        Ok(())
    }

    pub fn predict(&self, x: &Matrix) -> PrediktResult<Vec<f64>> {
        let w = self
            .weights
            .as_ref()
            .ok_or(PrediktError::NotFitted("LinearRegression"))?;
        linear_predict(w, self.bias, x)
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Ridge regression (L2-regularized).
///
/// Fits `(XcᵀXc + αI) w = Xcᵀyc` on centered data; the intercept is not
/// penalised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ridge {
    pub alpha: f64,
    pub weights: Option<Vec<f64>>,
    pub bias: f64,
}

impl Ridge {
    pub fn new(alpha: f64) -> Self {
        Ridge {
            alpha,
            weights: None,
            bias: 0.0,
        }
    }

    pub fn fit(&mut self, x: &Matrix, y: &[f64]) -> PrediktResult<()> {
        check_xy(x, y)?;
        if self.alpha <= 0.0 {
            return Err(PrediktError::InvalidParameter(format!(
                "Ridge alpha must be positive, got {}",
                self.alpha
            )));
        }
        let (xc, yc, x_mean, y_mean) = center(x, y)?;
        let xt = xc.transpose();
        let mut xtx = xt.matmul(&xc)?;
        for i in 0..xtx.rows() {
            let d = xtx.get(i, i)?;
            xtx.set(i, i, d + self.alpha)?;
        }
        let xty = xt.matvec(&yc)?;
        let w = solve(&xtx, &xty)?;

        self.bias = y_mean - w.iter().zip(&x_mean).map(|(a, b)| a * b).sum::<f64>();
        self.weights = Some(w);
        Ok(())
    }

    pub fn predict(&self, x: &Matrix) -> PrediktResult<Vec<f64>> {
        let w = self.weights.as_ref().ok_or(PrediktError::NotFitted("Ridge"))?;
        linear_predict(w, self.bias, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_regression() {
        // y = 2x + 1
        let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0], vec![5.0]]).unwrap();
        let y = [3.0, 5.0, 7.0, 9.0, 11.0];

        let mut model = LinearRegression::new(true);
        model.fit(&x, &y).unwrap();

        assert_abs_diff_eq!(model.weights.as_ref().unwrap()[0], 2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(model.bias, 1.0, epsilon = 1e-8);

        let pred = model.predict(&Matrix::from_row(&[6.0])).unwrap();
        assert_abs_diff_eq!(pred[0], 13.0, epsilon = 1e-8);
    }

    #[test]
    fn test_linear_regression_full_one_hot_block() {
        // Three-level one-hot block plus intercept is rank deficient
        let x = Matrix::from_rows(&[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        let y = [10.0, 20.0, 30.0, 10.0, 20.0, 30.0];

        let mut model = LinearRegression::default();
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(&y) {
            assert_abs_diff_eq!(p, t, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_ridge_shrinks() {
        let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0], vec![5.0]]).unwrap();
        let y = [3.0, 5.0, 7.0, 9.0, 11.0];

        let mut ridge = Ridge::new(10.0);
        ridge.fit(&x, &y).unwrap();
        let w = ridge.weights.as_ref().unwrap()[0];
        // Σ(x - x̄)² = 10, so w = 20 / (10 + 10)
        assert_abs_diff_eq!(w, 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(ridge.bias, 7.0 - 3.0 * w, epsilon = 1e-10);
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LinearRegression::default();
        assert!(matches!(
            model.predict(&Matrix::from_row(&[1.0])),
            Err(PrediktError::NotFitted(_))
        ));
    }
}
