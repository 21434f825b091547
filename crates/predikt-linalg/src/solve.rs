use predikt_core::{Matrix, PrediktError, PrediktResult};

use crate::decomposition::{lu, symmetric_eigen};

/// Relative eigenvalue cutoff for [`lstsq_min_norm`]: directions of XᵀX whose
/// eigenvalue falls below `RCOND * λ_max` are treated as null space.
pub const RCOND: f64 = 1e-10;

/// Solve the linear system Ax = b using LU decomposition.
pub fn solve(a: &Matrix, b: &[f64]) -> PrediktResult<Vec<f64>> {
    let n = a.rows();
    if b.len() != n {
        return Err(PrediktError::DimensionMismatch(format!(
            "solve: b has {} elements but A is {}x{}",
            b.len(),
            n,
            a.cols()
        )));
    }

    let decomp = lu(a)?;
    let l = decomp.l.data();
    let u = decomp.u.data();

    // Forward substitution: L * y = P * b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[i * n + j] * y[j]).sum();
        y[i] = b[decomp.pivot[i]] - sum;
    }

    // Back substitution: U * x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| u[i * n + j] * x[j]).sum();
        let diag = u[i * n + i];
        if diag.abs() < f64::EPSILON {
            return Err(PrediktError::SingularMatrix);
        }
        x[i] = (y[i] - sum) / diag;
    }

    Ok(x)
}

/// Matrix inverse via LU, one column at a time.
pub fn inv(a: &Matrix) -> PrediktResult<Matrix> {
    let n = a.rows();
    let mut out = Matrix::zeros(n, n);
    for col in 0..n {
        let mut e = vec![0.0; n];
        e[col] = 1.0;
        let x = solve(a, &e)?;
        for (row, v) in x.into_iter().enumerate() {
            out.set(row, col, v)?;
        }
    }
    Ok(out)
}

/// Minimum-norm least-squares solution of `min ||Xw - y||²`.
///
/// Works on rank-deficient designs (e.g. a full one-hot block next to an
/// intercept): the normal matrix XᵀX is eigendecomposed and only directions
/// with eigenvalue above `RCOND * λ_max` contribute to `w`.
pub fn lstsq_min_norm(x: &Matrix, y: &[f64]) -> PrediktResult<Vec<f64>> {
    if x.rows() != y.len() {
        return Err(PrediktError::DimensionMismatch(format!(
            "lstsq: X has {} rows but y has {} elements",
            x.rows(),
            y.len()
        )));
    }
    let p = x.cols();
    if p == 0 {
        return Ok(Vec::new());
    }

    let xt = x.transpose();
    let xtx = xt.matmul(x)?;
    let xty = xt.matvec(y)?;

    let eig = symmetric_eigen(&xtx)?;
    let lambda_max = eig.values.first().copied().unwrap_or(0.0);
    let cutoff = (lambda_max * RCOND).max(f64::MIN_POSITIVE);

    let mut w = vec![0.0; p];
    for (k, &lambda) in eig.values.iter().enumerate() {
        if lambda <= cutoff {
            break;
        }
        let v = eig.vectors.column(k)?;
        let coef = v.iter().zip(&xty).map(|(a, b)| a * b).sum::<f64>() / lambda;
        for (wi, vi) in w.iter_mut().zip(&v) {
            *wi += coef * vi;
        }
    }
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_solve() {
        // 2x + y = 5, x + 3y = 10  =>  x = 1, y = 3
        let a = Matrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let x = solve(&a, &[5.0, 10.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_inv() {
        let a = Matrix::from_rows(&[vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
        let a_inv = inv(&a).unwrap();
        let prod = a.matmul(&a_inv).unwrap();
        let eye = Matrix::identity(2);
        for (p, e) in prod.data().iter().zip(eye.data()) {
            assert_abs_diff_eq!(p, e, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lstsq_full_rank() {
        // y = 2a - b, exact
        let x = Matrix::from_rows(&[
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![2.0, 1.0],
        ])
        .unwrap();
        let y = [2.0, -1.0, 1.0, 3.0];
        let w = lstsq_min_norm(&x, &y).unwrap();
        assert_abs_diff_eq!(w[0], 2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(w[1], -1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_lstsq_rank_deficient_picks_min_norm() {
        // Two identical columns: any w0 + w1 = 1 fits, min-norm is (0.5, 0.5)
        let x = Matrix::from_rows(&[vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]]).unwrap();
        let y = [1.0, 2.0, 3.0];
        let w = lstsq_min_norm(&x, &y).unwrap();
        assert_abs_diff_eq!(w[0], 0.5, epsilon = 1e-8);
        assert_abs_diff_eq!(w[1], 0.5, epsilon = 1e-8);
    }
}
