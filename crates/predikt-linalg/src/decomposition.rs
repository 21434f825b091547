use predikt_core::{Matrix, PrediktError, PrediktResult};

/// LU decomposition result: P * A = L * U
pub struct LuDecomposition {
    pub l: Matrix,
    pub u: Matrix,
    pub pivot: Vec<usize>,
}

/// Eigendecomposition of a symmetric matrix: A = V * diag(values) * Vᵀ
///
/// `values` are sorted in descending order and column `k` of `vectors`
/// is the unit eigenvector belonging to `values[k]`.
pub struct SymmetricEigen {
    pub values: Vec<f64>,
    pub vectors: Matrix,
}

const JACOBI_MAX_SWEEPS: usize = 100;

fn require_square(a: &Matrix, what: &str) -> PrediktResult<usize> {
    let (n, m) = a.shape();
    if n != m {
        return Err(PrediktError::DimensionMismatch(format!(
            "{} requires a square matrix, got {}x{}",
            what, n, m
        )));
    }
    Ok(n)
}

/// LU decomposition with partial pivoting.
pub fn lu(a: &Matrix) -> PrediktResult<LuDecomposition> {
    let n = require_square(a, "LU")?;

    let mut u = a.data().to_vec();
    let mut l = vec![0.0; n * n];
    let mut pivot: Vec<usize> = (0..n).collect();

    for k in 0..n {
        let (max_row, max_val) = (k..n)
            .map(|i| (i, u[i * n + k].abs()))
            .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if max_val < f64::EPSILON {
            return Err(PrediktError::SingularMatrix);
        }

        if max_row != k {
            pivot.swap(k, max_row);
            for j in 0..n {
                u.swap(k * n + j, max_row * n + j);
            }
            for j in 0..k {
                l.swap(k * n + j, max_row * n + j);
            }
        }

        l[k * n + k] = 1.0;
        for i in (k + 1)..n {
            let factor = u[i * n + k] / u[k * n + k];
            l[i * n + k] = factor;
            for j in k..n {
                u[i * n + j] -= factor * u[k * n + j];
            }
        }
    }

    Ok(LuDecomposition {
        l: Matrix::new(l, n, n)?,
        u: Matrix::new(u, n, n)?,
        pivot,
    })
}

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Eigenvector signs are fixed so that the largest-magnitude component of
/// each vector is positive, which makes the result deterministic.
pub fn symmetric_eigen(a: &Matrix) -> PrediktResult<SymmetricEigen> {
    let n = require_square(a, "symmetric_eigen")?;
    let mut m = a.data().to_vec();
    let mut v = Matrix::identity(n).into_data();

    let scale: f64 = m.iter().map(|x| x * x).sum::<f64>().sqrt().max(f64::MIN_POSITIVE);

    for _sweep in 0..JACOBI_MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| ((p + 1)..n).map(move |q| (p, q)))
            .map(|(p, q)| m[p * n + q] * m[p * n + q])
            .sum::<f64>()
            .sqrt();
        if off <= 1e-14 * scale {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = m[p * n + q];
                if apq.abs() <= f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (m[q * n + q] - m[p * n + p]) / (2.0 * apq);
                let t = if theta.abs() > 1e150 {
                    0.5 / theta
                } else {
                    theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
                };
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = m[k * n + p];
                    let akq = m[k * n + q];
                    m[k * n + p] = c * akp - s * akq;
                    m[k * n + q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = m[p * n + k];
                    let aqk = m[q * n + k];
                    m[p * n + k] = c * apk - s * aqk;
                    m[q * n + k] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[k * n + p];
                    let vkq = v[k * n + q];
                    v[k * n + p] = c * vkp - s * vkq;
                    v[k * n + q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| m[j * n + j].total_cmp(&m[i * n + i]));

    let values: Vec<f64> = order.iter().map(|&i| m[i * n + i]).collect();
    let mut vectors = vec![0.0; n * n];
    for (dst, &src) in order.iter().enumerate() {
        let col: Vec<f64> = (0..n).map(|k| v[k * n + src]).collect();
        let pivot = col
            .iter()
            .copied()
            .max_by(|a, b| a.abs().total_cmp(&b.abs()))
            .unwrap_or(0.0);
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
        for (k, x) in col.into_iter().enumerate() {
            vectors[k * n + dst] = sign * x;
        }
    }

    Ok(SymmetricEigen {
        values,
        vectors: Matrix::new(vectors, n, n)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lu_reconstructs() {
        let a = Matrix::from_rows(&[
            vec![2.0, 1.0, 1.0],
            vec![4.0, -6.0, 0.0],
            vec![-2.0, 7.0, 2.0],
        ])
        .unwrap();
        let d = lu(&a).unwrap();
        let lu_prod = d.l.matmul(&d.u).unwrap();
        let pa = a.select_rows(&d.pivot).unwrap();
        for (x, y) in lu_prod.data().iter().zip(pa.data()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lu_singular() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        assert!(matches!(lu(&a), Err(PrediktError::SingularMatrix)));
    }

    #[test]
    fn test_symmetric_eigen() {
        let a = Matrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let e = symmetric_eigen(&a).unwrap();
        assert_abs_diff_eq!(e.values[0], 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(e.values[1], 1.0, epsilon = 1e-10);

        // A v = λ v for every pair
        for k in 0..2 {
            let v = e.vectors.column(k).unwrap();
            let av = a.matvec(&v).unwrap();
            for i in 0..2 {
                assert_abs_diff_eq!(av[i], e.values[k] * v[i], epsilon = 1e-10);
            }
        }
        // sign convention: dominant component positive
        let v0 = e.vectors.column(0).unwrap();
        assert!(v0.iter().copied().fold(f64::MIN, f64::max) > 0.0);
    }

    #[test]
    fn test_symmetric_eigen_diagonal_is_sorted() {
        let a = Matrix::from_rows(&[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 5.0, 0.0],
            vec![0.0, 0.0, 3.0],
        ])
        .unwrap();
        let e = symmetric_eigen(&a).unwrap();
        assert_eq!(e.values, vec![5.0, 3.0, 1.0]);
        assert_abs_diff_eq!(e.vectors.get(1, 0).unwrap(), 1.0);
    }
}
