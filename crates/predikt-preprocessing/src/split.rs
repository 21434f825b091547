use std::collections::BTreeMap;

use predikt_core::{Matrix, PrediktError, PrediktResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

fn check_ratio(test_ratio: f64) -> PrediktResult<()> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(PrediktError::InvalidParameter(format!(
            "test_ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }
    Ok(())
}

/// Shuffle `0..n` and cut it into `(train, test)` index sets.
///
/// The test set holds `ceil(n * test_ratio)` rows; both sets must be non-empty.
pub fn train_test_indices(
    n: usize,
    test_ratio: f64,
    seed: Option<u64>,
) -> PrediktResult<(Vec<usize>, Vec<usize>)> {
    check_ratio(test_ratio)?;
    let test_size = (n as f64 * test_ratio).ceil() as usize;
    if test_size == 0 || test_size >= n {
        return Err(PrediktError::InvalidParameter(format!(
            "cannot split {} samples with test_ratio {}",
            n, test_ratio
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng_from(seed));
    let test = indices.split_off(n - test_size);
    Ok((indices, test))
}

/// Split preserving the class proportions of `labels` in both sets.
///
/// Each class contributes `round(count * test_ratio)` rows to the test set,
/// at least one when the class has two or more members.
pub fn stratified_indices(
    labels: &[usize],
    test_ratio: f64,
    seed: Option<u64>,
) -> PrediktResult<(Vec<usize>, Vec<usize>)> {
    check_ratio(test_ratio)?;
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &c) in labels.iter().enumerate() {
        by_class.entry(c).or_default().push(i);
    }

    let mut rng = rng_from(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();
    for (_, mut members) in by_class {
        members.shuffle(&mut rng);
        let count = members.len();
        let mut n_test = (count as f64 * test_ratio).round() as usize;
        if count >= 2 {
            n_test = n_test.clamp(1, count - 1);
        } else {
            n_test = 0;
        }
        test.extend(members.split_off(count - n_test));
        train.extend(members);
    }

    if train.is_empty() || test.is_empty() {
        return Err(PrediktError::InvalidParameter(format!(
            "cannot stratify {} samples with test_ratio {}",
            labels.len(),
            test_ratio
        )));
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);
    Ok((train, test))
}

/// Split data into training and test sets.
///
/// Returns `(X_train, X_test, y_train, y_test)`.
pub fn train_test_split(
    x: &Matrix,
    y: &[f64],
    test_ratio: f64,
    seed: Option<u64>,
) -> PrediktResult<(Matrix, Matrix, Vec<f64>, Vec<f64>)> {
    if x.rows() != y.len() {
        return Err(PrediktError::DimensionMismatch(format!(
            "X has {} rows but y has {} elements",
            x.rows(),
            y.len()
        )));
    }
    let (train, test) = train_test_indices(x.rows(), test_ratio, seed)?;
    Ok((
        x.select_rows(&train)?,
        x.select_rows(&test)?,
        train.iter().map(|&i| y[i]).collect(),
        test.iter().map(|&i| y[i]).collect(),
    ))
}
