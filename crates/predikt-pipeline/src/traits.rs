use predikt_core::{Frame, Matrix, PrediktResult};
use predikt_linear::{LinearRegression, LogisticRegression, Ridge};
use predikt_preprocessing::{ColumnTransformer, StandardScaler, PCA};
use predikt_tree::DecisionTreeRegressor;

/// Trait for unsupervised transformers (scalers, encoders, reducers).
pub trait Transformer {
    type Input: ?Sized;

    fn fit(&mut self, x: &Self::Input) -> PrediktResult<()>;
    fn transform(&self, x: &Self::Input) -> PrediktResult<Matrix>;
    fn fit_transform(&mut self, x: &Self::Input) -> PrediktResult<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Trait for supervised estimators.
pub trait Estimator {
    type Target: Copy;

    fn fit(&mut self, x: &Matrix, y: &[Self::Target]) -> PrediktResult<()>;
    fn predict(&self, x: &Matrix) -> PrediktResult<Vec<Self::Target>>;
}

impl Transformer for StandardScaler {
    type Input = Matrix;

    fn fit(&mut self, x: &Matrix) -> PrediktResult<()> {
        StandardScaler::fit(self, x)
    }

    fn transform(&self, x: &Matrix) -> PrediktResult<Matrix> {
        StandardScaler::transform(self, x)
    }
}

impl Transformer for PCA {
    type Input = Matrix;

    fn fit(&mut self, x: &Matrix) -> PrediktResult<()> {
        PCA::fit(self, x)
    }

    fn transform(&self, x: &Matrix) -> PrediktResult<Matrix> {
        PCA::transform(self, x)
    }
}

impl Transformer for ColumnTransformer {
    type Input = Frame;

    fn fit(&mut self, x: &Frame) -> PrediktResult<()> {
        ColumnTransformer::fit(self, x)
    }

    fn transform(&self, x: &Frame) -> PrediktResult<Matrix> {
        ColumnTransformer::transform(self, x)
    }
}

macro_rules! impl_estimator {
    ($ty:ty, $target:ty) => {
        impl Estimator for $ty {
            type Target = $target;

            fn fit(&mut self, x: &Matrix, y: &[$target]) -> PrediktResult<()> {
                <$ty>::fit(self, x, y)
            }

            fn predict(&self, x: &Matrix) -> PrediktResult<Vec<$target>> {
                <$ty>::predict(self, x)
            }
        }
    };
}

impl_estimator!(LinearRegression, f64);
impl_estimator!(Ridge, f64);
impl_estimator!(DecisionTreeRegressor, f64);
impl_estimator!(LogisticRegression, usize);

#[cfg(test)]
mod tests {
    use super::*;

    fn chain<A, B>(first: &mut A, second: &mut B, x: &Matrix) -> PrediktResult<Matrix>
    where
        A: Transformer<Input = Matrix>,
        B: Transformer<Input = Matrix>,
    {
        let mid = first.fit_transform(x)?;
        second.fit_transform(&mid)
    }

    #[test]
    fn test_transformers_chain() {
        let x = Matrix::from_rows(&[
            vec![1.0, 10.0, 0.5],
            vec![2.0, 20.0, 0.1],
            vec![3.0, 35.0, 0.7],
            vec![4.0, 38.0, 0.2],
        ])
        .unwrap();
        let mut scaler = StandardScaler::new();
        let mut pca = PCA::new(2);
        let out = chain(&mut scaler, &mut pca, &x).unwrap();
        assert_eq!(out.shape(), (4, 2));
    }

    #[test]
    fn test_estimators_through_trait() {
        fn fit_predict<E: Estimator>(mut e: E, x: &Matrix, y: &[E::Target]) -> Vec<E::Target> {
            e.fit(x, y).unwrap();
            e.predict(x).unwrap()
        }
        let x = Matrix::from_rows(&[vec![0.0], vec![1.0], vec![5.0], vec![6.0]]).unwrap();
        assert_eq!(
            fit_predict(DecisionTreeRegressor::default(), &x, &[1.0, 1.0, 3.0, 3.0]),
            vec![1.0, 1.0, 3.0, 3.0]
        );
        assert_eq!(fit_predict(LogisticRegression::default(), &x, &[0, 0, 1, 1]), vec![0, 0, 1, 1]);
    }
}
