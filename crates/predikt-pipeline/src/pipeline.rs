use predikt_core::{ColumnKind, FeatureRecord, Frame, PrediktError, PrediktResult};
use predikt_preprocessing::ColumnTransformer;
use serde::{Deserialize, Serialize};

use crate::regressor::{Regressor, RegressorSpec};
use crate::traits::{Estimator, Transformer};

/// Column preprocessing followed by a regression model.
///
/// The whole pipeline serializes as one artifact, so the exact
/// training-time feature path travels with the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    preprocessor: ColumnTransformer,
    model: Regressor,
    fitted: bool,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, preprocessor: ColumnTransformer, spec: &RegressorSpec) -> Self {
        Pipeline {
            name: name.into(),
            preprocessor,
            model: spec.build(),
            fitted: false,
        }
    }

    /// Fit the preprocessor and the model.
    pub fn fit(&mut self, x: &Frame, y: &[f64]) -> PrediktResult<()> {
        if x.n_rows() != y.len() {
            return Err(PrediktError::DimensionMismatch(format!(
                "frame has {} rows but target has {} elements",
                x.n_rows(),
                y.len()
            )));
        }
        let features = self.preprocessor.fit_transform(x)?;
        self.model.fit(&features, y)?;
        self.fitted = true;
        Ok(())
    }

    /// Transform through the preprocessor and predict with the model.
    pub fn predict(&self, x: &Frame) -> PrediktResult<Vec<f64>> {
        if !self.fitted {
            return Err(PrediktError::NotFitted("Pipeline"));
        }
        let features = Transformer::transform(&self.preprocessor, x)?;
        self.model.predict(&features)
    }

    /// Rebuild a one-row frame from a record using the fitted input schema.
    pub fn record_to_frame(&self, record: &FeatureRecord) -> PrediktResult<Frame> {
        self.preprocessor.record_to_frame(record)
    }

    pub fn predict_record(&self, record: &FeatureRecord) -> PrediktResult<f64> {
        let frame = self.record_to_frame(record)?;
        self.predict(&frame)?
            .into_iter()
            .next()
            .ok_or_else(|| PrediktError::EmptyInput("model returned no prediction".into()))
    }

    /// Input columns (and kinds) the pipeline was fitted on, in order.
    pub fn input_schema(&self) -> &[(String, ColumnKind)] {
        self.preprocessor.input_schema()
    }

    pub fn n_features_out(&self) -> usize {
        self.preprocessor.n_output_features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use predikt_core::Column;

    fn training_frame() -> (Frame, Vec<f64>) {
        let from: Vec<String> = ["A", "B", "A", "B", "A", "B"].iter().map(|s| s.to_string()).collect();
        let dist = vec![100.0, 200.0, 300.0, 400.0, 500.0, 600.0];
        let y: Vec<f64> = from
            .iter()
            .zip(&dist)
            .map(|(f, d)| d * 2.0 + if f == "A" { 50.0 } else { 0.0 })
            .collect();
        let frame = Frame::new()
            .with_column("from", Column::Categorical(from))
            .unwrap()
            .with_column("distance", Column::Numeric(dist))
            .unwrap();
        (frame, y)
    }

    #[test]
    fn test_linear_pipeline_fits_exactly() {
        let (frame, y) = training_frame();
        let mut p = Pipeline::new("LinearRegression", ColumnTransformer::new(), &RegressorSpec::LinearRegression);
        p.fit(&frame, &y).unwrap();
        let pred = p.predict(&frame).unwrap();
        for (a, b) in pred.iter().zip(&y) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        }
        assert_eq!(p.n_features_out(), 3);
    }

    #[test]
    fn test_predict_record_and_serde_round_trip() {
        let (frame, y) = training_frame();
        let mut p = Pipeline::new(
            "DecisionTree",
            ColumnTransformer::new(),
            &RegressorSpec::DecisionTree { max_depth: 10 },
        );
        p.fit(&frame, &y).unwrap();

        let record = FeatureRecord::new().with("distance", 300.0).with("from", "A");
        let direct = p.predict_record(&record).unwrap();
        assert_abs_diff_eq!(direct, 650.0);

        let json = serde_json::to_string(&p).unwrap();
        let back: Pipeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back.predict_record(&record).unwrap(), direct);
        assert_eq!(back.input_schema(), p.input_schema());
    }

    #[test]
    fn test_unfitted() {
        let (frame, _) = training_frame();
        let p = Pipeline::new("x", ColumnTransformer::new(), &RegressorSpec::LinearRegression);
        assert!(matches!(p.predict(&frame), Err(PrediktError::NotFitted(_))));
    }
}
