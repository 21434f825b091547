use std::collections::BTreeMap;

use predikt_core::{Column, ColumnKind, FeatureRecord, Frame, Matrix, PrediktError, PrediktResult, Value};
use serde::{Deserialize, Serialize};

use crate::encoder::{HandleUnknown, OneHotEncoder};
use crate::scaler::StandardScaler;

/// Routes categorical columns through one-hot encoders and numeric columns
/// through a standard scaler, then concatenates the blocks.
///
/// Output layout: every categorical block (in feature order), then every
/// numeric column (in feature order). The input schema seen by `fit` is
/// stored so inference inputs can be rebuilt in exactly the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    default_policy: HandleUnknown,
    policies: BTreeMap<String, HandleUnknown>,
    schema: Vec<(String, ColumnKind)>,
    encoders: Vec<OneHotEncoder>,
    numeric: Vec<String>,
    scaler: StandardScaler,
}

impl ColumnTransformer {
    pub fn new() -> Self {
        ColumnTransformer::default()
    }

    /// Unknown-category policy for columns without an explicit override.
    pub fn with_default_policy(mut self, policy: HandleUnknown) -> Self {
        self.default_policy = policy;
        self
    }

    pub fn with_policy(mut self, column: impl Into<String>, policy: HandleUnknown) -> Self {
        self.policies.insert(column.into(), policy);
        self
    }

    pub fn fit(&mut self, frame: &Frame) -> PrediktResult<()> {
        if frame.n_rows() == 0 || frame.n_cols() == 0 {
            return Err(PrediktError::EmptyInput("ColumnTransformer.fit on empty frame".into()));
        }

        let mut encoders = Vec::new();
        let mut numeric = Vec::new();
        for (name, column) in frame.iter() {
            match column {
                Column::Categorical(values) => {
                    let policy = self.policies.get(name).copied().unwrap_or(self.default_policy);
                    let mut enc = OneHotEncoder::new(name, policy);
                    enc.fit(values)?;
                    encoders.push(enc);
                }
                Column::Numeric(_) => numeric.push(name.to_string()),
            }
        }

        let mut scaler = StandardScaler::new();
        if !numeric.is_empty() {
            let names: Vec<&str> = numeric.iter().map(String::as_str).collect();
            scaler.fit(&frame.to_matrix(&names)?)?;
        }

        self.schema = frame.schema();
        self.encoders = encoders;
        self.numeric = numeric;
        self.scaler = scaler;
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        !self.schema.is_empty()
    }

    pub fn transform(&self, frame: &Frame) -> PrediktResult<Matrix> {
        if !self.is_fitted() {
            return Err(PrediktError::NotFitted("ColumnTransformer"));
        }
        let rows = frame.n_rows();
        let mut blocks = Vec::with_capacity(self.encoders.len() + 1);

        for enc in &self.encoders {
            blocks.push(enc.transform(frame.categorical(&enc.column)?)?);
        }

        if !self.numeric.is_empty() {
            let mut data = vec![0.0; rows * self.numeric.len()];
            let width = self.numeric.len();
            for (j, name) in self.numeric.iter().enumerate() {
                let values = numeric_values(frame, name)?;
                for (i, v) in values.into_iter().enumerate() {
                    data[i * width + j] = v;
                }
            }
            blocks.push(self.scaler.transform(&Matrix::new(data, rows, width)?)?);
        }

        let refs: Vec<&Matrix> = blocks.iter().collect();
        Matrix::hstack(&refs)
    }

    pub fn fit_transform(&mut self, frame: &Frame) -> PrediktResult<Matrix> {
        self.fit(frame)?;
        self.transform(frame)
    }

    /// Columns and kinds seen during `fit`, in feature order.
    pub fn input_schema(&self) -> &[(String, ColumnKind)] {
        &self.schema
    }

    pub fn n_output_features(&self) -> usize {
        self.encoders.iter().map(OneHotEncoder::n_features).sum::<usize>() + self.numeric.len()
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.encoders
            .iter()
            .flat_map(OneHotEncoder::feature_names)
            .chain(self.numeric.iter().cloned())
            .collect()
    }

    /// Build a single-row frame from a record, in the fitted schema order.
    ///
    /// Fields are looked up by name, so record order does not matter and
    /// extra fields are ignored. Numeric columns accept numbers and text that
    /// parses as a float; categorical columns accept text only.
    pub fn record_to_frame(&self, record: &FeatureRecord) -> PrediktResult<Frame> {
        if !self.is_fitted() {
            return Err(PrediktError::NotFitted("ColumnTransformer"));
        }
        let mut frame = Frame::new();
        for (name, kind) in &self.schema {
            let value = record
                .get(name)
                .ok_or_else(|| PrediktError::MissingColumn(name.clone()))?;
            let column = match (kind, value) {
                (ColumnKind::Numeric, Value::Number(v)) => Column::Numeric(vec![*v]),
                (ColumnKind::Numeric, Value::Text(s)) => Column::Numeric(vec![parse_numeric(name, s)?]),
                (ColumnKind::Categorical, Value::Text(s)) => Column::Categorical(vec![s.clone()]),
                (ColumnKind::Categorical, Value::Number(_)) => {
                    return Err(PrediktError::ColumnType {
                        column: name.clone(),
                        expected: kind.describe(),
                    })
                }
            };
            frame.push_column(name.as_str(), column)?;
        }
        Ok(frame)
    }
}

fn parse_numeric(column: &str, raw: &str) -> PrediktResult<f64> {
    raw.trim().parse::<f64>().map_err(|_| PrediktError::ColumnType {
        column: column.to_string(),
        expected: ColumnKind::Numeric.describe(),
    })
}

fn numeric_values(frame: &Frame, name: &str) -> PrediktResult<Vec<f64>> {
    match frame.column(name)? {
        Column::Numeric(v) => Ok(v.clone()),
        Column::Categorical(v) => v.iter().map(|s| parse_numeric(name, s)).collect(),
    }
}
