use predikt_core::{Matrix, PrediktError, PrediktResult};
use serde::{Deserialize, Serialize};

/// Encode categorical string labels as integer indices.
///
/// Classes are kept sorted, so the code of a label is its rank among the
/// distinct labels seen during `fit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        LabelEncoder::default()
    }

    /// Fit the encoder on string labels.
    pub fn fit<S: AsRef<str>>(&mut self, labels: &[S]) -> PrediktResult<()> {
        if labels.is_empty() {
            return Err(PrediktError::EmptyInput("LabelEncoder.fit on 0 labels".into()));
        }
        let mut unique: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        unique.sort();
        unique.dedup();
        self.classes = unique;
        Ok(())
    }

    fn check_fitted(&self) -> PrediktResult<()> {
        if self.classes.is_empty() {
            return Err(PrediktError::NotFitted("LabelEncoder"));
        }
        Ok(())
    }

    /// Code of a single label. Labels not seen during `fit` are an error.
    pub fn transform_one(&self, label: &str) -> PrediktResult<usize> {
        self.check_fitted()?;
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| PrediktError::UnseenLabel(label.to_string()))
    }

    /// Transform string labels to integer codes.
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> PrediktResult<Vec<usize>> {
        labels.iter().map(|l| self.transform_one(l.as_ref())).collect()
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, labels: &[S]) -> PrediktResult<Vec<usize>> {
        self.fit(labels)?;
        self.transform(labels)
    }

    pub fn inverse_one(&self, code: usize) -> PrediktResult<&str> {
        self.check_fitted()?;
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(PrediktError::IndexOutOfBounds {
                index: code,
                axis: 0,
                size: self.classes.len(),
            })
    }

    /// Inverse transform: integer → string.
    pub fn inverse_transform(&self, codes: &[usize]) -> PrediktResult<Vec<String>> {
        codes
            .iter()
            .map(|&c| self.inverse_one(c).map(str::to_string))
            .collect()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

/// What a fitted [`OneHotEncoder`] does with a category it never saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    /// Encode as an all-zero block.
    #[default]
    Ignore,
    /// Fail with [`PrediktError::UnknownCategory`].
    Error,
}

/// One-hot encoder for a single categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub column: String,
    pub handle_unknown: HandleUnknown,
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn new(column: impl Into<String>, handle_unknown: HandleUnknown) -> Self {
        OneHotEncoder {
            column: column.into(),
            handle_unknown,
            categories: Vec::new(),
        }
    }

    pub fn fit(&mut self, values: &[String]) -> PrediktResult<()> {
        if values.is_empty() {
            return Err(PrediktError::EmptyInput(format!(
                "OneHotEncoder.fit on empty column '{}'",
                self.column
            )));
        }
        let mut cats = values.to_vec();
        cats.sort();
        cats.dedup();
        self.categories = cats;
        Ok(())
    }

    /// Binary matrix of shape `[values.len(), n_categories]`.
    pub fn transform(&self, values: &[String]) -> PrediktResult<Matrix> {
        if self.categories.is_empty() {
            return Err(PrediktError::NotFitted("OneHotEncoder"));
        }
        let k = self.categories.len();
        let mut out = Matrix::zeros(values.len(), k);
        for (i, v) in values.iter().enumerate() {
            match self.categories.binary_search(v) {
                Ok(j) => out.set(i, j, 1.0)?,
                Err(_) => match self.handle_unknown {
                    HandleUnknown::Ignore => {}
                    HandleUnknown::Error => {
                        return Err(PrediktError::UnknownCategory {
                            column: self.column.clone(),
                            value: v.clone(),
                        })
                    }
                },
            }
        }
        Ok(out)
    }

    pub fn n_features(&self) -> usize {
        self.categories.len()
    }

    /// Output feature names, `<column>_<category>`.
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}_{}", self.column, c))
            .collect()
    }
}
