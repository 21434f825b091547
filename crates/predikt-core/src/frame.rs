use crate::error::{PrediktError, PrediktResult};
use crate::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// Storage kind of a frame column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn describe(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "a string",
        }
    }
}

/// A single typed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Categorical(_) => ColumnKind::Categorical,
        }
    }

    fn select(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// Column-oriented table with named, typed columns in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Frame {
    pub fn new() -> Self {
        Frame::default()
    }

    /// Append a column. Its length must match the existing row count.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> PrediktResult<()> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(PrediktError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(PrediktError::DimensionMismatch(format!(
                "column '{}' has {} rows, frame has {}",
                name,
                column.len(),
                self.n_rows()
            )));
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> PrediktResult<Self> {
        self.push_column(name, column)?;
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> PrediktResult<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| PrediktError::MissingColumn(name.to_string()))
    }

    pub fn numeric(&self, name: &str) -> PrediktResult<&[f64]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            Column::Categorical(_) => Err(PrediktError::ColumnType {
                column: name.to_string(),
                expected: ColumnKind::Numeric.describe(),
            }),
        }
    }

    pub fn categorical(&self, name: &str) -> PrediktResult<&[String]> {
        match self.column(name)? {
            Column::Categorical(v) => Ok(v),
            Column::Numeric(_) => Err(PrediktError::ColumnType {
                column: name.to_string(),
                expected: ColumnKind::Categorical.describe(),
            }),
        }
    }

    /// Iterate `(name, column)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    pub fn schema(&self) -> Vec<(String, ColumnKind)> {
        self.iter().map(|(n, c)| (n.to_string(), c.kind())).collect()
    }

    pub fn remove_column(&mut self, name: &str) -> PrediktResult<Column> {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| PrediktError::MissingColumn(name.to_string()))?;
        self.names.remove(idx);
        Ok(self.columns.remove(idx))
    }

    /// Drop the named columns, ignoring names that are not present.
    pub fn drop_columns(&mut self, names: &[&str]) {
        for name in names {
            let _ = self.remove_column(name);
        }
    }

    /// Gather rows by index, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> PrediktResult<Frame> {
        let n = self.n_rows();
        if let Some(&bad) = indices.iter().find(|&&i| i >= n) {
            return Err(PrediktError::IndexOutOfBounds {
                index: bad,
                axis: 0,
                size: n,
            });
        }
        Ok(Frame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
        })
    }

    /// Keep only the rows whose mask entry is `true`.
    pub fn filter_rows(&self, mask: &[bool]) -> PrediktResult<Frame> {
        if mask.len() != self.n_rows() {
            return Err(PrediktError::DimensionMismatch(format!(
                "mask has {} entries, frame has {} rows",
                mask.len(),
                self.n_rows()
            )));
        }
        let keep: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i))
            .collect();
        self.select_rows(&keep)
    }

    /// Stack the named numeric columns into a matrix, in the given order.
    pub fn to_matrix(&self, names: &[&str]) -> PrediktResult<Matrix> {
        let cols: Vec<&[f64]> = names
            .iter()
            .map(|n| self.numeric(n))
            .collect::<PrediktResult<_>>()?;
        let rows = self.n_rows();
        let mut data = Vec::with_capacity(rows * cols.len());
        for i in 0..rows {
            data.extend(cols.iter().map(|c| c[i]));
        }
        Matrix::new(data, rows, cols.len())
    }
}
