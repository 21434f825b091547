use std::io::Read;
use std::path::Path;

use predikt_core::{Column, Frame, PrediktError, PrediktResult};

fn csv_err(err: csv::Error) -> PrediktError {
    PrediktError::Parse(err.to_string())
}

/// Read a CSV file with a header row into a [`Frame`].
///
/// A column whose every non-empty cell parses as a float becomes numeric
/// (empty cells read as NaN); any other column is categorical. Columns keep
/// file order.
pub fn read_csv(path: impl AsRef<Path>) -> PrediktResult<Frame> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| PrediktError::Io(format!("{}: {}", path.display(), e)))?;
    let frame = read_csv_from(file)?;
    tracing::debug!(path = %path.display(), rows = frame.n_rows(), cols = frame.n_cols(), "read csv");
    Ok(frame)
}

/// Same as [`read_csv`] over any reader.
pub fn read_csv_from<R: Read>(reader: R) -> PrediktResult<Frame> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        for (col, field) in cells.iter_mut().zip(record.iter()) {
            col.push(field.trim().to_string());
        }
    }

    let mut frame = Frame::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        frame.push_column(name, infer_column(raw))?;
    }
    Ok(frame)
}

fn infer_column(raw: Vec<String>) -> Column {
    let any_value = raw.iter().any(|c| !c.is_empty());
    let parsed: Option<Vec<f64>> = raw
        .iter()
        .map(|c| if c.is_empty() { Some(f64::NAN) } else { c.parse::<f64>().ok() })
        .collect();
    match parsed {
        Some(values) if any_value => Column::Numeric(values),
        _ => Column::Categorical(raw),
    }
}
