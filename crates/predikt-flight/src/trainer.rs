use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use predikt_core::{Column, Frame, PrediktError, PrediktResult};
use predikt_metrics::RegressionScores;
use predikt_pipeline::{Pipeline, RegressorSpec};
use predikt_preprocessing::train_test_indices;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{FlightConfig, Metric, Selection};
use crate::features::add_date_features;

pub const TARGET: &str = "price";
pub const DROPPED: [&str; 2] = ["travelCode", "userCode"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScores {
    pub name: String,
    pub model: RegressorSpec,
    #[serde(flatten)]
    pub scores: RegressionScores,
}

/// What a training run did, written as JSON when a report path is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub n_train: usize,
    pub n_test: usize,
    pub features: Vec<String>,
    pub candidates: Vec<CandidateScores>,
    pub selected: String,
}

/// Turn the raw dataset into `(features, target)`.
///
/// Date parts replace `date`, the target and id columns are removed.
/// Blank cells in the target or any numeric feature are an error naming
/// the first offending row.
pub fn prepare(mut frame: Frame) -> PrediktResult<(Frame, Vec<f64>)> {
    add_date_features(&mut frame)?;
    let target = match frame.remove_column(TARGET)? {
        Column::Numeric(values) => values,
        Column::Categorical(_) => {
            return Err(PrediktError::ColumnType {
                column: TARGET.to_string(),
                expected: "numeric",
            })
        }
    };
    reject_missing(TARGET, &target)?;
    frame.drop_columns(&DROPPED);
    for (name, column) in frame.iter() {
        if let Column::Numeric(values) = column {
            reject_missing(name, values)?;
        }
    }
    Ok((frame, target))
}

fn reject_missing(column: &str, values: &[f64]) -> PrediktResult<()> {
    match values.iter().position(|v| v.is_nan()) {
        Some(i) => Err(PrediktError::InvalidParameter(format!(
            "'{}' has a missing value at row {}",
            column,
            i + 1
        ))),
        None => Ok(()),
    }
}

fn select<'a>(selection: &Selection, scored: &'a [CandidateScores]) -> PrediktResult<&'a CandidateScores> {
    let chosen = match selection {
        Selection::Fixed { name } => scored.iter().find(|c| &c.name == name),
        Selection::Best { metric } => scored.iter().min_by(|a, b| {
            let (ka, kb) = match metric {
                Metric::R2 => (-a.scores.r2, -b.scores.r2),
                Metric::Mae => (a.scores.mae, b.scores.mae),
                Metric::Rmse => (a.scores.rmse, b.scores.rmse),
            };
            ka.total_cmp(&kb)
        }),
    };
    chosen.ok_or_else(|| PrediktError::InvalidParameter(format!("no candidate matches selection {:?}", selection)))
}

/// Fit and score every candidate, return the selected fitted pipeline.
pub fn train(frame: Frame, cfg: &FlightConfig) -> PrediktResult<(Pipeline, TrainingReport)> {
    if cfg.candidates.is_empty() {
        return Err(PrediktError::InvalidParameter("no candidate models configured".into()));
    }
    let (features, target) = prepare(frame)?;
    let (train_idx, test_idx) = train_test_indices(features.n_rows(), cfg.test_ratio, Some(cfg.seed))?;
    let x_train = features.select_rows(&train_idx)?;
    let x_test = features.select_rows(&test_idx)?;
    let y_train: Vec<f64> = train_idx.iter().map(|&i| target[i]).collect();
    let y_test: Vec<f64> = test_idx.iter().map(|&i| target[i]).collect();
    info!(
        rows = features.n_rows(),
        train = train_idx.len(),
        test = test_idx.len(),
        "split flight dataset"
    );

    let mut fitted = Vec::with_capacity(cfg.candidates.len());
    let mut scored = Vec::with_capacity(cfg.candidates.len());
    for candidate in &cfg.candidates {
        let mut pipeline = Pipeline::new(candidate.name.clone(), cfg.preprocessor(), &candidate.model);
        pipeline.fit(&x_train, &y_train)?;
        let scores = RegressionScores::compute(&y_test, &pipeline.predict(&x_test)?)?;
        info!(
            "{} -> R2: {:.3}, MAE: {:.2}, RMSE: {:.2}",
            candidate.name, scores.r2, scores.mae, scores.rmse
        );
        scored.push(CandidateScores {
            name: candidate.name.clone(),
            model: candidate.model.clone(),
            scores,
        });
        fitted.push(pipeline);
    }

    let selected = select(&cfg.selection, &scored)?.name.clone();
    let pipeline = fitted
        .into_iter()
        .find(|p| p.name == selected)
        .ok_or_else(|| PrediktError::InvalidParameter(format!("candidate '{}' was not fitted", selected)))?;
    info!(model = %selected, "selected model");

    let report = TrainingReport {
        trained_at: Utc::now(),
        n_train: train_idx.len(),
        n_test: test_idx.len(),
        features: features.names().to_vec(),
        candidates: scored,
        selected,
    };
    Ok((pipeline, report))
}

/// Read the dataset, train, and write the artifact (and report, if configured).
pub fn run(cfg: &FlightConfig) -> anyhow::Result<TrainingReport> {
    let frame = predikt_io::read_csv(&cfg.data_path)
        .with_context(|| format!("reading dataset {}", cfg.data_path.display()))?;
    let (pipeline, report) = train(frame, cfg).context("training flight price models")?;

    let out = cfg.output_path();
    if out.exists() {
        warn!(path = %out.display(), "overwriting existing model artifact");
    }
    predikt_io::save_artifact(&pipeline, &out).with_context(|| format!("saving model to {}", out.display()))?;
    info!("Best Model: {}", report.selected);

    if let Some(path) = &cfg.report_path {
        write_report(&report, path)?;
    }
    Ok(report)
}

fn write_report(report: &TrainingReport, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("writing report {}", path.display()))?;
    info!(path = %path.display(), "wrote training report");
    Ok(())
}
