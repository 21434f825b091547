use anyhow::Context;
use predikt_core::{Column, Frame, PrediktError, PrediktResult};
use predikt_embed::TextEmbedder;
use predikt_linear::LogisticRegression;
use predikt_metrics::{accuracy, ClassificationReport};
use predikt_preprocessing::{stratified_indices, LabelEncoder, StandardScaler, PCA};
use tracing::{info, warn};

use crate::artifacts::{feature_matrix, GenderArtifacts};
use crate::config::GenderConfig;
use crate::tracker::{ExperimentTracker, FileTracker, NoopTracker, RunStatus};

pub const GENDERS: [&str; 2] = ["male", "female"];

/// Rows usable for training, with every column in its working type.
#[derive(Debug, Clone, PartialEq)]
pub struct Users {
    pub names: Vec<String>,
    pub companies: Vec<String>,
    pub ages: Vec<f64>,
    pub codes: Vec<f64>,
    pub genders: Vec<String>,
}

fn text_column(frame: &Frame, name: &str) -> PrediktResult<Vec<String>> {
    Ok(match frame.column(name)? {
        Column::Categorical(v) => v.clone(),
        Column::Numeric(v) => v.iter().map(|x| x.to_string()).collect(),
    })
}

fn numeric_column(frame: &Frame, name: &str) -> PrediktResult<Vec<f64>> {
    let values = frame.numeric(name)?.to_vec();
    if values.iter().any(|v| v.is_nan()) {
        return Err(PrediktError::InvalidParameter(format!("'{}' has missing values", name)));
    }
    Ok(values)
}

/// Keep `male`/`female` rows and pull out the columns the model uses.
pub fn select_users(frame: &Frame) -> PrediktResult<Users> {
    let genders = text_column(frame, "gender")?;
    let mask: Vec<bool> = genders.iter().map(|g| GENDERS.contains(&g.as_str())).collect();
    let kept = frame.filter_rows(&mask)?;
    info!(rows = frame.n_rows(), kept = kept.n_rows(), "filtered users by gender");
    if kept.n_rows() == 0 {
        return Err(PrediktError::EmptyInput("no rows with gender male or female".into()));
    }
    Ok(Users {
        names: text_column(&kept, "name")?,
        companies: text_column(&kept, "company")?,
        ages: numeric_column(&kept, "age")?,
        codes: numeric_column(&kept, "code")?,
        genders: text_column(&kept, "gender")?,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutcome {
    pub artifacts: GenderArtifacts,
    pub accuracy: f64,
    pub report: ClassificationReport,
}

/// Fit the whole feature path and the classifier.
///
/// PCA and the company encoder see every row; the scaler only sees the
/// training split.
pub fn train(
    users: &Users,
    cfg: &GenderConfig,
    embedder: &dyn TextEmbedder,
    tracker: &mut dyn ExperimentTracker,
) -> PrediktResult<TrainOutcome> {
    let mut label_encoder = LabelEncoder::new();
    let y = label_encoder.fit_transform(&users.genders)?;

    let embeddings = embedder.embed_batch(&users.names)?;
    let mut pca = PCA::new(cfg.pca_components);
    let reduced = pca.fit_transform(&embeddings)?;
    if let Some(ratio) = pca.explained_variance_ratio() {
        info!(
            components = cfg.pca_components,
            explained = ratio.iter().sum::<f64>(),
            "fitted PCA on name embeddings"
        );
    }

    let mut company_encoder = LabelEncoder::new();
    let companies = company_encoder.fit_transform(&users.companies)?;
    let x = feature_matrix(&reduced, &users.codes, &companies, &users.ages)?;

    let (train_idx, test_idx) = stratified_indices(&y, cfg.test_ratio, Some(cfg.seed))?;
    let mut scaler = StandardScaler::new();
    let x_train = scaler.fit_transform(&x.select_rows(&train_idx)?)?;
    let x_test = scaler.transform(&x.select_rows(&test_idx)?)?;
    let y_train: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
    let y_test: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();

    let mut model = LogisticRegression::new(cfg.learning_rate, cfg.max_iter).with_c(cfg.c);
    model.fit(&x_train, &y_train)?;
    let preds = model.predict(&x_test)?;
    let acc = accuracy(&y_test, &preds)?;
    let report = ClassificationReport::new(&y_test, &preds, &label_encoder.classes)?;
    info!("Accuracy: {:.4}", acc);
    info!("classification report:\n{}", report);

    tracker.log_param("pca_components", &cfg.pca_components.to_string())?;
    tracker.log_param("max_iter", &cfg.max_iter.to_string())?;
    tracker.log_param("embedder", &format!("{:?}", cfg.embedder))?;
    tracker.log_metric("accuracy", acc)?;
    let snapshot = serde_json::to_value(&model).map_err(|e| PrediktError::Serialization(e.to_string()))?;
    tracker.log_artifact("gender_classifier", &snapshot)?;

    Ok(TrainOutcome {
        artifacts: GenderArtifacts {
            embedder: cfg.embedder.clone(),
            model,
            pca,
            scaler,
            label_encoder,
            company_encoder,
        },
        accuracy: acc,
        report,
    })
}

/// Read the dataset, train, track the run, and write the artifact directory.
pub fn run(cfg: &GenderConfig) -> anyhow::Result<TrainOutcome> {
    let frame = predikt_io::read_csv(&cfg.data_path)
        .with_context(|| format!("reading dataset {}", cfg.data_path.display()))?;
    let users = select_users(&frame)?;
    let embedder = cfg.embedder.build().context("building text embedder")?;

    let mut tracker: Box<dyn ExperimentTracker> = if cfg.tracking.enabled {
        Box::new(FileTracker::start(&cfg.tracking.root, &cfg.tracking.experiment)?)
    } else {
        Box::new(NoopTracker)
    };

    let result = train(&users, cfg, embedder.as_ref(), tracker.as_mut())
        .context("training gender classifier")
        .and_then(|outcome| {
            outcome
                .artifacts
                .save(&cfg.artifact_dir)
                .with_context(|| format!("saving artifacts to {}", cfg.artifact_dir.display()))?;
            Ok(outcome)
        });
    let status = if result.is_ok() { RunStatus::Finished } else { RunStatus::Failed };
    if let Err(e) = tracker.finish(status) {
        warn!(error = %e, ?status, "could not close tracking run");
    }
    let outcome = result?;
    info!("Training complete");
    Ok(outcome)
}
