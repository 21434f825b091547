use std::path::Path;

use predikt_core::{Matrix, PrediktError, PrediktResult};
use predikt_embed::{EmbedderConfig, TextEmbedder};
use predikt_io::{load_artifact, save_artifact};
use predikt_linear::LogisticRegression;
use predikt_preprocessing::{LabelEncoder, StandardScaler, PCA};

pub const MODEL_FILE: &str = "gender_model.json";
pub const PCA_FILE: &str = "pca.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const COMPANY_ENCODER_FILE: &str = "company_encoder.json";
pub const EMBEDDER_FILE: &str = "embedder.json";

/// The five fitted objects of the gender classifier, stored as separate files,
/// plus the settings of the embedder the PCA was fitted on.
#[derive(Debug, Clone, PartialEq)]
pub struct GenderArtifacts {
    pub embedder: EmbedderConfig,
    pub model: LogisticRegression,
    pub pca: PCA,
    pub scaler: StandardScaler,
    pub label_encoder: LabelEncoder,
    pub company_encoder: LabelEncoder,
}

impl GenderArtifacts {
    pub fn save(&self, dir: impl AsRef<Path>) -> PrediktResult<()> {
        let dir = dir.as_ref();
        save_artifact(&self.embedder, dir.join(EMBEDDER_FILE))?;
        save_artifact(&self.model, dir.join(MODEL_FILE))?;
        save_artifact(&self.pca, dir.join(PCA_FILE))?;
        save_artifact(&self.scaler, dir.join(SCALER_FILE))?;
        save_artifact(&self.label_encoder, dir.join(LABEL_ENCODER_FILE))?;
        save_artifact(&self.company_encoder, dir.join(COMPANY_ENCODER_FILE))?;
        Ok(())
    }

    /// Load every file; any one missing is an error.
    pub fn load(dir: impl AsRef<Path>) -> PrediktResult<Self> {
        let dir = dir.as_ref();
        Ok(GenderArtifacts {
            embedder: load_artifact(dir.join(EMBEDDER_FILE))?,
            model: load_artifact(dir.join(MODEL_FILE))?,
            pca: load_artifact(dir.join(PCA_FILE))?,
            scaler: load_artifact(dir.join(SCALER_FILE))?,
            label_encoder: load_artifact(dir.join(LABEL_ENCODER_FILE))?,
            company_encoder: load_artifact(dir.join(COMPANY_ENCODER_FILE))?,
        })
    }

    /// Fail unless `serving` is the embedder these artifacts were trained with.
    pub fn check_embedder(&self, serving: &EmbedderConfig) -> PrediktResult<()> {
        if &self.embedder != serving {
            return Err(PrediktError::Embedding(format!(
                "artifacts were trained with {:?} but serving is configured with {:?}",
                self.embedder, serving
            )));
        }
        Ok(())
    }

    pub fn check_dimension(&self, embedder: &dyn TextEmbedder) -> PrediktResult<()> {
        match self.pca.mean.as_ref().map(Vec::len) {
            Some(width) if width != embedder.dimension() => Err(PrediktError::DimensionMismatch(format!(
                "PCA expects {}-dim embeddings, embedder produces {}",
                width,
                embedder.dimension()
            ))),
            _ => Ok(()),
        }
    }

    /// Classify one person. Unseen companies fail with the encoder's error.
    pub fn predict_one(
        &self,
        embedder: &dyn TextEmbedder,
        name: &str,
        company: &str,
        age: i64,
        code: i64,
    ) -> PrediktResult<&str> {
        let embedding = Matrix::from_row(&embedder.embed(name)?);
        let reduced = self.pca.transform(&embedding)?;
        let company_code = self.company_encoder.transform_one(company)?;
        let x = feature_matrix(&reduced, &[code as f64], &[company_code], &[age as f64])?;
        let scaled = self.scaler.transform(&x)?;
        let class = self
            .model
            .predict(&scaled)?
            .into_iter()
            .next()
            .ok_or_else(|| PrediktError::EmptyInput("classifier returned no prediction".into()))?;
        self.label_encoder.inverse_one(class)
    }
}

/// `[pca block, code, company_encoded, age]`, one row per person.
pub fn feature_matrix(reduced: &Matrix, code: &[f64], company: &[usize], age: &[f64]) -> PrediktResult<Matrix> {
    let tail: Vec<f64> = code
        .iter()
        .zip(company)
        .zip(age)
        .flat_map(|((&c, &k), &a)| [c, k as f64, a])
        .collect();
    let tail = Matrix::new(tail, code.len(), 3)?;
    Matrix::hstack(&[reduced, &tail])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_layout() {
        let reduced = Matrix::from_rows(&[vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
        let x = feature_matrix(&reduced, &[7.0, 8.0], &[1, 0], &[30.0, 41.0]).unwrap();
        assert_eq!(x.shape(), (2, 5));
        assert_eq!(x.row(0), &[0.1, 0.2, 7.0, 1.0, 30.0]);
        assert_eq!(x.row(1), &[0.3, 0.4, 8.0, 0.0, 41.0]);
    }

    #[test]
    fn test_check_embedder() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = crate::testdata::small_config();
        let users = crate::trainer::select_users(
            &predikt_io::read_csv_from(crate::testdata::users_csv().as_bytes()).unwrap(),
        )
        .unwrap();
        let embedder = cfg.embedder.build().unwrap();
        let artifacts = crate::trainer::train(&users, &cfg, embedder.as_ref(), &mut crate::tracker::NoopTracker)
            .unwrap()
            .artifacts;
        artifacts.save(dir.path()).unwrap();
        let loaded = GenderArtifacts::load(dir.path()).unwrap();
        assert_eq!(loaded.embedder, cfg.embedder);
        assert!(loaded.check_embedder(&cfg.embedder).is_ok());
        assert!(loaded.check_dimension(embedder.as_ref()).is_ok());

        let wider = EmbedderConfig::Hashing { dimension: 64, ngram_min: 1, ngram_max: 3 };
        assert!(matches!(loaded.check_embedder(&wider), Err(PrediktError::Embedding(_))));
        assert!(matches!(
            loaded.check_dimension(wider.build().unwrap().as_ref()),
            Err(PrediktError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GenderArtifacts::load(dir.path()).is_err());
    }
}
