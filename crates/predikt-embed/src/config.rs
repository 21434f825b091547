use predikt_core::PrediktResult;
use serde::{Deserialize, Serialize};

use crate::embedder::TextEmbedder;
use crate::hashing::HashingEmbedder;

/// Which text embedding model to construct.
///
/// Training and serving must build the embedder from the same settings, or
/// the PCA fitted at training time sees vectors from a different space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbedderConfig {
    Hashing {
        #[serde(default = "default_dimension")]
        dimension: usize,
        #[serde(default = "default_ngram_min")]
        ngram_min: usize,
        #[serde(default = "default_ngram_max")]
        ngram_max: usize,
    },
    /// Requires the `minilm` feature.
    #[serde(rename = "minilm")]
    MiniLm {
        #[serde(default = "default_model_id")]
        model_id: String,
        #[serde(default = "default_revision")]
        revision: String,
        #[serde(default)]
        normalize: bool,
    },
}

fn default_dimension() -> usize {
    384
}

fn default_ngram_min() -> usize {
    1
}

fn default_ngram_max() -> usize {
    3
}

fn default_model_id() -> String {
    "flax-sentence-embeddings/all_datasets_v4_MiniLM-L6".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

/// MiniLM when built with the `minilm` feature, the offline hashing
/// embedder otherwise.
impl Default for EmbedderConfig {
    #[cfg(feature = "minilm")]
    fn default() -> Self {
        EmbedderConfig::MiniLm {
            model_id: default_model_id(),
            revision: default_revision(),
            normalize: false,
        }
    }

    #[cfg(not(feature = "minilm"))]
    fn default() -> Self {
        EmbedderConfig::hashing_default()
    }
}

impl EmbedderConfig {
    pub fn hashing_default() -> Self {
        EmbedderConfig::Hashing {
            dimension: default_dimension(),
            ngram_min: default_ngram_min(),
            ngram_max: default_ngram_max(),
        }
    }

    pub fn build(&self) -> PrediktResult<Box<dyn TextEmbedder>> {
        match self {
            EmbedderConfig::Hashing {
                dimension,
                ngram_min,
                ngram_max,
            } => Ok(Box::new(HashingEmbedder::new(*dimension, *ngram_min, *ngram_max)?)),
            #[cfg(feature = "minilm")]
            EmbedderConfig::MiniLm {
                model_id,
                revision,
                normalize,
            } => Ok(Box::new(crate::minilm::MiniLmEmbedder::load(
                model_id, revision, *normalize,
            )?)),
            #[cfg(not(feature = "minilm"))]
            EmbedderConfig::MiniLm { model_id, .. } => Err(predikt_core::PrediktError::InvalidParameter(
                format!("embedder '{}' needs predikt-embed built with the `minilm` feature", model_id),
            )),
        }
    }
}
