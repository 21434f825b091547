use std::fmt::Display;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use predikt_core::{Matrix, PrediktError, PrediktResult};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer};

use crate::embedder::{check_dimension, TextEmbedder};

fn model_err(e: impl Display) -> PrediktError {
    PrediktError::Embedding(e.to_string())
}

/// Sentence embedder backed by a BERT-family checkpoint from the Hugging Face
/// hub (mean pooling over the attention mask).
pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dimension: usize,
    normalize: bool,
}

impl MiniLmEmbedder {
    /// Download (or reuse the cached) checkpoint and load it on the CPU.
    pub fn load(model_id: &str, revision: &str, normalize: bool) -> PrediktResult<Self> {
        let device = Device::Cpu;
        let repo = Api::new()
            .map_err(model_err)?
            .repo(Repo::with_revision(model_id.to_string(), RepoType::Model, revision.to_string()));

        let config_path = repo.get("config.json").map_err(model_err)?;
        let tokenizer_path = repo.get("tokenizer.json").map_err(model_err)?;

        let raw_config = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&raw_config).map_err(model_err)?;
        let dimension = serde_json::from_str::<serde_json::Value>(&raw_config)
            .map_err(model_err)?
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| model_err("config.json has no hidden_size"))? as usize;

        let vb = match repo.get("model.safetensors") {
            // SAFETY: the file is a read-only cache entry owned by hf-hub.
            Ok(weights) => unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DTYPE, &device) }
                .map_err(model_err)?,
            Err(_) => {
                let weights = repo.get("pytorch_model.bin").map_err(model_err)?;
                VarBuilder::from_pth(&weights, DTYPE, &device).map_err(model_err)?
            }
        };
        let model = BertModel::load(vb, &config).map_err(model_err)?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(model_err)?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        tracing::info!(model = model_id, revision, dimension, "loaded sentence embedding model");
        Ok(MiniLmEmbedder {
            model,
            tokenizer,
            device,
            dimension,
            normalize,
        })
    }

    fn encode(&self, texts: &[String]) -> candle_core::Result<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(candle_core::Error::msg)?;

        let ids = encodings
            .iter()
            .map(|e| Tensor::new(e.get_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let masks = encodings
            .iter()
            .map(|e| Tensor::new(e.get_attention_mask(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        let input_ids = Tensor::stack(&ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;
        let token_type_ids = input_ids.zeros_like()?;

        // [batch, tokens, hidden]
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let mask = attention_mask.to_dtype(DTYPE)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let mut pooled = summed.broadcast_div(&counts)?;
        if self.normalize {
            let norms = pooled.sqr()?.sum_keepdim(1)?.sqrt()?;
            pooled = pooled.broadcast_div(&norms)?;
        }
        pooled.to_vec2::<f32>()
    }
}

impl TextEmbedder for MiniLmEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> PrediktResult<Vec<f64>> {
        let mut rows = self.encode(&[text.to_string()]).map_err(model_err)?;
        let row = rows.pop().ok_or_else(|| model_err("model returned no embedding"))?;
        check_dimension(self.dimension, row.len())?;
        Ok(row.into_iter().map(f64::from).collect())
    }

    fn embed_batch(&self, texts: &[String]) -> PrediktResult<Matrix> {
        let mut data = Vec::with_capacity(texts.len() * self.dimension);
        for chunk in texts.chunks(64) {
            for row in self.encode(chunk).map_err(model_err)? {
                check_dimension(self.dimension, row.len())?;
                data.extend(row.into_iter().map(f64::from));
            }
        }
        Matrix::new(data, texts.len(), self.dimension)
    }
}
