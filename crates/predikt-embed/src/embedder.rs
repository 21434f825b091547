use predikt_core::{Matrix, PrediktError, PrediktResult};

/// Turns a piece of text into a fixed-length dense vector.
///
/// Implementations must be deterministic: the same text always maps to the
/// same vector, at training time and at serving time.
pub trait TextEmbedder: Send + Sync {
    /// Length of every vector this embedder returns.
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> PrediktResult<Vec<f64>>;

    /// Embed many texts into a `[texts.len(), dimension]` matrix.
    fn embed_batch(&self, texts: &[String]) -> PrediktResult<Matrix> {
        let dim = self.dimension();
        let mut data = Vec::with_capacity(texts.len() * dim);
        for text in texts {
            let v = self.embed(text)?;
            check_dimension(dim, v.len())?;
            data.extend(v);
        }
        Matrix::new(data, texts.len(), dim)
    }
}

pub(crate) fn check_dimension(expected: usize, got: usize) -> PrediktResult<()> {
    if expected != got {
        return Err(PrediktError::Embedding(format!(
            "embedder declared dimension {} but produced {}",
            expected, got
        )));
    }
    Ok(())
}
