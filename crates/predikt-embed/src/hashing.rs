use predikt_core::{Matrix, PrediktError, PrediktResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::embedder::TextEmbedder;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// Character n-gram feature hashing.
///
/// The text is lower-cased and wrapped in `^`/`$` boundary markers; every
/// character n-gram with `ngram_min <= n <= ngram_max` is hashed into one of
/// `dimension` buckets with a hash-derived sign, and the result is
/// L2-normalised. Needs no model download and is stable across platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingEmbedder {
    pub dimension: usize,
    pub ngram_min: usize,
    pub ngram_max: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        HashingEmbedder {
            dimension: 384,
            ngram_min: 1,
            ngram_max: 3,
        }
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize, ngram_min: usize, ngram_max: usize) -> PrediktResult<Self> {
        if dimension == 0 || ngram_min == 0 || ngram_min > ngram_max {
            return Err(PrediktError::InvalidParameter(format!(
                "hashing embedder needs dimension > 0 and 1 <= ngram_min <= ngram_max, got {}/{}/{}",
                dimension, ngram_min, ngram_max
            )));
        }
        Ok(HashingEmbedder {
            dimension,
            ngram_min,
            ngram_max,
        })
    }

    fn embed_vec(&self, text: &str) -> Vec<f64> {
        let chars: Vec<char> = std::iter::once('^')
            .chain(text.trim().to_lowercase().chars())
            .chain(std::iter::once('$'))
            .collect();

        let mut v = vec![0.0; self.dimension];
        let mut buf = String::new();
        for n in self.ngram_min..=self.ngram_max {
            for gram in chars.windows(n) {
                buf.clear();
                buf.extend(gram);
                let h = fnv1a(buf.as_bytes());
                let bucket = (h % self.dimension as u64) as usize;
                let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
                v[bucket] += sign;
            }
        }

        let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl TextEmbedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> PrediktResult<Vec<f64>> {
        Ok(self.embed_vec(text))
    }

    fn embed_batch(&self, texts: &[String]) -> PrediktResult<Matrix> {
        let rows: Vec<Vec<f64>> = texts.par_iter().map(|t| self.embed_vec(t)).collect();
        let data: Vec<f64> = rows.into_iter().flatten().collect();
        Matrix::new(data, texts.len(), self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_deterministic_and_normalised() {
        let e = HashingEmbedder::default();
        let a = e.embed("Maria Silva").unwrap();
        let b = e.embed("  maria silva ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 384);
        assert_abs_diff_eq!(a.iter().map(|x| x * x).sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_different_names_differ() {
        let e = HashingEmbedder::default();
        assert_ne!(e.embed("Maria").unwrap(), e.embed("Mario").unwrap());
    }

    #[test]
    fn test_batch_matches_single() {
        let e = HashingEmbedder::new(32, 2, 3).unwrap();
        let names = vec!["Ana".to_string(), "Joao".to_string()];
        let m = e.embed_batch(&names).unwrap();
        assert_eq!(m.shape(), (2, 32));
        assert_eq!(m.row(1), e.embed("Joao").unwrap().as_slice());
    }

    #[test]
    fn test_empty_text_still_has_boundary_grams() {
        let e = HashingEmbedder::default();
        let v = e.embed("").unwrap();
        assert!(v.iter().any(|x| *x != 0.0));
    }

    #[test]
    fn test_rejects_bad_params() {
        assert!(HashingEmbedder::new(0, 1, 3).is_err());
        assert!(HashingEmbedder::new(8, 3, 2).is_err());
    }
}
