use std::hash::Hasher;
use twox_hash::XxHash64;

use bookgroup_core::traits::Embedder;

pub const HASHED_DIM: usize = 384;

/// Bag of hashed tokens, L2-normalized. Deterministic and model-free, so tests
/// and dry runs can exercise the dense path. Text without tokens maps to the
/// zero vector.
pub struct HashedEmbedder { dim: usize }

impl HashedEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.as_bytes());
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            v[idx] += 0.5 + ((h >> 32) as u32) as f32 / u32::MAX as f32;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self { Self::new(HASHED_DIM) }
}

impl Embedder for HashedEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn name(&self) -> &str { "hashed" }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
