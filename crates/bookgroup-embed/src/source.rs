use anyhow::{ensure, Result};

use bookgroup_core::traits::{Embedder, VectorSource};
use bookgroup_core::types::{Item, Vector};

/// Adapts any [`Embedder`] into a [`VectorSource`] over item descriptions.
pub struct DenseSource {
    name: String,
    embedder: Box<dyn Embedder>,
}

impl DenseSource {
    pub fn new(name: impl Into<String>, embedder: Box<dyn Embedder>) -> Self {
        Self { name: name.into(), embedder }
    }

    /// Named after the embedder itself, so a hashed fallback reports as `hashed`.
    pub fn from_embedder(embedder: Box<dyn Embedder>) -> Self {
        Self::new(Embedder::name(&*embedder).to_string(), embedder)
    }

    pub fn dim(&self) -> usize { self.embedder.dim() }
}

impl VectorSource for DenseSource {
    fn name(&self) -> &str { &self.name }

    fn produce_vectors(&self, items: &[Item]) -> Result<Vec<Vector>> {
        let texts: Vec<String> = items.iter().map(|i| i.description.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        ensure!(vectors.len() == items.len(), "embedder returned {} vectors for {} items", vectors.len(), items.len());
        Ok(vectors)
    }
}
