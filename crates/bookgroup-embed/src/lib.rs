//! bookgroup-embed
//!
//! Dense vector sources: a candle sentence encoder and a deterministic hashed
//! embedder behind the shared [`Embedder`] trait, plus [`DenseSource`] to feed
//! either one to the grouping engine.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use bookgroup_core::traits::Embedder;

pub mod hashed;
pub mod model;
pub mod pool;
pub mod source;
pub mod tokenize;

pub use hashed::{HashedEmbedder, HASHED_DIM};
pub use model::{select_device, SentenceEncoder, DEFAULT_MAX_LEN};
pub use pool::masked_mean_l2;
pub use source::DenseSource;

pub const DEFAULT_MODEL_DIR: &str = "models/all-MiniLM-L6-v2";

/// Use the hashed embedder when `APP_USE_FAKE_EMBEDDINGS` is `1`/`true`.
pub fn fake_embeddings_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn get_default_embedder(model_dir: Option<&Path>, max_len: usize) -> Result<Box<dyn Embedder>> {
    if fake_embeddings_requested() {
        info!("APP_USE_FAKE_EMBEDDINGS set, using hashed embedder");
        return Ok(Box::new(HashedEmbedder::default()));
    }
    let dir = resolve_model_dir(model_dir)?;
    Ok(Box::new(SentenceEncoder::load(&dir, max_len)?))
}

fn resolve_model_dir(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = configured {
        if p.exists() { return Ok(p.to_path_buf()); }
        return Err(anyhow!("configured model directory {} does not exist", p.display()));
    }
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = PathBuf::from(&dir);
            if p.exists() { info!(dir = %p.display(), "model dir from {}", var); return Ok(p); }
        }
    }
    for candidate in [DEFAULT_MODEL_DIR, "../models/all-MiniLM-L6-v2"] {
        let p = Path::new(candidate);
        if p.exists() { return Ok(p.to_path_buf()); }
    }
    Err(anyhow!("Could not locate sentence encoder model directory (set embedding.model_dir or APP_MODEL_DIR)"))
}
