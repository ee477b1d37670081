use crate::error::Result;
use crate::types::{Item, Vector};

/// Dense text encoder.
pub trait Embedder: Send + Sync {
    /// Short label reported as the vector source name.
    fn name(&self) -> &str;
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Turns a corpus into one fixed-length vector per item, in input order.
///
/// Implementations may look at the whole corpus at once (TF-IDF needs document
/// frequencies), so the input is the full item slice rather than one text.
pub trait VectorSource: Send + Sync {
    fn name(&self) -> &str;
    fn produce_vectors(&self, items: &[Item]) -> anyhow::Result<Vec<Vector>>;
}

impl<T: VectorSource + ?Sized> VectorSource for Box<T> {
    fn name(&self) -> &str { (**self).name() }
    fn produce_vectors(&self, items: &[Item]) -> anyhow::Result<Vec<Vector>> { (**self).produce_vectors(items) }
}

/// Short display keyphrases for one text. Best effort: callers treat an error
/// as "no themes" for that item.
pub trait ThemeExtractor: Send + Sync {
    fn extract(&self, text: &str, max_themes: usize) -> Result<Vec<String>>;
}
