//! Domain types shared by vector sources and the grouping engine.

use serde::{Deserialize, Serialize};

/// Position of an item in the loaded corpus.
pub type ItemIndex = usize;

/// Opaque pass-through fields (price, rating, stock, ...). Copied, never parsed.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One weight per feature; a source emits the same length for every item.
pub type Vector = Vec<f32>;

/// A single corpus record.
///
/// - `id`: optional stable identifier; `title` doubles as the key when absent
/// - `title`: display title
/// - `description`: the text that gets vectorized
/// - `metadata`: every other field of the source record, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl Item {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { id: None, title: title.into(), description: description.into(), metadata: Metadata::new() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.title)
    }
}

/// A pair of items whose cosine similarity cleared the threshold.
///
/// Always stored with `a < b`, matching the upper-triangle scan order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityEdge {
    pub a: ItemIndex,
    pub b: ItemIndex,
    pub score: f64,
}

/// A connected component of the threshold graph with at least two members.
///
/// `members` are ascending corpus positions. `similarity_score` is the score of
/// the edge that first linked the component. `themes` is either empty (themes
/// disabled) or holds one entry per member, in member order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub number: usize,
    pub members: Vec<ItemIndex>,
    pub similarity_score: f64,
    pub themes: Vec<Vec<String>>,
}

impl Group {
    pub fn label(&self) -> String {
        format!("Group_{}", self.number)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn themes_for(&self, position: usize) -> Option<&[String]> {
        self.themes.get(position).map(Vec::as_slice)
    }
}
