//! bookgroup-engine
//!
//! Similarity grouping: a lazy cosine scan over the upper triangle feeds a
//! union-find threshold graph whose connected components become the groups.
//! Vectorization and theme extraction are injected through the traits in
//! `bookgroup-core`.

pub mod engine;
pub mod graph;
pub mod manifest;
pub mod progress;
pub mod similarity;
pub mod summary;

pub use engine::{GroupingEngine, GroupingOutcome, GroupingReport};
pub use graph::ThresholdGraph;
pub use manifest::{Manifest, MemberRecord, MEMBER_FIELDS};
pub use progress::{CancellationToken, ProgressSink, RunControl, ScanProgress};
pub use similarity::{cosine_similarity, ScanStats, SimilarityMatrix};
pub use summary::RunSummary;
