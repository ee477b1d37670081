//! bookgroup-text
//!
//! Text analysis on tantivy tokenizers: the sparse term-weight vector source
//! and the keyphrase theme extractor.

pub mod analyzer;
pub mod tfidf;
pub mod themes;

pub use tfidf::{TfidfOptions, TfidfVectorizer};
pub use themes::KeyphraseExtractor;
