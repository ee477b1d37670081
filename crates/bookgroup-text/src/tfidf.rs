//! Sparse term-weight vectors: unigram/bigram counts scaled by smoothed idf,
//! one L2-normalized row per document over a shared vocabulary.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::Result;
use tantivy::tokenizer::TextAnalyzer;
use tracing::debug;

use bookgroup_core::config::TfidfConfig;
use bookgroup_core::traits::VectorSource;
use bookgroup_core::types::{Item, Vector};

use crate::analyzer::{analyze, content_analyzer};

#[derive(Debug, Clone, PartialEq)]
pub struct TfidfOptions {
	pub max_features: usize,
	pub ngram_max: usize,
	pub min_token_len: usize,
}

impl Default for TfidfOptions {
	fn default() -> Self { Self { max_features: 1000, ngram_max: 2, min_token_len: 2 } }
}

impl From<&TfidfConfig> for TfidfOptions {
	fn from(config: &TfidfConfig) -> Self {
		Self { max_features: config.max_features, ngram_max: config.ngram_max, ..Self::default() }
	}
}

/// Fitted vocabulary plus the weighted rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfMatrix {
	pub vocabulary: Vec<String>,
	pub idf: Vec<f64>,
	pub rows: Vec<Vector>,
}

pub struct TfidfVectorizer {
	options: TfidfOptions,
	analyzer: TextAnalyzer,
}

impl Default for TfidfVectorizer {
	fn default() -> Self { Self::new(TfidfOptions::default()) }
}

impl TfidfVectorizer {
	pub fn new(options: TfidfOptions) -> Self { Self { options, analyzer: content_analyzer() } }

	pub fn options(&self) -> &TfidfOptions { &self.options }

	/// Unigrams through `ngram_max`-grams over the retained tokens, in text order.
	pub fn terms(&self, text: &str) -> Vec<String> {
		let tokens: Vec<String> = analyze(&self.analyzer, text)
			.into_iter()
			.map(|t| t.text)
			.filter(|t| t.chars().count() >= self.options.min_token_len)
			.collect();
		let mut terms = Vec::new();
		for n in 1..=self.options.ngram_max.max(1) {
			for window in tokens.windows(n) { terms.push(window.join(" ")); }
		}
		terms
	}

	pub fn fit_transform(&self, texts: &[&str]) -> TfidfMatrix {
		let doc_terms: Vec<Vec<String>> = texts.iter().map(|t| self.terms(t)).collect();

		let mut corpus_counts: BTreeMap<&str, usize> = BTreeMap::new();
		for terms in &doc_terms {
			for term in terms { *corpus_counts.entry(term.as_str()).or_insert(0) += 1; }
		}
		let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
		ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
		ranked.truncate(self.options.max_features);
		let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
		vocabulary.sort();
		let column: HashMap<&str, usize> = vocabulary.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();

		let mut df = vec![0usize; vocabulary.len()];
		for terms in &doc_terms {
			let seen: HashSet<usize> = terms.iter().filter_map(|t| column.get(t.as_str()).copied()).collect();
			for col in seen { df[col] += 1; }
		}
		let n = texts.len() as f64;
		let idf: Vec<f64> = df.iter().map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0).collect();

		let rows = doc_terms
			.iter()
			.map(|terms| {
				let mut weights = vec![0f64; vocabulary.len()];
				for term in terms {
					if let Some(&col) = column.get(term.as_str()) { weights[col] += idf[col]; }
				}
				let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
				if norm > 0.0 { for w in &mut weights { *w /= norm; } }
				weights.into_iter().map(|w| w as f32).collect()
			})
			.collect();

		debug!(docs = texts.len(), vocabulary = vocabulary.len(), "fitted tf-idf");
		TfidfMatrix { vocabulary, idf, rows }
	}
}

impl VectorSource for TfidfVectorizer {
	fn name(&self) -> &str { "tfidf" }

	fn produce_vectors(&self, items: &[Item]) -> Result<Vec<Vector>> {
		let texts: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
		Ok(self.fit_transform(&texts).rows)
	}
}
