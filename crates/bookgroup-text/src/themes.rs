//! Keyphrase themes: candidate phrases are runs of content words cut at stop
//! words, punctuation and numbers; each word scores degree / frequency and a
//! phrase scores the sum of its words.

use std::collections::HashMap;

use tantivy::tokenizer::TextAnalyzer;

use bookgroup_core::error::{Error, Result};
use bookgroup_core::traits::ThemeExtractor;

use crate::analyzer::{analyze, content_analyzer, separated_by_punctuation, AnalyzedToken};

pub struct KeyphraseExtractor {
	analyzer: TextAnalyzer,
	max_words: usize,
	min_word_len: usize,
}

impl Default for KeyphraseExtractor {
	fn default() -> Self { Self { analyzer: content_analyzer(), max_words: 3, min_word_len: 3 } }
}

impl KeyphraseExtractor {
	pub fn new() -> Self { Self::default() }

	pub fn with_max_words(mut self, max_words: usize) -> Self { self.max_words = max_words.max(1); self }

	/// Candidate phrases in text order, duplicates included.
	pub fn candidates(&self, text: &str) -> Vec<Vec<String>> {
		let tokens = analyze(&self.analyzer, text);
		let mut phrases = Vec::new();
		let mut current: Vec<String> = Vec::new();
		let mut last: Option<&AnalyzedToken> = None;
		for token in &tokens {
			let adjacent = last.is_some_and(|prev| token.position == prev.position + 1 && !separated_by_punctuation(text, prev, token));
			if !adjacent || current.len() >= self.max_words {
				flush(&mut current, &mut phrases);
			}
			last = Some(token);
			if self.is_content_word(&token.text) {
				current.push(token.text.clone());
			} else {
				flush(&mut current, &mut phrases);
			}
		}
		flush(&mut current, &mut phrases);
		phrases
	}

	fn is_content_word(&self, word: &str) -> bool {
		word.chars().count() >= self.min_word_len && !word.chars().all(|c| c.is_ascii_digit())
	}
}

fn flush(current: &mut Vec<String>, phrases: &mut Vec<Vec<String>>) {
	if !current.is_empty() { phrases.push(std::mem::take(current)); }
}

impl ThemeExtractor for KeyphraseExtractor {
	fn extract(&self, text: &str, max_themes: usize) -> Result<Vec<String>> {
		if text.trim().is_empty() {
			return Err(Error::ThemeExtraction("empty text".to_string()));
		}
		let phrases = self.candidates(text);
		if phrases.is_empty() {
			return Err(Error::ThemeExtraction("no candidate phrases".to_string()));
		}

		let mut frequency: HashMap<&str, f64> = HashMap::new();
		let mut degree: HashMap<&str, f64> = HashMap::new();
		for phrase in &phrases {
			for word in phrase {
				*frequency.entry(word.as_str()).or_insert(0.0) += 1.0;
				*degree.entry(word.as_str()).or_insert(0.0) += phrase.len() as f64;
			}
		}

		let mut ranked: Vec<(String, f64, usize)> = Vec::new();
		for (first_seen, phrase) in phrases.iter().enumerate() {
			let joined = phrase.join(" ");
			if ranked.iter().any(|(p, _, _)| *p == joined) { continue; }
			let score = phrase.iter().map(|w| degree[w.as_str()] / frequency[w.as_str()]).sum::<f64>();
			ranked.push((joined, score, first_seen));
		}
		ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.2.cmp(&b.2)));
		Ok(ranked.into_iter().take(max_themes).map(|(p, _, _)| p).collect())
	}
}
