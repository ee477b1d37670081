use bookgroup_core::error::Error;
use bookgroup_core::traits::{ThemeExtractor, VectorSource};
use bookgroup_core::types::Item;
use bookgroup_text::{KeyphraseExtractor, TfidfOptions, TfidfVectorizer};

fn norm(v: &[f32]) -> f32 { v.iter().map(|x| x * x).sum::<f32>().sqrt() }

#[test]
fn terms_drop_stop_words_and_add_bigrams() {
	let vectorizer = TfidfVectorizer::default();
	let terms = vectorizer.terms("The cat sat on the mat");
	assert_eq!(terms, vec!["cat", "sat", "mat", "cat sat", "sat mat"]);
}

#[test]
fn rows_are_normalized_and_empty_text_is_zero() {
	let vectorizer = TfidfVectorizer::default();
	let matrix = vectorizer.fit_transform(&["the cat sat", "the cat ran", ""]);
	assert_eq!(matrix.rows.len(), 3);
	assert!(matrix.vocabulary.windows(2).all(|w| w[0] < w[1]), "columns are sorted");
	assert!(matrix.vocabulary.contains(&"cat sat".to_string()));
	for row in &matrix.rows { assert_eq!(row.len(), matrix.vocabulary.len()); }
	assert!((norm(&matrix.rows[0]) - 1.0).abs() < 1e-5);
	assert!(matrix.rows[2].iter().all(|w| *w == 0.0));

	let cat = matrix.vocabulary.iter().position(|t| t == "cat").unwrap();
	let sat = matrix.vocabulary.iter().position(|t| t == "sat").unwrap();
	assert!(matrix.idf[cat] < matrix.idf[sat], "shared term weighs less than a rare one");
}

#[test]
fn max_features_keeps_most_frequent_terms() {
	let vectorizer = TfidfVectorizer::new(TfidfOptions { max_features: 1, ..TfidfOptions::default() });
	let matrix = vectorizer.fit_transform(&["the cat sat", "the cat ran"]);
	assert_eq!(matrix.vocabulary, vec!["cat".to_string()]);
}

#[test]
fn vector_source_yields_one_row_per_item() {
	let items = vec![
		Item::new("a", "A haunting tale of love and loss"),
		Item::new("b", "A haunting story of love and grief"),
		Item::new("c", "Practical guide to woodworking"),
	];
	let vectorizer = TfidfVectorizer::default();
	assert_eq!(vectorizer.name(), "tfidf");
	let rows = vectorizer.produce_vectors(&items).expect("vectors");
	assert_eq!(rows.len(), 3);
	let dim = rows[0].len();
	assert!(rows.iter().all(|r| r.len() == dim));
}

#[test]
fn themes_rank_multi_word_phrases_first() {
	let extractor = KeyphraseExtractor::new();
	let themes = extractor.extract("A haunting tale of love and loss in Victorian London.", 3).expect("themes");
	assert_eq!(themes, vec!["haunting tale", "victorian london", "love"]);
}

#[test]
fn punctuation_and_length_split_candidates() {
	let extractor = KeyphraseExtractor::new();
	let phrases = extractor.candidates("Murder, mystery. Deep dark forest fire");
	let joined: Vec<String> = phrases.iter().map(|p| p.join(" ")).collect();
	assert_eq!(joined, vec!["murder", "mystery", "deep dark forest", "fire"]);
}

#[test]
fn themes_are_deduplicated_and_limited() {
	let extractor = KeyphraseExtractor::new();
	let themes = extractor.extract("Dragons. Dragons. Dragons and castles.", 5).expect("themes");
	assert_eq!(themes, vec!["dragons", "castles"]);
	assert!(extractor.extract("Dragons and castles", 0).expect("themes").is_empty());
}

#[test]
fn themes_fail_softly_without_candidates() {
	let extractor = KeyphraseExtractor::new();
	assert!(matches!(extractor.extract("   ", 3), Err(Error::ThemeExtraction(_))));
	assert!(matches!(extractor.extract("of the and 42", 3), Err(Error::ThemeExtraction(_))));
}
