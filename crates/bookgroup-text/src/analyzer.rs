use tantivy::tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};

pub const STOP_WORDS: &[&str] = &[
	"a","about","after","all","also","an","and","any","are","as","at","be","been","before","being","between","both","but","by",
	"can","could","did","do","does","doing","down","during","each","few","for","from","further","had","has","have","having",
	"he","her","here","hers","him","his","how","i","if","in","into","is","it","its","itself","just","me","more","most","my",
	"no","nor","not","now","of","off","on","once","only","or","other","our","out","over","own","same","she","should","so",
	"some","such","than","that","the","their","them","then","there","these","they","this","those","through","to","too",
	"under","until","up","very","was","we","were","what","when","where","which","while","who","whom","whose","why","will",
	"with","would","you","your","may","might","must","shall","one","two","every","even","ever","much","many","yet",
];

/// A token with the byte span it came from and its position in the raw token
/// sequence. Positions skip over removed stop words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
	pub text: String,
	pub offset_from: usize,
	pub offset_to: usize,
	pub position: usize,
}

/// Lowercased tokens with stop words and overlong tokens removed.
pub fn content_analyzer() -> TextAnalyzer {
	TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(40))
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(STOP_WORDS.iter().map(|s| s.to_string())))
		.build()
}

pub fn analyze(analyzer: &TextAnalyzer, text: &str) -> Vec<AnalyzedToken> {
	// token_stream needs &mut; clones share the underlying tokenizer config
	let mut analyzer = analyzer.clone();
	let mut stream = analyzer.token_stream(text);
	let mut tokens = Vec::new();
	while stream.advance() {
		let token = stream.token();
		tokens.push(AnalyzedToken { text: token.text.clone(), offset_from: token.offset_from, offset_to: token.offset_to, position: token.position });
	}
	tokens
}

/// True when the source text between two tokens holds anything besides
/// whitespace (punctuation, symbols, dropped characters).
pub fn separated_by_punctuation(text: &str, prev: &AnalyzedToken, next: &AnalyzedToken) -> bool {
	text.get(prev.offset_to..next.offset_from)
		.map(|gap| gap.chars().any(|c| !c.is_whitespace()))
		.unwrap_or(true)
}
