//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g. `APP_ENGINE__THRESHOLD`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Which vectorization strategy feeds the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorSourceKind {
    /// Sparse term weights (unigrams + bigrams, smoothed idf).
    #[serde(alias = "tf-idf")]
    Tfidf,
    /// Dense sentence embeddings from a local BERT-family model.
    #[serde(alias = "sbert")]
    Embedding,
    /// Deterministic token-hash embeddings; no model files needed.
    Hashed,
}

impl fmt::Display for VectorSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VectorSourceKind::Tfidf => "tfidf",
            VectorSourceKind::Embedding => "embedding",
            VectorSourceKind::Hashed => "hashed",
        };
        f.write_str(name)
    }
}

impl FromStr for VectorSourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tfidf" | "tf-idf" => Ok(Self::Tfidf),
            "embedding" | "sbert" => Ok(Self::Embedding),
            "hashed" => Ok(Self::Hashed),
            other => Err(Error::InvalidConfig(format!("unknown vector source '{other}'"))),
        }
    }
}

/// The engine's own contract: nothing else changes grouping behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub threshold: f64,
    pub vector_source: VectorSourceKind,
    pub theme_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { threshold: 0.6, vector_source: VectorSourceKind::Embedding, theme_count: 3 }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(-1.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "engine.threshold must be within [-1, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// A JSON array file, or a directory of scraper batch files.
    pub input: String,
    pub output: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { input: "data/books_final.json".to_string(), output: "data/book_groups.json".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub sample_groups: usize,
    pub description_preview_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { sample_groups: 3, description_preview_chars: 200 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Rows of the upper triangle handed to workers per batch.
    pub block_rows: usize,
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { block_rows: 64, parallel: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model_dir: Option<String>,
    pub max_len: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfidfConfig {
    pub max_features: usize,
    pub ngram_max: usize,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self { max_features: 1000, ngram_max: 2 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub data: DataConfig,
    pub report: ReportConfig,
    pub scan: ScanConfig,
    pub embedding: EmbeddingConfig,
    pub tfidf: TfidfConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        if self.scan.block_rows == 0 {
            return Err(Error::InvalidConfig("scan.block_rows must be at least 1".to_string()));
        }
        if self.tfidf.max_features == 0 {
            return Err(Error::InvalidConfig("tfidf.max_features must be at least 1".to_string()));
        }
        if !(1..=3).contains(&self.tfidf.ngram_max) {
            return Err(Error::InvalidConfig(format!(
                "tfidf.ngram_max must be 1, 2 or 3, got {}",
                self.tfidf.ngram_max
            )));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    pub fn load_from(base: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config = Self { figment: Figment::from(Serialized::defaults(Settings::default())).merge(figment) };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
