//! Loads the scraped corpus: either one JSON array file or a directory of
//! batch files (`books_batch_1.json`, `books_batch_2.json`, ...).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{Item, Metadata};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    items: Vec<Item>,
}

impl Corpus {
    pub fn new(items: Vec<Item>) -> Self { Self { items } }

    pub fn items(&self) -> &[Item] { &self.items }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Dispatch on the path kind: a directory is read as batch files.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::load_dir(path)
        } else if path.is_file() {
            Self::load_file(path)
        } else {
            Err(Error::NotFound(format!("corpus path {}", path.display())))
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = read_file_content(path)?;
        let items = parse_records(&content, &path.display().to_string())?;
        info!(path = %path.display(), items = items.len(), "loaded corpus file");
        Ok(Self { items })
    }

    pub fn load_dir(dir: &Path) -> Result<Self> {
        let files = list_batch_files(dir);
        if files.is_empty() {
            return Err(Error::NotFound(format!("no .json batch files under {}", dir.display())));
        }
        let mut items = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            debug!(file = %file_path.display(), "reading batch {}/{}", file_index + 1, files.len());
            let content = read_file_content(file_path)?;
            items.extend(parse_records(&content, &file_path.display().to_string())?);
        }
        info!(dir = %dir.display(), files = files.len(), items = items.len(), "loaded corpus batches");
        Ok(Self { items })
    }
}

fn read_file_content(file_path: &Path) -> Result<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string())
        }
        Err(e) => Err(e.into()),
    }
}

/// Parse a JSON array of records, validating each one on its own so the error
/// names the offending record.
pub fn parse_records(content: &str, origin: &str) -> Result<Vec<Item>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| Error::InvalidInput(format!("{origin}: not valid JSON: {e}")))?;
    let Value::Array(records) = value else {
        return Err(Error::InvalidInput(format!("{origin}: expected a JSON array of records")));
    };
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record_to_item(record).map_err(|msg| Error::InvalidInput(format!("{origin}: record {index}: {msg}"))))
        .collect()
}

fn record_to_item(record: Value) -> std::result::Result<Item, String> {
    let Value::Object(mut fields) = record else {
        return Err("expected a JSON object".to_string());
    };
    let title = take_string(&mut fields, "title")?;
    let description = take_string(&mut fields, "description")?;
    let id = match fields.remove("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => return Err(format!("field 'id' must be a string, got {other}")),
    };
    if id.is_none() && title.trim().is_empty() {
        return Err("record has neither 'id' nor a non-empty 'title'".to_string());
    }
    let metadata: Metadata = fields;
    Ok(Item { id, title, description, metadata })
}

fn take_string(fields: &mut Metadata, key: &str) -> std::result::Result<String, String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(format!("field '{key}' must be a string, got {other}")),
        None => Err(format!("missing required field '{key}'")),
    }
}

fn list_batch_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort_by(|a, b| batch_number(a).cmp(&batch_number(b)).then_with(|| a.cmp(b)));
    files
}

/// Trailing number of the file stem (`books_batch_12` -> 12); unnumbered files sort last.
fn batch_number(path: &Path) -> u64 {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let digits: String = stem.chars().rev().take_while(|c| c.is_ascii_digit()).collect::<Vec<_>>().into_iter().rev().collect();
    digits.parse().unwrap_or(u64::MAX)
}
