//! The group manifest: `{"Group_1": [member, ...], "Group_2": [...]}` in
//! discovery order.

use std::fs;
use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::{info, warn};

use bookgroup_core::error::{Error, Result};
use bookgroup_core::types::{Item, Metadata};

use crate::engine::GroupingReport;

/// Keys a member record writes itself; pass-through metadata never overrides them.
pub const MEMBER_FIELDS: &[&str] = &["id", "title", "description", "similarity_score", "themes"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub similarity_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<String>>,
    #[serde(flatten)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    groups: Vec<(String, Vec<MemberRecord>)>,
}

impl Manifest {
    /// `items` must be the slice the report was produced from.
    pub fn build(report: &GroupingReport, items: &[Item], preview_chars: usize) -> Result<Self> {
        check_items(report, items)?;
        let groups = report
            .groups
            .iter()
            .map(|group| {
                let members = group
                    .members
                    .iter()
                    .enumerate()
                    .map(|(pos, &index)| {
                        let item = &items[index];
                        MemberRecord {
                            id: item.id.clone(),
                            title: item.title.clone(),
                            description: truncate_description(&item.description, preview_chars),
                            similarity_score: group.similarity_score,
                            themes: report.themes_enabled.then(|| group.themes_for(pos).map(<[String]>::to_vec).unwrap_or_default()),
                            metadata: passthrough_metadata(item),
                        }
                    })
                    .collect();
                (group.label(), members)
            })
            .collect();
        Ok(Self { groups })
    }

    pub fn len(&self) -> usize { self.groups.len() }

    pub fn is_empty(&self) -> bool { self.groups.is_empty() }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(label, _)| label.as_str())
    }

    pub fn get(&self, label: &str) -> Option<&[MemberRecord]> {
        self.groups.iter().find(|(l, _)| l == label).map(|(_, members)| members.as_slice())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_pretty()?)?;
        info!(path = %path.display(), groups = self.len(), "saved group manifest");
        Ok(())
    }
}

pub(crate) fn check_items(report: &GroupingReport, items: &[Item]) -> Result<()> {
    if items.len() != report.total_items {
        return Err(Error::InvalidInput(format!(
            "report covers {} items but {} were supplied",
            report.total_items,
            items.len()
        )));
    }
    Ok(())
}

fn passthrough_metadata(item: &Item) -> Metadata {
    let mut metadata = item.metadata.clone();
    for &field in MEMBER_FIELDS {
        if metadata.remove(field).is_some() {
            warn!(item = item.key(), field, "metadata field shadows a manifest field, dropped");
        }
    }
    metadata
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (label, members) in &self.groups {
            map.serialize_entry(label, members)?;
        }
        map.end()
    }
}

/// First `max_chars` characters, with `...` appended only when something was cut.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_pos, _)) => format!("{}...", &text[..byte_pos]),
        None => text.to_string(),
    }
}
