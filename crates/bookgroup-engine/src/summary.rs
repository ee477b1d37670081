use std::fmt;

use bookgroup_core::error::Result;
use bookgroup_core::types::Item;

use crate::engine::GroupingReport;
use crate::manifest::check_items;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleMember {
    pub title: String,
    pub similarity_score: f64,
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroup {
    pub label: String,
    pub members: Vec<SampleMember>,
}

/// Human-readable companion to the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub source: String,
    pub total_items: usize,
    pub total_groups: usize,
    pub grouped_items: usize,
    pub degenerate_items: usize,
    pub theme_failures: usize,
    pub samples: Vec<SampleGroup>,
}

impl RunSummary {
    /// `items` must be the slice the report was produced from.
    pub fn new(report: &GroupingReport, items: &[Item], sample_groups: usize) -> Result<Self> {
        check_items(report, items)?;
        let samples = report
            .groups
            .iter()
            .take(sample_groups)
            .map(|group| SampleGroup {
                label: group.label(),
                members: group
                    .members
                    .iter()
                    .enumerate()
                    .map(|(pos, &index)| SampleMember {
                        title: items[index].title.clone(),
                        similarity_score: group.similarity_score,
                        themes: group.themes_for(pos).map(<[String]>::to_vec).unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();
        Ok(Self {
            source: report.source.clone(),
            total_items: report.total_items,
            total_groups: report.groups.len(),
            grouped_items: report.grouped_items(),
            degenerate_items: report.degenerate.len(),
            theme_failures: report.theme_failures,
            samples,
        })
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Summary ({}):", self.source)?;
        writeln!(f, "Total books analyzed: {}", self.total_items)?;
        writeln!(f, "Total number of groups: {}", self.total_groups)?;
        writeln!(f, "Books in groups: {}", self.grouped_items)?;
        writeln!(f, "Degenerate items skipped: {}", self.degenerate_items)?;
        if self.theme_failures > 0 {
            writeln!(f, "Books without themes: {}", self.theme_failures)?;
        }
        if self.samples.is_empty() {
            return Ok(());
        }
        writeln!(f, "\nSample groups:")?;
        for group in &self.samples {
            writeln!(f, "\n{}: {} books", group.label, group.members.len())?;
            for member in &group.members {
                writeln!(f, "- {}", member.title)?;
                writeln!(f, "  Similarity: {:.2}", member.similarity_score)?;
                if !member.themes.is_empty() {
                    writeln!(f, "  Themes: {}", member.themes.join(", "))?;
                }
            }
        }
        Ok(())
    }
}
