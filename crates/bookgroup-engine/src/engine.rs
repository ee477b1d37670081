use std::time::Instant;

use tracing::{debug, info, warn};

use bookgroup_core::config::{EngineConfig, ScanConfig};
use bookgroup_core::error::{Error, Result};
use bookgroup_core::traits::{ThemeExtractor, VectorSource};
use bookgroup_core::types::{Group, Item, ItemIndex, Vector};

use crate::graph::ThresholdGraph;
use crate::progress::RunControl;
use crate::similarity::{ScanStats, SimilarityMatrix};

/// Groups plus what was skipped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingOutcome {
    pub groups: Vec<Group>,
    /// Items whose vector had zero norm; they never join a group.
    pub degenerate: Vec<ItemIndex>,
    pub stats: ScanStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingReport {
    pub source: String,
    pub total_items: usize,
    pub groups: Vec<Group>,
    pub degenerate: Vec<ItemIndex>,
    pub stats: ScanStats,
    pub themes_enabled: bool,
    /// Grouped items whose theme extraction failed and fell back to no themes.
    pub theme_failures: usize,
}

impl GroupingReport {
    pub fn grouped_items(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}

pub struct GroupingEngine<VS: VectorSource> {
    source: VS,
    themes: Option<Box<dyn ThemeExtractor>>,
    config: EngineConfig,
    scan: ScanConfig,
}

impl<VS: VectorSource> GroupingEngine<VS> {
    pub fn new(source: VS, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, themes: None, config, scan: ScanConfig::default() })
    }

    pub fn with_themes(mut self, extractor: Box<dyn ThemeExtractor>) -> Self {
        self.themes = Some(extractor);
        self
    }

    pub fn with_scan(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Vectorize `items`, group them, and attach themes to grouped members.
    ///
    /// Only shape violations (vector count or dimensionality) and cancellation
    /// fail the run; zero vectors and theme failures are counted and skipped.
    pub fn run(&self, items: &[Item], control: &RunControl<'_>) -> Result<GroupingReport> {
        let themes_enabled = self.themes.is_some() && self.config.theme_count > 0;
        let mut report = GroupingReport {
            source: self.source.name().to_string(),
            total_items: items.len(),
            themes_enabled,
            ..GroupingReport::default()
        };
        if items.len() < 2 {
            info!(items = items.len(), "fewer than two items, nothing to group");
            return Ok(report);
        }

        let start = Instant::now();
        let vectors = self.source.produce_vectors(items).map_err(|e| Error::VectorSource {
            name: self.source.name().to_string(),
            message: format!("{e:#}"),
        })?;
        if vectors.len() != items.len() {
            return Err(Error::InvalidInput(format!(
                "vector source '{}' returned {} vectors for {} items",
                self.source.name(),
                vectors.len(),
                items.len()
            )));
        }
        info!(source = self.source.name(), items = items.len(), elapsed_ms = start.elapsed().as_millis() as u64, "vectorized corpus");

        let outcome = self.group_vectors(&vectors, control)?;
        for &index in &outcome.degenerate {
            warn!(item = index, title = %items[index].title, "zero-norm vector, item cannot join a group");
        }
        report.groups = outcome.groups;
        report.degenerate = outcome.degenerate;
        report.stats = outcome.stats;

        if let (true, Some(extractor)) = (themes_enabled, self.themes.as_deref()) {
            if control.is_cancelled() {
                return Err(Error::Cancelled);
            }
            report.theme_failures = self.attach_themes(extractor, items, &mut report.groups);
        }

        info!(
            groups = report.groups.len(),
            grouped = report.grouped_items(),
            degenerate = report.degenerate.len(),
            "grouping finished"
        );
        Ok(report)
    }

    /// The numeric core: validate shape, scan pairs, union, extract components.
    pub fn group_vectors(&self, vectors: &[Vector], control: &RunControl<'_>) -> Result<GroupingOutcome> {
        let matrix = SimilarityMatrix::new(vectors)?;
        let degenerate = matrix.degenerate();
        let mut graph = ThresholdGraph::new(matrix.len(), self.config.threshold);
        let stats = matrix.scan(self.config.threshold, &self.scan, control, |edges| {
            for edge in edges {
                graph.add_edge(edge);
            }
        })?;
        debug!(
            pairs = stats.pairs_compared,
            edges = stats.edges_found,
            unions = graph.union_count(),
            dim = matrix.dim(),
            "similarity scan complete"
        );
        Ok(GroupingOutcome { groups: graph.into_groups(), degenerate, stats })
    }

    fn attach_themes(&self, extractor: &dyn ThemeExtractor, items: &[Item], groups: &mut [Group]) -> usize {
        let mut failures = 0;
        for group in groups.iter_mut() {
            group.themes = group
                .members
                .iter()
                .map(|&index| match extractor.extract(&items[index].description, self.config.theme_count) {
                    Ok(themes) => themes,
                    Err(e) => {
                        debug!(item = index, error = %e, "no themes for item");
                        failures += 1;
                        Vec::new()
                    }
                })
                .collect();
        }
        failures
    }
}
