//! Pairwise cosine similarity over the upper triangle, computed lazily.
//!
//! Nothing N×N is ever stored: squared norms are cached once per vector and
//! rows are scanned in blocks, each block yielding only the edges that clear
//! the threshold.

use rayon::prelude::*;
use tracing::debug;

use bookgroup_core::config::ScanConfig;
use bookgroup_core::error::{Error, Result};
use bookgroup_core::types::{ItemIndex, SimilarityEdge, Vector};

use crate::progress::{RunControl, ScanProgress};

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum()
}

fn squared_norm(v: &[f32]) -> f64 {
    dot(v, v)
}

/// Cosine similarity in [-1, 1]; 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    cosine_from_parts(dot(a, b), squared_norm(a), squared_norm(b))
}

// sqrt of the product rather than the product of sqrts keeps exact inputs exact
fn cosine_from_parts(dot: f64, sq_a: f64, sq_b: f64) -> f64 {
    if sq_a == 0.0 || sq_b == 0.0 {
        return 0.0;
    }
    (dot / (sq_a * sq_b).sqrt()).clamp(-1.0, 1.0)
}

/// Counters for one completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub pairs_compared: usize,
    pub edges_found: usize,
}

pub struct SimilarityMatrix<'a> {
    vectors: &'a [Vector],
    sq_norms: Vec<f64>,
    dim: usize,
}

impl<'a> SimilarityMatrix<'a> {
    /// Validates shape before any comparison: every vector must share the
    /// first one's length and hold only finite weights.
    pub fn new(vectors: &'a [Vector]) -> Result<Self> {
        let dim = vectors.first().map_or(0, Vec::len);
        for (index, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                return Err(Error::DimensionMismatch { index, expected: dim, found: v.len() });
            }
            if let Some(pos) = v.iter().position(|x| !x.is_finite()) {
                return Err(Error::InvalidInput(format!("vector {index} has a non-finite weight at position {pos}")));
            }
        }
        let sq_norms = vectors.iter().map(|v| squared_norm(v)).collect();
        Ok(Self { vectors, sq_norms, dim })
    }

    pub fn len(&self) -> usize { self.vectors.len() }

    pub fn is_empty(&self) -> bool { self.vectors.is_empty() }

    pub fn dim(&self) -> usize { self.dim }

    pub fn is_degenerate(&self, i: ItemIndex) -> bool { self.sq_norms[i] == 0.0 }

    pub fn degenerate(&self) -> Vec<ItemIndex> {
        (0..self.len()).filter(|&i| self.is_degenerate(i)).collect()
    }

    /// Entry (i, j) of the conceptual matrix. The diagonal is 1 except for
    /// zero vectors, which are similar to nothing.
    pub fn similarity(&self, i: ItemIndex, j: ItemIndex) -> f64 {
        if i == j {
            return if self.is_degenerate(i) { 0.0 } else { 1.0 };
        }
        cosine_from_parts(dot(&self.vectors[i], &self.vectors[j]), self.sq_norms[i], self.sq_norms[j])
    }

    /// Edges (i, j) with j > i and similarity >= threshold, in ascending j.
    pub fn row_edges(&self, i: ItemIndex, threshold: f64) -> Vec<SimilarityEdge> {
        if self.is_degenerate(i) {
            return Vec::new();
        }
        ((i + 1)..self.len())
            .filter(|&j| !self.is_degenerate(j))
            .filter_map(|j| {
                let score = self.similarity(i, j);
                (score >= threshold).then_some(SimilarityEdge { a: i, b: j, score })
            })
            .collect()
    }

    /// Sequential edge stream in scan order (i ascending, then j ascending).
    pub fn edges(&self, threshold: f64) -> impl Iterator<Item = SimilarityEdge> + '_ {
        (0..self.len()).flat_map(move |i| self.row_edges(i, threshold))
    }

    /// Scan the upper triangle block by block, handing each block's edges to
    /// `sink` in scan order. Rows inside a block may run on the rayon pool;
    /// the emitted sequence is the same either way. Cancellation is checked
    /// before every block.
    pub fn scan<F>(&self, threshold: f64, options: &ScanConfig, control: &RunControl<'_>, mut sink: F) -> Result<ScanStats>
    where
        F: FnMut(&[SimilarityEdge]),
    {
        let n = self.len();
        let block_rows = options.block_rows.max(1);
        let mut stats = ScanStats::default();
        let mut start = 0;
        while start < n {
            if control.is_cancelled() {
                debug!(rows_done = start, "scan cancelled");
                return Err(Error::Cancelled);
            }
            let end = (start + block_rows).min(n);
            let rows: Vec<Vec<SimilarityEdge>> = if options.parallel {
                (start..end).into_par_iter().map(|i| self.row_edges(i, threshold)).collect()
            } else {
                (start..end).map(|i| self.row_edges(i, threshold)).collect()
            };
            for (i, row) in (start..end).zip(rows) {
                stats.pairs_compared += n - 1 - i;
                stats.edges_found += row.len();
                sink(&row);
            }
            debug!(rows_done = end, rows_total = n, edges = stats.edges_found, "scanned block");
            control.report(ScanProgress { rows_done: end, rows_total: n, edges_found: stats.edges_found });
            start = end;
        }
        Ok(stats)
    }
}
