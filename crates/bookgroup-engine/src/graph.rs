//! Threshold graph kept as a disjoint-set forest; its connected components
//! are the groups.

use std::collections::HashMap;

use bookgroup_core::types::{Group, ItemIndex, SimilarityEdge};

/// The edge that first joined a set: its position in the accepted-edge
/// stream and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Link {
    seq: u64,
    score: f64,
}

pub struct ThresholdGraph {
    parent: Vec<usize>,
    rank: Vec<u8>,
    // only meaningful at roots
    link: Vec<Option<Link>>,
    threshold: f64,
    accepted: u64,
    unions: usize,
}

impl ThresholdGraph {
    pub fn new(nodes: usize, threshold: f64) -> Self {
        Self {
            parent: (0..nodes).collect(),
            rank: vec![0; nodes],
            link: vec![None; nodes],
            threshold,
            accepted: 0,
            unions: 0,
        }
    }

    pub fn node_count(&self) -> usize { self.parent.len() }

    pub fn union_count(&self) -> usize { self.unions }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Adds the edge when `score >= threshold`. Returns true if two sets were
    /// merged. The merged set keeps the link of whichever side was linked
    /// first; a fresh pair takes this edge as its link.
    pub fn add_edge(&mut self, edge: &SimilarityEdge) -> bool {
        if edge.score.is_nan() || edge.score < self.threshold {
            return false;
        }
        let seq = self.accepted;
        self.accepted += 1;

        let (ra, rb) = (self.find(edge.a), self.find(edge.b));
        if ra == rb {
            return false;
        }
        let link = match (self.link[ra], self.link[rb]) {
            (Some(x), Some(y)) => if x.seq <= y.seq { x } else { y },
            (Some(x), None) | (None, Some(x)) => x,
            (None, None) => Link { seq, score: edge.score },
        };
        let (root, child) = match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => (rb, ra),
            std::cmp::Ordering::Greater => (ra, rb),
            std::cmp::Ordering::Equal => {
                self.rank[ra] += 1;
                (ra, rb)
            }
        };
        self.parent[child] = root;
        self.link[child] = None;
        self.link[root] = Some(link);
        self.unions += 1;
        true
    }

    /// Components with two or more members, numbered from 1 in the order
    /// their first edge was accepted. Members are ascending.
    pub fn into_groups(mut self) -> Vec<Group> {
        let mut by_root: HashMap<usize, Vec<ItemIndex>> = HashMap::new();
        for i in 0..self.node_count() {
            let root = self.find(i);
            by_root.entry(root).or_default().push(i);
        }
        let mut components: Vec<(Link, Vec<ItemIndex>)> = by_root
            .into_iter()
            .filter(|(_, members)| members.len() >= 2)
            .filter_map(|(root, members)| self.link[root].map(|link| (link, members)))
            .collect();
        components.sort_by_key(|(link, _)| link.seq);
        components
            .into_iter()
            .enumerate()
            .map(|(i, (link, members))| Group { number: i + 1, members, similarity_score: link.score, themes: Vec::new() })
            .collect()
    }
}
