//! Per-document vote table

use std::collections::BTreeMap;

use crate::ensemble::arc::{canonicalize, Arc};
use crate::relation::{Rel, RelationScheme};

/// Caller-owned vote state for a single document.
///
/// Maps each canonical arc to the label each classifier claimed for it.
/// Built fresh per document and discarded afterwards; nothing here is shared
/// across documents. A classifier re-voting on the same canonical arc
/// overwrites its earlier claim.
#[derive(Debug, Default, Clone)]
pub struct VoteTable {
    arcs: BTreeMap<Arc, BTreeMap<String, Rel>>,
}

impl VoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classifier's claim about an ordered entity pair.
    ///
    /// The pair is canonicalized on entry, inverting the label if the
    /// reported direction was flipped.
    pub fn record(
        &mut self,
        scheme: &RelationScheme,
        classifier: &str,
        source: &str,
        target: &str,
        rel: Rel,
    ) {
        let (arc, rel) = canonicalize(source, target, rel, scheme);
        self.arcs
            .entry(arc)
            .or_default()
            .insert(classifier.to_string(), rel);
    }

    /// Number of canonical arcs seen so far.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Total number of recorded votes across all arcs.
    pub fn vote_count(&self) -> usize {
        self.arcs.values().map(|votes| votes.len()).sum()
    }

    /// Iterate arcs with their per-classifier votes, in canonical arc order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc, &BTreeMap<String, Rel>)> {
        self.arcs.iter()
    }

    pub fn votes(&self, arc: &Arc) -> Option<&BTreeMap<String, Rel>> {
        self.arcs.get(arc)
    }
}
