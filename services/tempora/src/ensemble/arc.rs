//! Canonical arcs between entities

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::relation::{Rel, RelationScheme};

/// A direction-fixed pair of canonical entity identifiers.
///
/// Canonical direction is lexicographic on the identifiers. Classifiers may
/// report either orientation of a pair; after `canonicalize` the table never
/// holds both `(a, b)` and `(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Arc {
    pub source: String,
    pub target: String,
}

impl Arc {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

impl fmt::Display for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Fix the direction of a reported pair.
///
/// If the pair is already in canonical order it is returned unchanged
/// together with its label; otherwise the pair is flipped and the label
/// inverted. Idempotent: canonicalizing a canonical arc is a no-op. This is
/// the single point where direction ambiguity between classifiers is
/// eliminated.
pub fn canonicalize(
    source: &str,
    target: &str,
    rel: Rel,
    scheme: &RelationScheme,
) -> (Arc, Rel) {
    if target < source {
        (Arc::new(target, source), scheme.inverse(rel))
    } else {
        (Arc::new(source, target), rel)
    }
}
