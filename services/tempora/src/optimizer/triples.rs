//! Connected-triple enumeration over canonical arcs

use std::collections::{BTreeMap, BTreeSet};

use crate::ensemble::Arc;

/// Three entities whose three pairwise arcs are all present.
///
/// With canonical (lexicographic) arc direction, `first < middle < last`
/// always holds, so the three member arcs are exactly `(first, middle)`,
/// `(middle, last)` and `(first, last)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub first: String,
    pub middle: String,
    pub last: String,
}

impl Triple {
    pub fn arc_first_middle(&self) -> Arc {
        Arc::new(&self.first, &self.middle)
    }

    pub fn arc_middle_last(&self) -> Arc {
        Arc::new(&self.middle, &self.last)
    }

    pub fn arc_first_last(&self) -> Arc {
        Arc::new(&self.first, &self.last)
    }
}

/// Enumerate every connected triple among the given canonical arcs.
///
/// Arcs are indexed by their source endpoint so candidate continuations of
/// an arc `(i, j)` are looked up directly instead of scanning all pairs.
pub fn connected_triples(arcs: &[&Arc]) -> Vec<Triple> {
    let mut by_source: BTreeMap<&str, Vec<&Arc>> = BTreeMap::new();
    let mut present: BTreeSet<(&str, &str)> = BTreeSet::new();
    for arc in arcs {
        by_source
            .entry(arc.source.as_str())
            .or_default()
            .push(*arc);
        present.insert((arc.source.as_str(), arc.target.as_str()));
    }

    let mut triples = Vec::new();
    for first_arc in arcs {
        let Some(continuations) = by_source.get(first_arc.target.as_str()) else {
            continue;
        };
        for second_arc in continuations {
            if present.contains(&(first_arc.source.as_str(), second_arc.target.as_str())) {
                triples.push(Triple {
                    first: first_arc.source.clone(),
                    middle: first_arc.target.clone(),
                    last: second_arc.target.clone(),
                });
            }
        }
    }
    triples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arcs(pairs: &[(&str, &str)]) -> Vec<Arc> {
        pairs.iter().map(|(s, t)| Arc::new(s, t)).collect()
    }

    #[test]
    fn test_closed_chain_yields_one_triple() {
        let arcs = arcs(&[("e1", "e2"), ("e2", "e3"), ("e1", "e3")]);
        let refs: Vec<&Arc> = arcs.iter().collect();
        let triples = connected_triples(&refs);
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].first, "e1");
        assert_eq!(triples[0].middle, "e2");
        assert_eq!(triples[0].last, "e3");
    }

    #[test]
    fn test_open_chain_yields_nothing() {
        let arcs = arcs(&[("e1", "e2"), ("e2", "e3")]);
        let refs: Vec<&Arc> = arcs.iter().collect();
        assert!(connected_triples(&refs).is_empty());
    }

    #[test]
    fn test_four_entities_with_all_arcs() {
        // Complete graph on four entities: every 3-subset closes a triple.
        let arcs = arcs(&[
            ("e1", "e2"),
            ("e1", "e3"),
            ("e1", "e4"),
            ("e2", "e3"),
            ("e2", "e4"),
            ("e3", "e4"),
        ]);
        let refs: Vec<&Arc> = arcs.iter().collect();
        assert_eq!(connected_triples(&refs).len(), 4);
    }

    #[test]
    fn test_member_arcs() {
        let triple = Triple {
            first: "e1".to_string(),
            middle: "e2".to_string(),
            last: "e3".to_string(),
        };
        assert_eq!(triple.arc_first_middle(), Arc::new("e1", "e2"));
        assert_eq!(triple.arc_middle_last(), Arc::new("e2", "e3"));
        assert_eq!(triple.arc_first_last(), Arc::new("e1", "e3"));
    }
}
