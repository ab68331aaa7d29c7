//! Consistency optimization over aggregated arc evidence
//!
//! Two interchangeable strategies behind one contract: the integer program
//! that enforces transitive consistency across every connected triple, and
//! the per-arc arg-max baseline that ignores consistency entirely. Both
//! consume the aggregator's weight vectors and produce one label per arc.

mod ilp;
pub mod triples;

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::ensemble::{Arc, WeightVector};
use crate::error::EnsembleError;
use crate::relation::{Rel, RelationScheme};

pub use triples::{connected_triples, Triple};

/// Which strategy resolves the final assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationMode {
    /// Global binary program with transitivity constraints.
    Ilp,
    /// Independent per-arc best label, ties to the lowest label index.
    ArgMax,
}

impl OptimizationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ilp => "ilp",
            Self::ArgMax => "arg-max",
        }
    }
}

impl FromStr for OptimizationMode {
    type Err = EnsembleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ilp" => Ok(Self::Ilp),
            "arg-max" => Ok(Self::ArgMax),
            other => Err(EnsembleError::UnknownMode(other.to_string())),
        }
    }
}

/// Outcome quality reported by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal assignment.
    Optimal,
    /// Feasible assignment without an optimality proof (e.g. a time-limited
    /// backend). Still usable; callers decide whether to warn.
    Suboptimal,
}

/// Final label assignment for one document.
#[derive(Debug, Clone)]
pub struct Consensus {
    pub labels: BTreeMap<Arc, Rel>,
    pub status: SolveStatus,
    pub variables: usize,
    pub constraints: usize,
}

/// Resolve one label per arc under the selected strategy.
pub fn optimize(
    weights: &BTreeMap<Arc, WeightVector>,
    scheme: &RelationScheme,
    mode: OptimizationMode,
) -> Result<Consensus, EnsembleError> {
    if weights.is_empty() {
        return Ok(Consensus {
            labels: BTreeMap::new(),
            status: SolveStatus::Optimal,
            variables: 0,
            constraints: 0,
        });
    }
    match mode {
        OptimizationMode::Ilp => ilp::solve(weights, scheme),
        OptimizationMode::ArgMax => Ok(arg_max(weights, scheme)),
    }
}

/// Per-arc independent best-label selection.
///
/// Ignores global consistency; the result may violate the composition
/// algebra on connected triples.
fn arg_max(weights: &BTreeMap<Arc, WeightVector>, scheme: &RelationScheme) -> Consensus {
    let labels = weights
        .iter()
        .map(|(arc, vector)| (arc.clone(), vector.argmax()))
        .collect();
    Consensus {
        labels,
        status: SolveStatus::Optimal,
        variables: weights.len() * scheme.len(),
        constraints: 0,
    }
}

/// Check an assignment against the scheme's composition algebra.
///
/// Returns the triples whose closing label falls outside the admissible set
/// for the chosen chain labels.
pub fn consistency_violations(
    consensus: &Consensus,
    scheme: &RelationScheme,
) -> Vec<Triple> {
    let arcs: Vec<&Arc> = consensus.labels.keys().collect();
    connected_triples(&arcs)
        .into_iter()
        .filter(|triple| {
            let r1 = consensus.labels[&triple.arc_first_middle()];
            let r2 = consensus.labels[&triple.arc_middle_last()];
            let r3 = consensus.labels[&triple.arc_first_last()];
            match scheme.compose(r1, r2) {
                Some(allowed) => !allowed.contains(&r3),
                None => false,
            }
        })
        .collect()
}
