//! Ensemble layer: canonical arcs, vote tables, reliability weights and
//! evidence aggregation
//!
//! The flow inside one document:
//! 1. Classifier claims are canonicalized into a per-document vote table.
//! 2. A roster fixes each classifier's scalar reliability weight.
//! 3. The aggregator merges the table into one weight vector per arc under
//!    the configured combination formula.

pub mod aggregate;
pub mod arc;
pub mod votes;
pub mod weights;

pub use aggregate::{aggregate, LabelPriors, WeightFormula, WeightVector};
pub use arc::{canonicalize, Arc};
pub use votes::VoteTable;
pub use weights::{ClassifierRoster, ScoreRecord, WeightSource};
