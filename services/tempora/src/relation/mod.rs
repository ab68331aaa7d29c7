//! Relation taxonomy: label schemes, inverses and the composition algebra
//!
//! A scheme fixes the ordered label set for one task variant, the involution
//! mapping each label to its inverse, and the composition table that drives
//! transitivity constraints. Everything downstream (votes, weight vectors,
//! decision variables) is indexed by the scheme's stable label order.

mod composition;
pub mod scheme;

pub use scheme::{Rel, RelationScheme};
