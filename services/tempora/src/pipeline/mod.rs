//! Batch resolution pipeline
//!
//! 1. Ingest per-classifier vote records and resolve entity ids
//! 2. Derive classifier weights from score reports
//! 3. Aggregate votes into per-arc weight vectors
//! 4. Optimize a globally consistent assignment
//! 5. Serialize the final assignment per document

pub mod ingest;
pub mod outputs;
pub mod run;
pub mod scores;

pub use ingest::{
    discover_classifiers, discover_documents, merge_document, EntityMap, EntityMapping,
    MergeReport, VoteRecord,
};
pub use outputs::{assignment_records, write_assignments, AssignmentRecord};
pub use run::{process_document, DocumentOutcome, EnsembleContext};
pub use scores::{load_priors, load_scores};
