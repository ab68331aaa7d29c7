//! Typed errors for the ensemble engine

use thiserror::Error;

/// Errors raised by the taxonomy, aggregator and optimizer layers.
///
/// Configuration-class variants (unknown identifiers, weight domain
/// violations, missing scores) are fatal for the current document and are
/// never silently defaulted. `UnresolvedEntity` is recovered locally by
/// dropping the affected arc.
#[derive(Debug, Error)]
pub enum EnsembleError {
    #[error("unknown relation label `{label}` in scheme `{scheme}`")]
    UnknownLabel { scheme: String, label: String },

    #[error("unknown relation scheme `{0}`")]
    UnknownScheme(String),

    #[error("scheme `{scheme}` failed validation: {reason}")]
    InvalidScheme { scheme: String, reason: String },

    #[error("unknown weighting formula `{0}`")]
    UnknownFormula(String),

    #[error("unknown optimization mode `{0}`")]
    UnknownMode(String),

    #[error("unknown weight source `{0}`")]
    UnknownWeightSource(String),

    #[error(
        "classifier `{classifier}` weight {weight} must lie strictly between \
         0.5 and 1.0 for formula `{formula}`"
    )]
    WeightOutOfRange {
        classifier: String,
        weight: f64,
        formula: String,
    },

    #[error("no score record for classifier `{0}`")]
    MissingScore(String),

    #[error("label priors have {got} entries, scheme `{scheme}` has {expected} labels")]
    PriorLength {
        scheme: String,
        got: usize,
        expected: usize,
    },

    #[error("entity `{0}` has no canonical mapping")]
    UnresolvedEntity(String),

    #[error("solver reported an infeasible model over {arcs} arcs")]
    SolverInfeasible { arcs: usize },

    #[error("solver failure: {0}")]
    Solver(String),
}
