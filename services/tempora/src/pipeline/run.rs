//! Per-document orchestration: merge, aggregate, optimize, write

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::ensemble::{
    aggregate, ClassifierRoster, LabelPriors, WeightFormula,
};
use crate::optimizer::{consistency_violations, optimize, OptimizationMode, SolveStatus};
use crate::pipeline::ingest::{self, MergeReport};
use crate::pipeline::{outputs, scores};
use crate::relation::RelationScheme;

/// Everything a document run needs, resolved once from configuration.
///
/// The context is cloned into each document task; per-document state (vote
/// table, weight vectors, solver model) lives and dies inside
/// `process_document`, so concurrent documents share nothing mutable.
#[derive(Debug, Clone)]
pub struct EnsembleContext {
    pub data_dir: String,
    pub scheme: RelationScheme,
    pub formula: WeightFormula,
    pub mode: OptimizationMode,
    pub roster: ClassifierRoster,
    pub priors: LabelPriors,
}

impl EnsembleContext {
    /// Resolve configuration into a ready-to-run context.
    ///
    /// Unknown identifiers, missing scores and malformed priors all fail
    /// here, before any document is touched.
    pub fn from_config(config: &Config) -> Result<Self> {
        let scheme = config.resolve_scheme()?;
        let formula = config.resolve_formula()?;
        let mode = config.resolve_mode()?;
        let source = config.resolve_weight_source()?;

        let classifiers = if config.classifiers.is_empty() {
            ingest::discover_classifiers(&config.data_dir)?
        } else {
            config.classifiers.clone()
        };
        if classifiers.is_empty() {
            anyhow::bail!("No classifiers configured or discovered");
        }

        let score_records = scores::load_scores(&config.data_dir)?;
        let roster = ClassifierRoster::from_scores(classifiers, &score_records, source)?;

        let priors = match &config.priors_file {
            Some(path) => scores::load_priors(path, &scheme)?,
            None => LabelPriors::uniform(&scheme),
        };

        Ok(Self {
            data_dir: config.data_dir.clone(),
            scheme,
            formula,
            mode,
            roster,
            priors,
        })
    }
}

/// Summary of one resolved document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub doc: String,
    pub merge: MergeReport,
    /// Arcs that survived aggregation (threshold formulas may drop some).
    pub scored_arcs: usize,
    /// Arcs with a non-NONE final label.
    pub assigned: usize,
    pub proven_optimal: bool,
}

/// Run the full pipeline for a single document.
pub fn process_document(ctx: &EnsembleContext, doc: &str) -> Result<DocumentOutcome> {
    let (table, merge) = ingest::merge_document(
        &ctx.data_dir,
        doc,
        ctx.roster.names(),
        &ctx.scheme,
    )?;
    tracing::info!(
        doc,
        arcs = merge.arcs,
        votes = merge.votes,
        dropped = merge.dropped,
        "merged classifier votes"
    );

    let weights = aggregate(&table, &ctx.roster, ctx.formula, &ctx.scheme, &ctx.priors)
        .with_context(|| format!("Aggregation failed for {}", doc))?;
    let scored_arcs = weights.len();

    let consensus = optimize(&weights, &ctx.scheme, ctx.mode)
        .with_context(|| format!("Optimization failed for {}", doc))?;
    if consensus.status == SolveStatus::Suboptimal {
        tracing::warn!(doc, "solver returned a feasible but unproven assignment");
    }
    if ctx.mode == OptimizationMode::ArgMax {
        let violations = consistency_violations(&consensus, &ctx.scheme);
        if !violations.is_empty() {
            tracing::warn!(
                doc,
                violations = violations.len(),
                "arg-max assignment violates transitivity"
            );
        }
    }
    tracing::info!(
        doc,
        variables = consensus.variables,
        constraints = consensus.constraints,
        "resolved consensus assignment"
    );

    let records = outputs::assignment_records(doc, &consensus, &weights, &ctx.scheme);
    outputs::write_assignments(&ctx.data_dir, doc, &records)?;

    Ok(DocumentOutcome {
        doc: doc.to_string(),
        merge,
        scored_arcs,
        assigned: records.len(),
        proven_optimal: consensus.status == SolveStatus::Optimal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingest::VoteRecord;
    use std::io::Write;
    use std::path::Path;

    fn write_votes(data_dir: &Path, classifier: &str, doc: &str, votes: &[(&str, &str, &str)]) {
        let dir = data_dir
            .join("annotations")
            .join(format!("classifier={}", classifier));
        std::fs::create_dir_all(&dir).unwrap();
        let mut file = std::fs::File::create(dir.join(format!("{}.jsonl", doc))).unwrap();
        for (source, target, relation) in votes {
            let record = VoteRecord {
                source: source.to_string(),
                target: target.to_string(),
                relation: relation.to_string(),
            };
            writeln!(file, "{}", serde_json::to_string(&record).unwrap()).unwrap();
        }
    }

    fn clinical_config(data_dir: &Path) -> Config {
        Config {
            data_dir: data_dir.to_str().unwrap().to_string(),
            scheme: "clinical".to_string(),
            weight_formula: "weighted-sum-all".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_end_to_end_document() {
        let dir = tempfile::tempdir().unwrap();
        write_votes(
            dir.path(),
            "clf-a",
            "doc1",
            &[("e1", "e2", "BEFORE"), ("e2", "e3", "BEFORE")],
        );
        write_votes(
            dir.path(),
            "clf-b",
            "doc1",
            &[
                ("e1", "e2", "OVERLAP"),
                ("e2", "e3", "AFTER"),
                ("e1", "e3", "BEFORE"),
            ],
        );

        let config = clinical_config(dir.path());
        let ctx = EnsembleContext::from_config(&config).unwrap();
        let outcome = process_document(&ctx, "doc1").unwrap();

        assert_eq!(outcome.merge.arcs, 3);
        assert_eq!(outcome.scored_arcs, 3);
        assert_eq!(outcome.assigned, 3);
        assert!(outcome.proven_optimal);

        let results =
            std::fs::read_to_string(dir.path().join("results/doc1.jsonl")).unwrap();
        let records: Vec<crate::pipeline::outputs::AssignmentRecord> = results
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let closing = records
            .iter()
            .find(|r| r.source == "e1" && r.target == "e3")
            .unwrap();
        assert_eq!(closing.relation, "BEFORE");
    }

    #[test]
    fn test_argmax_mode_runs_without_solver() {
        let dir = tempfile::tempdir().unwrap();
        write_votes(dir.path(), "clf-a", "doc1", &[("e1", "e2", "CONTAINS")]);

        let config = Config {
            optimization: "arg-max".to_string(),
            ..clinical_config(dir.path())
        };
        let ctx = EnsembleContext::from_config(&config).unwrap();
        let outcome = process_document(&ctx, "doc1").unwrap();
        assert_eq!(outcome.assigned, 1);
    }

    #[test]
    fn test_config_errors_surface_before_documents() {
        let dir = tempfile::tempdir().unwrap();
        write_votes(dir.path(), "clf-a", "doc1", &[("e1", "e2", "BEFORE")]);

        let config = Config {
            weight_source: "f1".to_string(),
            ..clinical_config(dir.path())
        };
        // f1 weights need a score report; none exists.
        assert!(EnsembleContext::from_config(&config).is_err());
    }
}
