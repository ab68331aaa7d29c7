//! Merge → Aggregate → Optimize ensemble pipeline CLI
//!
//! Usage:
//!   tempora_ensemble merge --doc wsj_0026 --data-dir data
//!   tempora_ensemble aggregate --doc wsj_0026 --formula weighted-sum-all
//!   tempora_ensemble run --doc wsj_0026 --mode ilp
//!   tempora_ensemble run-all --data-dir data --scheme clinical
//!   tempora_ensemble validate --config ensemble.toml

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;

use tempora::config::Config;
use tempora::pipeline::{
    discover_documents, merge_document, process_document, DocumentOutcome, EnsembleContext,
};
use tempora::relation::RelationScheme;

#[derive(Parser)]
#[command(name = "tempora_ensemble")]
#[command(about = "Temporal-relation ensemble: merge votes, aggregate evidence, optimize")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct CommonArgs {
    /// Config file (TOML); flags below override its values
    #[arg(long)]
    config: Option<String>,
    #[arg(long)]
    data_dir: Option<String>,
    /// Relation scheme: timeml or clinical
    #[arg(long)]
    scheme: Option<String>,
    /// Weighting formula, e.g. uniform-count, weighted-sum-all, log-probability
    #[arg(long)]
    formula: Option<String>,
    /// Weight source: uniform, f1, precision, recall, convex
    #[arg(long)]
    source: Option<String>,
    /// Optimization mode: ilp or arg-max
    #[arg(long)]
    mode: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge classifier votes for one document and report arc counts
    Merge {
        #[arg(long)]
        doc: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Merge and aggregate one document, printing per-arc evidence
    Aggregate {
        #[arg(long)]
        doc: String,
        /// Limit printed arcs
        #[arg(long, default_value = "20")]
        limit: usize,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Resolve one document end to end
    Run {
        #[arg(long)]
        doc: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Resolve every annotated document
    RunAll {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Validate configuration and the built-in composition tables
    Validate {
        #[command(flatten)]
        common: CommonArgs,
    },
}

fn load_config(common: &CommonArgs) -> Result<Config> {
    let mut config = match &common.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(data_dir) = &common.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(scheme) = &common.scheme {
        config.scheme = scheme.clone();
    }
    if let Some(formula) = &common.formula {
        config.weight_formula = formula.clone();
    }
    if let Some(source) = &common.source {
        config.weight_source = source.clone();
    }
    if let Some(mode) = &common.mode {
        config.optimization = mode.clone();
    }
    Ok(config)
}

fn run_merge_command(doc: &str, common: &CommonArgs) -> Result<()> {
    let config = load_config(common)?;
    let ctx = EnsembleContext::from_config(&config)?;
    let (_, report) = merge_document(&ctx.data_dir, doc, ctx.roster.names(), &ctx.scheme)?;
    println!(
        "{}: {} arcs from {} votes across {} classifiers ({} dropped)",
        report.doc, report.arcs, report.votes, report.classifiers, report.dropped
    );
    Ok(())
}

fn run_aggregate_command(doc: &str, limit: usize, common: &CommonArgs) -> Result<()> {
    let config = load_config(common)?;
    let ctx = EnsembleContext::from_config(&config)?;
    let (table, report) =
        merge_document(&ctx.data_dir, doc, ctx.roster.names(), &ctx.scheme)?;
    let weights = tempora::ensemble::aggregate(
        &table,
        &ctx.roster,
        ctx.formula,
        &ctx.scheme,
        &ctx.priors,
    )?;

    println!(
        "{}: {} arcs scored under {} ({} merged)",
        doc,
        weights.len(),
        ctx.formula.as_str(),
        report.arcs
    );
    for (arc, vector) in weights.iter().take(limit) {
        let best = vector.argmax();
        println!(
            "  {} | best {} ({:.4}) | total {:.4}",
            arc,
            ctx.scheme.label(best),
            vector.get(best),
            vector.total()
        );
    }
    Ok(())
}

fn run_document_command(doc: &str, common: &CommonArgs) -> Result<()> {
    let config = load_config(common)?;
    let ctx = EnsembleContext::from_config(&config)?;
    let outcome = process_document(&ctx, doc)?;
    print_outcome(&outcome);
    Ok(())
}

async fn run_all_command(common: &CommonArgs) -> Result<()> {
    let config = load_config(common)?;
    let ctx = EnsembleContext::from_config(&config)?;
    let docs = discover_documents(&ctx.data_dir)?;
    tracing::info!("Resolving {} documents", docs.len());

    let progress = ProgressBar::new(docs.len() as u64);
    let mut tasks = Vec::new();
    for doc in docs {
        let ctx = ctx.clone();
        let progress = progress.clone();
        tasks.push(tokio::task::spawn_blocking(move || {
            let outcome = process_document(&ctx, &doc);
            progress.inc(1);
            (doc, outcome)
        }));
    }

    let mut outcomes = Vec::new();
    let mut failures = 0usize;
    for result in futures::future::join_all(tasks).await {
        let (doc, outcome) = result?;
        match outcome {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                tracing::warn!("Failed to resolve {}: {:#}", doc, err);
                failures += 1;
            }
        }
    }
    progress.finish_and_clear();

    let arcs: usize = outcomes.iter().map(|o| o.merge.arcs).sum();
    let assigned: usize = outcomes.iter().map(|o| o.assigned).sum();
    let dropped: usize = outcomes.iter().map(|o| o.merge.dropped).sum();
    println!("\n=== Ensemble Summary ===");
    println!("Documents resolved: {}", outcomes.len());
    println!("Documents failed: {}", failures);
    println!("Arcs merged: {}", arcs);
    println!("Arcs assigned: {}", assigned);
    println!("Records dropped (unresolved entities): {}", dropped);
    Ok(())
}

fn run_validate_command(common: &CommonArgs) -> Result<()> {
    for scheme in [RelationScheme::timeml(), RelationScheme::clinical()] {
        scheme.validate()?;
        println!("scheme {}: {} labels, tables ok", scheme.name(), scheme.len());
    }
    let config = load_config(common)?;
    let ctx = EnsembleContext::from_config(&config)?;
    println!(
        "config ok: scheme={} formula={} mode={} classifiers={}",
        ctx.scheme.name(),
        ctx.formula.as_str(),
        ctx.mode.as_str(),
        ctx.roster.len()
    );
    for (name, weight) in ctx.roster.iter() {
        println!("  {} weight {:.4}", name, weight);
    }
    Ok(())
}

fn print_outcome(outcome: &DocumentOutcome) {
    println!(
        "{}: {} arcs merged, {} scored, {} assigned{}{}",
        outcome.doc,
        outcome.merge.arcs,
        outcome.scored_arcs,
        outcome.assigned,
        if outcome.merge.dropped > 0 {
            format!(", {} dropped", outcome.merge.dropped)
        } else {
            String::new()
        },
        if outcome.proven_optimal {
            ""
        } else {
            " (not proven optimal)"
        }
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Merge { doc, common } => run_merge_command(&doc, &common)?,
        Commands::Aggregate { doc, limit, common } => {
            run_aggregate_command(&doc, limit, &common)?
        }
        Commands::Run { doc, common } => run_document_command(&doc, &common)?,
        Commands::RunAll { common } => run_all_command(&common).await?,
        Commands::Validate { common } => run_validate_command(&common)?,
    }

    Ok(())
}
