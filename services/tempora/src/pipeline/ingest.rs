//! Vote ingestion from per-classifier annotation records
//!
//! Each classifier contributes one JSONL file per document under
//! `<data_dir>/annotations/classifier=<id>/<doc>.jsonl`. An optional entity
//! map under `<data_dir>/entities/<doc>.jsonl` translates document-local
//! entity ids to canonical ids; records whose endpoints cannot be resolved
//! are dropped and counted, not fatal.

use std::collections::{BTreeSet, HashMap};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::ensemble::VoteTable;
use crate::error::EnsembleError;
use crate::relation::RelationScheme;

/// One classifier's claim about an ordered entity pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub source: String,
    pub target: String,
    pub relation: String,
}

/// One document-local to canonical entity id mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMapping {
    pub local: String,
    pub canonical: String,
}

/// Resolver from document-local to canonical entity ids.
///
/// Without a mapping file every id is its own canonical form.
#[derive(Debug, Clone, Default)]
pub struct EntityMap {
    map: HashMap<String, String>,
    identity: bool,
}

impl EntityMap {
    /// Identity resolver: ids are already canonical.
    pub fn identity() -> Self {
        Self {
            map: HashMap::new(),
            identity: true,
        }
    }

    pub fn from_mappings(mappings: impl IntoIterator<Item = EntityMapping>) -> Self {
        Self {
            map: mappings
                .into_iter()
                .map(|m| (m.local, m.canonical))
                .collect(),
            identity: false,
        }
    }

    pub fn resolve<'a>(&'a self, id: &'a str) -> Result<&'a str, EnsembleError> {
        if self.identity {
            return Ok(id);
        }
        self.map
            .get(id)
            .map(|s| s.as_str())
            .ok_or_else(|| EnsembleError::UnresolvedEntity(id.to_string()))
    }
}

/// Summary of one document's merge pass.
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub doc: String,
    pub classifiers: usize,
    pub votes: usize,
    pub arcs: usize,
    /// Records dropped because an endpoint had no canonical mapping.
    pub dropped: usize,
}

fn annotations_dir(data_dir: &str) -> PathBuf {
    Path::new(data_dir).join("annotations")
}

fn classifier_dir(data_dir: &str, classifier: &str) -> PathBuf {
    annotations_dir(data_dir).join(format!("classifier={}", classifier))
}

/// List every classifier with an annotations directory.
pub fn discover_classifiers(data_dir: &str) -> Result<Vec<String>> {
    let root = annotations_dir(data_dir);
    if !root.exists() {
        anyhow::bail!("Annotations directory not found: {:?}", root);
    }
    let mut classifiers = Vec::new();
    for entry in std::fs::read_dir(&root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(id) = name.strip_prefix("classifier=") {
            classifiers.push(id.to_string());
        }
    }
    classifiers.sort();
    Ok(classifiers)
}

/// List every document annotated by at least one classifier.
pub fn discover_documents(data_dir: &str) -> Result<Vec<String>> {
    let root = annotations_dir(data_dir);
    if !root.exists() {
        anyhow::bail!("Annotations directory not found: {:?}", root);
    }
    let mut docs = BTreeSet::new();
    for entry in WalkDir::new(&root).min_depth(2).max_depth(2) {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            docs.insert(stem.to_string());
        }
    }
    Ok(docs.into_iter().collect())
}

/// Load the entity map for a document, or the identity map if none exists.
pub fn load_entity_map(data_dir: &str, doc: &str) -> Result<EntityMap> {
    let path = Path::new(data_dir)
        .join("entities")
        .join(format!("{}.jsonl", doc));
    if !path.exists() {
        return Ok(EntityMap::identity());
    }

    let file = std::fs::File::open(&path)
        .with_context(|| format!("Failed to open entity map: {:?}", path))?;
    let reader = BufReader::new(file);
    let mut mappings = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mapping: EntityMapping = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse entity mapping: {}", line))?;
        mappings.push(mapping);
    }
    Ok(EntityMap::from_mappings(mappings))
}

/// Read one classifier's vote records for a document.
pub fn load_vote_records(
    data_dir: &str,
    classifier: &str,
    doc: &str,
) -> Result<Vec<VoteRecord>> {
    let path = classifier_dir(data_dir, classifier).join(format!("{}.jsonl", doc));
    let file = std::fs::File::open(&path)
        .with_context(|| format!("Failed to open annotations: {:?}", path))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: VoteRecord = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse vote record: {}", line))?;
        records.push(record);
    }
    Ok(records)
}

/// Merge every classifier's votes on a document into one canonical table.
///
/// A classifier without a file for the document is silent, not an error.
/// Unknown relation labels abort the document; unresolved entities drop the
/// affected record and are tallied in the report.
pub fn merge_document(
    data_dir: &str,
    doc: &str,
    classifiers: &[String],
    scheme: &RelationScheme,
) -> Result<(VoteTable, MergeReport)> {
    let entity_map = load_entity_map(data_dir, doc)?;
    let mut table = VoteTable::new();
    let mut dropped = 0usize;

    for classifier in classifiers {
        let path = classifier_dir(data_dir, classifier).join(format!("{}.jsonl", doc));
        if !path.exists() {
            tracing::debug!(classifier = %classifier, doc, "no annotations for document");
            continue;
        }
        for record in load_vote_records(data_dir, classifier, doc)? {
            let (source, target) = match (
                entity_map.resolve(&record.source),
                entity_map.resolve(&record.target),
            ) {
                (Ok(source), Ok(target)) => (source.to_string(), target.to_string()),
                (Err(EnsembleError::UnresolvedEntity(id)), _)
                | (_, Err(EnsembleError::UnresolvedEntity(id))) => {
                    tracing::debug!(classifier = %classifier, doc, entity = %id, "dropping unresolved arc");
                    dropped += 1;
                    continue;
                }
                (Err(err), _) | (_, Err(err)) => return Err(err.into()),
            };
            let rel = scheme.rel(&record.relation).with_context(|| {
                format!("Bad relation from classifier {} on {}", classifier, doc)
            })?;
            table.record(scheme, classifier, &source, &target, rel);
        }
    }

    let report = MergeReport {
        doc: doc.to_string(),
        classifiers: classifiers.len(),
        votes: table.vote_count(),
        arcs: table.len(),
        dropped,
    };
    if report.dropped > 0 {
        tracing::warn!(
            doc,
            dropped = report.dropped,
            "dropped records with unresolved entities"
        );
    }
    Ok((table, report))
}
