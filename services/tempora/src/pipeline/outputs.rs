//! Result serialization for resolved documents

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ensemble::{Arc, WeightVector};
use crate::optimizer::Consensus;
use crate::relation::RelationScheme;

/// One resolved arc, ready for downstream markup generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: String,
    pub doc: String,
    pub source: String,
    pub target: String,
    pub relation: String,
    /// Aggregated evidence for the chosen label.
    pub score: f64,
    pub resolved_ts: i64,
}

/// Stable content id for an assignment.
pub fn assignment_id(doc: &str, arc: &Arc) -> String {
    let mut hasher = Sha256::new();
    hasher.update(doc.as_bytes());
    hasher.update(arc.source.as_bytes());
    hasher.update(arc.target.as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

/// Turn a consensus into serializable records.
///
/// Arcs resolved to NONE carry no relation and are omitted.
pub fn assignment_records(
    doc: &str,
    consensus: &Consensus,
    weights: &BTreeMap<Arc, WeightVector>,
    scheme: &RelationScheme,
) -> Vec<AssignmentRecord> {
    let now = Utc::now().timestamp_millis();
    consensus
        .labels
        .iter()
        .filter(|(_, rel)| **rel != scheme.none())
        .map(|(arc, rel)| AssignmentRecord {
            id: assignment_id(doc, arc),
            doc: doc.to_string(),
            source: arc.source.clone(),
            target: arc.target.clone(),
            relation: scheme.label(*rel).to_string(),
            score: weights.get(arc).map(|v| v.get(*rel)).unwrap_or(0.0),
            resolved_ts: now,
        })
        .collect()
}

/// Write assignment records to `<data_dir>/results/<doc>.jsonl`.
pub fn write_assignments(
    data_dir: &str,
    doc: &str,
    records: &[AssignmentRecord],
) -> Result<PathBuf> {
    let dir = Path::new(data_dir).join("results");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create results directory: {:?}", dir))?;

    let path = dir.join(format!("{}.jsonl", doc));
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create results file: {:?}", path))?;
    for record in records {
        let json = serde_json::to_string(record)?;
        writeln!(file, "{}", json)?;
    }

    tracing::info!("Wrote {} assignments to {:?}", records.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::SolveStatus;

    #[test]
    fn test_none_assignments_omitted() {
        let scheme = RelationScheme::clinical();
        let before = scheme.rel("BEFORE").unwrap();

        let mut labels = BTreeMap::new();
        labels.insert(Arc::new("e1", "e2"), before);
        labels.insert(Arc::new("e2", "e3"), scheme.none());
        let consensus = Consensus {
            labels,
            status: SolveStatus::Optimal,
            variables: 16,
            constraints: 2,
        };

        let mut weights = BTreeMap::new();
        let mut vector = WeightVector::new(&scheme);
        vector.set(before, 0.9);
        weights.insert(Arc::new("e1", "e2"), vector);

        let records = assignment_records("doc1", &consensus, &weights, &scheme);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].relation, "BEFORE");
        assert!((records[0].score - 0.9).abs() < 1e-12);
        assert_eq!(records[0].id.len(), 16);
    }

    #[test]
    fn test_write_and_reread() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        let records = vec![AssignmentRecord {
            id: assignment_id("doc1", &Arc::new("e1", "e2")),
            doc: "doc1".to_string(),
            source: "e1".to_string(),
            target: "e2".to_string(),
            relation: "BEFORE".to_string(),
            score: 0.75,
            resolved_ts: 0,
        }];
        let path = write_assignments(data_dir, "doc1", &records).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let parsed: AssignmentRecord =
            serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(parsed.relation, "BEFORE");
        assert_eq!(parsed.id, records[0].id);
    }

    #[test]
    fn test_assignment_id_depends_on_arc() {
        let a = assignment_id("doc1", &Arc::new("e1", "e2"));
        let b = assignment_id("doc1", &Arc::new("e1", "e3"));
        let c = assignment_id("doc2", &Arc::new("e1", "e2"));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
