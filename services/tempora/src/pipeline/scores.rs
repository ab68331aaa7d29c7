//! Classifier score reports and label priors

use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::ensemble::{LabelPriors, ScoreRecord};
use crate::relation::RelationScheme;

/// Load held-out score records from `<data_dir>/scores.jsonl`.
///
/// A missing file yields an empty list; whether that is acceptable depends
/// on the configured weight source (uniform needs no scores).
pub fn load_scores(data_dir: &str) -> Result<Vec<ScoreRecord>> {
    let path = Path::new(data_dir).join("scores.jsonl");
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = std::fs::File::open(&path)
        .with_context(|| format!("Failed to open score report: {:?}", path))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ScoreRecord = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse score record: {}", line))?;
        records.push(record);
    }
    Ok(records)
}

/// Load label priors from a plain-text file: one float per line, in the
/// scheme's label order.
pub fn load_priors<P: AsRef<Path>>(path: P, scheme: &RelationScheme) -> Result<LabelPriors> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read priors from {:?}", path.as_ref()))?;
    let mut values = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: f64 = line
            .parse()
            .with_context(|| format!("Bad prior value: {}", line))?;
        values.push(value);
    }
    Ok(LabelPriors::from_values(values, scheme)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_scores_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "{}",
            serde_json::to_string(&ScoreRecord {
                classifier: "clf-a".to_string(),
                precision: 0.71,
                recall: 0.64,
                f1: 0.673,
            })
            .unwrap()
        )
        .unwrap();

        let records = load_scores(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].classifier, "clf-a");
        assert!((records[0].precision - 0.71).abs() < 1e-12);
    }

    #[test]
    fn test_missing_scores_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_scores(dir.path().to_str().unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_load_priors_length_checked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("priors.dat");
        std::fs::write(&path, "0.4\n0.3\n0.3\n").unwrap();

        let scheme = RelationScheme::clinical();
        assert!(load_priors(&path, &scheme).is_err());

        let values: Vec<String> = (0..scheme.len()).map(|_| "0.125".to_string()).collect();
        std::fs::write(&path, values.join("\n")).unwrap();
        let priors = load_priors(&path, &scheme).unwrap();
        assert!((priors.get(scheme.none()) - 0.125).abs() < 1e-12);
    }
}
