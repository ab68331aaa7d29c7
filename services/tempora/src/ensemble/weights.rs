//! Classifier reliability weights

use serde::{Deserialize, Serialize};

use crate::error::EnsembleError;

/// How a classifier's scalar weight is derived from its held-out scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightSource {
    /// Every classifier weighs 1.0.
    Uniform,
    F1,
    Precision,
    Recall,
    /// `alpha * precision + (1 - alpha) * recall`.
    Convex(f64),
}

impl WeightSource {
    /// Parse a configuration identifier. `convexifying` supplies the
    /// coefficient for the `convex` source.
    pub fn parse(name: &str, convexifying: f64) -> Result<Self, EnsembleError> {
        match name {
            "uniform" => Ok(Self::Uniform),
            "f1" => Ok(Self::F1),
            "precision" => Ok(Self::Precision),
            "recall" => Ok(Self::Recall),
            "convex" => Ok(Self::Convex(convexifying)),
            other => Err(EnsembleError::UnknownWeightSource(other.to_string())),
        }
    }

    fn apply(&self, record: &ScoreRecord) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::F1 => record.f1,
            Self::Precision => record.precision,
            Self::Recall => record.recall,
            Self::Convex(alpha) => alpha * record.precision + (1.0 - alpha) * record.recall,
        }
    }
}

/// Held-out evaluation scores for one classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub classifier: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Sorted, deduplicated classifier names with their scalar weights.
///
/// Iteration order is the sorted name order, so every aggregation pass over
/// the roster is deterministic regardless of how the input votes were
/// enumerated.
#[derive(Debug, Clone)]
pub struct ClassifierRoster {
    names: Vec<String>,
    weights: Vec<f64>,
}

impl ClassifierRoster {
    /// Roster with weight 1.0 for every classifier.
    pub fn uniform(names: impl IntoIterator<Item = String>) -> Self {
        let names = Self::sorted(names);
        let weights = vec![1.0; names.len()];
        Self { names, weights }
    }

    /// Derive weights from score records under the given source.
    ///
    /// Every classifier must have a score record unless the source is
    /// `Uniform`.
    pub fn from_scores(
        names: impl IntoIterator<Item = String>,
        scores: &[ScoreRecord],
        source: WeightSource,
    ) -> Result<Self, EnsembleError> {
        let names = Self::sorted(names);
        let mut weights = Vec::with_capacity(names.len());
        for name in &names {
            let weight = match source {
                WeightSource::Uniform => 1.0,
                source => {
                    let record = scores
                        .iter()
                        .find(|s| &s.classifier == name)
                        .ok_or_else(|| EnsembleError::MissingScore(name.clone()))?;
                    source.apply(record)
                }
            };
            weights.push(weight);
        }
        Ok(Self { names, weights })
    }

    fn sorted(names: impl IntoIterator<Item = String>) -> Vec<String> {
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate `(name, weight)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names
            .iter()
            .map(|n| n.as_str())
            .zip(self.weights.iter().copied())
    }

    pub fn weight(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.weights[i])
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// A copy of this roster with weights scaled to sum to 1.
    pub fn normalized(&self) -> Self {
        let total = self.total_weight();
        let weights = if total > 0.0 {
            self.weights.iter().map(|w| w / total).collect()
        } else {
            self.weights.clone()
        };
        Self {
            names: self.names.clone(),
            weights,
        }
    }

    /// Require every weight to lie strictly inside (0.5, 1.0).
    ///
    /// The log-probability and product-probability formulas interpret
    /// weights as per-classifier correctness probabilities; anything at or
    /// outside those bounds is a configuration error, raised before any arc
    /// is aggregated.
    pub fn require_probability_weights(&self, formula: &str) -> Result<(), EnsembleError> {
        for (name, weight) in self.iter() {
            if weight <= 0.5 || weight >= 1.0 {
                return Err(EnsembleError::WeightOutOfRange {
                    classifier: name.to_string(),
                    weight,
                    formula: formula.to_string(),
                });
            }
        }
        Ok(())
    }
}
