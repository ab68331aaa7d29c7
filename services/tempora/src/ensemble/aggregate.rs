//! Evidence aggregation: merge per-classifier votes into label weight vectors

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::ensemble::arc::Arc;
use crate::ensemble::votes::VoteTable;
use crate::ensemble::weights::ClassifierRoster;
use crate::error::EnsembleError;
use crate::relation::{Rel, RelationScheme};

/// Run-time-selectable combination formula for merging classifier votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightFormula {
    /// Fraction of voting classifiers that chose each label.
    UniformCount,
    /// Sum of voter weights per label, divided by the weight of the
    /// classifiers that voted on the arc.
    WeightedSumVoters,
    /// Sum of voter weights per label, divided by the weight of the whole
    /// ensemble.
    WeightedSumAll,
    /// Voter weights normalized ensemble-wide to sum to 1; an arc whose
    /// aggregated total stays below 0.5 is dropped from consideration.
    ThresholdNormalized,
    /// Per-label sum of `ln(1 + w)` for agreeing classifiers and
    /// `ln(1 + (1 - w))` for the rest. Weights must lie in (0.5, 1.0).
    LogProbability,
    /// Per-label product of `w` for agreeing classifiers and `1 - w` for the
    /// rest. Weights must lie in (0.5, 1.0).
    ProductProbability,
    /// 0/1 loss, sign-flipped and scaled by the label prior.
    Loss01,
    /// Squared loss scaled by `prior - 1` so maximizing minimizes loss.
    LossSquared,
    /// Log loss scaled by `prior - 1` so maximizing minimizes loss.
    LossLog,
}

impl WeightFormula {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UniformCount => "uniform-count",
            Self::WeightedSumVoters => "weighted-sum-voters",
            Self::WeightedSumAll => "weighted-sum-all",
            Self::ThresholdNormalized => "threshold-normalized",
            Self::LogProbability => "log-probability",
            Self::ProductProbability => "product-probability",
            Self::Loss01 => "loss-01",
            Self::LossSquared => "loss-squared",
            Self::LossLog => "loss-log",
        }
    }
}

impl FromStr for WeightFormula {
    type Err = EnsembleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform-count" => Ok(Self::UniformCount),
            "weighted-sum-voters" => Ok(Self::WeightedSumVoters),
            "weighted-sum-all" => Ok(Self::WeightedSumAll),
            "threshold-normalized" => Ok(Self::ThresholdNormalized),
            "log-probability" => Ok(Self::LogProbability),
            "product-probability" => Ok(Self::ProductProbability),
            "loss-01" => Ok(Self::Loss01),
            "loss-squared" => Ok(Self::LossSquared),
            "loss-log" => Ok(Self::LossLog),
            other => Err(EnsembleError::UnknownFormula(other.to_string())),
        }
    }
}

/// Arcs whose aggregated total falls below this are dropped by the
/// threshold-normalized formula.
pub const INCLUSION_THRESHOLD: f64 = 0.5;

/// Per-label prior probabilities used by the loss formulas.
#[derive(Debug, Clone)]
pub struct LabelPriors(Vec<f64>);

impl LabelPriors {
    /// Uniform prior over the scheme's labels.
    pub fn uniform(scheme: &RelationScheme) -> Self {
        Self(vec![1.0 / scheme.len() as f64; scheme.len()])
    }

    /// Priors from explicit values, one per label in scheme order.
    pub fn from_values(
        values: Vec<f64>,
        scheme: &RelationScheme,
    ) -> Result<Self, EnsembleError> {
        if values.len() != scheme.len() {
            return Err(EnsembleError::PriorLength {
                scheme: scheme.name().to_string(),
                got: values.len(),
                expected: scheme.len(),
            });
        }
        Ok(Self(values))
    }

    pub fn get(&self, rel: Rel) -> f64 {
        self.0[rel.0]
    }
}

/// Dense per-arc evidence scores, indexed by the scheme's label order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    scores: Vec<f64>,
}

impl WeightVector {
    /// Zeroed vector sized for the scheme's label set.
    pub fn new(scheme: &RelationScheme) -> Self {
        Self::zeros(scheme.len())
    }

    fn zeros(len: usize) -> Self {
        Self {
            scores: vec![0.0; len],
        }
    }

    pub fn get(&self, rel: Rel) -> f64 {
        self.scores[rel.0]
    }

    pub fn set(&mut self, rel: Rel, score: f64) {
        self.scores[rel.0] = score;
    }

    pub fn add(&mut self, rel: Rel, score: f64) {
        self.scores[rel.0] += score;
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    /// Label with the largest score; ties break to the lowest label index.
    pub fn argmax(&self) -> Rel {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, &score) in self.scores.iter().enumerate() {
            if score > best_score {
                best = i;
                best_score = score;
            }
        }
        Rel(best)
    }
}

/// Merge the vote table into one weight vector per canonical arc.
///
/// Pure function of its inputs. The roster's sorted iteration order makes
/// the result independent of how the votes were enumerated on the way in.
/// The probability-domain check for the log and product formulas runs before
/// any arc is touched.
pub fn aggregate(
    table: &VoteTable,
    roster: &ClassifierRoster,
    formula: WeightFormula,
    scheme: &RelationScheme,
    priors: &LabelPriors,
) -> Result<BTreeMap<Arc, WeightVector>, EnsembleError> {
    if matches!(
        formula,
        WeightFormula::LogProbability | WeightFormula::ProductProbability
    ) {
        roster.require_probability_weights(formula.as_str())?;
    }

    let mut out = BTreeMap::new();
    match formula {
        WeightFormula::UniformCount => {
            for (arc, votes) in table.iter() {
                let voters = votes.len() as f64;
                let mut vector = WeightVector::zeros(scheme.len());
                for rel in votes.values() {
                    vector.add(*rel, 1.0 / voters);
                }
                out.insert(arc.clone(), vector);
            }
        }
        WeightFormula::WeightedSumVoters | WeightFormula::WeightedSumAll => {
            for (arc, votes) in table.iter() {
                let mut vector = WeightVector::zeros(scheme.len());
                let mut voter_weight = 0.0;
                for (name, weight) in roster.iter() {
                    if let Some(rel) = votes.get(name) {
                        vector.add(*rel, weight);
                        voter_weight += weight;
                    }
                }
                let denominator = match formula {
                    WeightFormula::WeightedSumVoters => voter_weight,
                    _ => roster.total_weight(),
                };
                if denominator > 0.0 {
                    for rel in scheme.iter() {
                        vector.set(rel, vector.get(rel) / denominator);
                    }
                }
                out.insert(arc.clone(), vector);
            }
        }
        WeightFormula::ThresholdNormalized => {
            let normalized = roster.normalized();
            for (arc, votes) in table.iter() {
                let mut vector = WeightVector::zeros(scheme.len());
                for (name, weight) in normalized.iter() {
                    if let Some(rel) = votes.get(name) {
                        vector.add(*rel, weight);
                    }
                }
                if vector.total() >= INCLUSION_THRESHOLD {
                    out.insert(arc.clone(), vector);
                } else {
                    tracing::debug!(arc = %arc, total = vector.total(), "arc below inclusion threshold");
                }
            }
        }
        WeightFormula::LogProbability => {
            for (arc, votes) in table.iter() {
                let mut vector = WeightVector::zeros(scheme.len());
                for rel in scheme.iter() {
                    let mut score = 0.0;
                    for (name, weight) in roster.iter() {
                        if votes.get(name) == Some(&rel) {
                            score += weight.ln_1p();
                        } else {
                            score += (1.0 - weight).ln_1p();
                        }
                    }
                    vector.set(rel, score);
                }
                out.insert(arc.clone(), vector);
            }
        }
        WeightFormula::ProductProbability => {
            for (arc, votes) in table.iter() {
                let mut vector = WeightVector::zeros(scheme.len());
                for rel in scheme.iter() {
                    let mut score = 1.0;
                    for (name, weight) in roster.iter() {
                        if votes.get(name) == Some(&rel) {
                            score *= weight;
                        } else {
                            score *= 1.0 - weight;
                        }
                    }
                    vector.set(rel, score);
                }
                out.insert(arc.clone(), vector);
            }
        }
        WeightFormula::Loss01 | WeightFormula::LossSquared | WeightFormula::LossLog => {
            // A silent classifier disagrees with every candidate label, so it
            // contributes its full loss term to each.
            let normalized = roster.normalized();
            for (arc, votes) in table.iter() {
                let mut vector = WeightVector::zeros(scheme.len());
                for rel in scheme.iter() {
                    let mut loss = 0.0;
                    for (name, weight) in normalized.iter() {
                        if votes.get(name) == Some(&rel) {
                            continue;
                        }
                        loss += match formula {
                            WeightFormula::Loss01 => weight,
                            WeightFormula::LossSquared => weight * weight,
                            _ => weight.ln_1p() + (1.0 - weight).ln_1p(),
                        };
                    }
                    let score = match formula {
                        WeightFormula::Loss01 => (1.0 - loss) * priors.get(rel),
                        _ => loss * (priors.get(rel) - 1.0),
                    };
                    vector.set(rel, score);
                }
                out.insert(arc.clone(), vector);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme() -> RelationScheme {
        RelationScheme::clinical()
    }

    fn table(scheme: &RelationScheme) -> VoteTable {
        let before = scheme.rel("BEFORE").unwrap();
        let overlap = scheme.rel("OVERLAP").unwrap();

        let mut table = VoteTable::new();
        table.record(scheme, "clf-a", "e1", "e2", before);
        table.record(scheme, "clf-b", "e1", "e2", overlap);
        table.record(scheme, "clf-c", "e1", "e2", before);
        table.record(scheme, "clf-a", "e2", "e3", before);
        table
    }

    fn weighted_roster() -> ClassifierRoster {
        ClassifierRoster::from_scores(
            ["clf-a".to_string(), "clf-b".to_string(), "clf-c".to_string()],
            &[
                crate::ensemble::weights::ScoreRecord {
                    classifier: "clf-a".to_string(),
                    precision: 0.8,
                    recall: 0.8,
                    f1: 0.8,
                },
                crate::ensemble::weights::ScoreRecord {
                    classifier: "clf-b".to_string(),
                    precision: 0.6,
                    recall: 0.6,
                    f1: 0.6,
                },
                crate::ensemble::weights::ScoreRecord {
                    classifier: "clf-c".to_string(),
                    precision: 0.7,
                    recall: 0.7,
                    f1: 0.7,
                },
            ],
            crate::ensemble::weights::WeightSource::F1,
        )
        .unwrap()
    }

    #[test]
    fn test_uniform_count_proportions() {
        let scheme = scheme();
        let roster = ClassifierRoster::uniform(
            ["clf-a".to_string(), "clf-b".to_string(), "clf-c".to_string()],
        );
        let priors = LabelPriors::uniform(&scheme);
        let vectors = aggregate(
            &table(&scheme),
            &roster,
            WeightFormula::UniformCount,
            &scheme,
            &priors,
        )
        .unwrap();

        let before = scheme.rel("BEFORE").unwrap();
        let overlap = scheme.rel("OVERLAP").unwrap();
        let v12 = &vectors[&Arc::new("e1", "e2")];
        assert!((v12.get(before) - 2.0 / 3.0).abs() < 1e-12);
        assert!((v12.get(overlap) - 1.0 / 3.0).abs() < 1e-12);

        // Silent classifiers are excluded from the denominator.
        let v23 = &vectors[&Arc::new("e2", "e3")];
        assert!((v23.get(before) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_sum_linearity() {
        let scheme = scheme();
        let roster = weighted_roster();
        let priors = LabelPriors::uniform(&scheme);
        let vectors = aggregate(
            &table(&scheme),
            &roster,
            WeightFormula::WeightedSumAll,
            &scheme,
            &priors,
        )
        .unwrap();

        // Vector total times the ensemble weight equals the weight of the
        // classifiers that actually voted on the arc.
        let v12 = &vectors[&Arc::new("e1", "e2")];
        let voters_12 = 0.8 + 0.6 + 0.7;
        assert!((v12.total() * roster.total_weight() - voters_12).abs() < 1e-9);

        let v23 = &vectors[&Arc::new("e2", "e3")];
        assert!((v23.total() * roster.total_weight() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_sum_voters_normalizes_per_arc() {
        let scheme = scheme();
        let roster = weighted_roster();
        let priors = LabelPriors::uniform(&scheme);
        let vectors = aggregate(
            &table(&scheme),
            &roster,
            WeightFormula::WeightedSumVoters,
            &scheme,
            &priors,
        )
        .unwrap();
        for vector in vectors.values() {
            assert!((vector.total() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_threshold_drops_weak_arcs() {
        let scheme = scheme();
        let roster = ClassifierRoster::uniform(
            ["clf-a".to_string(), "clf-b".to_string(), "clf-c".to_string()],
        );
        let priors = LabelPriors::uniform(&scheme);
        let vectors = aggregate(
            &table(&scheme),
            &roster,
            WeightFormula::ThresholdNormalized,
            &scheme,
            &priors,
        )
        .unwrap();

        // All three classifiers voted on (e1, e2): total 1.0, kept. Only one
        // voted on (e2, e3): total 1/3, dropped.
        assert!(vectors.contains_key(&Arc::new("e1", "e2")));
        assert!(!vectors.contains_key(&Arc::new("e2", "e3")));
    }

    #[test]
    fn test_log_probability_domain_checked_first() {
        let scheme = scheme();
        // Weight 1.0 is outside the open interval even though votes exist.
        let roster = ClassifierRoster::uniform(["clf-a".to_string()]);
        let priors = LabelPriors::uniform(&scheme);
        let err = aggregate(
            &table(&scheme),
            &roster,
            WeightFormula::LogProbability,
            &scheme,
            &priors,
        )
        .unwrap_err();
        assert!(matches!(err, EnsembleError::WeightOutOfRange { .. }));

        let err = aggregate(
            &table(&scheme),
            &roster,
            WeightFormula::ProductProbability,
            &scheme,
            &priors,
        )
        .unwrap_err();
        assert!(matches!(err, EnsembleError::WeightOutOfRange { .. }));
    }

    #[test]
    fn test_product_probability_values() {
        let scheme = scheme();
        let roster = weighted_roster();
        let priors = LabelPriors::uniform(&scheme);
        let vectors = aggregate(
            &table(&scheme),
            &roster,
            WeightFormula::ProductProbability,
            &scheme,
            &priors,
        )
        .unwrap();

        let before = scheme.rel("BEFORE").unwrap();
        let v12 = &vectors[&Arc::new("e1", "e2")];
        // clf-a and clf-c agree with BEFORE, clf-b voted OVERLAP.
        let expected = 0.8 * (1.0 - 0.6) * 0.7;
        assert!((v12.get(before) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_log_probability_values() {
        let scheme = scheme();
        let roster = weighted_roster();
        let priors = LabelPriors::uniform(&scheme);
        let vectors = aggregate(
            &table(&scheme),
            &roster,
            WeightFormula::LogProbability,
            &scheme,
            &priors,
        )
        .unwrap();

        let before = scheme.rel("BEFORE").unwrap();
        let v12 = &vectors[&Arc::new("e1", "e2")];
        let expected = 0.8f64.ln_1p() + 0.4f64.ln_1p() + 0.7f64.ln_1p();
        assert!((v12.get(before) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_loss01_prefers_agreement() {
        let scheme = scheme();
        let roster = weighted_roster();
        let priors = LabelPriors::uniform(&scheme);
        let vectors = aggregate(
            &table(&scheme),
            &roster,
            WeightFormula::Loss01,
            &scheme,
            &priors,
        )
        .unwrap();

        let before = scheme.rel("BEFORE").unwrap();
        let overlap = scheme.rel("OVERLAP").unwrap();
        let after = scheme.rel("AFTER").unwrap();
        let v12 = &vectors[&Arc::new("e1", "e2")];
        assert!(v12.get(before) > v12.get(overlap));
        assert!(v12.get(overlap) > v12.get(after));
    }

    #[test]
    fn test_deterministic_under_vote_permutation() {
        let scheme = scheme();
        let before = scheme.rel("BEFORE").unwrap();
        let overlap = scheme.rel("OVERLAP").unwrap();

        let mut forward = VoteTable::new();
        forward.record(&scheme, "clf-a", "e1", "e2", before);
        forward.record(&scheme, "clf-b", "e1", "e2", overlap);
        forward.record(&scheme, "clf-c", "e1", "e2", before);
        forward.record(&scheme, "clf-a", "e2", "e3", before);

        let after_rel = scheme.rel("AFTER").unwrap();
        let mut reversed = VoteTable::new();
        reversed.record(&scheme, "clf-a", "e3", "e2", after_rel);
        reversed.record(&scheme, "clf-c", "e1", "e2", before);
        reversed.record(&scheme, "clf-b", "e2", "e1", overlap);
        reversed.record(&scheme, "clf-a", "e1", "e2", before);

        let roster = weighted_roster();
        let priors = LabelPriors::uniform(&scheme);
        for formula in [
            WeightFormula::UniformCount,
            WeightFormula::WeightedSumVoters,
            WeightFormula::WeightedSumAll,
            WeightFormula::ThresholdNormalized,
            WeightFormula::LogProbability,
            WeightFormula::ProductProbability,
            WeightFormula::Loss01,
            WeightFormula::LossSquared,
            WeightFormula::LossLog,
        ] {
            let a = aggregate(&forward, &roster, formula, &scheme, &priors).unwrap();
            let b = aggregate(&reversed, &roster, formula, &scheme, &priors).unwrap();
            assert_eq!(a, b, "formula {:?} not permutation-invariant", formula);
        }
    }

    #[test]
    fn test_argmax_tie_breaks_low_index() {
        let scheme = scheme();
        let mut vector = WeightVector::zeros(scheme.len());
        let before = scheme.rel("BEFORE").unwrap();
        let overlap = scheme.rel("OVERLAP").unwrap();
        vector.set(before, 0.5);
        vector.set(overlap, 0.5);
        assert_eq!(vector.argmax(), before);
    }

    #[test]
    fn test_unknown_formula_identifier() {
        let err = "majority-vote".parse::<WeightFormula>().unwrap_err();
        assert!(matches!(err, EnsembleError::UnknownFormula(_)));
    }

    #[test]
    fn test_prior_length_mismatch() {
        let scheme = scheme();
        let err = LabelPriors::from_values(vec![0.1; 3], &scheme).unwrap_err();
        assert!(matches!(err, EnsembleError::PriorLength { .. }));
    }
}
