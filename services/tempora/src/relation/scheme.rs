//! Relation taxonomies: ordered label sets with inverse and composition maps

use crate::error::EnsembleError;
use crate::relation::composition::{self, CompositionRow};

/// Position of a relation label within its scheme's label order.
///
/// The scheme owns index assignment, so weight vectors, votes and decision
/// variables built against the same scheme stay aligned by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rel(pub usize);

const TIMEML_LABELS: &[&str] = &[
    "BEFORE",
    "AFTER",
    "INCLUDES",
    "IS_INCLUDED",
    "DURING",
    "DURING_INV",
    "SIMULTANEOUS",
    "IAFTER",
    "IBEFORE",
    "IDENTITY",
    "BEGINS",
    "ENDS",
    "BEGUN_BY",
    "ENDED_BY",
    "NONE",
];

const TIMEML_INVERSES: &[&str] = &[
    "AFTER",
    "BEFORE",
    "IS_INCLUDED",
    "INCLUDES",
    "DURING_INV",
    "DURING",
    "SIMULTANEOUS",
    "IBEFORE",
    "IAFTER",
    "IDENTITY",
    "BEGUN_BY",
    "ENDED_BY",
    "BEGINS",
    "ENDS",
    "NONE",
];

const TIMEML_CODES: &[&str] = &[
    "p", "pi", "o", "oi", "d", "di", "Ii", "mi", "m", "I", "s", "f", "si", "fi", "n",
];

const CLINICAL_LABELS: &[&str] = &[
    "BEFORE",
    "AFTER",
    "CONTAINS",
    "CONTAINS_INV",
    "OVERLAP",
    "BEGINS-ON",
    "ENDS-ON",
    "NONE",
];

const CLINICAL_INVERSES: &[&str] = &[
    "AFTER",
    "BEFORE",
    "CONTAINS_INV",
    "CONTAINS",
    "OVERLAP",
    "ENDS-ON",
    "BEGINS-ON",
    "NONE",
];

const CLINICAL_CODES: &[&str] = &["p", "pi", "c", "ci", "o", "b", "bi", "n"];

/// A fixed, ordered relation label set with its involution and composition
/// algebra.
///
/// Built-in instantiations cover the news-domain TimeML set (Allen's 13
/// interval relations plus IDENTITY and NONE) and the clinical THYME set.
/// Consuming code never branches on the variant: it only talks to this
/// contract.
#[derive(Debug, Clone)]
pub struct RelationScheme {
    name: &'static str,
    labels: &'static [&'static str],
    inverse: Vec<usize>,
    composition: Vec<Option<Vec<Rel>>>,
}

impl RelationScheme {
    /// News-domain TimeML scheme (15 labels).
    pub fn timeml() -> Self {
        Self::build(
            "timeml",
            TIMEML_LABELS,
            TIMEML_INVERSES,
            TIMEML_CODES,
            composition::TIMEML,
        )
    }

    /// Clinical THYME scheme (8 labels).
    pub fn clinical() -> Self {
        Self::build(
            "clinical",
            CLINICAL_LABELS,
            CLINICAL_INVERSES,
            CLINICAL_CODES,
            composition::CLINICAL,
        )
    }

    /// Look up a scheme by its configuration name.
    pub fn by_name(name: &str) -> Result<Self, EnsembleError> {
        match name {
            "timeml" => Ok(Self::timeml()),
            "clinical" => Ok(Self::clinical()),
            other => Err(EnsembleError::UnknownScheme(other.to_string())),
        }
    }

    fn build(
        name: &'static str,
        labels: &'static [&'static str],
        inverses: &'static [&'static str],
        codes: &'static [&'static str],
        table: &[CompositionRow],
    ) -> Self {
        let index_of = |label: &str| {
            labels
                .iter()
                .position(|l| *l == label)
                .expect("inverse table references a known label")
        };
        let inverse: Vec<usize> = inverses.iter().map(|l| index_of(l)).collect();

        let code_index = |code: &str| {
            codes
                .iter()
                .position(|c| *c == code)
                .expect("composition table references a known code")
        };
        let n = labels.len();
        let mut composition: Vec<Option<Vec<Rel>>> = vec![None; n * n];
        for (r1, r2, allowed) in table {
            let set: Vec<Rel> = allowed.iter().map(|c| Rel(code_index(c))).collect();
            composition[code_index(r1) * n + code_index(r2)] = Some(set);
        }

        Self {
            name,
            labels,
            inverse,
            composition,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of labels, including NONE.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    /// Iterate all labels in stable index order.
    pub fn iter(&self) -> impl Iterator<Item = Rel> {
        (0..self.labels.len()).map(Rel)
    }

    /// Resolve a label string to its index.
    pub fn rel(&self, label: &str) -> Result<Rel, EnsembleError> {
        self.labels
            .iter()
            .position(|l| *l == label)
            .map(Rel)
            .ok_or_else(|| EnsembleError::UnknownLabel {
                scheme: self.name.to_string(),
                label: label.to_string(),
            })
    }

    pub fn label(&self, rel: Rel) -> &'static str {
        self.labels[rel.0]
    }

    /// Involution over labels: `inverse(inverse(r)) == r`.
    pub fn inverse(&self, rel: Rel) -> Rel {
        Rel(self.inverse[rel.0])
    }

    /// The NONE label.
    pub fn none(&self) -> Rel {
        Rel(self.labels.len() - 1)
    }

    /// Admissible closing relations for the chain `i r1 j`, `j r2 k`.
    ///
    /// `None` means the pair is unconstrained: every closing relation is
    /// admissible and no constraint needs to be generated.
    pub fn compose(&self, r1: Rel, r2: Rel) -> Option<&[Rel]> {
        self.composition[r1.0 * self.labels.len() + r2.0].as_deref()
    }

    /// Structural sanity checks on the scheme's tables.
    ///
    /// Verifies that the inverse map is a true involution fixing NONE, and
    /// that every constrained composition entry admits at least one closing
    /// relation.
    pub fn validate(&self) -> Result<(), EnsembleError> {
        let invalid = |reason: String| EnsembleError::InvalidScheme {
            scheme: self.name.to_string(),
            reason,
        };
        for r in self.iter() {
            if self.inverse(self.inverse(r)) != r {
                return Err(invalid(format!(
                    "inverse of `{}` is not an involution",
                    self.label(r)
                )));
            }
        }
        if self.inverse(self.none()) != self.none() {
            return Err(invalid("NONE must be self-inverse".to_string()));
        }
        for r1 in self.iter() {
            for r2 in self.iter() {
                if let Some(allowed) = self.compose(r1, r2) {
                    if allowed.is_empty() {
                        return Err(invalid(format!(
                            "composition ({}, {}) admits no relation",
                            self.label(r1),
                            self.label(r2)
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
