//! Run configuration for the ensemble pipeline

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::ensemble::{WeightFormula, WeightSource};
use crate::error::EnsembleError;
use crate::optimizer::OptimizationMode;
use crate::relation::RelationScheme;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Classifiers to include. Empty means every classifier found under the
    /// annotations directory.
    #[serde(default)]
    pub classifiers: Vec<String>,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_weight_formula")]
    pub weight_formula: String,
    #[serde(default = "default_weight_source")]
    pub weight_source: String,
    #[serde(default = "default_convexifying")]
    pub convexifying: f64,
    #[serde(default = "default_optimization")]
    pub optimization: String,
    /// Optional per-label prior file for the loss formulas: one float per
    /// line, in scheme label order.
    #[serde(default)]
    pub priors_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            classifiers: Vec::new(),
            scheme: default_scheme(),
            weight_formula: default_weight_formula(),
            weight_source: default_weight_source(),
            convexifying: default_convexifying(),
            optimization: default_optimization(),
            priors_file: None,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content)
            .context("Failed to parse config TOML")?;
        Ok(config)
    }

    pub fn resolve_scheme(&self) -> Result<RelationScheme, EnsembleError> {
        RelationScheme::by_name(&self.scheme)
    }

    pub fn resolve_formula(&self) -> Result<WeightFormula, EnsembleError> {
        self.weight_formula.parse()
    }

    pub fn resolve_weight_source(&self) -> Result<WeightSource, EnsembleError> {
        WeightSource::parse(&self.weight_source, self.convexifying)
    }

    pub fn resolve_mode(&self) -> Result<OptimizationMode, EnsembleError> {
        self.optimization.parse()
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_scheme() -> String {
    "timeml".to_string()
}

fn default_weight_formula() -> String {
    "uniform-count".to_string()
}

fn default_weight_source() -> String {
    "uniform".to_string()
}

fn default_convexifying() -> f64 {
    0.5
}

fn default_optimization() -> String {
    "ilp".to_string()
}
