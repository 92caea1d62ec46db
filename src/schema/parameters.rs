//! Gene configuration types and the lookup tables derived from them.
//!
//! A gene configuration is a JSON document with one entry per gene:
//!
//! ```json
//! {
//!   "dna": [
//!     {
//!       "bounds": { "low": -1.0, "high": 1.0 },
//!       "mutation": {
//!         "low": -0.1, "high": 0.1, "probability": 0.5,
//!         "distribution": "normal",
//!         "distribution_parameters": { "mu": 0.0, "sigma": 0.05 }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! [`GenomeParameters`] validates the document and computes every derived
//! table eagerly, so a constructed value is always complete and consistent.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level gene configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneConfig {
    /// Per-gene settings in genome order.
    pub dna: Vec<GeneSpec>,
    /// Starting dna used by `GenomeFactory::initial_genome`.
    /// Defaults to the midpoint of each gene's bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_dna: Option<Vec<f64>>,
}

/// Settings for a single gene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneSpec {
    /// Hard clipping range. Must be given for all genes or for none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsSpec>,
    /// Mutation range, probability and sampling law.
    pub mutation: MutationSpec,
}

/// Closed interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsSpec {
    pub low: f64,
    pub high: f64,
}

/// Mutation settings for a single gene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationSpec {
    /// Lower end of the uniform perturbation range.
    pub low: f64,
    /// Upper end of the uniform perturbation range.
    pub high: f64,
    /// Probability that this gene is perturbed during a mutation.
    pub probability: f64,
    /// Sampling law for distribution-based mutation.
    #[serde(default)]
    pub distribution: DistributionKind,
    /// Parameters of the sampling law. When absent, `low`/`high` are used
    /// as the bounds of a uniform distribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_parameters: Option<DistributionParameters>,
}

/// Name of a mutation sampling law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    #[default]
    Uniform,
    Normal,
    LogNormal,
}

/// Raw distribution parameters. Which fields are required depends on the
/// [`DistributionKind`] they accompany.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

/// Validated sampling law of a single gene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Distribution {
    /// Uniform on `[low, high]`.
    Uniform { low: f64, high: f64 },
    /// Gaussian with mean `mu` and standard deviation `sigma`.
    Normal { mu: f64, sigma: f64 },
    /// Log-normal variate with log-space parameters `mu`/`sigma`, shifted by `offset`.
    LogNormal { mu: f64, sigma: f64, offset: f64 },
}

/// Per-gene lower and upper clipping bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeBounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl GenomeBounds {
    /// Create bounds from lower and upper rows.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, ParameterError> {
        if lower.len() != upper.len() {
            return Err(ParameterError::GeneCountMismatch {
                table: "bounds",
                expected: lower.len(),
                found: upper.len(),
            });
        }
        for (gene, (&low, &high)) in lower.iter().zip(&upper).enumerate() {
            if !is_interval(low, high) {
                return Err(ParameterError::InvalidBounds { gene, low, high });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Number of genes covered.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Lower bound row.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bound row.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// `(low, high)` pairs in gene order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lower.iter().copied().zip(self.upper.iter().copied())
    }
}

/// Per-gene mutation range and probability (the 3 x n_genes table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationTable {
    min: Vec<f64>,
    max: Vec<f64>,
    probability: Vec<f64>,
}

impl MutationTable {
    /// Lower end of each gene's perturbation range.
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Upper end of each gene's perturbation range.
    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Mutation probability of each gene.
    pub fn probability(&self) -> &[f64] {
        &self.probability
    }

    /// Number of genes covered.
    pub fn len(&self) -> usize {
        self.probability.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probability.is_empty()
    }
}

/// Parsed gene configuration with all derived tables.
#[derive(Debug, Clone)]
pub struct GenomeParameters {
    n_genes: usize,
    mutation_table: MutationTable,
    distributions: Vec<Distribution>,
    genome_bounds: Option<GenomeBounds>,
    initial_dna: Vec<f64>,
    default_display_name: Option<String>,
}

impl GenomeParameters {
    /// Load and validate a gene configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ParameterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a gene configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ParameterError> {
        let config: GeneConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// Validate a gene configuration and derive the lookup tables.
    pub fn from_config(config: GeneConfig) -> Result<Self, ParameterError> {
        let n_genes = config.dna.len();
        if n_genes == 0 {
            return Err(ParameterError::NoGenes);
        }

        // Bounds are all-or-none
        let configured = config.dna.iter().filter(|g| g.bounds.is_some()).count();
        let genome_bounds = match configured {
            0 => None,
            n if n == n_genes => {
                let (lower, upper) = config
                    .dna
                    .iter()
                    .filter_map(|g| g.bounds)
                    .map(|b| (b.low, b.high))
                    .unzip();
                Some(GenomeBounds::new(lower, upper)?)
            }
            _ => {
                return Err(ParameterError::PartialBounds {
                    configured,
                    n_genes,
                });
            }
        };

        let mut min = Vec::with_capacity(n_genes);
        let mut max = Vec::with_capacity(n_genes);
        let mut probability = Vec::with_capacity(n_genes);
        let mut distributions = Vec::with_capacity(n_genes);

        for (gene, spec) in config.dna.iter().enumerate() {
            let mutation = &spec.mutation;
            if !is_interval(mutation.low, mutation.high) {
                return Err(ParameterError::InvalidMutationRange {
                    gene,
                    low: mutation.low,
                    high: mutation.high,
                });
            }
            if !(0.0..=1.0).contains(&mutation.probability) {
                return Err(ParameterError::InvalidProbability {
                    gene,
                    probability: mutation.probability,
                });
            }

            min.push(mutation.low);
            max.push(mutation.high);
            probability.push(mutation.probability);
            distributions.push(resolve_distribution(gene, mutation)?);
        }

        let initial_dna = match config.initial_dna {
            Some(dna) if dna.len() != n_genes => {
                return Err(ParameterError::GeneCountMismatch {
                    table: "initial_dna",
                    expected: n_genes,
                    found: dna.len(),
                });
            }
            Some(dna) => dna,
            None => match &genome_bounds {
                Some(bounds) => bounds.iter().map(|(low, high)| 0.5 * (low + high)).collect(),
                None => vec![0.0; n_genes],
            },
        };

        Ok(Self {
            n_genes,
            mutation_table: MutationTable {
                min,
                max,
                probability,
            },
            distributions,
            genome_bounds,
            initial_dna,
            default_display_name: None,
        })
    }

    /// Set the display name given to genomes created without one.
    pub fn with_default_display_name(mut self, name: impl Into<String>) -> Self {
        self.default_display_name = Some(name.into());
        self
    }

    /// Number of genes per genome.
    pub fn n_genes(&self) -> usize {
        self.n_genes
    }

    /// Per-gene mutation range and probability.
    pub fn mutation_table(&self) -> &MutationTable {
        &self.mutation_table
    }

    /// Per-gene sampling laws.
    pub fn distributions(&self) -> &[Distribution] {
        &self.distributions
    }

    /// Per-gene clipping bounds, if configured.
    pub fn genome_bounds(&self) -> Option<&GenomeBounds> {
        self.genome_bounds.as_ref()
    }

    /// Starting dna for the initial genome.
    pub fn initial_dna(&self) -> &[f64] {
        &self.initial_dna
    }

    pub fn default_display_name(&self) -> Option<&str> {
        self.default_display_name.as_deref()
    }
}

/// Turn a gene's raw distribution settings into a validated [`Distribution`].
fn resolve_distribution(
    gene: usize,
    mutation: &MutationSpec,
) -> Result<Distribution, ParameterError> {
    let kind = mutation.distribution;
    let params = mutation.distribution_parameters;

    let require = |value: Option<f64>, parameter: &'static str| {
        value.ok_or(ParameterError::MissingDistributionParameter {
            gene,
            distribution: kind,
            parameter,
        })
    };
    let invalid =
        |parameter: &'static str, value: f64| ParameterError::InvalidDistributionParameter {
            gene,
            distribution: kind,
            parameter,
            value,
        };

    match kind {
        DistributionKind::Uniform => {
            let (low, high) = match params {
                Some(p) => (require(p.low, "low")?, require(p.high, "high")?),
                None => (mutation.low, mutation.high),
            };
            if !low.is_finite() {
                return Err(invalid("low", low));
            }
            if !high.is_finite() || high < low {
                return Err(invalid("high", high));
            }
            Ok(Distribution::Uniform { low, high })
        }
        DistributionKind::Normal | DistributionKind::LogNormal => {
            let p = params.ok_or(ParameterError::MissingDistributionParameter {
                gene,
                distribution: kind,
                parameter: "mu",
            })?;
            let mu = require(p.mu, "mu")?;
            let sigma = require(p.sigma, "sigma")?;
            if !mu.is_finite() {
                return Err(invalid("mu", mu));
            }
            if !(sigma.is_finite() && sigma >= 0.0) {
                return Err(invalid("sigma", sigma));
            }
            if kind == DistributionKind::Normal {
                return Ok(Distribution::Normal { mu, sigma });
            }
            let offset = p.offset.unwrap_or(0.0);
            if !offset.is_finite() {
                return Err(invalid("offset", offset));
            }
            Ok(Distribution::LogNormal { mu, sigma, offset })
        }
    }
}

fn is_interval(low: f64, high: f64) -> bool {
    low.is_finite() && high.is_finite() && low <= high
}

/// Gene configuration errors. Construction fails fast on the first one.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("Failed to read gene configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed gene configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Gene configuration must declare at least one gene")]
    NoGenes,
    #[error("Gene {gene}: bounds must be finite with low <= high (low: {low}, high: {high})")]
    InvalidBounds { gene: usize, low: f64, high: f64 },
    #[error("Bounds configured for {configured} of {n_genes} genes; give them for all genes or none")]
    PartialBounds { configured: usize, n_genes: usize },
    #[error("Gene {gene}: mutation range must be finite with low <= high (low: {low}, high: {high})")]
    InvalidMutationRange { gene: usize, low: f64, high: f64 },
    #[error("Gene {gene}: mutation probability {probability} is outside [0, 1]")]
    InvalidProbability { gene: usize, probability: f64 },
    #[error("Gene {gene}: {distribution:?} distribution requires parameter '{parameter}'")]
    MissingDistributionParameter {
        gene: usize,
        distribution: DistributionKind,
        parameter: &'static str,
    },
    #[error("Gene {gene}: invalid {distribution:?} parameter '{parameter}' = {value}")]
    InvalidDistributionParameter {
        gene: usize,
        distribution: DistributionKind,
        parameter: &'static str,
        value: f64,
    },
    #[error("{table} has {found} entries, expected {expected}")]
    GeneCountMismatch {
        table: &'static str,
        expected: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GENES: &str = r#"{
        "dna": [
            {
                "bounds": { "low": -1.0, "high": 1.0 },
                "mutation": { "low": -0.1, "high": 0.1, "probability": 1.0, "distribution": "uniform" }
            },
            {
                "bounds": { "low": -2.0, "high": 4.0 },
                "mutation": {
                    "low": -0.5, "high": 0.5, "probability": 0.25,
                    "distribution": "lognormal",
                    "distribution_parameters": { "mu": 0.0, "sigma": 0.2, "offset": -1.0 }
                }
            }
        ]
    }"#;

    #[test]
    fn test_derived_tables() {
        let params = GenomeParameters::from_json_str(TWO_GENES).unwrap();
        assert_eq!(params.n_genes(), 2);

        let table = params.mutation_table();
        assert_eq!(table.min(), &[-0.1, -0.5]);
        assert_eq!(table.max(), &[0.1, 0.5]);
        assert_eq!(table.probability(), &[1.0, 0.25]);

        let bounds = params.genome_bounds().unwrap();
        assert_eq!(bounds.lower(), &[-1.0, -2.0]);
        assert_eq!(bounds.upper(), &[1.0, 4.0]);

        assert_eq!(
            params.distributions(),
            &[
                Distribution::Uniform {
                    low: -0.1,
                    high: 0.1
                },
                Distribution::LogNormal {
                    mu: 0.0,
                    sigma: 0.2,
                    offset: -1.0
                },
            ]
        );
    }

    #[test]
    fn test_initial_dna_defaults_to_bounds_midpoint() {
        let params = GenomeParameters::from_json_str(TWO_GENES).unwrap();
        assert_eq!(params.initial_dna(), &[0.0, 1.0]);
    }

    #[test]
    fn test_initial_dna_length_checked() {
        let json = r#"{
            "initial_dna": [0.0, 1.0, 2.0],
            "dna": [ { "mutation": { "low": 0.0, "high": 1.0, "probability": 0.5 } } ]
        }"#;
        let err = GenomeParameters::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::GeneCountMismatch {
                expected: 1,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_bounds_everywhere_is_allowed() {
        let json = r#"{ "dna": [ { "mutation": { "low": 0.0, "high": 1.0, "probability": 0.5 } } ] }"#;
        let params = GenomeParameters::from_json_str(json).unwrap();
        assert!(params.genome_bounds().is_none());
        assert_eq!(params.initial_dna(), &[0.0]);
    }

    #[test]
    fn test_partial_bounds_rejected() {
        let json = r#"{ "dna": [
            { "bounds": { "low": 0.0, "high": 1.0 }, "mutation": { "low": 0.0, "high": 1.0, "probability": 0.5 } },
            { "mutation": { "low": 0.0, "high": 1.0, "probability": 0.5 } }
        ] }"#;
        let err = GenomeParameters::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::PartialBounds {
                configured: 1,
                n_genes: 2
            }
        ));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let json = r#"{ "dna": [
            { "bounds": { "low": 1.0, "high": -1.0 }, "mutation": { "low": 0.0, "high": 1.0, "probability": 0.5 } }
        ] }"#;
        let err = GenomeParameters::from_json_str(json).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidBounds { gene: 0, .. }));
    }

    #[test]
    fn test_probability_range_checked() {
        let json = r#"{ "dna": [ { "mutation": { "low": 0.0, "high": 1.0, "probability": 1.5 } } ] }"#;
        let err = GenomeParameters::from_json_str(json).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidProbability { .. }));
    }

    #[test]
    fn test_normal_requires_sigma() {
        let json = r#"{ "dna": [ { "mutation": {
            "low": 0.0, "high": 1.0, "probability": 0.5,
            "distribution": "normal", "distribution_parameters": { "mu": 0.0 }
        } } ] }"#;
        let err = GenomeParameters::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::MissingDistributionParameter {
                parameter: "sigma",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_sigma_rejected() {
        let json = r#"{ "dna": [ { "mutation": {
            "low": 0.0, "high": 1.0, "probability": 0.5,
            "distribution": "normal", "distribution_parameters": { "mu": 0.0, "sigma": -1.0 }
        } } ] }"#;
        let err = GenomeParameters::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::InvalidDistributionParameter {
                parameter: "sigma",
                ..
            }
        ));
    }

    #[test]
    fn test_uniform_parameters_override_mutation_range() {
        let json = r#"{ "dna": [ { "mutation": {
            "low": 0.0, "high": 1.0, "probability": 0.5,
            "distribution": "uniform", "distribution_parameters": { "low": -3.0, "high": 3.0 }
        } } ] }"#;
        let params = GenomeParameters::from_json_str(json).unwrap();
        assert_eq!(
            params.distributions()[0],
            Distribution::Uniform {
                low: -3.0,
                high: 3.0
            }
        );
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = GenomeParameters::from_json_str("{ \"dna\": [ ").unwrap_err();
        assert!(matches!(err, ParameterError::Parse(_)));
    }

    #[test]
    fn test_empty_dna_rejected() {
        let err = GenomeParameters::from_json_str(r#"{ "dna": [] }"#).unwrap_err();
        assert!(matches!(err, ParameterError::NoGenes));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GenomeParameters::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ParameterError::Io { .. }));
    }

    #[test]
    fn test_default_display_name() {
        let params = GenomeParameters::from_json_str(TWO_GENES)
            .unwrap()
            .with_default_display_name("camera");
        assert_eq!(params.default_display_name(), Some("camera"));
    }
}
