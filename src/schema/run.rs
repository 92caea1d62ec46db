//! Run configuration: everything needed to drive one optimization from a file.
//!
//! ```json
//! {
//!   "genes": "genes.json",
//!   "populate": { "type": "BoundedUniform", "size": 16 },
//!   "selection": { "type": "Tournament", "k": 3, "p": 0.5 },
//!   "crossover": { "type": "SinglePoint" },
//!   "mutation": { "type": "BoundedUniform" },
//!   "termination": {
//!     "type": "Or",
//!     "strategies": [
//!       { "type": "MaxIteration", "n": 200 },
//!       { "type": "NoImprovement", "n": 25 }
//!     ]
//!   },
//!   "objective": { "kind": "rastrigin" },
//!   "random_seed": 42
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::evolution::{
    Algorithm, And, BoundedDistributionBasedMutation, BoundedUniformMutation,
    BoundedUniformPopulation, CrossoverStrategy, DnaTranslator, FitnessReached, GenomeFactory,
    MaxIteration, MutationStrategy, NoImprovement, Objective, ObjectiveKind, Or, PopulateStrategy,
    Random, RouletteWheel, SelectionStrategy, SinglePoint, StrategyBundle, StrategyError,
    TerminationStrategy, Tournament, TwoPoint, Uniform, ValueUniformPopulation,
};

use super::parameters::{
    BoundsSpec, DistributionKind, DistributionParameters, GeneConfig, GeneSpec, GenomeParameters,
    MutationSpec, ParameterError,
};

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Path to a gene configuration file, relative to the run file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genes: Option<PathBuf>,
    /// Inline gene configuration, as an alternative to `genes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_config: Option<GeneConfig>,
    /// Label given to genomes created without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Starting dna handed to the populate strategy.
    /// Defaults to the gene configuration's initial dna.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_dna: Option<Vec<f64>>,
    #[serde(default)]
    pub populate: PopulateConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub crossover: CrossoverConfig,
    #[serde(default)]
    pub mutation: MutationConfig,
    #[serde(default)]
    pub termination: TerminationConfig,
    /// Benchmark objective to maximize.
    #[serde(default = "default_objective")]
    pub objective: Objective,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Evaluate fitness on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Directory that relative `genes` paths resolve against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_objective() -> Objective {
    Objective::new(ObjectiveKind::Sphere)
}

fn default_parallel() -> bool {
    true
}

/// Initial population strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PopulateConfig {
    /// Uniform within the genome bounds.
    BoundedUniform {
        #[serde(default = "default_population_size")]
        size: usize,
    },
    /// `start_dna` plus a uniform offset in `[low_i, high_i]`.
    ValueUniform {
        #[serde(default = "default_population_size")]
        size: usize,
        low: Vec<f64>,
        high: Vec<f64>,
    },
    /// `start_dna` plus a uniform offset in `[-w_i, w_i]`.
    ValueUniformSymmetric {
        #[serde(default = "default_population_size")]
        size: usize,
        half_widths: Vec<f64>,
    },
}

impl Default for PopulateConfig {
    fn default() -> Self {
        Self::BoundedUniform {
            size: default_population_size(),
        }
    }
}

fn default_population_size() -> usize {
    16
}

/// Parent selection strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SelectionConfig {
    RouletteWheel,
    Tournament {
        #[serde(default = "default_tournament_size")]
        k: usize,
        #[serde(default = "default_tournament_p")]
        p: f64,
    },
    Random,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self::Tournament {
            k: default_tournament_size(),
            p: default_tournament_p(),
        }
    }
}

fn default_tournament_size() -> usize {
    3
}

fn default_tournament_p() -> f64 {
    0.5
}

/// Crossover strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CrossoverConfig {
    /// Per-gene coin flip. `probabilities` wins over `probability` when given.
    Uniform {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        probabilities: Option<Vec<f64>>,
        #[serde(default = "default_crossover_probability")]
        probability: f64,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        identifier_suffix: String,
    },
    #[default]
    SinglePoint,
    TwoPoint,
}

fn default_crossover_probability() -> f64 {
    0.5
}

/// Mutation strategy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MutationConfig {
    #[default]
    BoundedUniform,
    BoundedDistributionBased,
}

/// Termination strategy, possibly composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TerminationConfig {
    MaxIteration { n: usize },
    FitnessReached { fitness: f64 },
    NoImprovement { n: usize },
    And { strategies: Vec<TerminationConfig> },
    Or { strategies: Vec<TerminationConfig> },
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self::MaxIteration { n: 100 }
    }
}

impl TerminationConfig {
    /// Build the strategy tree.
    pub fn build(&self) -> Box<dyn TerminationStrategy> {
        match self {
            Self::MaxIteration { n } => Box::new(MaxIteration::new(*n)),
            Self::FitnessReached { fitness } => Box::new(FitnessReached::new(*fitness)),
            Self::NoImprovement { n } => Box::new(NoImprovement::new(*n)),
            Self::And { strategies } => {
                Box::new(And::new(strategies.iter().map(Self::build).collect()))
            }
            Self::Or { strategies } => {
                Box::new(Or::new(strategies.iter().map(Self::build).collect()))
            }
        }
    }
}

/// A configured engine with its starting dna.
pub struct PreparedRun {
    pub algorithm: Algorithm<DnaTranslator>,
    pub start_dna: Vec<f64>,
}

impl RunConfig {
    /// Load a run configuration. Relative `genes` paths resolve against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RunConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RunConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse a run configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, RunConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and validate the gene configuration.
    pub fn genome_parameters(&self) -> Result<GenomeParameters, RunConfigError> {
        let parameters = match (&self.genes, &self.gene_config) {
            (Some(_), Some(_)) => return Err(RunConfigError::AmbiguousGenes),
            (None, None) => return Err(RunConfigError::MissingGenes),
            (Some(path), None) => {
                let path = match &self.base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path.clone(),
                };
                GenomeParameters::from_file(path)?
            }
            (None, Some(config)) => GenomeParameters::from_config(config.clone())?,
        };
        Ok(match &self.display_name {
            Some(name) => parameters.with_default_display_name(name.clone()),
            None => parameters,
        })
    }

    /// Build the strategy bundle for genomes of `n_genes` genes.
    pub fn build_bundle(&self, n_genes: usize) -> Result<StrategyBundle<Vec<f64>>, RunConfigError> {
        let populate: Box<dyn PopulateStrategy> = match &self.populate {
            PopulateConfig::BoundedUniform { size } => {
                Box::new(BoundedUniformPopulation::new(*size))
            }
            PopulateConfig::ValueUniform { size, low, high } => {
                Box::new(ValueUniformPopulation::new(*size, low.clone(), high.clone())?)
            }
            PopulateConfig::ValueUniformSymmetric { size, half_widths } => {
                Box::new(ValueUniformPopulation::symmetric(*size, half_widths)?)
            }
        };

        let selection: Box<dyn SelectionStrategy> = match &self.selection {
            SelectionConfig::RouletteWheel => Box::new(RouletteWheel),
            SelectionConfig::Tournament { k, p } => Box::new(Tournament::new(*k, *p)?),
            SelectionConfig::Random => Box::new(Random::new()),
        };

        let crossover: Box<dyn CrossoverStrategy> = match &self.crossover {
            CrossoverConfig::Uniform {
                probabilities,
                probability,
                identifier_suffix,
            } => {
                let uniform = match probabilities {
                    Some(p) => Uniform::new(p.clone())?,
                    None => Uniform::constant(n_genes, *probability)?,
                };
                Box::new(uniform.with_identifier_suffix(identifier_suffix.clone()))
            }
            CrossoverConfig::SinglePoint => Box::new(SinglePoint),
            CrossoverConfig::TwoPoint => Box::new(TwoPoint),
        };

        let mutation: Box<dyn MutationStrategy> = match self.mutation {
            MutationConfig::BoundedUniform => Box::new(BoundedUniformMutation),
            MutationConfig::BoundedDistributionBased => Box::new(BoundedDistributionBasedMutation),
        };

        Ok(StrategyBundle::new(
            populate,
            Box::new(self.objective.clone()),
            selection,
            crossover,
            mutation,
            self.termination.build(),
        ))
    }

    /// Build the engine and resolve the starting dna.
    pub fn prepare(&self) -> Result<PreparedRun, RunConfigError> {
        let factory = GenomeFactory::new(self.genome_parameters()?);
        let n_genes = factory.n_genes();

        let start_dna = match &self.start_dna {
            Some(dna) if dna.len() != n_genes => {
                return Err(RunConfigError::StartDnaMismatch {
                    expected: n_genes,
                    found: dna.len(),
                });
            }
            Some(dna) => dna.clone(),
            None => factory.initial_genome(None).dna,
        };

        let bundle = self.build_bundle(n_genes)?;
        let mut algorithm =
            Algorithm::new(DnaTranslator, factory, bundle).with_parallel(self.parallel);
        if let Some(seed) = self.random_seed {
            algorithm = algorithm.with_seed(seed);
        }

        Ok(PreparedRun {
            algorithm,
            start_dna,
        })
    }

    /// A self-contained example with an inline three-gene configuration.
    pub fn example() -> Self {
        let gene = |low: f64, high: f64, distribution: DistributionKind| GeneSpec {
            bounds: Some(BoundsSpec { low, high }),
            mutation: MutationSpec {
                low: -0.1 * (high - low),
                high: 0.1 * (high - low),
                probability: 0.3,
                distribution,
                distribution_parameters: match distribution {
                    DistributionKind::Uniform => None,
                    _ => Some(DistributionParameters {
                        mu: Some(0.0),
                        sigma: Some(0.05 * (high - low)),
                        ..Default::default()
                    }),
                },
            },
        };

        Self {
            genes: None,
            gene_config: Some(GeneConfig {
                dna: vec![
                    gene(-5.12, 5.12, DistributionKind::Uniform),
                    gene(-5.12, 5.12, DistributionKind::Normal),
                    gene(-5.12, 5.12, DistributionKind::Normal),
                ],
                initial_dna: None,
            }),
            display_name: Some("candidate".to_string()),
            start_dna: None,
            populate: PopulateConfig::default(),
            selection: SelectionConfig::default(),
            crossover: CrossoverConfig::default(),
            mutation: MutationConfig::BoundedDistributionBased,
            termination: TerminationConfig::Or {
                strategies: vec![
                    TerminationConfig::MaxIteration { n: 200 },
                    TerminationConfig::NoImprovement { n: 30 },
                ],
            },
            objective: Objective::new(ObjectiveKind::Rastrigin),
            random_seed: Some(42),
            parallel: true,
            base_dir: None,
        }
    }
}

/// Errors raised while loading or applying a run configuration.
#[derive(Debug, thiserror::Error)]
pub enum RunConfigError {
    #[error("Failed to read run configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed run configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error("Run configuration must give either `genes` or `gene_config`")]
    MissingGenes,
    #[error("Run configuration gives both `genes` and `gene_config`")]
    AmbiguousGenes,
    #[error("start_dna has {found} genes, expected {expected}")]
    StartDnaMismatch { expected: usize, found: usize },
}
