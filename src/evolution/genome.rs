//! Genome representation, the genome factory, and the seedable random source.

use std::fmt;
use std::sync::Arc;

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{
    Distribution as GeneDistribution, GenomeBounds, GenomeParameters, MutationTable,
};

/// A candidate solution: a fixed-length real-valued vector plus an optional label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub dna: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Genome {
    pub fn new(dna: Vec<f64>) -> Self {
        Self {
            dna,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.dna.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dna.is_empty()
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome")?;
        if let Some(name) = &self.display_name {
            write!(f, " [{name}]")?;
        }
        write!(f, " (")?;
        for (i, gene) in self.dna.iter().enumerate() {
            if i > 0 {
                write!(f, " / ")?;
            }
            write!(f, "{gene}")?;
        }
        write!(f, ")")
    }
}

/// Builds genomes that match a [`GenomeParameters`] layout.
///
/// Cloning is cheap; all clones share the same parameters.
#[derive(Debug, Clone)]
pub struct GenomeFactory {
    parameters: Arc<GenomeParameters>,
}

impl GenomeFactory {
    pub fn new(parameters: GenomeParameters) -> Self {
        Self {
            parameters: Arc::new(parameters),
        }
    }

    pub fn parameters(&self) -> &GenomeParameters {
        &self.parameters
    }

    /// Number of genes per genome.
    pub fn n_genes(&self) -> usize {
        self.parameters.n_genes()
    }

    /// Wrap a copy of `dna` in a new genome.
    pub fn create(&self, dna: &[f64], display_name: Option<&str>) -> Genome {
        Genome {
            dna: dna.to_vec(),
            display_name: display_name.map(str::to_owned),
        }
    }

    /// Genome seeded from the configured initial dna.
    pub fn initial_genome(&self, display_name: Option<&str>) -> Genome {
        self.create(self.parameters.initial_dna(), display_name)
    }

    /// All-zero genome carrying the default display name, if any.
    pub fn empty_genome(&self) -> Genome {
        Genome {
            dna: vec![0.0; self.n_genes()],
            display_name: self.parameters.default_display_name().map(str::to_owned),
        }
    }

    /// Clip every gene into its `[low, high]` range in place.
    pub fn validate_bounds(&self, genome: &mut Genome, bounds: &GenomeBounds) {
        for (gene, (low, high)) in genome.dna.iter_mut().zip(bounds.iter()) {
            *gene = gene.clamp(low, high);
        }
    }

    /// Configured clipping bounds, if any.
    pub fn genome_bounds(&self) -> Option<&GenomeBounds> {
        self.parameters.genome_bounds()
    }

    pub fn mutation_table(&self) -> &MutationTable {
        self.parameters.mutation_table()
    }

    pub fn distributions(&self) -> &[GeneDistribution] {
        self.parameters.distributions()
    }
}

/// Random number generator wrapper threaded through every strategy.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample from `[low, high]`. Degenerate ranges return `low`.
    ///
    /// Interpolates between the endpoints so ranges wider than `f64::MAX`
    /// still sample.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high > low {
            let u = self.unit();
            (low * (1.0 - u) + high * u).clamp(low, high)
        } else {
            low
        }
    }

    /// Uniform sample from `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Draw from any `rand` distribution.
    pub fn sample<D: rand::distributions::Distribution<f64>>(&mut self, distribution: &D) -> f64 {
        distribution.sample(&mut self.rng)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// `amount` distinct indices from `0..len`, in random order.
    /// Panics if `amount > len`.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, len, amount).into_vec()
    }

    /// Two weighted draws with replacement.
    ///
    /// Returns `None` when the weights cannot form a distribution
    /// (empty, negative, non-finite, or all zero).
    pub fn weighted_pair(&mut self, weights: &[f64]) -> Option<(usize, usize)> {
        if weights.iter().any(|w| !w.is_finite()) {
            return None;
        }
        let index = WeightedIndex::<f64>::new(weights).ok()?;
        Some((index.sample(&mut self.rng), index.sample(&mut self.rng)))
    }
}
