//! Initial population builders.

use crate::evolution::genome::{Genome, GenomeFactory, GenomeRng};

use super::StrategyError;

/// Builds the fixed-size initial population.
pub trait PopulateStrategy: Send + Sync {
    /// Produce `population_size()` genomes.
    fn populate(
        &self,
        factory: &GenomeFactory,
        start_dna: &[f64],
        rng: &mut GenomeRng,
    ) -> Result<Vec<Genome>, StrategyError>;

    /// Number of genomes `populate` returns.
    fn population_size(&self) -> usize;

    fn printable_identifier(&self) -> String;
}

/// Samples every gene uniformly within the configured genome bounds.
/// `start_dna` is ignored.
#[derive(Debug, Clone)]
pub struct BoundedUniformPopulation {
    size: usize,
}

impl BoundedUniformPopulation {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Default for BoundedUniformPopulation {
    fn default() -> Self {
        Self::new(16)
    }
}

impl PopulateStrategy for BoundedUniformPopulation {
    fn populate(
        &self,
        factory: &GenomeFactory,
        _start_dna: &[f64],
        rng: &mut GenomeRng,
    ) -> Result<Vec<Genome>, StrategyError> {
        let bounds = factory
            .genome_bounds()
            .ok_or(StrategyError::MissingBounds {
                strategy: "BoundedUniformPopulation",
            })?;

        let population = (0..self.size)
            .map(|_| {
                let dna: Vec<f64> = bounds
                    .iter()
                    .map(|(low, high)| rng.uniform(low, high))
                    .collect();
                factory.create(&dna, None)
            })
            .collect();
        Ok(population)
    }

    fn population_size(&self) -> usize {
        self.size
    }

    fn printable_identifier(&self) -> String {
        format!("BoundedUniformPopulation(n={})", self.size)
    }
}

/// Samples `start_dna + U(low_i, high_i)` per gene.
///
/// Values are limited only by the perturbation table, never by the genome bounds.
#[derive(Debug, Clone)]
pub struct ValueUniformPopulation {
    size: usize,
    low: Vec<f64>,
    high: Vec<f64>,
}

impl ValueUniformPopulation {
    /// Create with an explicit perturbation range per gene.
    pub fn new(size: usize, low: Vec<f64>, high: Vec<f64>) -> Result<Self, StrategyError> {
        if low.len() != high.len() {
            return Err(StrategyError::DimensionMismatch {
                context: "ValueUniformPopulation perturbation table",
                expected: low.len(),
                found: high.len(),
            });
        }
        if let Some(gene) = low
            .iter()
            .zip(&high)
            .position(|(l, h)| !(l.is_finite() && h.is_finite() && l <= h))
        {
            return Err(StrategyError::InvalidParameter {
                strategy: "ValueUniformPopulation",
                reason: format!(
                    "gene {gene}: perturbation range [{}, {}] must be finite with low <= high",
                    low[gene], high[gene]
                ),
            });
        }
        Ok(Self { size, low, high })
    }

    /// Create with a symmetric range `[-w_i, +w_i]` per gene.
    pub fn symmetric(size: usize, half_widths: &[f64]) -> Result<Self, StrategyError> {
        let low = half_widths.iter().map(|w| -w.abs()).collect();
        let high = half_widths.iter().map(|w| w.abs()).collect();
        Self::new(size, low, high)
    }
}

impl PopulateStrategy for ValueUniformPopulation {
    fn populate(
        &self,
        factory: &GenomeFactory,
        start_dna: &[f64],
        rng: &mut GenomeRng,
    ) -> Result<Vec<Genome>, StrategyError> {
        let n_genes = factory.n_genes();
        if start_dna.len() != n_genes {
            return Err(StrategyError::DimensionMismatch {
                context: "ValueUniformPopulation start dna",
                expected: n_genes,
                found: start_dna.len(),
            });
        }
        if self.low.len() != n_genes {
            return Err(StrategyError::DimensionMismatch {
                context: "ValueUniformPopulation perturbation table",
                expected: n_genes,
                found: self.low.len(),
            });
        }

        let population = (0..self.size)
            .map(|_| {
                let dna: Vec<f64> = start_dna
                    .iter()
                    .zip(self.low.iter().zip(&self.high))
                    .map(|(start, (&low, &high))| start + rng.uniform(low, high))
                    .collect();
                factory.create(&dna, None)
            })
            .collect();
        Ok(population)
    }

    fn population_size(&self) -> usize {
        self.size
    }

    fn printable_identifier(&self) -> String {
        format!("ValueUniformPopulation(n={})", self.size)
    }
}
