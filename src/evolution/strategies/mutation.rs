//! In-place genome mutation.

use rand_distr::{LogNormal, Normal, NormalError};

use crate::evolution::genome::{Genome, GenomeFactory, GenomeRng};
use crate::schema::Distribution;

use super::StrategyError;

/// Perturbs a genome in place.
///
/// Each gene is perturbed independently with its configured probability.
/// Afterwards the genome is clipped to the genome bounds when they exist.
pub trait MutationStrategy: Send + Sync {
    fn mutate(
        &self,
        factory: &GenomeFactory,
        genome: &mut Genome,
        rng: &mut GenomeRng,
    ) -> Result<(), StrategyError>;

    fn printable_identifier(&self) -> String;
}

fn check_genome(factory: &GenomeFactory, genome: &Genome) -> Result<(), StrategyError> {
    if genome.len() != factory.n_genes() {
        return Err(StrategyError::DimensionMismatch {
            context: "mutated genome",
            expected: factory.n_genes(),
            found: genome.len(),
        });
    }
    Ok(())
}

fn apply(factory: &GenomeFactory, genome: &mut Genome, offsets: &[f64]) {
    for (gene, offset) in genome.dna.iter_mut().zip(offsets) {
        *gene += offset;
    }
    if let Some(bounds) = factory.genome_bounds() {
        factory.validate_bounds(genome, bounds);
    }
}

/// Offsets drawn uniformly from each gene's mutation `[min, max]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedUniformMutation;

impl MutationStrategy for BoundedUniformMutation {
    fn mutate(
        &self,
        factory: &GenomeFactory,
        genome: &mut Genome,
        rng: &mut GenomeRng,
    ) -> Result<(), StrategyError> {
        check_genome(factory, genome)?;
        let table = factory.mutation_table();

        let mut offsets: Vec<f64> = table
            .min()
            .iter()
            .zip(table.max())
            .map(|(&low, &high)| rng.uniform(low, high))
            .collect();
        for (offset, &p) in offsets.iter_mut().zip(table.probability()) {
            if rng.unit() >= p {
                *offset = 0.0;
            }
        }

        apply(factory, genome, &offsets);
        Ok(())
    }

    fn printable_identifier(&self) -> String {
        "BoundedUniformMutation".to_string()
    }
}

/// Offsets drawn from each gene's configured [`Distribution`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedDistributionBasedMutation;

impl BoundedDistributionBasedMutation {
    fn sample(
        gene: usize,
        distribution: &Distribution,
        rng: &mut GenomeRng,
    ) -> Result<f64, StrategyError> {
        let invalid = |e: NormalError| StrategyError::InvalidDistribution {
            gene,
            reason: e.to_string(),
        };
        match *distribution {
            Distribution::Uniform { low, high } => Ok(rng.uniform(low, high)),
            Distribution::Normal { mu, sigma } => {
                let normal = Normal::new(mu, sigma).map_err(invalid)?;
                Ok(rng.sample(&normal))
            }
            Distribution::LogNormal { mu, sigma, offset } => {
                let lognormal = LogNormal::new(mu, sigma).map_err(invalid)?;
                Ok(rng.sample(&lognormal) + offset)
            }
        }
    }
}

impl MutationStrategy for BoundedDistributionBasedMutation {
    fn mutate(
        &self,
        factory: &GenomeFactory,
        genome: &mut Genome,
        rng: &mut GenomeRng,
    ) -> Result<(), StrategyError> {
        check_genome(factory, genome)?;
        let probability = factory.mutation_table().probability();

        let mut offsets = vec![0.0; genome.len()];
        let genes = offsets.iter_mut().zip(factory.distributions()).enumerate();
        for (gene, (offset, distribution)) in genes {
            if rng.unit() < probability[gene] {
                *offset = Self::sample(gene, distribution, rng)?;
            }
        }

        apply(factory, genome, &offsets);
        Ok(())
    }

    fn printable_identifier(&self) -> String {
        "BoundedDistributionBasedMutation".to_string()
    }
}
