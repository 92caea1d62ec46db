//! Recombination of two parents into two fresh children.

use crate::evolution::genome::{Genome, GenomeFactory, GenomeRng};

use super::StrategyError;

/// Produces two children from two parents. Gene count is preserved and the
/// children never share storage with the parents.
pub trait CrossoverStrategy: Send + Sync {
    fn crossover(
        &self,
        factory: &GenomeFactory,
        genome_a: &Genome,
        genome_b: &Genome,
        rng: &mut GenomeRng,
    ) -> Result<(Genome, Genome), StrategyError>;

    fn printable_identifier(&self) -> String;
}

fn check_parents(
    strategy: &'static str,
    required: usize,
    genome_a: &Genome,
    genome_b: &Genome,
) -> Result<usize, StrategyError> {
    let n = genome_a.len();
    if genome_b.len() != n {
        return Err(StrategyError::DimensionMismatch {
            context: "crossover parents",
            expected: n,
            found: genome_b.len(),
        });
    }
    if n < required {
        return Err(StrategyError::TooFewGenes {
            strategy,
            required,
            found: n,
        });
    }
    Ok(n)
}

/// Per-gene coin flip. Child 1 takes parent B's gene with probability `p_i`;
/// child 2 receives the other parent's gene.
#[derive(Debug, Clone)]
pub struct Uniform {
    probabilities: Vec<f64>,
    identifier_suffix: String,
}

impl Uniform {
    pub fn new(probabilities: Vec<f64>) -> Result<Self, StrategyError> {
        if let Some(p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(StrategyError::InvalidParameter {
                strategy: "Uniform",
                reason: format!("crossover probability {p} is outside [0, 1]"),
            });
        }
        Ok(Self {
            probabilities,
            identifier_suffix: String::new(),
        })
    }

    /// Same probability for every gene.
    pub fn constant(n_genes: usize, probability: f64) -> Result<Self, StrategyError> {
        Self::new(vec![probability; n_genes])
    }

    /// Appended to `"Uniform"` in the printable identifier.
    pub fn with_identifier_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.identifier_suffix = suffix.into();
        self
    }
}

impl CrossoverStrategy for Uniform {
    fn crossover(
        &self,
        factory: &GenomeFactory,
        genome_a: &Genome,
        genome_b: &Genome,
        rng: &mut GenomeRng,
    ) -> Result<(Genome, Genome), StrategyError> {
        let n = check_parents("Uniform", 1, genome_a, genome_b)?;
        if self.probabilities.len() != n {
            return Err(StrategyError::DimensionMismatch {
                context: "Uniform crossover probabilities",
                expected: n,
                found: self.probabilities.len(),
            });
        }

        let mut dna_a = Vec::with_capacity(n);
        let mut dna_b = Vec::with_capacity(n);
        for ((&a, &b), &p) in genome_a.dna.iter().zip(&genome_b.dna).zip(&self.probabilities) {
            if rng.unit() < p {
                dna_a.push(b);
                dna_b.push(a);
            } else {
                dna_a.push(a);
                dna_b.push(b);
            }
        }
        Ok((factory.create(&dna_a, None), factory.create(&dna_b, None)))
    }

    fn printable_identifier(&self) -> String {
        format!("Uniform{}", self.identifier_suffix)
    }
}

/// One cut `c` in `[1, n - 1]`: child 1 = `A[..c] + B[c..]`, child 2 the complement.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePoint;

impl CrossoverStrategy for SinglePoint {
    fn crossover(
        &self,
        factory: &GenomeFactory,
        genome_a: &Genome,
        genome_b: &Genome,
        rng: &mut GenomeRng,
    ) -> Result<(Genome, Genome), StrategyError> {
        let n = check_parents("SinglePoint", 2, genome_a, genome_b)?;
        let point = 1 + rng.index(n - 1);

        let (a, b) = (&genome_a.dna, &genome_b.dna);
        let dna_a = [&a[..point], &b[point..]].concat();
        let dna_b = [&b[..point], &a[point..]].concat();
        Ok((factory.create(&dna_a, None), factory.create(&dna_b, None)))
    }

    fn printable_identifier(&self) -> String {
        "SinglePoint".to_string()
    }
}

/// Two distinct cuts `c1 < c2` in `[1, n - 1]`:
/// child 1 = `A[..c1] + B[c1..c2] + A[c2..]`, child 2 the complement.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPoint;

impl CrossoverStrategy for TwoPoint {
    fn crossover(
        &self,
        factory: &GenomeFactory,
        genome_a: &Genome,
        genome_b: &Genome,
        rng: &mut GenomeRng,
    ) -> Result<(Genome, Genome), StrategyError> {
        let n = check_parents("TwoPoint", 3, genome_a, genome_b)?;
        let cuts = rng.sample_indices(n - 1, 2);
        let (c1, c2) = (cuts[0].min(cuts[1]) + 1, cuts[0].max(cuts[1]) + 1);

        let (a, b) = (&genome_a.dna, &genome_b.dna);
        let dna_a = [&a[..c1], &b[c1..c2], &a[c2..]].concat();
        let dna_b = [&b[..c1], &a[c1..c2], &b[c2..]].concat();
        Ok((factory.create(&dna_a, None), factory.create(&dna_b, None)))
    }

    fn printable_identifier(&self) -> String {
        "TwoPoint".to_string()
    }
}
