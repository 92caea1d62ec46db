//! The generational loop.
//!
//! Each generation runs EVALUATE, RANK, RECORD, CHECK_TERMINATION and,
//! unless the run stops, BREED:
//!
//! - **Evaluate**: translate and score every genome, optionally in parallel.
//! - **Rank**: stable sort by fitness, highest first. NaN scores rank last.
//! - **Record**: log the generation best and notify the observer.
//! - **Check termination**: ask the termination strategy with the number of
//!   completed generations and the best-ever fitness.
//! - **Breed**: keep the top two genomes, then fill the population with
//!   mutated crossover children of selected parents.

use log::{debug, info, trace};
use rayon::prelude::*;

use super::genome::{Genome, GenomeFactory, GenomeRng};
use super::result::EvolutionResult;
use super::strategies::{FitnessError, StrategyBundle, StrategyError, Translator};

/// Number of top genomes carried unchanged into the next generation.
pub const ELITE_COUNT: usize = 2;

/// Hooks called by the engine during a run. Both default to no-ops.
pub trait GenerationObserver {
    /// Called once per generation with the ranked population.
    fn on_display_population(
        &mut self,
        _generation: usize,
        _population: &[Genome],
        _fitness: &[f64],
    ) {
    }

    /// Called when a generation strictly improves on the best-ever fitness.
    fn on_best_genome_found(&mut self, _genome: &Genome, _fitness: f64) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error("Fitness evaluation failed: {0}")]
    Fitness(#[source] FitnessError),
    #[error("Population size must be even and at least 2, got {0}")]
    InvalidPopulationSize(usize),
    #[error("Populate strategy produced {found} genomes, expected {expected}")]
    PopulationSizeMismatch { expected: usize, found: usize },
}

/// Evolution engine composing a translator, a genome factory and a strategy bundle.
pub struct Algorithm<T: Translator> {
    translator: T,
    factory: GenomeFactory,
    strategies: StrategyBundle<T::Output>,
    seed: u64,
    parallel: bool,
}

impl<T: Translator> Algorithm<T> {
    /// Create an engine with a random seed and parallel evaluation.
    pub fn new(
        translator: T,
        factory: GenomeFactory,
        strategies: StrategyBundle<T::Output>,
    ) -> Self {
        Self {
            translator,
            factory,
            strategies,
            seed: rand::random(),
            parallel: true,
        }
    }

    /// Fix the random seed. Runs with the same seed produce identical results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable parallel fitness evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn factory(&self) -> &GenomeFactory {
        &self.factory
    }

    pub fn strategies(&self) -> &StrategyBundle<T::Output> {
        &self.strategies
    }

    /// Run until the termination strategy stops the loop.
    pub fn run(&mut self, start_dna: &[f64]) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_observer(start_dna, &mut NoopObserver)
    }

    /// Run with observation hooks.
    pub fn run_with_observer<O: GenerationObserver + ?Sized>(
        &mut self,
        start_dna: &[f64],
        observer: &mut O,
    ) -> Result<EvolutionResult, EvolutionError> {
        let population_size = self.strategies.populate_strategy().population_size();
        if population_size < ELITE_COUNT || population_size % 2 != 0 {
            return Err(EvolutionError::InvalidPopulationSize(population_size));
        }

        info!(
            "Starting evolution: {} (seed {})",
            self.strategies.name_identifier(),
            self.seed
        );

        let mut rng = GenomeRng::new(self.seed);
        self.strategies.termination_strategy_mut().reset();

        let mut population = self
            .strategies
            .populate_strategy()
            .populate(&self.factory, start_dna, &mut rng)?;
        if population.len() != population_size {
            return Err(EvolutionError::PopulationSizeMismatch {
                expected: population_size,
                found: population.len(),
            });
        }

        let mut result = EvolutionResult::new();
        let mut generation = 0;

        loop {
            let fitness = self.evaluate(&population)?;
            let (ranked, fitness) = rank(population, fitness);

            debug!(
                "Generation {generation}: best {:.6}, worst {:.6}",
                fitness[0],
                fitness[fitness.len() - 1]
            );

            if result.add_generation(generation, &ranked[0], fitness[0]) {
                info!("New best genome: {} (fitness {:.6})", ranked[0], fitness[0]);
                observer.on_best_genome_found(&ranked[0], fitness[0]);
            }
            observer.on_display_population(generation, &ranked, &fitness);

            let best_fitness = result.best_fitness();
            if self
                .strategies
                .termination_strategy_mut()
                .should_terminate(generation + 1, best_fitness)
            {
                info!(
                    "Terminated after {} generations ({}), best fitness {best_fitness:.6}",
                    generation + 1,
                    self.strategies.termination_strategy().printable_identifier()
                );
                return Ok(result);
            }

            population = self.breed(&ranked, &fitness, &mut rng)?;
            generation += 1;
        }
    }

    /// Score every genome; results stay index-aligned with `population`.
    fn evaluate(&self, population: &[Genome]) -> Result<Vec<f64>, EvolutionError> {
        let score = |genome: &Genome| -> Result<f64, FitnessError> {
            let params = self.translator.translate(genome);
            let fitness = self.strategies.fitness_strategy().fitness(&params)?;
            Ok(if fitness.is_nan() {
                f64::NEG_INFINITY
            } else {
                fitness
            })
        };

        let fitness: Result<Vec<f64>, FitnessError> = if self.parallel {
            population.par_iter().map(score).collect()
        } else {
            population.iter().map(score).collect()
        };
        fitness.map_err(EvolutionError::Fitness)
    }

    /// Elites first, then `size / 2 - 1` mutated child pairs.
    fn breed(
        &self,
        population: &[Genome],
        fitness: &[f64],
        rng: &mut GenomeRng,
    ) -> Result<Vec<Genome>, StrategyError> {
        let selection = self.strategies.selection_strategy();
        let crossover = self.strategies.crossover_strategy();
        let mutation = self.strategies.mutation_strategy();

        let mut next = Vec::with_capacity(population.len());
        next.extend_from_slice(&population[..ELITE_COUNT]);

        for pair in 0..population.len() / 2 - 1 {
            let (parent_a, parent_b) = selection.select(population, fitness, rng)?;
            let (mut child_a, mut child_b) =
                crossover.crossover(&self.factory, parent_a, parent_b, rng)?;
            mutation.mutate(&self.factory, &mut child_a, rng)?;
            mutation.mutate(&self.factory, &mut child_b, rng)?;
            trace!("Pair {pair}: {parent_a} x {parent_b} -> {child_a}, {child_b}");
            next.push(child_a);
            next.push(child_b);
        }
        Ok(next)
    }
}

/// Stable sort by fitness, highest first.
fn rank(population: Vec<Genome>, fitness: Vec<f64>) -> (Vec<Genome>, Vec<f64>) {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

    let mut slots: Vec<Option<Genome>> = population.into_iter().map(Some).collect();
    let ranked = order.iter().filter_map(|&i| slots[i].take()).collect();
    let fitness = order.iter().map(|&i| fitness[i]).collect();
    (ranked, fitness)
}
