//! Pluggable policies for each phase of the generational loop.
//!
//! Every category is a trait with one required operation plus
//! `printable_identifier`, which is a pure function of the construction
//! parameters and is used to label experiments:
//!
//! - [`PopulateStrategy`]: build the initial population
//! - [`SelectionStrategy`]: pick two parents from the ranked population
//! - [`CrossoverStrategy`]: recombine two parents into two children
//! - [`MutationStrategy`]: perturb a genome in place
//! - [`TerminationStrategy`]: decide when the loop stops
//! - [`FitnessStrategy`]: score translated domain parameters
//!
//! A [`StrategyBundle`] carries one instance of each into the engine.

mod bundle;
mod crossover;
mod fitness;
mod mutation;
mod populate;
mod selection;
mod termination;

pub use bundle::StrategyBundle;
pub use crossover::{CrossoverStrategy, SinglePoint, TwoPoint, Uniform};
pub use fitness::{
    DnaTranslator, FitnessError, FitnessFn, FitnessStrategy, Objective, ObjectiveKind, Translator,
};
pub use mutation::{BoundedDistributionBasedMutation, BoundedUniformMutation, MutationStrategy};
pub use populate::{BoundedUniformPopulation, PopulateStrategy, ValueUniformPopulation};
pub use selection::{Random, RouletteWheel, SelectionStrategy, Tournament};
pub use termination::{
    And, FitnessReached, MaxIteration, NoImprovement, Or, TerminationStrategy,
};

/// Errors raised while constructing or applying a strategy.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("Invalid {strategy} parameter: {reason}")]
    InvalidParameter {
        strategy: &'static str,
        reason: String,
    },
    #[error("{context}: expected {expected} genes, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{strategy} crossover requires at least {required} genes, got {found}")]
    TooFewGenes {
        strategy: &'static str,
        required: usize,
        found: usize,
    },
    #[error("Tournament size {k} exceeds population size {population}")]
    TournamentTooLarge { k: usize, population: usize },
    #[error("Cannot select from an empty population")]
    EmptyPopulation,
    #[error("Population has {population} genomes but {fitness} fitness values")]
    FitnessLengthMismatch { population: usize, fitness: usize },
    #[error("{strategy} requires genome bounds, but none are configured")]
    MissingBounds { strategy: &'static str },
    #[error("Gene {gene}: cannot sample distribution: {reason}")]
    InvalidDistribution { gene: usize, reason: String },
}
