//! One concrete strategy per category, injected into the engine as a unit.

use super::{
    CrossoverStrategy, FitnessStrategy, MutationStrategy, PopulateStrategy, SelectionStrategy,
    TerminationStrategy,
};

/// Aggregate of the six strategies driving a run.
///
/// `P` is the translated parameter type scored by the fitness strategy.
pub struct StrategyBundle<P> {
    populate: Box<dyn PopulateStrategy>,
    fitness: Box<dyn FitnessStrategy<P>>,
    selection: Box<dyn SelectionStrategy>,
    crossover: Box<dyn CrossoverStrategy>,
    mutation: Box<dyn MutationStrategy>,
    termination: Box<dyn TerminationStrategy>,
}

impl<P> StrategyBundle<P> {
    pub fn new(
        populate: Box<dyn PopulateStrategy>,
        fitness: Box<dyn FitnessStrategy<P>>,
        selection: Box<dyn SelectionStrategy>,
        crossover: Box<dyn CrossoverStrategy>,
        mutation: Box<dyn MutationStrategy>,
        termination: Box<dyn TerminationStrategy>,
    ) -> Self {
        Self {
            populate,
            fitness,
            selection,
            crossover,
            mutation,
            termination,
        }
    }

    pub fn populate_strategy(&self) -> &dyn PopulateStrategy {
        self.populate.as_ref()
    }

    pub fn fitness_strategy(&self) -> &dyn FitnessStrategy<P> {
        self.fitness.as_ref()
    }

    pub fn selection_strategy(&self) -> &dyn SelectionStrategy {
        self.selection.as_ref()
    }

    pub fn crossover_strategy(&self) -> &dyn CrossoverStrategy {
        self.crossover.as_ref()
    }

    pub fn mutation_strategy(&self) -> &dyn MutationStrategy {
        self.mutation.as_ref()
    }

    pub fn termination_strategy(&self) -> &dyn TerminationStrategy {
        self.termination.as_ref()
    }

    /// Termination strategies carry state between generations.
    pub(crate) fn termination_strategy_mut(&mut self) -> &mut dyn TerminationStrategy {
        self.termination.as_mut()
    }

    fn identifiers(&self) -> [String; 6] {
        [
            self.populate.printable_identifier(),
            self.fitness.printable_identifier(),
            self.selection.printable_identifier(),
            self.crossover.printable_identifier(),
            self.mutation.printable_identifier(),
            self.termination.printable_identifier(),
        ]
    }

    /// Comma-joined identifiers, for tabular experiment logs.
    pub fn csv(&self) -> String {
        self.identifiers().join(",")
    }

    /// Underscore-joined identifiers, for file and run names.
    pub fn name_identifier(&self) -> String {
        self.identifiers().join("_")
    }
}
