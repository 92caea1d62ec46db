//! Stop conditions, including boolean combinators.

/// Decides after each generation whether the loop stops.
///
/// `generation` is the number of completed generations and `best_fitness`
/// the best fitness seen so far.
pub trait TerminationStrategy: Send + Sync {
    fn should_terminate(&mut self, generation: usize, best_fitness: f64) -> bool;

    /// Clear internal state before a new run.
    fn reset(&mut self) {}

    fn printable_identifier(&self) -> String;
}

/// Stop once `generation >= max_generations`.
#[derive(Debug, Clone)]
pub struct MaxIteration {
    max_generations: usize,
}

impl MaxIteration {
    pub fn new(max_generations: usize) -> Self {
        Self { max_generations }
    }
}

impl TerminationStrategy for MaxIteration {
    fn should_terminate(&mut self, generation: usize, _best_fitness: f64) -> bool {
        generation >= self.max_generations
    }

    fn printable_identifier(&self) -> String {
        format!("MaxIteration(n={})", self.max_generations)
    }
}

/// Stop once the best fitness reaches a threshold.
#[derive(Debug, Clone)]
pub struct FitnessReached {
    needed_fitness: f64,
}

impl FitnessReached {
    pub fn new(needed_fitness: f64) -> Self {
        Self { needed_fitness }
    }
}

impl TerminationStrategy for FitnessReached {
    fn should_terminate(&mut self, _generation: usize, best_fitness: f64) -> bool {
        best_fitness >= self.needed_fitness
    }

    fn printable_identifier(&self) -> String {
        format!("FitnessReached(n={:?})", self.needed_fitness)
    }
}

/// Stop once the best fitness has stayed exactly equal for `n` consecutive checks.
#[derive(Debug, Clone)]
pub struct NoImprovement {
    n_generations: usize,
    last_best: f64,
    counter: usize,
}

impl NoImprovement {
    pub fn new(n_generations: usize) -> Self {
        Self {
            n_generations,
            last_best: f64::NEG_INFINITY,
            counter: 0,
        }
    }
}

impl TerminationStrategy for NoImprovement {
    fn should_terminate(&mut self, _generation: usize, best_fitness: f64) -> bool {
        if best_fitness == self.last_best {
            self.counter += 1;
        } else {
            self.last_best = best_fitness;
            self.counter = 0;
        }
        self.counter >= self.n_generations
    }

    fn reset(&mut self) {
        self.last_best = f64::NEG_INFINITY;
        self.counter = 0;
    }

    fn printable_identifier(&self) -> String {
        format!("NoImprovement(n={})", self.n_generations)
    }
}

/// Stop when any sub-strategy says so. Every sub-strategy is consulted on
/// every call so stateful ones stay current. Empty: never stops.
pub struct Or {
    strategies: Vec<Box<dyn TerminationStrategy>>,
}

impl Or {
    pub fn new(strategies: Vec<Box<dyn TerminationStrategy>>) -> Self {
        Self { strategies }
    }
}

impl TerminationStrategy for Or {
    fn should_terminate(&mut self, generation: usize, best_fitness: f64) -> bool {
        self.strategies
            .iter_mut()
            .map(|s| s.should_terminate(generation, best_fitness))
            .fold(false, |acc, stop| acc | stop)
    }

    fn reset(&mut self) {
        self.strategies.iter_mut().for_each(|s| s.reset());
    }

    fn printable_identifier(&self) -> String {
        combined_identifier(&self.strategies, "|")
    }
}

/// Stop when all sub-strategies say so. Every sub-strategy is consulted on
/// every call so stateful ones stay current. Empty: stops immediately.
pub struct And {
    strategies: Vec<Box<dyn TerminationStrategy>>,
}

impl And {
    pub fn new(strategies: Vec<Box<dyn TerminationStrategy>>) -> Self {
        Self { strategies }
    }
}

impl TerminationStrategy for And {
    fn should_terminate(&mut self, generation: usize, best_fitness: f64) -> bool {
        self.strategies
            .iter_mut()
            .map(|s| s.should_terminate(generation, best_fitness))
            .fold(true, |acc, stop| acc & stop)
    }

    fn reset(&mut self) {
        self.strategies.iter_mut().for_each(|s| s.reset());
    }

    fn printable_identifier(&self) -> String {
        combined_identifier(&self.strategies, "&")
    }
}

fn combined_identifier(strategies: &[Box<dyn TerminationStrategy>], separator: &str) -> String {
    let parts: Vec<String> = strategies.iter().map(|s| s.printable_identifier()).collect();
    format!("[{}]", parts.join(separator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_iteration() {
        let mut strategy = MaxIteration::new(5);
        assert!(!strategy.should_terminate(4, 0.0));
        assert!(strategy.should_terminate(5, 0.0));
        assert!(strategy.should_terminate(6, 0.0));
    }

    #[test]
    fn test_fitness_reached() {
        let mut strategy = FitnessReached::new(0.9);
        assert!(!strategy.should_terminate(0, 0.89));
        assert!(strategy.should_terminate(0, 0.9));
    }

    #[test]
    fn test_no_improvement_counts_exact_repeats() {
        let mut strategy = NoImprovement::new(3);
        assert!(!strategy.should_terminate(1, 1.0));
        assert!(!strategy.should_terminate(2, 1.0));
        assert!(!strategy.should_terminate(3, 1.0));
        assert!(strategy.should_terminate(4, 1.0));
    }

    #[test]
    fn test_no_improvement_resets_on_change() {
        let mut strategy = NoImprovement::new(2);
        assert!(!strategy.should_terminate(1, 1.0));
        assert!(!strategy.should_terminate(2, 1.0));
        assert!(!strategy.should_terminate(3, 2.0));
        assert!(!strategy.should_terminate(4, 2.0));
        assert!(strategy.should_terminate(5, 2.0));

        strategy.reset();
        assert!(!strategy.should_terminate(1, 2.0));
    }

    #[test]
    fn test_empty_combinators() {
        assert!(And::new(vec![]).should_terminate(0, 0.0));
        assert!(!Or::new(vec![]).should_terminate(0, 0.0));
    }

    #[test]
    fn test_or_advances_every_sub_strategy() {
        let mut or = Or::new(vec![
            Box::new(MaxIteration::new(2)),
            Box::new(NoImprovement::new(2)),
        ]);
        assert!(or.should_terminate(5, 1.0));
        assert!(or.should_terminate(5, 1.0));
        // MaxIteration is false here; NoImprovement has counted every call
        assert!(or.should_terminate(0, 1.0));
    }

    #[test]
    fn test_and_sees_stateful_updates_after_short_circuit_point() {
        let mut and = And::new(vec![
            Box::new(MaxIteration::new(3)),
            Box::new(NoImprovement::new(2)),
        ]);
        assert!(!and.should_terminate(1, 1.0));
        assert!(!and.should_terminate(2, 1.0));
        // NoImprovement counted both earlier calls, so it is ready as soon as
        // MaxIteration allows
        assert!(and.should_terminate(3, 1.0));
    }

    #[test]
    fn test_identifiers() {
        let or = Or::new(vec![
            Box::new(MaxIteration::new(10)),
            Box::new(And::new(vec![
                Box::new(NoImprovement::new(3)),
                Box::new(FitnessReached::new(0.5)),
            ])),
        ]);
        assert_eq!(
            or.printable_identifier(),
            "[MaxIteration(n=10)|[NoImprovement(n=3)&FitnessReached(n=0.5)]]"
        );
    }
}
