//! Per-generation history of a run.

use serde::{Deserialize, Serialize};

use super::genome::Genome;

/// Best genome of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best_genome: Genome,
    pub best_fitness: f64,
}

/// Append-only log of generation bests plus the best-ever genome.
///
/// Stored genomes are owned copies, independent of the live population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionResult {
    history: Vec<GenerationRecord>,
    best: Option<GenerationRecord>,
}

impl EvolutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's best genome.
    ///
    /// Returns `true` when it strictly improves on the best-ever fitness.
    pub fn add_generation(
        &mut self,
        generation: usize,
        best_genome: &Genome,
        best_fitness: f64,
    ) -> bool {
        let record = GenerationRecord {
            generation,
            best_genome: best_genome.clone(),
            best_fitness,
        };

        let best_so_far = self.best.as_ref().map_or(f64::NEG_INFINITY, |b| b.best_fitness);
        let improved = best_fitness > best_so_far;
        if improved {
            self.best = Some(record.clone());
        }
        self.history.push(record);
        improved
    }

    /// Best-ever genome and its fitness. `None` until some generation
    /// scores above negative infinity.
    pub fn best_genome(&self) -> Option<(&Genome, f64)> {
        self.best.as_ref().map(|b| (&b.best_genome, b.best_fitness))
    }

    /// Best-ever fitness, negative infinity before any improvement.
    pub fn best_fitness(&self) -> f64 {
        self.best.as_ref().map_or(f64::NEG_INFINITY, |b| b.best_fitness)
    }

    /// Per-generation best fitness, in generation order.
    pub fn best_fitnesses(&self) -> Vec<f64> {
        self.history.iter().map(|r| r.best_fitness).collect()
    }

    /// Running maximum of `best_fitnesses`.
    pub fn best_ever_fitnesses(&self) -> Vec<f64> {
        self.history
            .iter()
            .scan(f64::NEG_INFINITY, |best, r| {
                *best = best.max(r.best_fitness);
                Some(*best)
            })
            .collect()
    }

    /// Number of recorded generations.
    pub fn n_generations(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
