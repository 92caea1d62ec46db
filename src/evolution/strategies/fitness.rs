//! Translation of genomes into domain parameters, and their scoring.
//!
//! The engine never inspects genome contents itself. A [`Translator`] turns
//! each genome into whatever the embedding domain works with, and a
//! [`FitnessStrategy`] scores that value (higher is better).

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::evolution::genome::Genome;

/// Error type returned by fitness evaluation. Propagated to the caller unchanged.
pub type FitnessError = Box<dyn std::error::Error + Send + Sync>;

/// Maps raw dna to domain parameters.
pub trait Translator: Send + Sync {
    type Output: Send;

    fn translate(&self, genome: &Genome) -> Self::Output;
}

/// Identity translator: the domain parameters are an owned copy of the dna.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnaTranslator;

impl Translator for DnaTranslator {
    type Output = Vec<f64>;

    fn translate(&self, genome: &Genome) -> Vec<f64> {
        genome.dna.clone()
    }
}

/// Scores translated parameters. Must be safe to call concurrently.
pub trait FitnessStrategy<P>: Send + Sync {
    fn fitness(&self, params: &P) -> Result<f64, FitnessError>;

    fn printable_identifier(&self) -> String;
}

/// Wraps a closure as a named fitness strategy.
pub struct FitnessFn<F> {
    name: String,
    function: F,
}

impl<F> FitnessFn<F> {
    pub fn new(name: impl Into<String>, function: F) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }
}

impl<P, F> FitnessStrategy<P> for FitnessFn<F>
where
    F: Fn(&P) -> Result<f64, FitnessError> + Send + Sync,
{
    fn fitness(&self, params: &P) -> Result<f64, FitnessError> {
        (self.function)(params)
    }

    fn printable_identifier(&self) -> String {
        self.name.clone()
    }
}

/// Benchmark landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveKind {
    /// `sum(z_i^2)`
    Sphere,
    /// `10n + sum(z_i^2 - 10 cos(2 pi z_i))`
    Rastrigin,
    /// `sum(100 (z_{i+1} - z_i^2)^2 + (1 - z_i)^2)`
    Rosenbrock,
}

/// Built-in benchmark objective over plain dna.
///
/// Fitness is the negated cost, so the optimum scores 0. With a `target`
/// the landscape is shifted so its optimum sits at the target point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub kind: ObjectiveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Vec<f64>>,
}

impl Objective {
    pub fn new(kind: ObjectiveKind) -> Self {
        Self { kind, target: None }
    }

    pub fn with_target(mut self, target: Vec<f64>) -> Self {
        self.target = Some(target);
        self
    }

    /// Cost at `x` (lower is better).
    pub fn cost(&self, x: &[f64]) -> Result<f64, ObjectiveError> {
        let z: Vec<f64> = match &self.target {
            Some(target) if target.len() != x.len() => {
                return Err(ObjectiveError::DimensionMismatch {
                    expected: target.len(),
                    found: x.len(),
                });
            }
            Some(target) => x.iter().zip(target).map(|(xi, ti)| xi - ti).collect(),
            None => x.to_vec(),
        };

        let cost = match self.kind {
            ObjectiveKind::Sphere => z.iter().map(|v| v * v).sum(),
            ObjectiveKind::Rastrigin => {
                10.0 * z.len() as f64
                    + z.iter()
                        .map(|v| v * v - 10.0 * (2.0 * PI * v).cos())
                        .sum::<f64>()
            }
            ObjectiveKind::Rosenbrock => {
                // Rosenbrock's optimum is at 1, so shift by one more
                let z: Vec<f64> = if self.target.is_some() {
                    z.iter().map(|v| v + 1.0).collect()
                } else {
                    z
                };
                z.windows(2)
                    .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
                    .sum()
            }
        };
        Ok(cost)
    }
}

impl FitnessStrategy<Vec<f64>> for Objective {
    fn fitness(&self, params: &Vec<f64>) -> Result<f64, FitnessError> {
        Ok(-self.cost(params)?)
    }

    fn printable_identifier(&self) -> String {
        let name = match self.kind {
            ObjectiveKind::Sphere => "Sphere",
            ObjectiveKind::Rastrigin => "Rastrigin",
            ObjectiveKind::Rosenbrock => "Rosenbrock",
        };
        if self.target.is_some() {
            format!("{name}(shifted)")
        } else {
            name.to_string()
        }
    }
}

/// Errors from the built-in objectives.
#[derive(Debug, thiserror::Error)]
pub enum ObjectiveError {
    #[error("Objective target has {expected} coordinates, genome has {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dna_translator_copies() {
        let genome = Genome::new(vec![1.0, 2.0]);
        let params = DnaTranslator.translate(&genome);
        assert_eq!(params, genome.dna);
    }

    #[test]
    fn test_optimum_scores_zero() {
        let sphere = Objective::new(ObjectiveKind::Sphere);
        assert_eq!(sphere.fitness(&vec![0.0, 0.0]).unwrap(), 0.0);

        let rastrigin = Objective::new(ObjectiveKind::Rastrigin);
        assert!(rastrigin.fitness(&vec![0.0, 0.0, 0.0]).unwrap().abs() < 1e-12);

        let rosenbrock = Objective::new(ObjectiveKind::Rosenbrock);
        assert_eq!(rosenbrock.fitness(&vec![1.0, 1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_higher_is_better() {
        let sphere = Objective::new(ObjectiveKind::Sphere);
        let near = sphere.fitness(&vec![0.1, 0.1]).unwrap();
        let far = sphere.fitness(&vec![1.0, -1.0]).unwrap();
        assert!(near > far);
        assert_eq!(far, -2.0);
    }

    #[test]
    fn test_shifted_optimum() {
        let target = vec![0.5, -0.25];
        for kind in [ObjectiveKind::Sphere, ObjectiveKind::Rastrigin, ObjectiveKind::Rosenbrock] {
            let objective = Objective::new(kind).with_target(target.clone());
            assert!(objective.fitness(&target).unwrap().abs() < 1e-12);
            assert!(objective.fitness(&vec![0.0, 0.0]).unwrap() < 0.0);
        }
    }

    #[test]
    fn test_target_dimension_mismatch_is_error() {
        let objective = Objective::new(ObjectiveKind::Sphere).with_target(vec![0.0; 3]);
        assert!(objective.fitness(&vec![0.0; 2]).is_err());
    }

    #[test]
    fn test_fitness_fn() {
        let strategy = FitnessFn::new("FirstGene", |p: &Vec<f64>| -> Result<f64, FitnessError> {
            Ok(p[0])
        });
        assert_eq!(strategy.fitness(&vec![3.0]).unwrap(), 3.0);
        assert_eq!(
            FitnessStrategy::<Vec<f64>>::printable_identifier(&strategy),
            "FirstGene"
        );
    }

    #[test]
    fn test_objective_identifier_and_serde() {
        let objective: Objective =
            serde_json::from_str(r#"{ "kind": "rastrigin", "target": [1.0] }"#).unwrap();
        assert_eq!(objective.kind, ObjectiveKind::Rastrigin);
        assert_eq!(objective.printable_identifier(), "Rastrigin(shifted)");
        assert_eq!(
            Objective::new(ObjectiveKind::Sphere).printable_identifier(),
            "Sphere"
        );
    }
}
