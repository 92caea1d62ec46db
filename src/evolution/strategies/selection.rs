//! Parent selection over a fitness-ranked population.

use log::warn;

use crate::evolution::genome::{Genome, GenomeRng};

use super::StrategyError;

/// Picks two parents, with replacement, from the ranked population.
///
/// `population` and `fitness` are index-aligned and sorted by fitness,
/// highest first.
pub trait SelectionStrategy: Send + Sync {
    fn select<'a>(
        &self,
        population: &'a [Genome],
        fitness: &[f64],
        rng: &mut GenomeRng,
    ) -> Result<(&'a Genome, &'a Genome), StrategyError>;

    fn printable_identifier(&self) -> String;
}

fn check_population(population: &[Genome], fitness: &[f64]) -> Result<(), StrategyError> {
    if population.is_empty() {
        return Err(StrategyError::EmptyPopulation);
    }
    if population.len() != fitness.len() {
        return Err(StrategyError::FitnessLengthMismatch {
            population: population.len(),
            fitness: fitness.len(),
        });
    }
    Ok(())
}

/// Fitness-proportionate selection on min-shifted fitness.
///
/// The shift uses the smallest finite fitness; non-finite members get
/// weight 0. When every weight is zero (all finite fitness equal, or no
/// finite fitness at all), both parents are drawn uniformly instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouletteWheel;

impl SelectionStrategy for RouletteWheel {
    fn select<'a>(
        &self,
        population: &'a [Genome],
        fitness: &[f64],
        rng: &mut GenomeRng,
    ) -> Result<(&'a Genome, &'a Genome), StrategyError> {
        check_population(population, fitness)?;

        let min = fitness
            .iter()
            .copied()
            .filter(|f| f.is_finite())
            .fold(f64::INFINITY, f64::min);
        let weights: Vec<f64> = fitness
            .iter()
            .map(|&f| if f.is_finite() { f - min } else { 0.0 })
            .collect();

        let (first, second) = match rng.weighted_pair(&weights) {
            Some(pair) => pair,
            None => {
                warn!("Roulette wheel weights degenerate, falling back to uniform selection");
                (rng.index(population.len()), rng.index(population.len()))
            }
        };
        Ok((&population[first], &population[second]))
    }

    fn printable_identifier(&self) -> String {
        "RouletteWheel".to_string()
    }
}

/// Rank-weighted tournament.
///
/// Draws `k` distinct members, orders them by population rank, then picks
/// two of them with replacement using weights `p * (1 - p)^rank`.
#[derive(Debug, Clone)]
pub struct Tournament {
    k: usize,
    weights: Vec<f64>,
}

impl Tournament {
    pub fn new(k: usize, p: f64) -> Result<Self, StrategyError> {
        if k == 0 {
            return Err(StrategyError::InvalidParameter {
                strategy: "Tournament",
                reason: "tournament size must be at least 1".to_string(),
            });
        }
        if !(p > 0.0 && p <= 1.0) {
            return Err(StrategyError::InvalidParameter {
                strategy: "Tournament",
                reason: format!("probability {p} must lie in (0, 1]"),
            });
        }
        let weights = (0..k).map(|rank| p * (1.0 - p).powi(rank as i32)).collect();
        Ok(Self { k, weights })
    }

    /// Tournament size.
    pub fn size(&self) -> usize {
        self.k
    }
}

impl SelectionStrategy for Tournament {
    fn select<'a>(
        &self,
        population: &'a [Genome],
        fitness: &[f64],
        rng: &mut GenomeRng,
    ) -> Result<(&'a Genome, &'a Genome), StrategyError> {
        check_population(population, fitness)?;
        if self.k > population.len() {
            return Err(StrategyError::TournamentTooLarge {
                k: self.k,
                population: population.len(),
            });
        }

        let mut tournament = rng.sample_indices(population.len(), self.k);
        tournament.sort_unstable();

        // weights[0] == p > 0, so a pair always exists
        let (first, second) = rng.weighted_pair(&self.weights).unwrap_or((0, 0));
        Ok((&population[tournament[first]], &population[tournament[second]]))
    }

    fn printable_identifier(&self) -> String {
        format!("Tournament(k={})", self.k)
    }
}

/// Uniform pick of a single member, twice. Equivalent to `Tournament(1, 1)`.
#[derive(Debug, Clone)]
pub struct Random {
    inner: Tournament,
}

impl Random {
    pub fn new() -> Self {
        Self {
            inner: Tournament {
                k: 1,
                weights: vec![1.0],
            },
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStrategy for Random {
    fn select<'a>(
        &self,
        population: &'a [Genome],
        fitness: &[f64],
        rng: &mut GenomeRng,
    ) -> Result<(&'a Genome, &'a Genome), StrategyError> {
        self.inner.select(population, fitness, rng)
    }

    fn printable_identifier(&self) -> String {
        "Random".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population(n: usize) -> Vec<Genome> {
        (0..n).map(|i| Genome::new(vec![i as f64])).collect()
    }

    #[test]
    fn test_roulette_equal_fitness_falls_back_to_uniform() {
        let population = population(4);
        let fitness = vec![2.0; 4];
        let mut rng = GenomeRng::new(42);

        let mut seen = [false; 4];
        for _ in 0..200 {
            let (a, b) = RouletteWheel.select(&population, &fitness, &mut rng).unwrap();
            seen[a.dna[0] as usize] = true;
            seen[b.dna[0] as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_roulette_never_picks_minimum() {
        let population = population(3);
        let fitness = vec![5.0, 3.0, -1.0];
        let mut rng = GenomeRng::new(7);

        for _ in 0..200 {
            let (a, b) = RouletteWheel.select(&population, &fitness, &mut rng).unwrap();
            assert_ne!(a.dna[0], 2.0);
            assert_ne!(b.dna[0], 2.0);
        }
    }

    #[test]
    fn test_roulette_ignores_negative_infinity_member() {
        let population = population(4);
        let fitness = vec![100.0, 1.0, 0.0, f64::NEG_INFINITY];
        let mut rng = GenomeRng::new(13);

        let mut counts = [0usize; 4];
        for _ in 0..2000 {
            let (a, b) = RouletteWheel.select(&population, &fitness, &mut rng).unwrap();
            counts[a.dna[0] as usize] += 1;
            counts[b.dna[0] as usize] += 1;
        }
        assert_eq!(counts[2], 0);
        assert_eq!(counts[3], 0);
        assert!(counts[0] > 10 * counts[1]);
    }

    #[test]
    fn test_roulette_all_non_finite_falls_back_to_uniform() {
        let population = population(3);
        let fitness = vec![f64::NEG_INFINITY; 3];
        let mut rng = GenomeRng::new(21);

        let mut seen = [false; 3];
        for _ in 0..200 {
            let (a, b) = RouletteWheel.select(&population, &fitness, &mut rng).unwrap();
            seen[a.dna[0] as usize] = true;
            seen[b.dna[0] as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_roulette_rejects_empty_population() {
        let mut rng = GenomeRng::new(7);
        let err = RouletteWheel.select(&[], &[], &mut rng).unwrap_err();
        assert!(matches!(err, StrategyError::EmptyPopulation));
    }

    #[test]
    fn test_tournament_prefers_rank() {
        // With p = 1 only the best-ranked tournament member can win
        let population = population(6);
        let fitness = vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let tournament = Tournament::new(6, 1.0).unwrap();
        let mut rng = GenomeRng::new(3);

        for _ in 0..50 {
            let (a, b) = tournament.select(&population, &fitness, &mut rng).unwrap();
            assert_eq!(a.dna[0], 0.0);
            assert_eq!(b.dna[0], 0.0);
        }
    }

    #[test]
    fn test_tournament_weights() {
        let tournament = Tournament::new(3, 0.5).unwrap();
        assert_eq!(tournament.weights, vec![0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_tournament_validation() {
        assert!(Tournament::new(0, 0.5).is_err());
        assert!(Tournament::new(2, 0.0).is_err());
        assert!(Tournament::new(2, 1.5).is_err());

        let population = population(2);
        let mut rng = GenomeRng::new(1);
        let err = Tournament::new(3, 0.5)
            .unwrap()
            .select(&population, &[1.0, 0.0], &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            StrategyError::TournamentTooLarge {
                k: 3,
                population: 2
            }
        ));
    }

    #[test]
    fn test_random_covers_population() {
        let population = population(4);
        let fitness = vec![4.0, 3.0, 2.0, 1.0];
        let mut rng = GenomeRng::new(9);

        let mut seen = [false; 4];
        for _ in 0..200 {
            let (a, _) = Random::new().select(&population, &fitness, &mut rng).unwrap();
            seen[a.dna[0] as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(RouletteWheel.printable_identifier(), "RouletteWheel");
        assert_eq!(
            Tournament::new(4, 0.5).unwrap().printable_identifier(),
            "Tournament(k=4)"
        );
        assert_eq!(Random::new().printable_identifier(), "Random");
    }
}
