//! Evolution Engine - Genetic optimization of real-valued parameter vectors.
//!
//! This crate searches a fixed-length vector of real numbers (a "genome")
//! for the values that maximize an externally supplied fitness function,
//! using a population-based generational loop with pluggable strategies.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Gene configuration, derived per-gene tables, and run configuration
//! - `evolution`: Genomes, strategies, the generational loop, and results
//!
//! # Example
//!
//! ```rust,no_run
//! use evolution_engine::schema::RunConfig;
//!
//! let config = RunConfig::from_file("run.json").unwrap();
//! let mut run = config.prepare().unwrap();
//! let result = run.algorithm.run(&run.start_dna).unwrap();
//!
//! println!("Generations: {}", result.n_generations());
//! println!("Best fitness: {:.4}", result.best_fitness());
//! ```

pub mod evolution;
pub mod schema;

// Re-export commonly used types
pub use evolution::{Algorithm, EvolutionResult, Genome, GenomeFactory, StrategyBundle};
pub use schema::{GenomeParameters, RunConfig};
