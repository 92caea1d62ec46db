//! Evolutionary optimization over real-valued genomes.
//!
//! # Overview
//!
//! The engine is assembled from:
//!
//! - **Genomes** (`genome`): dna vectors, the factory that builds and clips
//!   them, and the seedable random source shared by all strategies
//! - **Strategies** (`strategies`): populate, selection, crossover, mutation,
//!   termination and fitness policies, bundled into a `StrategyBundle`
//! - **Algorithm** (`algorithm`): the generational loop and its observer hooks
//! - **Result** (`result`): per-generation history and the best-ever genome
//!
//! # Example
//!
//! ```rust,no_run
//! use evolution_engine::evolution::{
//!     Algorithm, BoundedUniformMutation, BoundedUniformPopulation, DnaTranslator,
//!     GenomeFactory, MaxIteration, Objective, ObjectiveKind, SinglePoint, StrategyBundle,
//!     Tournament,
//! };
//! use evolution_engine::schema::GenomeParameters;
//!
//! let parameters = GenomeParameters::from_file("genes.json").unwrap();
//! let factory = GenomeFactory::new(parameters);
//! let start_dna = factory.initial_genome(None).dna;
//!
//! let strategies = StrategyBundle::new(
//!     Box::new(BoundedUniformPopulation::new(32)),
//!     Box::new(Objective::new(ObjectiveKind::Rastrigin)),
//!     Box::new(Tournament::new(4, 0.5).unwrap()),
//!     Box::new(SinglePoint),
//!     Box::new(BoundedUniformMutation),
//!     Box::new(MaxIteration::new(100)),
//! );
//!
//! let mut algorithm = Algorithm::new(DnaTranslator, factory, strategies).with_seed(42);
//! let result = algorithm.run(&start_dna).unwrap();
//!
//! if let Some((genome, fitness)) = result.best_genome() {
//!     println!("{genome}: {fitness:.4}");
//! }
//! ```

mod algorithm;
mod genome;
mod result;
mod strategies;

pub use algorithm::*;
pub use genome::*;
pub use result::*;
pub use strategies::*;
