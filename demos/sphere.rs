//! Quick optimization demo on the benchmark objectives

use std::time::Instant;

use evolution_engine::{
    evolution::{
        Algorithm, BoundedUniformMutation, BoundedUniformPopulation, DnaTranslator, GenomeFactory,
        NoImprovement, Objective, ObjectiveKind, Or, MaxIteration, StrategyBundle, Tournament,
        TwoPoint,
    },
    schema::GenomeParameters,
};

const GENES: &str = r#"{
    "dna": [
        { "bounds": { "low": -5.0, "high": 5.0 }, "mutation": { "low": -0.25, "high": 0.25, "probability": 0.3 } },
        { "bounds": { "low": -5.0, "high": 5.0 }, "mutation": { "low": -0.25, "high": 0.25, "probability": 0.3 } },
        { "bounds": { "low": -5.0, "high": 5.0 }, "mutation": { "low": -0.25, "high": 0.25, "probability": 0.3 } },
        { "bounds": { "low": -5.0, "high": 5.0 }, "mutation": { "low": -0.25, "high": 0.25, "probability": 0.3 } }
    ]
}"#;

fn main() {
    env_logger::init();

    println!("=== Evolution Demo ===\n");

    let parameters = match GenomeParameters::from_json_str(GENES) {
        Ok(parameters) => parameters.with_default_display_name("demo"),
        Err(e) => {
            eprintln!("Error in gene configuration: {}", e);
            std::process::exit(1);
        }
    };
    let factory = GenomeFactory::new(parameters);
    let target = vec![1.5, -2.0, 0.5, 3.0];

    for kind in [
        ObjectiveKind::Sphere,
        ObjectiveKind::Rastrigin,
        ObjectiveKind::Rosenbrock,
    ] {
        let tournament = match Tournament::new(4, 0.5) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error building selection: {}", e);
                std::process::exit(1);
            }
        };
        let strategies = StrategyBundle::new(
            Box::new(BoundedUniformPopulation::new(40)),
            Box::new(Objective::new(kind).with_target(target.clone())),
            Box::new(tournament),
            Box::new(TwoPoint),
            Box::new(BoundedUniformMutation),
            Box::new(Or::new(vec![
                Box::new(MaxIteration::new(300)),
                Box::new(NoImprovement::new(40)),
            ])),
        );
        println!("{}", strategies.name_identifier());

        let start = Instant::now();
        let mut algorithm =
            Algorithm::new(DnaTranslator, factory.clone(), strategies).with_seed(42);
        let result = match algorithm.run(&factory.initial_genome(None).dna) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error during evolution: {}", e);
                std::process::exit(1);
            }
        };
        let elapsed = start.elapsed();

        println!("  Generations:    {}", result.n_generations());
        println!("  Elapsed:        {:.3}s", elapsed.as_secs_f64());
        if let Some((genome, fitness)) = result.best_genome() {
            println!("  Best genome:    {}", genome);
            println!("  Best fitness:   {:.6}", fitness);
        }
        println!();
    }
}
