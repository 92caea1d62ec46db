//! End-to-end runs driven from configuration files on disk.

use std::fs;

use evolution_engine::evolution::{
    Algorithm, BoundedUniformMutation, BoundedUniformPopulation, DnaTranslator, GenerationObserver,
    Genome, GenomeFactory, GenomeRng, MaxIteration, Objective, ObjectiveKind, PopulateStrategy,
    RouletteWheel, StrategyBundle, TwoPoint, Uniform,
};
use evolution_engine::schema::{GenomeParameters, ParameterError, RunConfig, RunConfigError};

const TWO_GENES: &str = r#"{
    "dna": [
        {
            "bounds": { "low": -1.0, "high": 1.0 },
            "mutation": { "low": -0.1, "high": 0.1, "probability": 1.0, "distribution": "uniform" }
        },
        {
            "bounds": { "low": -1.0, "high": 1.0 },
            "mutation": { "low": -0.1, "high": 0.1, "probability": 1.0, "distribution": "uniform" }
        }
    ]
}"#;

#[derive(Default)]
struct BoundsWatcher {
    generations: usize,
    out_of_bounds: usize,
}

impl GenerationObserver for BoundsWatcher {
    fn on_display_population(
        &mut self,
        _generation: usize,
        population: &[Genome],
        _fitness: &[f64],
    ) {
        self.generations += 1;
        self.out_of_bounds += population
            .iter()
            .flat_map(|g| g.dna.iter())
            .filter(|v| !(-1.0..=1.0).contains(*v))
            .count();
    }
}

#[test]
fn test_two_gene_run_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let genes_path = dir.path().join("genes.json");
    fs::write(&genes_path, TWO_GENES).unwrap();

    let parameters = GenomeParameters::from_file(&genes_path).unwrap();
    assert_eq!(parameters.n_genes(), 2);
    let factory = GenomeFactory::new(parameters);

    let populate = BoundedUniformPopulation::new(4);
    let mut rng = GenomeRng::new(42);
    let population = populate.populate(&factory, &[0.0, 0.0], &mut rng).unwrap();
    assert_eq!(population.len(), 4);
    for genome in &population {
        assert!(genome.dna.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    let strategies = StrategyBundle::new(
        Box::new(populate),
        Box::new(Objective::new(ObjectiveKind::Sphere)),
        Box::new(RouletteWheel),
        Box::new(Uniform::constant(2, 0.5).unwrap()),
        Box::new(BoundedUniformMutation),
        Box::new(MaxIteration::new(5)),
    );

    let mut watcher = BoundsWatcher::default();
    let result = Algorithm::new(DnaTranslator, factory, strategies)
        .with_seed(7)
        .run_with_observer(&[0.0, 0.0], &mut watcher)
        .unwrap();

    assert_eq!(result.n_generations(), 5);
    assert_eq!(watcher.generations, 5);
    assert_eq!(watcher.out_of_bounds, 0);
}

#[test]
fn test_run_config_resolves_relative_gene_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("genes.json"), TWO_GENES).unwrap();
    let run_path = dir.path().join("run.json");
    fs::write(
        &run_path,
        r#"{
            "genes": "genes.json",
            "populate": { "type": "BoundedUniform", "size": 8 },
            "selection": { "type": "Random" },
            "crossover": { "type": "SinglePoint" },
            "mutation": { "type": "BoundedDistributionBased" },
            "termination": {
                "type": "Or",
                "strategies": [
                    { "type": "MaxIteration", "n": 12 },
                    { "type": "FitnessReached", "fitness": 1.0 }
                ]
            },
            "objective": { "kind": "sphere", "target": [0.25, -0.5] },
            "random_seed": 3,
            "parallel": false
        }"#,
    )
    .unwrap();

    let config = RunConfig::from_file(&run_path).unwrap();
    let mut run = config.prepare().unwrap();
    assert_eq!(run.start_dna, vec![0.0, 0.0]);

    let result = run.algorithm.run(&run.start_dna).unwrap();
    assert_eq!(result.n_generations(), 12);

    let ever = result.best_ever_fitnesses();
    assert!(ever.windows(2).all(|w| w[1] >= w[0]));
    let (best, fitness) = result.best_genome().unwrap();
    assert_eq!(fitness, result.best_fitness());
    assert!(best.dna.iter().all(|v| (-1.0..=1.0).contains(v)));
}

#[test]
fn test_two_point_needs_three_genes() {
    let factory = GenomeFactory::new(GenomeParameters::from_json_str(TWO_GENES).unwrap());
    let strategies = StrategyBundle::new(
        Box::new(BoundedUniformPopulation::new(4)),
        Box::new(Objective::new(ObjectiveKind::Sphere)),
        Box::new(RouletteWheel),
        Box::new(TwoPoint),
        Box::new(BoundedUniformMutation),
        Box::new(MaxIteration::new(3)),
    );
    let err = Algorithm::new(DnaTranslator, factory, strategies)
        .with_seed(1)
        .run(&[0.0, 0.0])
        .unwrap_err();
    assert!(err.to_string().contains("TwoPoint"));
}

#[test]
fn test_missing_gene_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let run_path = dir.path().join("run.json");
    fs::write(&run_path, r#"{ "genes": "absent.json" }"#).unwrap();

    let config = RunConfig::from_file(&run_path).unwrap();
    match config.prepare() {
        Err(RunConfigError::Parameters(ParameterError::Io { path, .. })) => {
            assert!(path.ends_with("absent.json"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected a missing file error"),
    }
}

#[test]
fn test_malformed_run_file() {
    let dir = tempfile::tempdir().unwrap();
    let run_path = dir.path().join("run.json");
    fs::write(&run_path, "{ not json").unwrap();
    assert!(matches!(
        RunConfig::from_file(&run_path),
        Err(RunConfigError::Parse(_))
    ));
}
