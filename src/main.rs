//! Evolution Engine CLI - Run an optimization from a JSON run configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use evolution_engine::{
    evolution::{GenerationObserver, Genome},
    schema::{GeneConfig, RunConfig},
};

/// Prints a progress line on every improvement.
struct ProgressPrinter {
    start: Instant,
}

impl GenerationObserver for ProgressPrinter {
    fn on_best_genome_found(&mut self, genome: &Genome, fitness: f64) {
        eprintln!(
            "  [{:>7.2}s] fitness={:.6}  {}",
            self.start.elapsed().as_secs_f32(),
            fitness,
            genome
        );
    }
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <run.json>", args[0]);
        eprintln!();
        eprintln!("Run an evolutionary optimization from a JSON run configuration.");
        eprintln!("The result is written to stdout as JSON.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  run.json     Path to run configuration file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let config = RunConfig::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading run configuration: {}", e);
        std::process::exit(1);
    });

    let mut run = config.prepare().unwrap_or_else(|e| {
        eprintln!("Error preparing run: {}", e);
        std::process::exit(1);
    });

    eprintln!("Evolution Engine");
    eprintln!("================");
    eprintln!("Genes: {}", run.algorithm.factory().n_genes());
    eprintln!("Strategies: {}", run.algorithm.strategies().csv());
    eprintln!("Seed: {}", run.algorithm.seed());
    eprintln!();

    let start = Instant::now();
    let mut printer = ProgressPrinter { start };
    let result = run
        .algorithm
        .run_with_observer(&run.start_dna, &mut printer)
        .unwrap_or_else(|e| {
            eprintln!("Error during evolution: {}", e);
            std::process::exit(1);
        });
    let elapsed = start.elapsed();

    eprintln!();
    eprintln!("Generations: {}", result.n_generations());
    if let Some((genome, fitness)) = result.best_genome() {
        eprintln!("Best: {} (fitness {:.6})", genome, fitness);
    }
    eprintln!(
        "Time: {:.2}s ({:.1} generations/s)",
        elapsed.as_secs_f32(),
        result.n_generations() as f32 / elapsed.as_secs_f32()
    );

    match result.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_example_config() {
    let config = RunConfig::example();
    let genes = config.gene_config.clone();

    let print = |label: &str, json: serde_json::Result<String>| match json {
        Ok(json) => {
            println!("{}", label);
            println!("{}", json);
        }
        Err(e) => {
            eprintln!("Error serializing example: {}", e);
            std::process::exit(1);
        }
    };

    print(
        "Example run configuration (run.json):",
        serde_json::to_string_pretty(&config),
    );
    println!();
    if let Some(genes) = genes {
        print(
            "Example gene configuration (genes.json, referenced via \"genes\"):",
            serde_json::to_string_pretty::<GeneConfig>(&genes),
        );
    }
}
