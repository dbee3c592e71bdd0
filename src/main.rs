//! Tricolor CLI - Run 3-coloring searches and density sweeps from JSON configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use serde::de::DeserializeOwned;

use tricolor::{
    compute::{evolution::EvolutionEngine, planted_graph, run_experiment},
    report,
    schema::{EvolutionConfig, ExperimentConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--example") => print_example_config(),
        Some("run") if args.len() > 2 => run_single(&args[2..]),
        Some("sweep") if args.len() > 2 => run_sweep(Path::new(&args[2])),
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} run <config.json> [graph.csv] [--nodes N] [--density D]", program);
    eprintln!("       {} sweep <experiment.json>", program);
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Search for a proper 3-coloring with a hybrid genetic algorithm.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json      Search configuration");
    eprintln!("  graph.csv        Adjacency matrix (default: random planted graph)");
    eprintln!("  --nodes N        Planted graph size (default: 90)");
    eprintln!("  --density D      Planted graph edges per node (default: 3.0)");
    eprintln!("  experiment.json  Density sweep configuration");
    eprintln!();
    eprintln!("Example configurations are generated with the --example flag.");
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> T {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {} file: {}", what, e);
        process::exit(1);
    });

    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {}", what, e);
        process::exit(1);
    })
}

fn parse_flag<T: std::str::FromStr>(value: Option<&String>, flag: &str) -> T {
    value.and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        eprintln!("Missing or invalid value for {}", flag);
        process::exit(1);
    })
}

fn run_single(args: &[String]) {
    let config: EvolutionConfig = load_json(Path::new(&args[0]), "config");

    let mut graph_path: Option<PathBuf> = None;
    let mut nodes = 90usize;
    let mut density = 3.0f64;

    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--nodes" => nodes = parse_flag(rest.next(), "--nodes"),
            "--density" => density = parse_flag(rest.next(), "--density"),
            other => graph_path = Some(PathBuf::from(other)),
        }
    }

    // A generated graph hands its stream on to the search.
    let (graph, rng) = match &graph_path {
        Some(path) => {
            let graph = report::load_graph_csv(path).unwrap_or_else(|e| {
                eprintln!("Error loading graph: {}", e);
                process::exit(1);
            });
            (graph, None)
        }
        None => {
            let (graph, rng) =
                planted_graph(nodes, density, config.random_seed).unwrap_or_else(|e| {
                    eprintln!("Error generating graph: {}", e);
                    process::exit(1);
                });
            (graph, Some(rng))
        }
    };

    println!("Tricolor Search");
    println!("===============");
    println!("Graph: {}", graph);
    println!(
        "Population: {}, generations: {}",
        config.population.size, config.population.max_generations
    );
    println!(
        "Selection: {:?}, crossover: {:?}, mutation: {}",
        config.operators.selection, config.operators.crossover, config.operators.mutation_rate
    );
    println!("Hybrid: {:?}", config.hybrid);
    println!();

    let total = config.population.max_generations;
    let engine = match rng {
        Some(rng) => EvolutionEngine::with_rng(config, &graph, rng),
        None => EvolutionEngine::new(config, &graph),
    };
    let mut engine = engine.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    println!("Running search...");
    let result = engine.run_with_callback(|progress| {
        // Print progress every 10%
        if progress.generation > 0 && progress.generation % (total / 10).max(1) == 0 {
            println!(
                "  Generation {}/{}: best={:.6}, avg={:.6}, evaluations={}",
                progress.generation,
                total,
                progress.best_fitness,
                progress.avg_fitness,
                progress.evaluations
            );
        }
    });

    println!();
    println!("Result:");
    println!("  Success: {}", result.success);
    println!("  Generations: {}", result.generations);
    println!("  Evaluations: {:.6e}", result.total_evaluations as f64);
    println!("  Best fitness: {:.8}", result.best_fitness);
    println!(
        "  Conflicting edges: {}",
        graph.conflicting_edges(&result.best_solution)
    );
    println!("  Time: {}", result.timing);
}

fn run_sweep(path: &Path) {
    let config: ExperimentConfig = load_json(path, "experiment");

    println!("Tricolor Density Sweep");
    println!("======================");
    println!("Nodes: {}", config.node_count);
    println!("Densities: {:?}", config.densities);
    println!("Runs per density: {}", config.runs_per_density);
    println!();

    let summary = run_experiment(&config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    println!("{:>10} {:>10} {:>14}", "density", "successes", "avg evals");
    for entry in &summary.densities {
        println!(
            "{:>10.2} {:>7}/{:<2} {:>14.6e}",
            entry.density, entry.successes, entry.runs, entry.avg_evaluations
        );
    }
    println!();
    println!("Time: {:.2}s", summary.elapsed_seconds);
}

fn print_example_config() {
    let config = EvolutionConfig::default();
    let experiment = ExperimentConfig {
        output_dir: Some(PathBuf::from("results")),
        ..Default::default()
    };

    println!("Example search configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
    println!();
    println!("Example sweep configuration (experiment.json):");
    println!("{}", serde_json::to_string_pretty(&experiment).unwrap());
}
