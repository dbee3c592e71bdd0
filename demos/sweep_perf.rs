//! Quick search performance test

use std::time::Instant;

use tricolor::{
    EvolutionConfig, EvolutionEngine,
    compute::{ColoringRng, Graph},
    schema::{
        CrossoverMethod, GeneticAlgorithmConfig, HybridMethod, PopulationConfig, SelectionMethod,
    },
};

fn config(hybrid: Option<HybridMethod>) -> EvolutionConfig {
    EvolutionConfig {
        population: PopulationConfig {
            size: 200,
            max_generations: 2_000,
        },
        operators: GeneticAlgorithmConfig {
            selection: SelectionMethod::Tournament { candidates: 2 },
            crossover: CrossoverMethod::UniformMask,
            mutation_rate: 0.014,
            elitism: true,
            scaling: true,
        },
        hybrid,
        random_seed: Some(42),
    }
}

fn main() {
    println!("=== Search Performance Test ===\n");

    // Test different densities around the hard region
    for density in [2.0, 2.5, 3.0, 4.0] {
        println!("Density: {} (90 nodes)", density);

        let mut rng = ColoringRng::new(7);
        let graph = Graph::planted(90, density, &mut rng).unwrap();

        for (name, hybrid) in [
            ("none", None),
            ("greedy", Some(HybridMethod::GreedyStep)),
            ("hill climb", Some(HybridMethod::hill_climb())),
        ] {
            let start = Instant::now();
            let mut engine = EvolutionEngine::new(config(hybrid), &graph).unwrap();
            let result = engine.run();
            let elapsed = start.elapsed();

            let evals_per_sec = result.total_evaluations as f64 / elapsed.as_secs_f64();

            println!("  Hybrid:         {}", name);
            println!("    Success:      {}", result.success);
            println!("    Generations:  {}", result.generations);
            println!("    Evaluations:  {}", result.total_evaluations);
            println!("    Elapsed:      {:.2}s", elapsed.as_secs_f64());
            println!("    Evals/sec:    {:.1}", evals_per_sec);
            println!("    Best fitness: {:.6}", result.best_fitness);
        }
        println!();
    }

    println!("=== Scalability Test (d = 3.0) ===\n");

    // Test different population sizes
    let mut rng = ColoringRng::new(11);
    let graph = Graph::planted(90, 3.0, &mut rng).unwrap();
    for pop_size in [50, 100, 200, 400] {
        let mut config = config(Some(HybridMethod::hill_climb()));
        config.population.size = pop_size;
        config.population.max_generations = 200;

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(config, &graph).unwrap();
        let result = engine.run();
        let elapsed = start.elapsed();

        println!(
            "  Pop {:3}: {:.2}s total, {:.2}ms/gen, best {:.6}",
            pop_size,
            elapsed.as_secs_f64(),
            elapsed.as_secs_f64() * 1000.0 / result.generations.max(1) as f64,
            result.best_fitness
        );
    }
}
