//! Benchmarks for fitness evaluation, conflict analysis and the generation step.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use tricolor::{
    compute::{ColoringRng, ConflictReport, Graph, evolution::EvolutionEngine, evolution::Individual},
    schema::{EvolutionConfig, HybridMethod},
};

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");

    for density in [2.0, 5.0, 10.0] {
        let mut rng = ColoringRng::new(1);
        let graph = Graph::planted(90, density, &mut rng).unwrap();
        let individual = Individual::random(&graph, &mut rng);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("d{}", density)),
            &density,
            |b, _| {
                b.iter(|| graph.fitness(black_box(&individual.colors)));
            },
        );
    }

    group.finish();
}

fn bench_conflict_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflict_analysis");

    for density in [2.0, 5.0, 10.0] {
        let mut rng = ColoringRng::new(2);
        let graph = Graph::planted(90, density, &mut rng).unwrap();
        let individual = Individual::random(&graph, &mut rng);
        let mut report = ConflictReport::default();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("d{}", density)),
            &density,
            |b, _| {
                b.iter(|| report.refresh(&graph, black_box(&individual.colors)));
            },
        );
    }

    group.finish();
}

fn bench_generation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation_step");

    let mut rng = ColoringRng::new(3);
    let graph = Graph::planted(90, 10.0, &mut rng).unwrap();

    for (name, hybrid) in [
        ("plain", None),
        ("greedy", Some(HybridMethod::GreedyStep)),
        ("hill_climb", Some(HybridMethod::hill_climb())),
    ] {
        let mut config = EvolutionConfig {
            hybrid,
            random_seed: Some(4),
            ..Default::default()
        };
        config.population.max_generations = 100_000;

        let mut engine = EvolutionEngine::new(config, &graph).unwrap();
        engine.initialize();

        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| {
                if engine.step().is_terminal() {
                    engine.initialize();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_fitness,
    bench_conflict_analysis,
    bench_generation_step
);
criterion_main!(benches);
