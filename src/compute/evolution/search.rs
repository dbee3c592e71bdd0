//! Run controller: the generation loop of the hybrid genetic search.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{debug, info};

use crate::compute::graph::Graph;
use crate::compute::rng::{ColoringRng, RandomSource};
use crate::schema::{
    CrossoverMethod, EvolutionConfig, EvolutionConfigError, EvolutionPhase, EvolutionProgress,
    RunResult, RunTiming,
};

use super::operators::{Crossover, SelectionPool, mutate};
use super::population::{Individual, Population};

/// Errors that prevent a run from starting.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] EvolutionConfigError),
    #[error("Single-point crossover needs at least 3 nodes, graph has {0}")]
    GraphTooSmall(usize),
}

/// Evolution engine for one graph.
///
/// Owns the two population buffers; each generation is bred from `current`
/// into `next` and the buffers are swapped.
pub struct EvolutionEngine<'g, R: RandomSource = ColoringRng> {
    config: EvolutionConfig,
    graph: &'g Graph,
    rng: R,
    current: Population,
    next: Population,
    pool: SelectionPool,
    crossover: Crossover,
    elite: usize,
    best: Individual,
    history: Vec<f64>,
    generation: usize,
    evaluations: u64,
    phase: EvolutionPhase,
}

impl<'g> EvolutionEngine<'g, ColoringRng> {
    /// Create an engine seeded from `config.random_seed`, or from entropy.
    pub fn new(config: EvolutionConfig, graph: &'g Graph) -> Result<Self, EvolutionError> {
        let rng = match config.random_seed {
            Some(seed) => ColoringRng::new(seed),
            None => ColoringRng::from_entropy(),
        };
        Self::with_rng(config, graph, rng)
    }
}

impl<'g, R: RandomSource> EvolutionEngine<'g, R> {
    /// Create an engine drawing from `rng`.
    pub fn with_rng(config: EvolutionConfig, graph: &'g Graph, rng: R) -> Result<Self, EvolutionError> {
        config.validate()?;

        let node_count = graph.node_count();
        if config.operators.crossover == CrossoverMethod::SinglePoint && node_count < 3 {
            return Err(EvolutionError::GraphTooSmall(node_count));
        }

        let size = config.population.size;
        let blank = Individual {
            colors: vec![0; node_count],
            fitness: 0.0,
        };

        Ok(Self {
            crossover: Crossover::new(config.operators.crossover, node_count),
            history: vec![0.0; config.population.max_generations],
            current: Population::from_individuals(vec![blank.clone(); size]),
            next: Population::from_individuals(vec![blank.clone(); size]),
            pool: SelectionPool::default(),
            elite: 0,
            best: blank,
            generation: 0,
            evaluations: 0,
            phase: EvolutionPhase::Initializing,
            config,
            graph,
            rng,
        })
    }

    /// Current population.
    pub fn population(&self) -> &Population {
        &self.current
    }

    /// Current phase.
    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Fitness evaluations counted so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Build and evaluate a random population and record its best.
    ///
    /// Initial evaluations are not counted.
    pub fn initialize(&mut self) {
        self.current = Population::random(self.config.population.size, self.graph, &mut self.rng);
        self.generation = 0;
        self.evaluations = 0;
        self.history.fill(0.0);

        self.elite = self.current.elite_index();
        self.best = self.current.get(self.elite).clone();
        self.history[0] = self.best.fitness;
        self.phase = EvolutionPhase::Evolving;

        debug!(
            "initial population: best {:.5}, mean {:.5}",
            self.best.fitness,
            self.current.avg_fitness()
        );
    }

    /// Advance the state machine by one step.
    ///
    /// Returns the phase after the step; terminal phases are sticky.
    pub fn step(&mut self) -> EvolutionPhase {
        if self.phase != EvolutionPhase::Evolving {
            return self.phase;
        }

        if self.current.get(self.elite).is_proper() {
            self.phase = EvolutionPhase::Success;
            return self.phase;
        }
        if self.generation >= self.config.population.max_generations {
            self.phase = EvolutionPhase::Exhausted;
            return self.phase;
        }

        self.breed();
        self.evaluations += self.next.evaluate_all(self.graph);
        self.check_fitness_range();
        std::mem::swap(&mut self.current, &mut self.next);

        self.elite = self.current.elite_index();
        if let Some(hybrid) = self.config.hybrid {
            let elite = self.current.get_mut(self.elite);
            if !elite.is_proper() {
                let outcome = hybrid.apply(self.graph, elite, &mut self.rng);
                self.evaluations += outcome.evaluations;
            }
        }

        let elite = self.current.get(self.elite);
        self.history[self.generation] = elite.fitness;
        if elite.fitness > self.best.fitness {
            self.best.copy_from(elite);
        }

        debug!(
            "generation {:5}: best {:.5}, evaluations {}",
            self.generation + 1,
            elite.fitness,
            self.evaluations
        );

        self.generation += 1;
        self.phase
    }

    /// Fill `next` from `current` by selection, crossover, mutation and elitism.
    fn breed(&mut self) {
        let ops = &self.config.operators;

        self.pool.refill(&self.current, ops.scaling);
        self.crossover.begin_generation(&mut self.rng);

        for pair in 0..self.current.len() / 2 {
            let (a, b) = ops.selection.select_pair(&mut self.pool, &mut self.rng);
            let (child1, child2) = self.next.pair_mut(2 * pair);
            self.crossover.apply(
                &self.current.get(a).colors,
                &self.current.get(b).colors,
                &mut child1.colors,
                &mut child2.colors,
                &mut self.rng,
            );
        }

        for child in self.next.individuals_mut() {
            mutate(&mut child.colors, ops.mutation_rate, &mut self.rng);
        }

        if ops.elitism {
            self.next
                .get_mut(self.elite)
                .copy_from(self.current.get(self.elite));
        }
    }

    fn check_fitness_range(&self) {
        for (i, child) in self.next.individuals().iter().enumerate() {
            assert!(
                (0.0..=1.0).contains(&child.fitness),
                "generation {}: individual {} has fitness {} outside [0, 1]",
                self.generation + 1,
                i,
                child.fitness
            );
        }
    }

    /// Current progress.
    pub fn progress(&self) -> EvolutionProgress {
        EvolutionProgress {
            generation: self.generation,
            total_generations: self.config.population.max_generations,
            generation_best: self.current.get(self.elite).fitness,
            best_fitness: self.best.fitness,
            avg_fitness: self.current.avg_fitness(),
            evaluations: self.evaluations,
            phase: self.phase,
        }
    }

    /// Run evolution with progress callback.
    pub fn run_with_callback<F>(&mut self, callback: F) -> RunResult
    where
        F: Fn(&EvolutionProgress),
    {
        let start_time = Instant::now();
        let started_at = unix_seconds();

        info!(
            "starting run on {}: population {}, budget {} generations",
            self.graph, self.config.population.size, self.config.population.max_generations
        );

        self.initialize();
        callback(&self.progress());

        let outcome = loop {
            let before = self.generation;
            let phase = self.step();
            if phase.is_terminal() {
                break phase;
            }
            if self.generation != before {
                callback(&self.progress());
            }
        };
        callback(&self.progress());

        let timing = RunTiming {
            started_at,
            finished_at: unix_seconds(),
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        };

        info!(
            "run {:?} after {} generations: best {:.5}, {} evaluations ({})",
            outcome, self.generation, self.best.fitness, self.evaluations, timing
        );

        RunResult {
            success: outcome == EvolutionPhase::Success,
            outcome,
            generations: self.generation,
            total_evaluations: self.evaluations,
            best_solution: self.best.colors.clone(),
            best_fitness: self.best.fitness,
            history: self.history.clone(),
            timing,
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> RunResult {
        self.run_with_callback(|_| {})
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
