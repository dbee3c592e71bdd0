//! Density sweep driver.
//!
//! Every trial generates a fresh planted graph and runs one search on it.
//! Trials are independent and run in parallel; each owns a random stream
//! seeded from the sweep's master seed before any trial starts, so results do
//! not depend on thread scheduling.

use std::time::Instant;

use log::{info, warn};
use rayon::prelude::*;

use crate::compute::evolution::{EvolutionEngine, EvolutionError};
use crate::compute::graph::{Graph, GraphError};
use crate::compute::rng::{ColoringRng, RandomSource};
use crate::report::{self, ReportError};
use crate::schema::{
    DensitySummary, EvolutionConfigError, ExperimentConfig, ExperimentSummary, RunResult,
};

/// Errors that abort a sweep.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] EvolutionConfigError),
    #[error("Graph generation failed: {0}")]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Evolution(#[from] EvolutionError),
    #[error("Saving results failed: {0}")]
    Report(#[from] ReportError),
}

/// One planned run of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trial {
    /// Position of the density in the sweep.
    pub density_index: usize,
    /// Edges per node.
    pub density: f64,
    /// Run number within the density.
    pub run: usize,
    /// Seed for the trial's graph and search.
    pub seed: u32,
}

/// Plan every trial, drawing seeds density by density, run by run.
pub fn plan_trials<R: RandomSource>(config: &ExperimentConfig, master: &mut R) -> Vec<Trial> {
    let mut trials = Vec::with_capacity(config.densities.len() * config.runs_per_density);
    for (density_index, &density) in config.densities.iter().enumerate() {
        for run in 0..config.runs_per_density {
            trials.push(Trial {
                density_index,
                density,
                run,
                seed: master.next_u32(),
            });
        }
    }
    trials
}

/// Generate a planted graph and return it with the stream that produced it.
///
/// The search should continue on the returned stream so its initial colorings
/// do not replay the draws that placed the edges. Entropy seeds the stream when
/// `seed` is `None`.
pub fn planted_graph(
    node_count: usize,
    density: f64,
    seed: Option<u32>,
) -> Result<(Graph, ColoringRng), GraphError> {
    let mut rng = match seed {
        Some(seed) => ColoringRng::new(seed),
        None => ColoringRng::from_entropy(),
    };
    let graph = Graph::planted(node_count, density, &mut rng)?;
    Ok((graph, rng))
}

/// Generate the trial's graph and search it, saving files if configured.
///
/// The graph and the search share one stream seeded with `trial.seed`;
/// `config.evolution.random_seed` is not used.
pub fn run_trial(config: &ExperimentConfig, trial: &Trial) -> Result<RunResult, ExperimentError> {
    let (graph, rng) = planted_graph(config.node_count, trial.density, Some(trial.seed))?;

    if config.save_graphs
        && let Some(dir) = &config.output_dir
    {
        let stem = report::graph_file_stem(
            config.node_count,
            trial.density_index,
            trial.density,
            trial.run,
        );
        report::save_graph(&graph, dir.join(format!("{stem}.csv")))?;
    }

    let mut engine = EvolutionEngine::with_rng(config.evolution.clone(), &graph, rng)?;
    let result = engine.run();

    info!(
        "d = {:.1} graph {:3} ============> {}",
        trial.density,
        trial.run,
        if result.success { "success" } else { "fail" }
    );

    if config.save_results
        && let Some(dir) = &config.output_dir
    {
        let stem = report::result_file_stem(
            config.node_count,
            trial.density_index,
            trial.density,
            trial.run,
        );
        report::save_run_result(&result, dir.join(stem))?;
    }

    Ok(result)
}

/// Aggregate finished trials per density.
///
/// `results` pairs each trial with its result in any order. The average
/// evaluation count only covers successful runs and is 0 when none succeeded.
pub fn summarize(densities: &[f64], results: &[(Trial, RunResult)]) -> Vec<DensitySummary> {
    densities
        .iter()
        .enumerate()
        .map(|(index, &density)| {
            let mut runs = 0;
            let mut successes = 0;
            let mut evaluations = 0.0;
            for (trial, result) in results.iter().filter(|(t, _)| t.density_index == index) {
                debug_assert_eq!(trial.density, density);
                runs += 1;
                if result.success {
                    successes += 1;
                    evaluations += result.total_evaluations as f64;
                }
            }

            DensitySummary {
                density,
                runs,
                successes,
                success_rate: if runs > 0 {
                    successes as f64 / runs as f64
                } else {
                    0.0
                },
                avg_evaluations: if successes > 0 {
                    evaluations / successes as f64
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Run a whole density sweep.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentSummary, ExperimentError> {
    config.validate()?;
    if config.evolution.random_seed.is_some() {
        warn!("evolution.random_seed is ignored in a sweep; set random_seed on the experiment");
    }

    let start = Instant::now();
    let mut master = match config.random_seed {
        Some(seed) => ColoringRng::new(seed),
        None => ColoringRng::from_entropy(),
    };
    let trials = plan_trials(config, &mut master);

    info!(
        "sweep: {} nodes, {} densities x {} runs",
        config.node_count,
        config.densities.len(),
        config.runs_per_density
    );

    let results = trials
        .par_iter()
        .map(|trial| run_trial(config, trial).map(|result| (*trial, result)))
        .collect::<Result<Vec<_>, _>>()?;

    let densities = summarize(&config.densities, &results);
    for entry in &densities {
        info!(
            "d = {:.6} finished. success: {} times, average evaluation times: {:.6e}",
            entry.density, entry.successes, entry.avg_evaluations
        );
    }

    let summary = ExperimentSummary {
        node_count: config.node_count,
        densities,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    };

    if let Some(dir) = &config.output_dir {
        let base = dir.join(format!("final_result{}", config.node_count));
        let (csv, _) = report::save_summary(&summary, &base)?;
        info!("summary written to {}", csv.display());
    }

    Ok(summary)
}
