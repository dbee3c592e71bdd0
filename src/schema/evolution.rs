//! Result, progress and summary types produced by coloring runs and sweeps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compute::Color;

/// Current phase of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Building and evaluating the random initial population.
    #[default]
    Initializing,
    /// Generations in progress.
    Evolving,
    /// A proper coloring was found.
    Success,
    /// The generation budget ran out.
    Exhausted,
}

impl EvolutionPhase {
    /// Whether the run has stopped.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Exhausted)
    }
}

/// Progress snapshot handed to run callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Generations completed.
    pub generation: usize,
    /// Generation budget.
    pub total_generations: usize,
    /// Best fitness in the current population.
    pub generation_best: f64,
    /// Best fitness seen in any generation.
    pub best_fitness: f64,
    /// Average fitness of the current population.
    pub avg_fitness: f64,
    /// Fitness evaluations counted so far.
    pub evaluations: u64,
    /// Current phase.
    pub phase: EvolutionPhase,
}

/// Final record of one coloring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Whether a proper coloring (fitness exactly 1.0) was reached.
    pub success: bool,
    /// Terminal phase, `Success` or `Exhausted`.
    pub outcome: EvolutionPhase,
    /// Generations run.
    pub generations: usize,
    /// Fitness evaluations: one per child per generation plus hybrid trials.
    pub total_evaluations: u64,
    /// Best coloring found.
    pub best_solution: Vec<Color>,
    /// Fitness of `best_solution`.
    pub best_fitness: f64,
    /// Best fitness per generation, sized to the generation budget.
    /// Entries past `generations` stay at 0.0.
    pub history: Vec<f64>,
    /// Timing of the run.
    pub timing: RunTiming,
}

/// Wall-clock metadata of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct RunTiming {
    /// Start as seconds since the Unix epoch.
    pub started_at: u64,
    /// End as seconds since the Unix epoch.
    pub finished_at: u64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
}

impl RunTiming {
    /// Elapsed time split into whole hours, minutes and seconds.
    pub fn elapsed_hms(&self) -> (u64, u64, u64) {
        let total = self.elapsed_seconds.max(0.0) as u64;
        (total / 3600, (total / 60) % 60, total % 60)
    }
}

impl fmt::Display for RunTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes, seconds) = self.elapsed_hms();
        write!(
            f,
            "{:5} hour(s) {:4} minute(s) {:4} second(s)",
            hours, minutes, seconds
        )
    }
}

impl RunResult {
    /// History entries for the generations actually reached.
    ///
    /// A run that succeeds at initialization still reports its generation-0
    /// entry.
    pub fn reached_history(&self) -> &[f64] {
        let len = self.generations.max(1).min(self.history.len());
        &self.history[..len]
    }
}

/// Aggregate over all runs at one density.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensitySummary {
    /// Edges per node.
    pub density: f64,
    /// Runs performed.
    pub runs: usize,
    /// Runs that reached a proper coloring.
    pub successes: usize,
    /// `successes / runs`.
    pub success_rate: f64,
    /// Mean evaluation count over successful runs, 0 when none succeeded.
    pub avg_evaluations: f64,
}

/// Result of a whole density sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Nodes per graph.
    pub node_count: usize,
    /// One entry per density, in sweep order.
    pub densities: Vec<DensitySummary>,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
}
