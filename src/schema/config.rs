//! Configuration types for coloring runs and density sweeps.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for one evolutionary coloring run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionConfig {
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Genetic operator settings.
    #[serde(default)]
    pub operators: GeneticAlgorithmConfig,
    /// Local search applied to the elite after each generation.
    #[serde(default)]
    pub hybrid: Option<HybridMethod>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u32>,
}

/// Population and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of individuals in population. Must be even.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Maximum number of generations.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            max_generations: default_max_generations(),
        }
    }
}

fn default_population_size() -> usize {
    200
}
fn default_max_generations() -> usize {
    10_000
}

/// Genetic Algorithm configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticAlgorithmConfig {
    /// Selection method.
    #[serde(default)]
    pub selection: SelectionMethod,
    /// Crossover method.
    #[serde(default)]
    pub crossover: CrossoverMethod,
    /// Mutation probability per gene (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Copy the previous elite into the next generation.
    #[serde(default = "default_true")]
    pub elitism: bool,
    /// Min-max rescale selection weights each generation.
    #[serde(default = "default_true")]
    pub scaling: bool,
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            selection: SelectionMethod::default(),
            crossover: CrossoverMethod::default(),
            mutation_rate: default_mutation_rate(),
            elitism: true,
            scaling: true,
        }
    }
}

fn default_mutation_rate() -> f64 {
    0.014
}
fn default_true() -> bool {
    true
}

/// Selection method for genetic algorithm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method")]
pub enum SelectionMethod {
    /// Roulette wheel (fitness-proportionate) selection.
    Roulette,
    /// Tournament among distinct random candidates.
    Tournament {
        #[serde(default = "default_tournament_size")]
        candidates: usize,
    },
}

impl Default for SelectionMethod {
    fn default() -> Self {
        Self::Tournament {
            candidates: default_tournament_size(),
        }
    }
}

fn default_tournament_size() -> usize {
    2
}

/// Crossover method for genetic algorithm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CrossoverMethod {
    /// One cut point strictly inside the chromosome.
    SinglePoint,
    /// One random binary mask per generation, shared by every mating pair.
    #[default]
    UniformMask,
}

/// Local search refinement of the elite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method")]
pub enum HybridMethod {
    /// Recolor the most conflicted node once if it does not lose fitness.
    GreedyStep,
    /// Bounded hill climbing over randomly chosen conflicted nodes.
    HillClimb {
        #[serde(default = "default_hill_climb_steps")]
        max_steps: usize,
    },
}

fn default_hill_climb_steps() -> usize {
    45
}

impl HybridMethod {
    /// Hill climbing with the default step budget.
    pub fn hill_climb() -> Self {
        Self::HillClimb {
            max_steps: default_hill_climb_steps(),
        }
    }
}

/// Density sweep: repeated runs on fresh planted graphs per density.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Nodes per generated graph.
    #[serde(default = "default_node_count")]
    pub node_count: usize,
    /// Edge densities (edges per node) to sweep.
    #[serde(default = "default_densities")]
    pub densities: Vec<f64>,
    /// Independent graphs and runs per density.
    #[serde(default = "default_runs_per_density")]
    pub runs_per_density: usize,
    /// Search settings shared by every run.
    #[serde(default)]
    pub evolution: EvolutionConfig,
    /// Directory for result files. Nothing is written when unset.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Write each generated graph as CSV.
    #[serde(default)]
    pub save_graphs: bool,
    /// Write per-run history CSV and summary text.
    #[serde(default = "default_true")]
    pub save_results: bool,
    /// Master seed; per-run seeds are drawn from it.
    #[serde(default)]
    pub random_seed: Option<u32>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            node_count: default_node_count(),
            densities: default_densities(),
            runs_per_density: default_runs_per_density(),
            evolution: EvolutionConfig::default(),
            output_dir: None,
            save_graphs: false,
            save_results: true,
            random_seed: None,
        }
    }
}

fn default_node_count() -> usize {
    90
}
fn default_densities() -> Vec<f64> {
    vec![1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]
}
fn default_runs_per_density() -> usize {
    30
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 2")]
    PopulationTooSmall,
    #[error("Population size {0} must be even")]
    OddPopulation(usize),
    #[error("Generation budget must be positive")]
    NoGenerations,
    #[error("Mutation rate {0} outside [0, 1]")]
    InvalidMutationRate(f64),
    #[error("Tournament of {candidates} candidates needs 2 <= candidates < population ({population})")]
    InvalidTournament { candidates: usize, population: usize },
    #[error("Hill climbing step budget must be positive")]
    NoHillClimbSteps,
    #[error("Experiment needs at least one density and one run per density")]
    EmptyExperiment,
    #[error("Invalid density: {0}")]
    InvalidDensity(f64),
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        let size = self.population.size;
        if size < 2 {
            return Err(EvolutionConfigError::PopulationTooSmall);
        }
        if size % 2 != 0 {
            return Err(EvolutionConfigError::OddPopulation(size));
        }
        if self.population.max_generations == 0 {
            return Err(EvolutionConfigError::NoGenerations);
        }

        let rate = self.operators.mutation_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(EvolutionConfigError::InvalidMutationRate(rate));
        }

        if let SelectionMethod::Tournament { candidates } = self.operators.selection
            && (candidates < 2 || candidates >= size)
        {
            return Err(EvolutionConfigError::InvalidTournament {
                candidates,
                population: size,
            });
        }

        if let Some(HybridMethod::HillClimb { max_steps: 0 }) = self.hybrid {
            return Err(EvolutionConfigError::NoHillClimbSteps);
        }

        Ok(())
    }
}

impl ExperimentConfig {
    /// Validate the sweep and its evolution settings.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.evolution.validate()?;

        if self.densities.is_empty() || self.runs_per_density == 0 {
            return Err(EvolutionConfigError::EmptyExperiment);
        }
        if let Some(&d) = self.densities.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
            return Err(EvolutionConfigError::InvalidDensity(d));
        }

        Ok(())
    }
}
