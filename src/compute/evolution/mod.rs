//! Hybrid genetic search for proper 3-colorings.
//!
//! # Overview
//!
//! - **Population** (`population`): individuals, elite selection, fitness scaling
//! - **Operators** (`operators`): roulette/tournament selection, single-point and
//!   uniform-mask crossover, recoloring mutation
//! - **Hybrids** (`hybrid`): greedy recoloring step and bounded hill climbing
//! - **Search** (`search`): the generation loop and run result
//!
//! # Example
//!
//! ```rust,no_run
//! use tricolor::compute::{ColoringRng, Graph};
//! use tricolor::compute::evolution::EvolutionEngine;
//! use tricolor::schema::{EvolutionConfig, HybridMethod};
//!
//! let mut rng = ColoringRng::new(7);
//! let graph = Graph::planted(90, 3.0, &mut rng).unwrap();
//!
//! let config = EvolutionConfig {
//!     hybrid: Some(HybridMethod::hill_climb()),
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config, &graph).unwrap();
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best fitness = {:.5}",
//!         progress.generation, progress.generation_best);
//! });
//!
//! println!("success: {}, evaluations: {}", result.success, result.total_evaluations);
//! ```

mod hybrid;
mod operators;
mod population;
mod search;

pub use hybrid::{HybridOutcome, greedy_step, hill_climb};
pub use operators::{
    Crossover, SelectionPool, alternative_colors, draw_distinct, mutate, other_color,
};
pub use population::{Individual, Population, scale_weights};
pub use search::{EvolutionEngine, EvolutionError};
