//! Tricolor - Hybrid genetic search for graph 3-coloring.
//!
//! This crate searches for proper 3-colorings of undirected graphs with a
//! generational genetic algorithm, optionally refining the best individual of
//! each generation with a local search.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration, progress and result types
//! - `compute`: Graphs, fitness, conflict analysis, the search and sweeps
//! - `report`: Text persistence of graphs, run results and sweep summaries
//!
//! # Example
//!
//! ```rust,no_run
//! use tricolor::{
//!     compute::{ColoringRng, Graph, evolution::EvolutionEngine},
//!     schema::{EvolutionConfig, HybridMethod},
//! };
//!
//! // Planted graph: 90 nodes, 3 edges per node
//! let mut rng = ColoringRng::new(1);
//! let graph = Graph::planted(90, 3.0, &mut rng).unwrap();
//!
//! // Default search with bounded hill climbing on the elite
//! let config = EvolutionConfig {
//!     hybrid: Some(HybridMethod::hill_climb()),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config, &graph).unwrap();
//! let result = engine.run();
//!
//! println!("success: {} after {} evaluations", result.success, result.total_evaluations);
//! ```

pub mod compute;
pub mod report;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::EvolutionEngine;
pub use compute::{ColoringRng, Graph, run_experiment};
pub use schema::{EvolutionConfig, ExperimentConfig, RunResult};
