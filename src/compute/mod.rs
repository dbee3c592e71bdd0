//! Compute module - Graphs, fitness and the hybrid genetic search.

mod conflict;
mod experiment;
mod graph;
mod rng;

pub mod evolution;

pub use conflict::*;
pub use experiment::*;
pub use graph::*;
pub use rng::*;
