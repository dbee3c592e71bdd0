//! Schema module - Configuration and result types for coloring runs.

mod config;
mod evolution;

pub use config::*;
pub use evolution::*;
