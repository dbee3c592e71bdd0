//! Result persistence for coloring runs and density sweeps.
//!
//! All files are plain text so they can be opened in a spreadsheet.
//!
//! # File Formats
//!
//! ```text
//! Graph (<name>.csv):
//!   One adjacency row per line, each cell "{:>4}, ", two blank lines at the end
//!
//! Run history (<name>.csv):
//!   "{generation:>8}, {best_fitness:.8}" per reached generation, 1-based
//!
//! Run summary (<name>.txt):
//!   Start time, success flag, generations, evaluations (scientific),
//!   elapsed time, best coloring, end time; one "Label: \t value" per line
//!
//! Sweep summary (<name>.csv / <name>.json):
//!   "{density:.6}, {successes}, {avg_evaluations:.6e}" per density,
//!   plus the whole summary as pretty JSON
//! ```

mod writer;

pub use writer::{
    ReportError, graph_file_stem, load_graph_csv, result_file_stem, save_graph,
    save_run_result, save_summary, write_graph, write_history, write_run_summary,
    write_summary_csv,
};
