//! Writers and readers for the text result formats.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::compute::{Graph, GraphError};
use crate::schema::{ExperimentSummary, RunResult};

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Line {line}: cannot parse adjacency cell {value:?}")]
    Parse { line: usize, value: String },
    #[error("Line {line}: row has {found} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("Invalid graph: {0}")]
    Graph(#[from] GraphError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

fn create(path: &Path) -> Result<BufWriter<File>, ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    File::create(path)
        .map(BufWriter::new)
        .map_err(io_error(path))
}

/// File stem for the graph of one sweep trial, e.g. `graph90_03_d3_007`.
///
/// The density index keeps stems unique even for repeated densities.
pub fn graph_file_stem(
    node_count: usize,
    density_index: usize,
    density: f64,
    run: usize,
) -> String {
    format!("graph{}_{:02}_d{}_{:03}", node_count, density_index, density, run)
}

/// File stem for the result of one sweep trial, e.g. `result90_03_d3_007`.
pub fn result_file_stem(
    node_count: usize,
    density_index: usize,
    density: f64,
    run: usize,
) -> String {
    format!("result{}_{:02}_d{}_{:03}", node_count, density_index, density, run)
}

// ============================================================================
// Graphs
// ============================================================================

/// Write the adjacency matrix of `graph`.
pub fn write_graph<W: Write>(graph: &Graph, out: &mut W) -> io::Result<()> {
    for node in 0..graph.node_count() {
        for &cell in graph.row(node) {
            write!(out, "{:>4}, ", cell)?;
        }
        writeln!(out)?;
    }
    write!(out, "\n\n")
}

/// Save the adjacency matrix of `graph` to `path`.
pub fn save_graph<P: AsRef<Path>>(graph: &Graph, path: P) -> Result<(), ReportError> {
    let path = path.as_ref();
    let mut out = create(path)?;
    write_graph(graph, &mut out)
        .and_then(|_| out.flush())
        .map_err(io_error(path))
}

/// Load a graph written by [`save_graph`].
///
/// Blank lines are skipped and a trailing comma on each row is allowed. The
/// node count is the number of rows.
pub fn load_graph_csv<P: AsRef<Path>>(path: P) -> Result<Graph, ReportError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path).map_err(io_error(path))?);

    let mut adjacency = Vec::new();
    let mut width = None;
    let mut rows = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(io_error(path))?;
        let line_no = index + 1;

        let before = adjacency.len();
        for cell in line.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let value = cell.parse::<u8>().map_err(|_| ReportError::Parse {
                line: line_no,
                value: cell.to_string(),
            })?;
            adjacency.push(value);
        }

        let found = adjacency.len() - before;
        if found == 0 {
            continue;
        }
        match width {
            None => width = Some(found),
            Some(expected) if expected != found => {
                return Err(ReportError::RaggedRow {
                    line: line_no,
                    found,
                    expected,
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    Ok(Graph::from_adjacency(rows, adjacency)?)
}

// ============================================================================
// Runs
// ============================================================================

/// Write one line per reached generation.
pub fn write_history<W: Write>(result: &RunResult, out: &mut W) -> io::Result<()> {
    for (generation, fitness) in result.reached_history().iter().enumerate() {
        writeln!(out, "{:>8}, {:.8}", generation + 1, fitness)?;
    }
    Ok(())
}

/// Write the human readable run summary.
pub fn write_run_summary<W: Write>(result: &RunResult, out: &mut W) -> io::Result<()> {
    writeln!(out, "Start time: \t {}", result.timing.started_at)?;
    writeln!(out, "Found proper coloring: \t {}", u8::from(result.success))?;
    writeln!(out, "Generations: \t {}", result.generations)?;
    writeln!(out, "Evaluations: \t {:.9e}", result.total_evaluations as f64)?;
    writeln!(out, "Elapsed: \t {}", result.timing)?;
    writeln!(out, "Best fitness: \t {:.8}", result.best_fitness)?;
    writeln!(out, "Best solution: \t ")?;
    for color in &result.best_solution {
        write!(out, "{:>3}, ", color)?;
    }
    write!(out, "\n\n")?;
    writeln!(out, "End time: \t {}", result.timing.finished_at)
}

/// Save `<base>.csv` (history) and `<base>.txt` (summary).
///
/// The suffixes are appended, so a base containing dots keeps them.
///
/// Returns the two paths written.
pub fn save_run_result<P: AsRef<Path>>(
    result: &RunResult,
    base: P,
) -> Result<(PathBuf, PathBuf), ReportError> {
    let base = base.as_ref();
    let csv_path = with_suffix(base, "csv");
    let txt_path = with_suffix(base, "txt");

    let mut csv = create(&csv_path)?;
    write_history(result, &mut csv)
        .and_then(|_| csv.flush())
        .map_err(io_error(&csv_path))?;

    let mut txt = create(&txt_path)?;
    write_run_summary(result, &mut txt)
        .and_then(|_| txt.flush())
        .map_err(io_error(&txt_path))?;

    Ok((csv_path, txt_path))
}

// ============================================================================
// Sweeps
// ============================================================================

/// Write one line per density.
pub fn write_summary_csv<W: Write>(summary: &ExperimentSummary, out: &mut W) -> io::Result<()> {
    for entry in &summary.densities {
        writeln!(
            out,
            "{:.6}, {}, {:.6e}",
            entry.density, entry.successes, entry.avg_evaluations
        )?;
    }
    Ok(())
}

/// Save `<base>.csv` and `<base>.json` for a finished sweep.
pub fn save_summary<P: AsRef<Path>>(
    summary: &ExperimentSummary,
    base: P,
) -> Result<(PathBuf, PathBuf), ReportError> {
    let base = base.as_ref();
    let csv_path = with_suffix(base, "csv");
    let json_path = with_suffix(base, "json");

    let mut csv = create(&csv_path)?;
    write_summary_csv(summary, &mut csv)
        .and_then(|_| csv.flush())
        .map_err(io_error(&csv_path))?;

    let json = serde_json::to_string_pretty(summary)?;
    fs::write(&json_path, json).map_err(io_error(&json_path))?;

    Ok((csv_path, json_path))
}
