//! Problem instance and fitness model.
//!
//! A [`Graph`] is an immutable symmetric 0/1 adjacency matrix. Construction
//! validates the matrix and caches the undirected edge list and neighbor lists
//! used by [`Graph::fitness`] and the conflict analyzer.

use std::fmt;

use super::rng::RandomSource;

/// A node color. Valid values are `0..NUM_COLORS`.
pub type Color = u8;

/// Number of colors available to a coloring.
pub const NUM_COLORS: Color = 3;

/// Undirected graph over a fixed number of nodes.
#[derive(Debug, Clone)]
pub struct Graph {
    node_count: usize,
    /// Row-major adjacency matrix, `node_count * node_count` entries.
    adjacency: Vec<u8>,
    /// Undirected edges with `i < j`, each listed once.
    edges: Vec<(u32, u32)>,
    /// Neighbors of each node in ascending order.
    neighbors: Vec<Vec<u32>>,
}

impl Graph {
    /// Build a graph from a row-major adjacency matrix.
    pub fn from_adjacency(node_count: usize, adjacency: Vec<u8>) -> Result<Self, GraphError> {
        if adjacency.len() != node_count * node_count {
            return Err(GraphError::NotSquare {
                nodes: node_count,
                len: adjacency.len(),
            });
        }

        for i in 0..node_count {
            for j in 0..node_count {
                let value = adjacency[i * node_count + j];
                if value > 1 {
                    return Err(GraphError::NonBinary { row: i, col: j, value });
                }
                if i == j && value != 0 {
                    return Err(GraphError::SelfLoop(i));
                }
                if j > i && value != adjacency[j * node_count + i] {
                    return Err(GraphError::Asymmetric { row: i, col: j });
                }
            }
        }

        Self::build(node_count, adjacency)
    }

    /// Build a graph from an undirected edge list. Duplicate edges collapse.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut adjacency = vec![0u8; node_count * node_count];
        for &(i, j) in edges {
            if i >= node_count || j >= node_count {
                return Err(GraphError::NodeOutOfRange {
                    node: i.max(j),
                    nodes: node_count,
                });
            }
            if i == j {
                return Err(GraphError::SelfLoop(i));
            }
            adjacency[i * node_count + j] = 1;
            adjacency[j * node_count + i] = 1;
        }

        Self::build(node_count, adjacency)
    }

    /// Generate a random planted 3-partite graph with `floor(node_count * density)` edges.
    ///
    /// The first `3 * (node_count / 3)` nodes are split into three equal parts
    /// and edges only run between different parts, so coloring each node by its
    /// part index is always proper. Remaining nodes are isolated.
    pub fn planted<R: RandomSource>(
        node_count: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Self, GraphError> {
        let k = node_count / 3;
        let capacity = 3 * k * k;
        let target = (node_count as f64 * density) as usize;
        if density.is_nan() || density <= 0.0 || target == 0 || target > capacity {
            return Err(GraphError::EdgeTargetOutOfRange {
                density,
                target,
                capacity,
            });
        }

        // Three k x k bipartite blocks: parts (0,1), (0,2), (1,2).
        let mut cells = vec![0u8; 3 * k * k];
        let mut current = 0usize;
        for cell in cells.iter_mut() {
            if rng.next_u32() % 2 == 1 {
                *cell = 1;
                current += 1;
            }
        }

        while current != target {
            let block = rng.below(3);
            let i = rng.below(k);
            let j = rng.below(k);
            let cell = &mut cells[block * k * k + i * k + j];
            if current > target && *cell == 1 {
                *cell = 0;
                current -= 1;
            } else if current < target && *cell == 0 {
                *cell = 1;
                current += 1;
            }
        }

        let offsets = [(0, k), (0, 2 * k), (k, 2 * k)];
        let mut adjacency = vec![0u8; node_count * node_count];
        for (block, &(row_offset, col_offset)) in offsets.iter().enumerate() {
            for i in 0..k {
                for j in 0..k {
                    if cells[block * k * k + i * k + j] == 1 {
                        let (a, b) = (row_offset + i, col_offset + j);
                        adjacency[a * node_count + b] = 1;
                        adjacency[b * node_count + a] = 1;
                    }
                }
            }
        }

        Self::build(node_count, adjacency)
    }

    fn build(node_count: usize, adjacency: Vec<u8>) -> Result<Self, GraphError> {
        let mut edges = Vec::new();
        let mut neighbors = vec![Vec::new(); node_count];
        for i in 0..node_count {
            for j in 0..node_count {
                if adjacency[i * node_count + j] == 1 {
                    neighbors[i].push(j as u32);
                    if i < j {
                        edges.push((i as u32, j as u32));
                    }
                }
            }
        }

        if edges.is_empty() {
            return Err(GraphError::NoEdges);
        }

        Ok(Self {
            node_count,
            adjacency,
            edges,
            neighbors,
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether nodes `i` and `j` are adjacent.
    #[inline]
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.adjacency[i * self.node_count + j] == 1
    }

    /// Undirected edges, each listed once with the smaller endpoint first.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().map(|&(i, j)| (i as usize, j as usize))
    }

    /// Neighbors of `node` in ascending order.
    #[inline]
    pub fn neighbors(&self, node: usize) -> &[u32] {
        &self.neighbors[node]
    }

    /// One matrix row.
    pub fn row(&self, node: usize) -> &[u8] {
        &self.adjacency[node * self.node_count..(node + 1) * self.node_count]
    }

    /// Number of edges whose endpoints share a color.
    #[inline]
    pub fn conflicting_edges(&self, coloring: &[Color]) -> usize {
        debug_assert_eq!(coloring.len(), self.node_count);
        self.edges
            .iter()
            .filter(|&&(i, j)| coloring[i as usize] == coloring[j as usize])
            .count()
    }

    /// Fitness of a coloring: `1 - conflicting_edges / edge_count`.
    ///
    /// Returns exactly `1.0` for a proper coloring.
    #[inline]
    pub fn fitness(&self, coloring: &[Color]) -> f64 {
        1.0 - self.conflicting_edges(coloring) as f64 / self.edges.len() as f64
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} nodes, {} edges", self.node_count, self.edges.len())
    }
}

/// Graph construction errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Adjacency matrix for {nodes} nodes has {len} entries")]
    NotSquare { nodes: usize, len: usize },
    #[error("Adjacency entry ({row}, {col}) is {value}, expected 0 or 1")]
    NonBinary { row: usize, col: usize, value: u8 },
    #[error("Adjacency matrix is not symmetric at ({row}, {col})")]
    Asymmetric { row: usize, col: usize },
    #[error("Node {0} has a self loop")]
    SelfLoop(usize),
    #[error("Node {node} out of range for a graph of {nodes} nodes")]
    NodeOutOfRange { node: usize, nodes: usize },
    #[error("Graph has no edges; fitness is undefined")]
    NoEdges,
    #[error("Density {density} gives {target} edges, planted graph holds 1..={capacity}")]
    EdgeTargetOutOfRange {
        density: f64,
        target: usize,
        capacity: usize,
    },
}
