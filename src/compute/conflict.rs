//! Per-node conflict analysis for a coloring.

use super::graph::{Color, Graph};

/// A node that shares its color with at least one neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConflict {
    /// Node index.
    pub node: usize,
    /// Number of neighbors with the same color.
    pub count: usize,
}

/// Conflict summary of a coloring, recomputed on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    /// Conflicted nodes in ascending node order.
    pub conflicts: Vec<NodeConflict>,
    /// Largest per-node conflict count (0 for a proper coloring).
    pub max_conflict: usize,
    /// First node attaining `max_conflict`, `None` for a proper coloring.
    pub max_conflict_node: Option<usize>,
}

impl ConflictReport {
    /// Analyze `coloring` against `graph`.
    pub fn analyze(graph: &Graph, coloring: &[Color]) -> Self {
        let mut report = Self::default();
        report.refresh(graph, coloring);
        report
    }

    /// Recompute in place, reusing the conflict list allocation.
    pub fn refresh(&mut self, graph: &Graph, coloring: &[Color]) {
        debug_assert_eq!(coloring.len(), graph.node_count());

        self.conflicts.clear();
        self.max_conflict = 0;
        self.max_conflict_node = None;

        for (node, &color) in coloring.iter().enumerate() {
            let count = graph
                .neighbors(node)
                .iter()
                .filter(|&&j| coloring[j as usize] == color)
                .count();

            if count > 0 {
                self.conflicts.push(NodeConflict { node, count });
            }

            if count > self.max_conflict {
                self.max_conflict = count;
                self.max_conflict_node = Some(node);
            }
        }
    }

    /// Number of conflicted nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// True for a proper coloring.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Sum of per-node counts; each conflicting edge contributes twice.
    pub fn total(&self) -> usize {
        self.conflicts.iter().map(|c| c.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ColoringRng;
    use crate::compute::rng::RandomSource;

    fn path4() -> Graph {
        // 0 - 1 - 2 - 3
        Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn test_proper_coloring_has_no_conflicts() {
        let report = ConflictReport::analyze(&path4(), &[0, 1, 0, 1]);
        assert!(report.is_empty());
        assert_eq!(report.max_conflict, 0);
        assert_eq!(report.max_conflict_node, None);
    }

    #[test]
    fn test_counts_and_order() {
        let report = ConflictReport::analyze(&path4(), &[2, 2, 2, 0]);
        assert_eq!(
            report.conflicts,
            vec![
                NodeConflict { node: 0, count: 1 },
                NodeConflict { node: 1, count: 2 },
                NodeConflict { node: 2, count: 1 },
            ]
        );
        assert_eq!(report.max_conflict, 2);
        assert_eq!(report.max_conflict_node, Some(1));
    }

    #[test]
    fn test_first_max_wins_ties() {
        // Two disjoint edges, both conflicting: nodes 0..4 all have count 1.
        let g = Graph::from_edges(4, &[(0, 1), (2, 3)]).unwrap();
        let report = ConflictReport::analyze(&g, &[1, 1, 0, 0]);
        assert_eq!(report.len(), 4);
        assert_eq!(report.max_conflict_node, Some(0));
    }

    #[test]
    fn test_max_node_zero_distinct_from_none() {
        let g = Graph::from_edges(3, &[(0, 1), (0, 2)]).unwrap();
        let report = ConflictReport::analyze(&g, &[1, 1, 1]);
        assert_eq!(report.max_conflict_node, Some(0));
        assert_eq!(report.max_conflict, 2);
    }

    #[test]
    fn test_agrees_with_fitness() {
        let mut rng = ColoringRng::new(9);
        let g = Graph::planted(30, 4.0, &mut rng).unwrap();
        for _ in 0..200 {
            let coloring: Vec<Color> = (0..30).map(|_| rng.below(3) as Color).collect();
            let report = ConflictReport::analyze(&g, &coloring);
            assert_eq!(report.total(), 2 * g.conflicting_edges(&coloring));
            assert_eq!(report.is_empty(), g.fitness(&coloring) == 1.0);
            let fitness = g.fitness(&coloring);
            assert!((0.0..=1.0).contains(&fitness));
        }
    }

    #[test]
    fn test_refresh_reuses_report() {
        let g = path4();
        let mut report = ConflictReport::analyze(&g, &[0, 0, 0, 0]);
        assert_eq!(report.len(), 4);
        report.refresh(&g, &[0, 1, 0, 1]);
        assert!(report.is_empty());
        assert_eq!(report.max_conflict_node, None);
    }
}
