//! Local search refinements applied to the elite.
//!
//! Both refinements work on a snapshot and overwrite the caller's individual
//! only when they accepted a change, so the caller never loses fitness.

use crate::compute::conflict::ConflictReport;
use crate::compute::graph::Graph;
use crate::compute::rng::RandomSource;
use crate::schema::HybridMethod;

use super::operators::alternative_colors;
use super::population::Individual;

/// Outcome of one refinement call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HybridOutcome {
    /// Fitness evaluations spent.
    pub evaluations: u64,
    /// Whether the individual was changed.
    pub improved: bool,
}

impl HybridMethod {
    /// Refine `individual` in place.
    pub fn apply<R: RandomSource>(
        &self,
        graph: &Graph,
        individual: &mut Individual,
        rng: &mut R,
    ) -> HybridOutcome {
        match *self {
            HybridMethod::GreedyStep => greedy_step(graph, individual),
            HybridMethod::HillClimb { max_steps } => {
                hill_climb(graph, individual, max_steps, rng)
            }
        }
    }
}

/// Recolor the most conflicted node.
///
/// The two alternative colors are tried in ascending order and the first one
/// whose fitness is at least the original is kept. Equal fitness is accepted,
/// so sideways moves are committed.
pub fn greedy_step(graph: &Graph, individual: &mut Individual) -> HybridOutcome {
    let report = ConflictReport::analyze(graph, &individual.colors);
    let Some(node) = report.max_conflict_node else {
        return HybridOutcome::default();
    };

    let mut trial = individual.clone();
    let mut evaluations = 0;
    for color in alternative_colors(individual.colors[node]) {
        trial.colors[node] = color;
        trial.evaluate(graph);
        evaluations += 1;

        if trial.fitness >= individual.fitness {
            *individual = trial;
            return HybridOutcome {
                evaluations,
                improved: true,
            };
        }
    }

    HybridOutcome {
        evaluations,
        improved: false,
    }
}

/// Bounded hill climbing over conflicted nodes.
///
/// Each step picks a conflicted node uniformly and tries the two colors that
/// differ from its color at the start of the step. A trial is committed as
/// soon as it is strictly fitter than the working copy, so the second trial is
/// measured against the updated baseline. A trial reaching fitness 1.0 ends
/// the climb.
pub fn hill_climb<R: RandomSource>(
    graph: &Graph,
    individual: &mut Individual,
    max_steps: usize,
    rng: &mut R,
) -> HybridOutcome {
    let mut working = individual.clone();
    let mut report = ConflictReport::default();
    let mut evaluations = 0;

    'steps: for _ in 0..max_steps {
        report.refresh(graph, &working.colors);
        if report.is_empty() {
            break;
        }

        let node = report.conflicts[rng.below(report.len())].node;
        let start_color = working.colors[node];

        for color in alternative_colors(start_color) {
            let committed = working.colors[node];
            working.colors[node] = color;
            let fitness = graph.fitness(&working.colors);
            evaluations += 1;

            if fitness > working.fitness {
                working.fitness = fitness;
            } else {
                working.colors[node] = committed;
            }

            if fitness == 1.0 {
                break 'steps;
            }
        }
    }

    let improved = working.fitness > individual.fitness;
    if improved {
        *individual = working;
    }

    HybridOutcome {
        evaluations,
        improved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ColoringRng;
    use crate::compute::graph::Color;

    fn path3() -> Graph {
        // 0 - 1 - 2
        Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap()
    }

    #[test]
    fn test_greedy_fixes_center() {
        let g = path3();
        let mut individual = Individual::from_colors(&g, vec![0, 0, 0]);
        let outcome = greedy_step(&g, &mut individual);

        // Node 1 has the most conflicts; color 1 already fixes it.
        assert_eq!(outcome.evaluations, 1);
        assert!(outcome.improved);
        assert_eq!(individual.colors, vec![0, 1, 0]);
        assert!(individual.is_proper());
    }

    #[test]
    fn test_greedy_proper_coloring_untouched() {
        let g = path3();
        let mut individual = Individual::from_colors(&g, vec![0, 1, 0]);
        let outcome = greedy_step(&g, &mut individual);
        assert_eq!(outcome, HybridOutcome::default());
        assert_eq!(individual.colors, vec![0, 1, 0]);
    }

    #[test]
    fn test_greedy_accepts_ties() {
        // Path 1 - 0 - 2 colored [0, 0, 1]: recoloring node 0 to 1 moves the
        // conflict from edge 0-1 to edge 0-2 and is still accepted.
        let g = Graph::from_edges(3, &[(0, 1), (0, 2)]).unwrap();
        let mut individual = Individual::from_colors(&g, vec![0, 0, 1]);
        let before = individual.fitness;
        let outcome = greedy_step(&g, &mut individual);

        assert_eq!(outcome.evaluations, 1);
        assert!(outcome.improved);
        assert_eq!(individual.colors, vec![1, 0, 1]);
        assert_eq!(individual.fitness, before);
    }

    #[test]
    fn test_greedy_rejects_worse() {
        // Star centered at 0 whose leaves cover colors 1 and 2, plus a leaf
        // of color 0: any recolor of node 0 loses.
        let g = Graph::from_edges(
            6,
            &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)],
        )
        .unwrap();
        let mut individual = Individual::from_colors(&g, vec![0, 0, 1, 1, 2, 2]);
        let before = individual.clone();
        let outcome = greedy_step(&g, &mut individual);

        assert_eq!(outcome.evaluations, 2);
        assert!(!outcome.improved);
        assert_eq!(individual, before);
    }

    #[test]
    fn test_greedy_never_decreases_fitness() {
        let mut rng = ColoringRng::new(21);
        let g = Graph::planted(30, 5.0, &mut rng).unwrap();
        for _ in 0..300 {
            let mut individual = Individual::random(&g, &mut rng);
            let before = individual.fitness;
            let outcome = greedy_step(&g, &mut individual);
            assert!(individual.fitness >= before);
            assert!(outcome.evaluations <= 2);
            assert_eq!(individual.fitness, g.fitness(&individual.colors));
        }
    }

    #[test]
    fn test_hill_climb_proper_coloring_costs_nothing() {
        let g = path3();
        let mut individual = Individual::from_colors(&g, vec![2, 0, 2]);
        let mut rng = ColoringRng::new(1);
        let outcome = hill_climb(&g, &mut individual, 45, &mut rng);
        assert_eq!(outcome.evaluations, 0);
        assert!(!outcome.improved);
    }

    #[test]
    fn test_hill_climb_stops_on_perfect() {
        // Single edge 0-1, both color 0. Whichever node is picked, trial color 1
        // fixes the edge and the climb stops before trying color 2.
        let g = Graph::from_edges(2, &[(0, 1)]).unwrap();
        let mut individual = Individual::from_colors(&g, vec![0, 0]);
        let mut rng = ColoringRng::new(2);
        let outcome = hill_climb(&g, &mut individual, 10, &mut rng);

        assert_eq!(outcome.evaluations, 1);
        assert!(outcome.improved);
        assert!(individual.is_proper());
        assert!(individual.colors.contains(&1));
    }

    /// Always draws zero, so the lowest conflicted node is picked.
    struct FirstPick;

    impl RandomSource for FirstPick {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_f64(&mut self) -> f64 {
            0.0
        }
    }

    /// Star centered at node 0 with leaves 1..=6 colored `leaves`, center 0.
    fn star(leaves: [Color; 6]) -> (Graph, Individual) {
        let edges: Vec<(usize, usize)> = (1..=6).map(|leaf| (0, leaf)).collect();
        let g = Graph::from_edges(7, &edges).unwrap();
        let mut colors = vec![0];
        colors.extend(leaves);
        let individual = Individual::from_colors(&g, colors);
        (g, individual)
    }

    #[test]
    fn test_hill_climb_second_trial_builds_on_first() {
        // Center conflicts: color 0 -> 3, color 1 -> 2, color 2 -> 1.
        let (g, mut individual) = star([0, 0, 0, 1, 1, 2]);
        let outcome = hill_climb(&g, &mut individual, 1, &mut FirstPick);

        assert_eq!(outcome.evaluations, 2);
        assert!(outcome.improved);
        assert_eq!(individual.colors[0], 2);
        assert_eq!(g.conflicting_edges(&individual.colors), 1);
        assert_eq!(individual.fitness, g.fitness(&individual.colors));
    }

    #[test]
    fn test_hill_climb_worse_second_trial_keeps_first() {
        // Center conflicts: color 0 -> 3, color 1 -> 1, color 2 -> 2. Color 2
        // beats the start color but not the committed color 1.
        let (g, mut individual) = star([0, 0, 0, 1, 2, 2]);
        let outcome = hill_climb(&g, &mut individual, 1, &mut FirstPick);

        assert_eq!(outcome.evaluations, 2);
        assert!(outcome.improved);
        assert_eq!(individual.colors[0], 1);
        assert_eq!(g.conflicting_edges(&individual.colors), 1);
        assert_eq!(individual.fitness, g.fitness(&individual.colors));
    }

    #[test]
    fn test_hill_climb_never_regresses() {
        let mut rng = ColoringRng::new(33);
        let g = Graph::planted(30, 4.0, &mut rng).unwrap();
        for _ in 0..100 {
            let mut individual = Individual::random(&g, &mut rng);
            let before = individual.fitness;
            let outcome = hill_climb(&g, &mut individual, 45, &mut rng);
            assert!(individual.fitness >= before);
            assert!(outcome.evaluations <= 90);
            assert_eq!(individual.fitness, g.fitness(&individual.colors));
        }
    }

    #[test]
    fn test_hill_climb_budget_bounds_evaluations() {
        let g = Graph::from_edges(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]).unwrap();
        let mut individual = Individual::from_colors(&g, vec![0, 0, 0, 0]);
        let mut rng = ColoringRng::new(4);
        let outcome = hill_climb(&g, &mut individual, 5, &mut rng);
        // K4 cannot be 3-colored, so the climb runs its whole budget.
        assert_eq!(outcome.evaluations, 10);
        assert!(individual.fitness < 1.0);
    }

    #[test]
    fn test_hill_climb_more_steps_solves_more() {
        // Statistical over seeded trials on 3-colorable planted graphs. A longer
        // budget replays the same draws first, so it can only solve more.
        let trials = 40;
        let solve = |steps: usize| {
            (0..trials)
                .filter(|&seed| {
                    let mut rng = ColoringRng::new(seed);
                    let g = Graph::planted(15, 1.5, &mut rng).unwrap();
                    let mut individual = Individual::random(&g, &mut rng);
                    hill_climb(&g, &mut individual, steps, &mut rng);
                    individual.is_proper()
                })
                .count()
        };

        let short = solve(2);
        let long = solve(2000);
        assert!(long >= short, "short {short}, long {long}");
        assert!(long > 0);
    }

    #[test]
    fn test_apply_dispatch() {
        let g = path3();
        let mut rng = ColoringRng::new(5);
        let mut individual = Individual::from_colors(&g, vec![1, 1, 1]);
        let outcome = HybridMethod::GreedyStep.apply(&g, &mut individual, &mut rng);
        assert!(outcome.evaluations >= 1);

        let mut individual = Individual::from_colors(&g, vec![1, 1, 1]);
        let outcome = HybridMethod::hill_climb().apply(&g, &mut individual, &mut rng);
        assert!(outcome.improved);
        let colors: &[Color] = &individual.colors;
        assert_eq!(g.fitness(colors), individual.fitness);
    }
}
