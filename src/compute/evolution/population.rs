//! Individuals and fixed-size populations of colorings.

use crate::compute::graph::{Color, Graph, NUM_COLORS};
use crate::compute::rng::RandomSource;

/// A candidate coloring with its cached fitness.
///
/// `fitness` always equals `graph.fitness(&colors)` for the run's graph once
/// [`Individual::evaluate`] has been called after the last change to `colors`.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    /// Color of each node.
    pub colors: Vec<Color>,
    /// Fitness score.
    pub fitness: f64,
}

impl Individual {
    /// Uniformly random coloring, evaluated.
    pub fn random<R: RandomSource>(graph: &Graph, rng: &mut R) -> Self {
        let colors = (0..graph.node_count())
            .map(|_| rng.below(NUM_COLORS as usize) as Color)
            .collect();
        Self::from_colors(graph, colors)
    }

    /// Wrap an existing coloring, evaluated.
    pub fn from_colors(graph: &Graph, colors: Vec<Color>) -> Self {
        let fitness = graph.fitness(&colors);
        Self { colors, fitness }
    }

    /// Recompute the cached fitness.
    #[inline]
    pub fn evaluate(&mut self, graph: &Graph) {
        self.fitness = graph.fitness(&self.colors);
    }

    /// Overwrite with `other`, reusing this individual's gene storage.
    #[inline]
    pub fn copy_from(&mut self, other: &Individual) {
        self.colors.copy_from_slice(&other.colors);
        self.fitness = other.fitness;
    }

    /// Whether the coloring has no conflicting edge.
    #[inline]
    pub fn is_proper(&self) -> bool {
        self.fitness == 1.0
    }
}

/// Fixed-size ordered population.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Random, evaluated population of `size` individuals.
    pub fn random<R: RandomSource>(size: usize, graph: &Graph, rng: &mut R) -> Self {
        Self {
            individuals: (0..size).map(|_| Individual::random(graph, rng)).collect(),
        }
    }

    /// Population from existing individuals.
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Number of individuals.
    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// True when empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// All individuals in order.
    #[inline]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Mutable access to all individuals.
    #[inline]
    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    /// Individual at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> &Individual {
        &self.individuals[index]
    }

    /// Mutable individual at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut Individual {
        &mut self.individuals[index]
    }

    /// The two adjacent individuals at `index` and `index + 1`.
    pub fn pair_mut(&mut self, index: usize) -> (&mut Individual, &mut Individual) {
        let (head, tail) = self.individuals.split_at_mut(index + 1);
        (&mut head[index], &mut tail[0])
    }

    /// Index of the individual with strictly greatest fitness; first on ties.
    pub fn elite_index(&self) -> usize {
        let mut best_index = 0;
        let mut best_fitness = f64::NEG_INFINITY;
        for (i, individual) in self.individuals.iter().enumerate() {
            if individual.fitness > best_fitness {
                best_fitness = individual.fitness;
                best_index = i;
            }
        }
        best_index
    }

    /// Sum of fitness values.
    pub fn total_fitness(&self) -> f64 {
        self.individuals.iter().map(|c| c.fitness).sum()
    }

    /// Mean fitness, 0 for an empty population.
    pub fn avg_fitness(&self) -> f64 {
        if self.individuals.is_empty() {
            0.0
        } else {
            self.total_fitness() / self.individuals.len() as f64
        }
    }

    /// Re-evaluate every individual, returning the number of evaluations.
    pub fn evaluate_all(&mut self, graph: &Graph) -> u64 {
        for individual in &mut self.individuals {
            individual.evaluate(graph);
        }
        self.individuals.len() as u64
    }
}

/// Linear min-max rescale to `[0, 1]`; untouched when all values are equal.
pub fn scale_weights(weights: &mut [f64]) {
    let (min, max) = weights
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| {
            (lo.min(w), hi.max(w))
        });

    if min != max {
        let range = max - min;
        for w in weights.iter_mut() {
            *w = (*w - min) / range;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ColoringRng;

    fn graph() -> Graph {
        Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap()
    }

    fn with_fitness(values: &[f64]) -> Population {
        Population::from_individuals(
            values
                .iter()
                .map(|&fitness| Individual {
                    colors: vec![0; 4],
                    fitness,
                })
                .collect(),
        )
    }

    #[test]
    fn test_random_population() {
        let g = graph();
        let mut rng = ColoringRng::new(42);
        let population = Population::random(10, &g, &mut rng);

        assert_eq!(population.len(), 10);
        for individual in population.individuals() {
            assert_eq!(individual.colors.len(), 4);
            assert!(individual.colors.iter().all(|&c| c < NUM_COLORS));
            assert_eq!(individual.fitness, g.fitness(&individual.colors));
        }
    }

    #[test]
    fn test_elite_first_on_ties() {
        let population = with_fitness(&[0.2, 0.7, 0.4, 0.7]);
        assert_eq!(population.elite_index(), 1);
        let population = with_fitness(&[0.0, 0.0]);
        assert_eq!(population.elite_index(), 0);
    }

    #[test]
    fn test_totals() {
        let population = with_fitness(&[0.25, 0.75]);
        assert_eq!(population.total_fitness(), 1.0);
        assert_eq!(population.avg_fitness(), 0.5);
    }

    #[test]
    fn test_scale_weights() {
        let mut weights = vec![0.8, 0.9, 1.0];
        scale_weights(&mut weights);
        assert!((weights[0] - 0.0).abs() < 1e-12);
        assert!((weights[1] - 0.5).abs() < 1e-9);
        assert!((weights[2] - 1.0).abs() < 1e-12);

        let mut flat = vec![0.6, 0.6];
        scale_weights(&mut flat);
        assert_eq!(flat, vec![0.6, 0.6]);
    }

    #[test]
    fn test_pair_mut_and_copy() {
        let g = graph();
        let mut population = with_fitness(&[0.1, 0.2, 0.3, 0.4]);
        let source = Individual::from_colors(&g, vec![0, 1, 0, 1]);
        {
            let (a, b) = population.pair_mut(2);
            a.copy_from(&source);
            b.colors[0] = 2;
        }
        assert_eq!(population.get(2), &source);
        assert_eq!(population.get(3).colors[0], 2);
        assert!(population.get(2).is_proper());
    }

    #[test]
    fn test_evaluate_all_counts() {
        let g = graph();
        let mut population = with_fitness(&[0.9, 0.9, 0.9]);
        assert_eq!(population.evaluate_all(&g), 3);
        assert!(population.individuals().iter().all(|c| c.fitness == 0.0));
    }
}
