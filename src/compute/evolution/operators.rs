//! Selection, crossover and mutation operators.
//!
//! Strategies are chosen once per run from [`SelectionMethod`] and
//! [`CrossoverMethod`]; the methods here dispatch on the variant.

use crate::compute::graph::{Color, NUM_COLORS};
use crate::compute::rng::RandomSource;
use crate::schema::{CrossoverMethod, SelectionMethod};

use super::population::{Population, scale_weights};

/// Per-generation selection weights.
///
/// Weights are the population's fitness values, optionally min-max scaled.
/// Cached fitness on the individuals is never modified.
#[derive(Debug, Clone, Default)]
pub struct SelectionPool {
    weights: Vec<f64>,
    total: f64,
    positive: usize,
    last_positive: usize,
    /// Tournament draws, reused across selections.
    scratch: Vec<usize>,
}

impl SelectionPool {
    /// Weights taken from `population`.
    pub fn new(population: &Population, scaling: bool) -> Self {
        let mut pool = Self::default();
        pool.refill(population, scaling);
        pool
    }

    /// Pool over explicit weights.
    pub fn from_weights(weights: Vec<f64>) -> Self {
        let mut pool = Self {
            weights,
            ..Default::default()
        };
        pool.update_totals();
        pool
    }

    /// Reload weights from `population`, reusing storage.
    pub fn refill(&mut self, population: &Population, scaling: bool) {
        self.weights.clear();
        self.weights
            .extend(population.individuals().iter().map(|c| c.fitness));
        if scaling {
            scale_weights(&mut self.weights);
        }
        self.update_totals();
    }

    fn update_totals(&mut self) {
        self.total = self.weights.iter().sum();
        self.positive = 0;
        self.last_positive = 0;
        for (i, &w) in self.weights.iter().enumerate() {
            if w > 0.0 {
                self.positive += 1;
                self.last_positive = i;
            }
        }
    }

    /// Number of selectable individuals.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Selection weight of `index`.
    #[inline]
    pub fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    /// Sum of all weights.
    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }
}

impl SelectionMethod {
    /// Select one parent index.
    pub fn select<R: RandomSource>(&self, pool: &mut SelectionPool, rng: &mut R) -> usize {
        match *self {
            SelectionMethod::Roulette => roulette(pool, rng),
            SelectionMethod::Tournament { candidates } => tournament(pool, candidates, rng),
        }
    }

    /// Select two distinct parent indices, redrawing both until they differ.
    pub fn select_pair<R: RandomSource>(
        &self,
        pool: &mut SelectionPool,
        rng: &mut R,
    ) -> (usize, usize) {
        debug_assert!(pool.len() >= 2);
        loop {
            let first = self.select(pool, rng);
            let second = self.select(pool, rng);
            if first != second {
                return (first, second);
            }
        }
    }
}

/// Fitness-proportionate selection.
///
/// With fewer than two positive weights the wheel could never yield two
/// distinct parents, so the draw is uniform instead.
fn roulette<R: RandomSource>(pool: &SelectionPool, rng: &mut R) -> usize {
    if pool.positive < 2 {
        return rng.below(pool.len());
    }

    let target = rng.next_f64() * pool.total;
    let mut cumulative = 0.0;
    for (i, &w) in pool.weights.iter().enumerate() {
        cumulative += w;
        if cumulative >= target {
            return i;
        }
    }
    // Rounding left the sum just short of the target.
    pool.last_positive
}

/// Tournament among `candidates` distinct random individuals.
fn tournament<R: RandomSource>(pool: &mut SelectionPool, candidates: usize, rng: &mut R) -> usize {
    draw_distinct(pool.weights.len(), candidates, rng, &mut pool.scratch);

    let mut best_index = pool.scratch[0];
    let mut best_weight = pool.weights[best_index];
    for &i in &pool.scratch[1..] {
        if pool.weights[i] > best_weight {
            best_weight = pool.weights[i];
            best_index = i;
        }
    }
    best_index
}

/// Draw `count` distinct indices below `len` into `out`, redrawing the whole
/// set whenever two collide.
pub fn draw_distinct<R: RandomSource>(len: usize, count: usize, rng: &mut R, out: &mut Vec<usize>) {
    debug_assert!(count >= 1 && count <= len);
    loop {
        out.clear();
        out.extend((0..count).map(|_| rng.below(len)));

        let distinct = out
            .iter()
            .enumerate()
            .all(|(i, a)| out[i + 1..].iter().all(|b| a != b));
        if distinct {
            return;
        }
    }
}

/// Crossover operator with its per-generation state.
#[derive(Debug, Clone)]
pub struct Crossover {
    method: CrossoverMethod,
    /// Uniform mask, redrawn once per generation.
    mask: Vec<bool>,
}

impl Crossover {
    /// Operator for chromosomes of `node_count` genes.
    pub fn new(method: CrossoverMethod, node_count: usize) -> Self {
        let mask = match method {
            CrossoverMethod::UniformMask => vec![false; node_count],
            CrossoverMethod::SinglePoint => Vec::new(),
        };
        Self { method, mask }
    }

    /// Configured method.
    pub fn method(&self) -> CrossoverMethod {
        self.method
    }

    /// Current uniform mask (empty for single-point).
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Prepare for a new generation. Redraws the shared mask.
    pub fn begin_generation<R: RandomSource>(&mut self, rng: &mut R) {
        if self.method == CrossoverMethod::UniformMask {
            for bit in self.mask.iter_mut() {
                *bit = rng.next_u32() % 2 == 1;
            }
        }
    }

    /// Produce two children from two parents.
    pub fn apply<R: RandomSource>(
        &self,
        parent1: &[Color],
        parent2: &[Color],
        child1: &mut [Color],
        child2: &mut [Color],
        rng: &mut R,
    ) {
        let n = parent1.len();
        debug_assert!(parent2.len() == n && child1.len() == n && child2.len() == n);

        match self.method {
            CrossoverMethod::SinglePoint => {
                debug_assert!(n >= 3);
                let point = 1 + rng.below(n - 2);
                child1[..point].copy_from_slice(&parent1[..point]);
                child1[point..].copy_from_slice(&parent2[point..]);
                child2[..point].copy_from_slice(&parent2[..point]);
                child2[point..].copy_from_slice(&parent1[point..]);
            }
            CrossoverMethod::UniformMask => {
                for (j, &swap) in self.mask.iter().enumerate() {
                    if swap {
                        child1[j] = parent2[j];
                        child2[j] = parent1[j];
                    } else {
                        child1[j] = parent1[j];
                        child2[j] = parent2[j];
                    }
                }
            }
        }
    }
}

/// Mutate each gene with probability `rate`, returning the number of changed genes.
///
/// A mutated gene always takes one of the two other colors, uniformly.
pub fn mutate<R: RandomSource>(colors: &mut [Color], rate: f64, rng: &mut R) -> usize {
    let mut changed = 0;
    for gene in colors.iter_mut() {
        if rng.next_f64() < rate {
            *gene = other_color(*gene, rng);
            changed += 1;
        }
    }
    changed
}

/// A color different from `current`, uniform over the remaining two.
#[inline]
pub fn other_color<R: RandomSource>(current: Color, rng: &mut R) -> Color {
    (current + 1 + rng.below(NUM_COLORS as usize - 1) as Color) % NUM_COLORS
}

/// The two colors different from `current`, ascending.
#[inline]
pub fn alternative_colors(current: Color) -> impl Iterator<Item = Color> {
    (0..NUM_COLORS).filter(move |&c| c != current)
}
