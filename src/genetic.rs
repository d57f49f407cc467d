//! Genetic heuristic: population-based search for a warm-start incumbent.
//!
//! A population of 1000 bitstrings evolves under a pool of crossover and mutation
//! operators with roulette selection and elitism. Fitness is `-cost` for feasible
//! individuals and a sentinel for infeasible ones, so feasibility always dominates cost.
//! The search stops once the elite's fitness has not improved for a configured number of
//! generations.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::instance::Instance;

pub const POPULATION_SIZE: usize = 1000;

/// Sentinel fitness assigned to an infeasible individual: lower than any feasible
/// individual's fitness, since a feasible cost can never exceed `total_cost + 1`.
const INFEASIBLE_FITNESS: f64 = 1.0;

/// Best feasible genome found so far, tracked across generations (not merely the fittest
/// individual currently alive, which can regress between generations).
#[derive(Debug, Clone)]
pub struct Elite {
    pub bits: Vec<bool>,
    pub fitness: f64,
}

/// Result of running the genetic heuristic: the best feasible cover found, if any.
#[derive(Debug, Clone)]
pub struct GeneticResult {
    pub x: Vec<bool>,
    pub cost: f64,
}

/// `total_cost - cost(x) + 2` for a feasible individual, so lower cost scores higher and
/// the worst feasible genome (`cost == total_cost`) still beats the infeasible sentinel.
fn fitness_of(instance: &Instance, total_cost: f64, bits: &[bool]) -> f64 {
    if instance.feasible(bits) {
        total_cost - instance.cost(bits) + 2.0
    } else {
        INFEASIBLE_FITNESS
    }
}

fn random_genome(instance: &Instance, x: &[bool], fixed: usize, rng: &mut impl Rng) -> Vec<bool> {
    let mut bits = x.to_vec();
    for bit in bits.iter_mut().skip(fixed).take(instance.n() - fixed) {
        *bit = rng.gen_bool(0.5);
    }
    bits
}

fn two_point_crossover(a: &[bool], b: &[bool], rng: &mut impl Rng) -> (Vec<bool>, Vec<bool>) {
    let n = a.len();
    if n < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let mut p1 = rng.gen_range(0..n);
    let mut p2 = rng.gen_range(0..n);
    if p1 > p2 {
        std::mem::swap(&mut p1, &mut p2);
    }
    let mut child_a = a.to_vec();
    let mut child_b = b.to_vec();
    child_a[p1..p2].clone_from_slice(&b[p1..p2]);
    child_b[p1..p2].clone_from_slice(&a[p1..p2]);
    (child_a, child_b)
}

fn uniform_crossover(a: &[bool], b: &[bool], rng: &mut impl Rng) -> (Vec<bool>, Vec<bool>) {
    let mut child_a = a.to_vec();
    let mut child_b = b.to_vec();
    for i in 0..a.len() {
        if rng.gen_bool(0.5) {
            child_a[i] = b[i];
            child_b[i] = a[i];
        }
    }
    (child_a, child_b)
}

fn partial_mutate(a: &[bool], fixed: usize, rng: &mut impl Rng) -> Vec<bool> {
    let mut child = a.to_vec();
    if fixed < child.len() {
        let i = rng.gen_range(fixed..child.len());
        child[i] = !child[i];
    }
    child
}

/// Runs the genetic heuristic from a partially-fixed seed, stopping once the elite's
/// fitness has been unchanged for `stall_rounds` consecutive generations.
pub fn genetic_heuristic(
    instance: &Instance,
    x: &[bool],
    fixed: usize,
    stall_rounds: usize,
) -> Option<GeneticResult> {
    let mut rng = rand::thread_rng();
    let mut population: Vec<Vec<bool>> = (0..POPULATION_SIZE)
        .map(|_| random_genome(instance, x, fixed, &mut rng))
        .collect();

    let total_cost: f64 = instance.costs().iter().sum();
    let mut elite: Option<Elite> = None;
    let mut stall = 0usize;

    loop {
        let fitness: Vec<f64> = population
            .iter()
            .map(|bits| fitness_of(instance, total_cost, bits))
            .collect();

        let gen_best = fitness
            .iter()
            .enumerate()
            .max_by(|&(_, a), &(_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, &f)| (i, f));

        let mut improved = false;
        if let Some((i, f)) = gen_best {
            if f > INFEASIBLE_FITNESS
                && elite.as_ref().map(|e| f > e.fitness).unwrap_or(true)
            {
                elite = Some(Elite {
                    bits: population[i].clone(),
                    fitness: f,
                });
                improved = true;
            }
        }
        stall = if improved { 0 } else { stall + 1 };
        if stall >= stall_rounds {
            break;
        }

        // Roulette weights: higher fitness (lower cost) wins more often. Fitness is
        // always >= 1 (the infeasible sentinel), so it is already a valid weight.
        let weights: Vec<f64> = fitness.clone();
        let dist = match WeightedIndex::new(&weights) {
            Ok(dist) => dist,
            Err(_) => break,
        };

        let reapply_fixed = |mut child: Vec<bool>| -> Vec<bool> {
            child[..fixed].clone_from_slice(&x[..fixed]);
            child
        };

        let mut next_gen = Vec::with_capacity(POPULATION_SIZE);
        while next_gen.len() < POPULATION_SIZE {
            let a = &population[dist.sample(&mut rng)];
            let b = &population[dist.sample(&mut rng)];

            if !rng.gen_bool(0.9) {
                next_gen.push(a.clone());
                if next_gen.len() < POPULATION_SIZE {
                    next_gen.push(b.clone());
                }
                continue;
            }

            match rng.gen_range(0..10u8) {
                0 => {
                    // One of the three two-point crossovers breeds against the elite
                    // genome rather than another roulette pick.
                    let elite_parent = elite.as_ref().map(|e| e.bits.as_slice()).unwrap_or(a);
                    let (c1, c2) = two_point_crossover(elite_parent, b, &mut rng);
                    next_gen.push(reapply_fixed(c1));
                    if next_gen.len() < POPULATION_SIZE {
                        next_gen.push(reapply_fixed(c2));
                    }
                }
                1..=2 => {
                    let (c1, c2) = two_point_crossover(a, b, &mut rng);
                    next_gen.push(reapply_fixed(c1));
                    if next_gen.len() < POPULATION_SIZE {
                        next_gen.push(reapply_fixed(c2));
                    }
                }
                9 => {
                    let (c1, c2) = uniform_crossover(a, b, &mut rng);
                    next_gen.push(reapply_fixed(c1));
                    if next_gen.len() < POPULATION_SIZE {
                        next_gen.push(reapply_fixed(c2));
                    }
                }
                _ => {
                    next_gen.push(partial_mutate(a, fixed, &mut rng));
                }
            }
        }
        population = next_gen;
    }

    elite.map(|e| GeneticResult {
        cost: instance.cost(&e.bits),
        x: e.bits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e2_converges_to_feasible_cover() {
        let incidence = vec![vec![true, true], vec![false, true]];
        let inst = Instance::new(
            &incidence,
            vec![3.0, 1.0],
            &[vec![0.0, 0.0], vec![0.0, 0.0]],
        )
        .unwrap();

        let result = genetic_heuristic(&inst, &[false, false], 0, 5).unwrap();
        assert!(inst.feasible(&result.x));
    }

    #[test]
    fn respects_fixed_prefix_in_seed() {
        let incidence = vec![vec![true, true], vec![false, true]];
        let inst = Instance::new(
            &incidence,
            vec![3.0, 1.0],
            &[vec![0.0, 0.0], vec![0.0, 0.0]],
        )
        .unwrap();

        let result = genetic_heuristic(&inst, &[true, false], 1, 5);
        if let Some(result) = result {
            assert!(result.x[0]);
        }
    }
}
