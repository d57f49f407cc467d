//! Subgradient optimization of the Lagrangean dual.
//!
//! Covering constraints are dualized into the objective with multipliers `lambda`; what
//! remains is a small 0/1 program over the subset columns plus one auxiliary column per
//! conflicting pair, linearizing `x_i * x_j` via `x_i + x_j - y_p <= 1`. Each round solves
//! that program, then ascends `lambda` by the constraint violation with a geometrically
//! decaying step. Stalls for five consecutive rounds, or a NaN objective, end the search.

use crate::error::{Result, ScpcsError};
use crate::instance::{Instance, EPS};
use crate::mip::{MipModel, MipStatus, Objective, RowBound};

const BASE_STEP: f64 = 10.0;
const STEP_DECAY: f64 = 0.6;
const STALL_THRESHOLD: f64 = 0.1;
const STALL_ROUNDS: usize = 5;

/// Outcome of one subgradient round: the dual objective value and the subset assignment
/// that attained it (the auxiliary conflict-pair columns are not returned).
#[derive(Debug, Clone)]
pub struct DualSolution {
    pub x: Vec<bool>,
    pub objective: f64,
}

fn lagrangean_model(instance: &Instance, lambda: &[f64], x: &[bool], fixed: usize) -> MipModel {
    let n_subsets = instance.n();
    let pairs = instance.conflict_pairs();
    let n_cols = n_subsets + pairs.len();

    let mut model = MipModel::new_binary(n_cols, Objective::Minimize);

    for j in 0..n_subsets {
        let reduced = instance.cost_of(j)
            - instance
                .elements_of(j)
                .iter()
                .map(|&i| lambda[i])
                .sum::<f64>();
        model.cost[j] = reduced;
    }
    for (p, &(i, j)) in pairs.iter().enumerate() {
        model.cost[n_subsets + p] = instance.conflict_cost(i, j);
    }

    for j in 0..fixed {
        let v = if x[j] { 1.0 } else { 0.0 };
        model.col_lo[j] = v;
        model.col_hi[j] = v;
    }

    for (p, &(i, j)) in pairs.iter().enumerate() {
        let col = n_subsets + p;
        model.row_bounds.push(RowBound::at_most(1.0));
        let row = model.row_bounds.len() - 1;
        model.triples.push((row, i, 1.0));
        model.triples.push((row, j, 1.0));
        model.triples.push((row, col, -1.0));
    }

    model.objective_offset = lambda.iter().sum();
    model
}

/// true iff `dual_x` is primal-feasible and complementary slackness holds against
/// `lambda`: the Lagrangean relaxation is then exactly optimal for the original problem,
/// short-circuiting the rest of the search.
pub fn complementary_slack_optimal(instance: &Instance, dual_x: &[bool], lambda: &[f64]) -> bool {
    (0..instance.m()).all(|i| {
        let covered: f64 = instance
            .covering_subsets(i)
            .iter()
            .filter(|&&j| dual_x[j])
            .count() as f64;
        covered >= 1.0 && (lambda[i] * (1.0 - covered)).abs() < EPS
    })
}

/// Ascends the Lagrangean dual from `x`'s partial assignment (first `fixed` columns
/// decided). `lambda0` seeds the multipliers (a previous node's multipliers, or `None`
/// for the root, which starts at all-ones). Returns the best dual bound found and the
/// multipliers at that point.
pub fn optimize_subgradient(
    instance: &Instance,
    x: &[bool],
    fixed: usize,
    lambda0: Option<&[f64]>,
) -> Result<(DualSolution, Vec<f64>)> {
    let m = instance.m();
    let mut lambda: Vec<f64> = match lambda0 {
        Some(l) => l.to_vec(),
        None => vec![1.0; m],
    };

    let mut best: Option<DualSolution> = None;
    let mut stall = 0usize;
    let mut step = BASE_STEP;

    loop {
        let model = lagrangean_model(instance, &lambda, x, fixed);
        let solved = model.solve()?;
        if matches!(solved.status, MipStatus::Infeasible) {
            // A contradictory fixed prefix (no column assignment satisfies the pair
            // linearization under the node's bounds) is a local infeasibility: the
            // driver fathoms this branch rather than aborting the whole search.
            return Err(ScpcsError::Infeasible);
        }
        if !matches!(solved.status, MipStatus::Optimal) {
            return Err(ScpcsError::SolverNonOptimal {
                status: solved.status,
            });
        }
        if solved.objective.is_nan() {
            return Err(ScpcsError::Numerical(
                "subgradient round produced a NaN objective".to_string(),
            ));
        }

        let dual_x: Vec<bool> = solved.x[..instance.n()]
            .iter()
            .map(|&v| v > 0.5)
            .collect();
        let round = DualSolution {
            x: dual_x,
            objective: solved.objective,
        };

        let improvement = match &best {
            Some(b) => round.objective - b.objective,
            None => f64::INFINITY,
        };
        if improvement > 0.0 {
            best = Some(round.clone());
        }
        if improvement < STALL_THRESHOLD {
            stall += 1;
            if stall > STALL_ROUNDS {
                break;
            }
        } else {
            stall = 0;
        }

        if complementary_slack_optimal(instance, &round.x, &lambda) {
            best = Some(round);
            break;
        }

        step *= STEP_DECAY;
        for i in 0..m {
            let covered: f64 = instance
                .covering_subsets(i)
                .iter()
                .filter(|&&j| round.x[j])
                .count() as f64;
            let violation = 1.0 - covered;
            lambda[i] = (lambda[i] + step * violation).max(0.0);
        }
    }

    Ok((best.expect("at least one subgradient round always runs"), lambda))
}
