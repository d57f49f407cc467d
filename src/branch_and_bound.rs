//! Branch-and-bound driver: the top-level Lagrangean B&B search.
//!
//! The frontier is a LIFO stack of partially-fixed nodes. Each popped node is expanded
//! into up to six children by fixing a prefix of its free columns; children are explored
//! concurrently, their dual bounds computed via subgradient optimization, and infeasible
//! or dominated children are fathomed before the survivors are pushed back in
//! descending-dual-bound order (so the most promising child is explored first).

use rayon::prelude::*;

use crate::error::{Result, ScpcsError};
use crate::genetic;
use crate::greedy;
use crate::instance::Instance;
use crate::subgradient::{self, complementary_slack_optimal};

const MAX_CHILDREN: usize = 6;

/// A node in the branch-and-bound tree: a partial assignment whose first `fixed` columns
/// are decided, plus the dual bound and multipliers computed for it (if any).
#[derive(Debug, Clone)]
pub struct Node {
    pub x: Vec<bool>,
    pub fixed: usize,
    /// Exact objective contribution of `x[0..fixed)`, conflicts among the prefix counted
    /// once each.
    pub partial_cost: f64,
    pub dual_bound: f64,
    pub lambda: Vec<f64>,
}

/// The best feasible cover found by the search, with its incumbent cost.
#[derive(Debug, Clone)]
pub struct Incumbent {
    pub x: Vec<bool>,
    pub cost: f64,
}

/// Options controlling the search's stopping behavior.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Generations of unchanged elite fitness before the root genetic heuristic stops.
    pub genetic_stall_rounds: usize,
    /// Optional wall-clock bound on the main loop. When it elapses the search returns the
    /// current incumbent instead of continuing to fathom the frontier.
    pub time_limit: Option<std::time::Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            genetic_stall_rounds: 2000,
            time_limit: None,
        }
    }
}

/// Generates up to [`MAX_CHILDREN`] children of `node` by fixing progressively longer
/// prefixes of its free columns: the first `k - 2` children fix exactly one additional
/// column to 1 (at increasing offsets), and the last two both fix the same `k - 1` extra
/// columns, one all-zero and one with the final column flipped to 1.
fn generate_children(instance: &Instance, node: &Node) -> Vec<Node> {
    let free = instance.n() - node.fixed;
    let k = MAX_CHILDREN.min(free + 1);
    if k == 0 {
        return Vec::new();
    }

    let mut children = Vec::with_capacity(k);

    for i in 0..k.saturating_sub(2) {
        let mut include = vec![false; i + 1];
        include[i] = true;
        children.push(fix_prefix(instance, node, &include));
    }

    let mut include = vec![false; k - 1];
    children.push(fix_prefix(instance, node, &include));
    if let Some(last) = include.last_mut() {
        *last = true;
    }
    children.push(fix_prefix(instance, node, &include));

    children
}

/// Extends `node`'s prefix by `include.len()` decided columns. At most one position in
/// `include` is `true` (the branching scheme never fixes two new columns to 1 at once), so
/// the added cost is exactly that column's own cost plus its conflict surcharge against the
/// already-decided prefix, paid once.
fn fix_prefix(instance: &Instance, node: &Node, include: &[bool]) -> Node {
    let mut x = node.x.clone();
    let mut new_one = None;
    for (offset, &flag) in include.iter().enumerate() {
        x[node.fixed + offset] = flag;
        if flag {
            new_one = Some(node.fixed + offset);
        }
    }
    let partial_cost = node.partial_cost
        + new_one
            .map(|j| instance.cost_of(j) + instance.conflict_with(&x, j))
            .unwrap_or(0.0);
    Node {
        x,
        fixed: node.fixed + include.len(),
        partial_cost,
        dual_bound: node.dual_bound,
        lambda: node.lambda.clone(),
    }
}

/// Runs the full Lagrangean branch-and-bound search to completion (or until the genetic
/// root bound already certifies optimality).
pub fn solve(instance: &Instance, options: &SearchOptions) -> Result<Incumbent> {
    let root_x = vec![false; instance.n()];

    let genetic_root = genetic::genetic_heuristic(instance, &root_x, 0, options.genetic_stall_rounds);
    let mut incumbent = match genetic_root {
        Some(result) => Incumbent {
            x: result.x,
            cost: result.cost,
        },
        None => Incumbent {
            x: root_x.clone(),
            cost: f64::INFINITY,
        },
    };

    let (root_dual, root_lambda) = subgradient::optimize_subgradient(instance, &root_x, 0, None)?;

    if incumbent.cost.is_finite()
        && relative_gap(incumbent.cost, root_dual.objective) < 1e-8
    {
        return Ok(incumbent);
    }

    let mut stack = vec![Node {
        x: root_x,
        fixed: 0,
        partial_cost: 0.0,
        dual_bound: root_dual.objective,
        lambda: root_lambda,
    }];

    let deadline = options
        .time_limit
        .map(|limit| std::time::Instant::now() + limit);

    while let Some(node) = stack.pop() {
        if deadline.is_some_and(|d| std::time::Instant::now() >= d) {
            break;
        }
        if node.dual_bound > incumbent.cost {
            continue;
        }
        if node.partial_cost < incumbent.cost && instance.feasible(&node.x) {
            incumbent = Incumbent {
                x: node.x,
                cost: node.partial_cost,
            };
            continue;
        }
        if node.fixed == instance.n() {
            continue;
        }

        let children = generate_children(instance, &node);

        let expanded: Vec<Result<ChildOutcome>> = children
            .into_par_iter()
            .map(|child| expand_child(instance, child, incumbent.cost))
            .collect();

        let mut survivors = Vec::with_capacity(expanded.len());
        for outcome in expanded {
            // Infeasible is recovered locally (fathom); any other error is fatal and
            // aborts the whole search, matching the solver-non-optimal/numerical/
            // unexpected error taxonomy.
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(ScpcsError::Infeasible) => continue,
                Err(err) => return Err(err),
            };
            match outcome {
                ChildOutcome::Fathomed => {}
                ChildOutcome::Feasible { x, cost } => {
                    if cost < incumbent.cost {
                        incumbent = Incumbent { x, cost };
                    }
                }
                ChildOutcome::Survives { node, repaired: (x, cost) } => {
                    if cost < incumbent.cost {
                        incumbent = Incumbent { x, cost };
                    }
                    survivors.push(node);
                }
            }
        }

        // Descending by dual bound, so the tightest (best) child lands last and is
        // therefore the next one popped off the stack.
        survivors.sort_by(|a, b| {
            b.dual_bound
                .partial_cmp(&a.dual_bound)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        stack.extend(survivors);
    }

    Ok(incumbent)
}

enum ChildOutcome {
    Fathomed,
    Feasible { x: Vec<bool>, cost: f64 },
    Survives {
        node: Node,
        repaired: (Vec<bool>, f64),
    },
}

fn expand_child(instance: &Instance, mut child: Node, incumbent_cost: f64) -> Result<ChildOutcome> {
    let (dual, lambda) = match subgradient::optimize_subgradient(
        instance,
        &child.x,
        child.fixed,
        Some(&child.lambda),
    ) {
        Ok(pair) => pair,
        Err(ScpcsError::Infeasible) => return Ok(ChildOutcome::Fathomed),
        Err(err) => return Err(err),
    };

    if complementary_slack_optimal(instance, &dual.x, &lambda) {
        return Ok(ChildOutcome::Feasible {
            x: dual.x.clone(),
            cost: instance.cost(&dual.x),
        });
    }

    child.dual_bound = dual.objective;
    child.lambda = lambda;

    if child.dual_bound > incumbent_cost {
        return Ok(ChildOutcome::Fathomed);
    }

    match greedy::greedy_repair(instance, &child.x, child.fixed) {
        Ok((x, _)) => {
            let cost = instance.cost(&x);
            Ok(ChildOutcome::Survives {
                node: child,
                repaired: (x, cost),
            })
        }
        Err(ScpcsError::Infeasible) => Ok(ChildOutcome::Fathomed),
        Err(err) => Err(err),
    }
}

fn relative_gap(incumbent_cost: f64, dual_bound: f64) -> f64 {
    if incumbent_cost == 0.0 {
        (incumbent_cost - dual_bound).abs()
    } else {
        ((incumbent_cost - dual_bound) / incumbent_cost).abs()
    }
}
