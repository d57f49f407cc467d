//! Greedy repair: turns a partially-fixed assignment into a feasible cover.
//!
//! Free columns are ranked by an effective density score, `(cost + conflict surcharge) /
//! |subset|`, and added to the cover one at a time via a decrease-key min-priority-queue
//! until every element is covered. Already-selected columns are skipped; columns fixed to
//! zero are never considered.

use priority_queue::PriorityQueue;
use std::cmp::Reverse;

use crate::error::{Result, ScpcsError};
use crate::instance::Instance;

/// Priorities are compared as `Reverse<ordered_float_bits>` so the queue pops the smallest
/// density score first. `f64` has no total order, so scores are reduced to ordered `u64`
/// bit patterns (they are always finite and non-negative here).
fn order_key(score: f64) -> Reverse<u64> {
    Reverse(score.to_bits())
}

fn density_score(instance: &Instance, selected: &[bool], j: usize) -> f64 {
    (instance.cost_of(j) + instance.conflict_with(selected, j)) / instance.subset_size(j) as f64
}

/// Repairs the partial assignment `x` (whose first `fixed` columns are decided, the rest
/// free and currently `false`) into a feasible cover. Returns the completed assignment and
/// its cost, or [`ScpcsError::Infeasible`] if no completion exists (can only happen if some
/// element is covered by no free or selected subset).
pub fn greedy_repair(instance: &Instance, x: &[bool], fixed: usize) -> Result<(Vec<bool>, f64)> {
    let n = instance.n();
    let mut selected = x.to_vec();

    let mut pq: PriorityQueue<usize, Reverse<u64>> = PriorityQueue::new();
    for j in fixed..n {
        if selected[j] {
            continue;
        }
        pq.push(j, order_key(density_score(instance, &selected, j)));
    }

    while !instance.feasible(&selected) {
        let Some((j, _)) = pq.pop() else {
            return Err(ScpcsError::Infeasible);
        };
        selected[j] = true;

        for &(i, _) in instance.conflicts_of(j) {
            if !selected[i] && i >= fixed {
                pq.change_priority(&i, order_key(density_score(instance, &selected, i)));
            }
        }
    }

    let cost = instance.cost(&selected);
    Ok((selected, cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trivial_instance() -> Instance {
        let incidence = vec![vec![true, true], vec![false, true]];
        Instance::new(
            &incidence,
            vec![3.0, 1.0],
            &[vec![0.0, 0.0], vec![0.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn e2_free_completion_from_empty_start() {
        let inst = trivial_instance();
        let x = vec![false, false];
        let (sol, cost) = greedy_repair(&inst, &x, 0).unwrap();
        assert!(inst.feasible(&sol));
        assert_eq!(cost, inst.cost(&sol));
    }

    #[test]
    fn respects_fixed_prefix() {
        let inst = trivial_instance();
        // Fix subset 0 to selected; subset 1 is free.
        let x = vec![true, false];
        let (sol, _cost) = greedy_repair(&inst, &x, 1).unwrap();
        assert!(sol[0]);
        assert!(inst.feasible(&sol));
    }

    #[test]
    fn infeasible_when_required_subset_fixed_off() {
        // element 1 is only covered by subset 1; fixing it off with nothing else free
        // leaves it uncoverable.
        let incidence = vec![vec![true, false], vec![false, true]];
        let inst = Instance::new(
            &incidence,
            vec![1.0, 1.0],
            &[vec![0.0, 0.0], vec![0.0, 0.0]],
        )
        .unwrap();
        let x = vec![true, false];
        let err = greedy_repair(&inst, &x, 2).unwrap_err();
        assert!(matches!(err, ScpcsError::Infeasible));
    }

    #[test]
    fn repair_of_already_feasible_assignment_is_idempotent() {
        let inst = trivial_instance();
        let x = vec![true, true];
        let (sol, cost) = greedy_repair(&inst, &x, 2).unwrap();
        assert_eq!(sol, x);
        assert_eq!(cost, inst.cost(&x));
    }

    #[test]
    fn conflict_forces_the_cheaper_redundant_pick() {
        let incidence = vec![
            vec![true, false, true],
            vec![true, true, false],
            vec![false, true, true],
        ];
        let mut conflicts = vec![vec![0.0; 3]; 3];
        conflicts[0][1] = 100.0;
        conflicts[1][0] = 100.0;
        let inst = Instance::new(&incidence, vec![1.0, 1.0, 10.0], &conflicts).unwrap();

        let x = vec![false, false, false];
        let (sol, cost) = greedy_repair(&inst, &x, 0).unwrap();
        assert!(inst.feasible(&sol));
        assert_eq!(cost, inst.cost(&sol));
    }
}
