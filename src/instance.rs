//! The SCPCS problem instance: universe, subset-element incidence, costs and conflicts.

use crate::error::{Result, ScpcsError};

/// Numerical tolerance used when comparing covering sums against zero.
pub const EPS: f64 = 1e-8;

/// An immutable Set Covering Problem with Conflicts between Subsets instance.
///
/// The incidence matrix `A` is stored column-oriented (one element-index set per subset)
/// because SCPCS instances are typically sparse; the conflict matrix `K` is stored as a
/// sparse adjacency list per subset plus the ordered pair list `P`. Both representations
/// observe the dense semantics described in the covering/cost/conflict queries below.
#[derive(Debug, Clone)]
pub struct Instance {
    m: usize,
    n: usize,
    /// `subsets[j]` is the sorted list of element indices covered by subset `j`.
    subsets: Vec<Vec<usize>>,
    /// `covering[i]` is the list of subset indices that cover element `i`.
    covering: Vec<Vec<usize>>,
    costs: Vec<f64>,
    /// `conflicts[j]` is the list of `(i, K[i][j])` pairs with `K[i][j] > 0`.
    conflicts: Vec<Vec<(usize, f64)>>,
    /// Ordered list of conflicting pairs `(i, j)` with `i < j`.
    pairs: Vec<(usize, usize)>,
}

impl Instance {
    /// Build and validate an instance from a dense incidence matrix, cost vector and
    /// conflict-cost matrix. Returns [`ScpcsError::InvalidInstance`] if any row or column
    /// of `incidence` is empty, if any cost is negative, or if `conflicts` is not a
    /// symmetric zero-diagonal matrix of the right size.
    pub fn new(incidence: &[Vec<bool>], costs: Vec<f64>, conflicts: &[Vec<f64>]) -> Result<Self> {
        let m = incidence.len();
        let n = costs.len();

        if m == 0 {
            return Err(ScpcsError::InvalidInstance(
                "universe must contain at least one element".to_string(),
            ));
        }
        if incidence.iter().any(|row| row.len() != n) {
            return Err(ScpcsError::InvalidInstance(
                "incidence matrix rows must all have length n".to_string(),
            ));
        }
        if conflicts.len() != n || conflicts.iter().any(|row| row.len() != n) {
            return Err(ScpcsError::InvalidInstance(
                "conflict matrix must be n x n".to_string(),
            ));
        }
        if let Some(c) = costs.iter().find(|&&c| c < 0.0) {
            return Err(ScpcsError::InvalidInstance(format!(
                "subset costs must be non-negative, found {c}"
            )));
        }

        let mut subsets = vec![Vec::new(); n];
        let mut covering = vec![Vec::new(); m];
        for (i, row) in incidence.iter().enumerate() {
            for (j, &present) in row.iter().enumerate() {
                if present {
                    subsets[j].push(i);
                    covering[i].push(j);
                }
            }
        }
        if let Some(i) = covering.iter().position(|c| c.is_empty()) {
            return Err(ScpcsError::InvalidInstance(format!(
                "element {i} is covered by no subset"
            )));
        }
        if let Some(j) = subsets.iter().position(|s| s.is_empty()) {
            return Err(ScpcsError::InvalidInstance(format!(
                "subset {j} covers no elements"
            )));
        }

        let mut conflict_adj = vec![Vec::new(); n];
        let mut pairs = Vec::new();
        for i in 0..n {
            if conflicts[i][i] != 0.0 {
                return Err(ScpcsError::InvalidInstance(format!(
                    "conflict matrix diagonal must be zero, found K[{i}][{i}]={}",
                    conflicts[i][i]
                )));
            }
            for j in (i + 1)..n {
                let kij = conflicts[i][j];
                if (kij - conflicts[j][i]).abs() > EPS {
                    return Err(ScpcsError::InvalidInstance(format!(
                        "conflict matrix must be symmetric at ({i}, {j})"
                    )));
                }
                if kij > 0.0 {
                    conflict_adj[i].push((j, kij));
                    conflict_adj[j].push((i, kij));
                    pairs.push((i, j));
                }
            }
        }

        Ok(Self {
            m,
            n,
            subsets,
            covering,
            costs,
            conflicts: conflict_adj,
            pairs,
        })
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn cost_of(&self, j: usize) -> f64 {
        self.costs[j]
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Size of subset `j`, i.e. `|subset_j|`.
    pub fn subset_size(&self, j: usize) -> usize {
        self.subsets[j].len()
    }

    /// The element indices covered by subset `j`.
    pub fn elements_of(&self, j: usize) -> &[usize] {
        &self.subsets[j]
    }

    /// The subset indices that cover element `i`.
    pub fn covering_subsets(&self, i: usize) -> &[usize] {
        &self.covering[i]
    }

    /// The ordered list of conflicting pairs `(i, j)` with `i < j` and `K[i][j] > 0`.
    pub fn conflict_pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// `K[i][j]`, zero if `i` and `j` are not in conflict.
    pub fn conflict_cost(&self, i: usize, j: usize) -> f64 {
        self.conflicts[i]
            .iter()
            .find(|&&(k, _)| k == j)
            .map(|&(_, cost)| cost)
            .unwrap_or(0.0)
    }

    /// The subsets in conflict with `j`, as `(other_subset, K[other][j])` pairs.
    pub fn conflicts_of(&self, j: usize) -> &[(usize, f64)] {
        &self.conflicts[j]
    }

    /// true iff `A x >= 1` componentwise, i.e. every element is covered by `x`.
    pub fn feasible(&self, x: &[bool]) -> bool {
        self.covering
            .iter()
            .all(|subsets| subsets.iter().any(|&j| x[j]))
    }

    /// `c^T x + sum_{(i,j) in P} K[i][j] x_i x_j`.
    pub fn cost(&self, x: &[bool]) -> f64 {
        let linear: f64 = (0..self.n)
            .filter(|&j| x[j])
            .map(|j| self.costs[j])
            .sum();
        let quadratic: f64 = self
            .pairs
            .iter()
            .filter(|&&(i, j)| x[i] && x[j])
            .map(|&(i, j)| self.conflict_cost(i, j))
            .sum();
        linear + quadratic
    }

    /// `sum_i K[i][j] x_i`, the conflict surcharge incurred by adding subset `j` to `x`.
    pub fn conflict_with(&self, x: &[bool], j: usize) -> f64 {
        self.conflicts[j]
            .iter()
            .filter(|&&(i, _)| x[i])
            .map(|&(_, cost)| cost)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(bits: &[u8]) -> Vec<bool> {
        bits.iter().map(|&b| b != 0).collect()
    }

    #[test]
    fn rejects_uncovered_element() {
        let incidence = vec![vec![true, false], vec![false, false]];
        let err = Instance::new(&incidence, vec![1.0, 1.0], &[vec![0.0, 0.0], vec![0.0, 0.0]])
            .unwrap_err();
        assert!(matches!(err, ScpcsError::InvalidInstance(_)));
    }

    #[test]
    fn rejects_negative_cost() {
        let incidence = vec![vec![true]];
        let err = Instance::new(&incidence, vec![-1.0], &[vec![0.0]]).unwrap_err();
        assert!(matches!(err, ScpcsError::InvalidInstance(_)));
    }

    #[test]
    fn e1_trivial_cover_feasibility_and_cost() {
        let incidence = vec![vec![true, false], vec![false, true]];
        let inst = Instance::new(
            &incidence,
            vec![1.0, 1.0],
            &[vec![0.0, 0.0], vec![0.0, 0.0]],
        )
        .unwrap();

        let x = bits(&[1, 1]);
        assert!(inst.feasible(&x));
        assert_eq!(inst.cost(&x), 2.0);

        let x_partial = bits(&[1, 0]);
        assert!(!inst.feasible(&x_partial));
    }

    #[test]
    fn e3_conflict_forces_redundant_pick() {
        let incidence = vec![vec![true, true, false], vec![false, true, true]];
        let mut conflicts = vec![vec![0.0; 3]; 3];
        conflicts[0][1] = 100.0;
        conflicts[1][0] = 100.0;
        let inst = Instance::new(&incidence, vec![1.0, 1.0, 10.0], &conflicts).unwrap();

        let avoid_conflict = bits(&[1, 0, 1]);
        assert!(inst.feasible(&avoid_conflict));
        assert_eq!(inst.cost(&avoid_conflict), 11.0);

        let with_conflict = bits(&[1, 1, 0]);
        assert!(inst.feasible(&with_conflict));
        assert_eq!(inst.cost(&with_conflict), 102.0);
    }

    #[test]
    fn conflict_cost_symmetry_matches_incremental_insertion() {
        let incidence = vec![vec![true, false, true], vec![false, true, true], vec![true, true, false]];
        let mut conflicts = vec![vec![0.0; 3]; 3];
        conflicts[0][1] = 1.0;
        conflicts[1][0] = 1.0;
        let inst = Instance::new(&incidence, vec![2.0, 2.0, 2.0], &conflicts).unwrap();

        let x = bits(&[1, 1, 0]);
        let full_cost = inst.cost(&x);

        let mut running = vec![false; 3];
        let mut incremental = 0.0;
        for j in 0..3 {
            if x[j] {
                incremental += inst.cost_of(j) + inst.conflict_with(&running, j);
                running[j] = true;
            }
        }
        assert_eq!(full_cost, incremental);
    }
}
