//! Backend-agnostic MIP/LP adapter.
//!
//! Internally a model is a sparse, backend-agnostic description: a cost vector, column and
//! row bound vectors, a sparse `(row, col, val)` constraint matrix, a per-column integrality
//! flag vector, an objective offset and an objective direction. `solve` translates this
//! description into `good_lp`'s builder API at call time and dispatches to the bundled HiGHS
//! backend, mapping HiGHS's solver status back onto [`MipStatus`].

use good_lp::solvers::highs::highs;
use good_lp::{constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};

use crate::error::{Result, ScpcsError};
use crate::instance::Instance;

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    Minimize,
    Maximize,
}

/// Outcome reported by the solver backend, abstracted away from any particular crate's
/// own status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}

/// A row's bound: `lo <= row <= hi`. Use `f64::NEG_INFINITY`/`f64::INFINITY` for one-sided
/// constraints and `lo == hi` for equalities.
#[derive(Debug, Clone, Copy)]
pub struct RowBound {
    pub lo: f64,
    pub hi: f64,
}

impl RowBound {
    pub fn at_least(lo: f64) -> Self {
        Self {
            lo,
            hi: f64::INFINITY,
        }
    }

    pub fn at_most(hi: f64) -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi,
        }
    }

    pub fn equal_to(v: f64) -> Self {
        Self { lo: v, hi: v }
    }
}

/// Backend-agnostic sparse MIP/LP model.
#[derive(Debug, Clone)]
pub struct MipModel {
    pub cost: Vec<f64>,
    pub col_lo: Vec<f64>,
    pub col_hi: Vec<f64>,
    pub integer: Vec<bool>,
    pub row_bounds: Vec<RowBound>,
    /// Sparse entries `(row, col, value)` of the constraint matrix.
    pub triples: Vec<(usize, usize, f64)>,
    pub objective_offset: f64,
    pub objective: Objective,
}

/// Solution returned by [`MipModel::solve`]: primal values, dual/row-activity values, the
/// objective and the reported status.
#[derive(Debug, Clone)]
pub struct MipSolution {
    pub x: Vec<f64>,
    pub row_activity: Vec<f64>,
    pub objective: f64,
    pub status: MipStatus,
}

impl MipModel {
    /// An empty model with `n_cols` columns, all binary (`0 <= x <= 1`, integer).
    pub fn new_binary(n_cols: usize, objective: Objective) -> Self {
        Self {
            cost: vec![0.0; n_cols],
            col_lo: vec![0.0; n_cols],
            col_hi: vec![1.0; n_cols],
            integer: vec![true; n_cols],
            row_bounds: Vec::new(),
            triples: Vec::new(),
            objective_offset: 0.0,
            objective,
        }
    }

    pub fn n_cols(&self) -> usize {
        self.cost.len()
    }

    pub fn n_rows(&self) -> usize {
        self.row_bounds.len()
    }

    /// Relax every column's integrality flag, yielding the model's LP relaxation.
    pub fn relaxed(&self) -> Self {
        let mut relaxed = self.clone();
        relaxed.integer.iter_mut().for_each(|flag| *flag = false);
        relaxed
    }

    /// Translate this model into `good_lp`'s builder API and solve it with HiGHS.
    pub fn solve(&self) -> Result<MipSolution> {
        if self.cost.len() != self.col_lo.len()
            || self.cost.len() != self.col_hi.len()
            || self.cost.len() != self.integer.len()
        {
            return Err(ScpcsError::Unexpected(
                "mip model column vectors have mismatched lengths".to_string(),
            ));
        }

        let mut vars = ProblemVariables::new();
        let columns: Vec<Variable> = (0..self.n_cols())
            .map(|j| {
                let mut def = variable().min(self.col_lo[j]).max(self.col_hi[j]);
                if self.integer[j] {
                    def = def.integer();
                }
                vars.add(def)
            })
            .collect();

        let objective_expr: Expression = columns
            .iter()
            .zip(self.cost.iter())
            .map(|(&v, &c)| c * v)
            .sum();

        let mut rows: Vec<Expression> = vec![Expression::from(0.0); self.n_rows()];
        for &(row, col, val) in &self.triples {
            rows[row] += val * columns[col];
        }

        let mut problem = match self.objective {
            Objective::Minimize => vars.minimise(objective_expr.clone()),
            Objective::Maximize => vars.maximise(objective_expr.clone()),
        }
        .using(highs);

        for (row, bound) in rows.iter().zip(self.row_bounds.iter()) {
            if bound.lo == bound.hi {
                problem = problem.with(constraint!(row.clone() == bound.lo));
            } else {
                if bound.lo.is_finite() {
                    problem = problem.with(constraint!(row.clone() >= bound.lo));
                }
                if bound.hi.is_finite() {
                    problem = problem.with(constraint!(row.clone() <= bound.hi));
                }
            }
        }

        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(good_lp::ResolutionError::Infeasible) => {
                return Ok(MipSolution {
                    x: Vec::new(),
                    row_activity: Vec::new(),
                    objective: f64::NAN,
                    status: MipStatus::Infeasible,
                })
            }
            Err(good_lp::ResolutionError::Unbounded) => {
                return Ok(MipSolution {
                    x: Vec::new(),
                    row_activity: Vec::new(),
                    objective: f64::NAN,
                    status: MipStatus::Unbounded,
                })
            }
            Err(err) => {
                return Err(ScpcsError::SolverFailure(err.to_string()));
            }
        };

        let x: Vec<f64> = columns.iter().map(|&v| solution.value(v)).collect();
        let row_activity: Vec<f64> = rows.iter().map(|row| solution.eval(row)).collect();
        let objective = x
            .iter()
            .zip(self.cost.iter())
            .map(|(&xi, &ci)| xi * ci)
            .sum::<f64>()
            + self.objective_offset;

        Ok(MipSolution {
            x,
            row_activity,
            objective,
            status: MipStatus::Optimal,
        })
    }
}

/// Builds the full SCPCS model: one binary column per subset plus one binary
/// linearization column `y` per conflicting pair, covering constraints `A x >= 1`, and the
/// linearization constraints `x_i + x_j - y_ij <= 1`. Solving this model directly (e.g. via
/// the `-highs` CLI flag) gives the exact SCPCS optimum, bypassing the Lagrangean search.
pub fn build_full_scpcs(instance: &Instance) -> MipModel {
    let n = instance.n();
    let pairs = instance.conflict_pairs();
    let mut model = MipModel::new_binary(n + pairs.len(), Objective::Minimize);

    for j in 0..n {
        model.cost[j] = instance.cost_of(j);
    }
    for (p, &(i, j)) in pairs.iter().enumerate() {
        model.cost[n + p] = instance.conflict_cost(i, j);
    }

    for i in 0..instance.m() {
        model.row_bounds.push(RowBound::at_least(1.0));
        let row = model.row_bounds.len() - 1;
        for &j in instance.covering_subsets(i) {
            model.triples.push((row, j, 1.0));
        }
    }

    for (p, &(i, j)) in pairs.iter().enumerate() {
        let col = n + p;
        model.row_bounds.push(RowBound::at_most(1.0));
        let row = model.row_bounds.len() - 1;
        model.triples.push((row, i, 1.0));
        model.triples.push((row, j, 1.0));
        model.triples.push((row, col, -1.0));
    }

    model
}
