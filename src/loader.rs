//! Plain-text instance file loader.
//!
//! Format: a first line `m n`, a second line of `n` subset costs, then `m` lines (one per
//! element) each starting with a count `k_i` followed by `k_i` 1-indexed subset ids.
//! Conflicts are not in the file; they are derived here from an intersection-threshold
//! rule and folded into the [`Instance`] the loader returns.

use std::io::BufRead;

use crate::error::{Result, ScpcsError};
use crate::instance::Instance;

fn parse_err(line: usize, reason: impl Into<String>) -> ScpcsError {
    ScpcsError::Parse {
        line,
        reason: reason.into(),
    }
}

fn parse_ints(line_no: usize, text: &str) -> Result<Vec<i64>> {
    text.split_whitespace()
        .map(|tok| {
            tok.parse::<i64>()
                .map_err(|_| parse_err(line_no, format!("expected integer, found '{tok}'")))
        })
        .collect()
}

/// Loads an instance from `reader`, deriving conflicts with threshold `tau`.
pub fn load<R: BufRead>(reader: R, tau: i64) -> Result<Instance> {
    let mut lines = reader.lines();

    let first = lines
        .next()
        .ok_or_else(|| parse_err(1, "missing header line"))??;
    let header = parse_ints(1, &first)?;
    if header.len() != 2 {
        return Err(parse_err(1, "expected 'm n'"));
    }
    let (m, n) = (header[0] as usize, header[1] as usize);

    let second = lines
        .next()
        .ok_or_else(|| parse_err(2, "missing cost line"))??;
    let cost_ints = parse_ints(2, &second)?;
    if cost_ints.len() != n {
        return Err(parse_err(
            2,
            format!("expected {n} subset costs, found {}", cost_ints.len()),
        ));
    }
    let costs: Vec<f64> = cost_ints.iter().map(|&c| c as f64).collect();

    let mut incidence = vec![vec![false; n]; m];
    for i in 0..m {
        let line_no = 3 + i;
        let text = lines
            .next()
            .ok_or_else(|| parse_err(line_no, format!("missing element line {}", i + 1)))??;
        let tokens = parse_ints(line_no, &text)?;
        let Some((&k, ids)) = tokens.split_first() else {
            return Err(parse_err(line_no, "missing subset count"));
        };
        if ids.len() as i64 != k {
            return Err(parse_err(
                line_no,
                format!("declared {k} subsets, found {}", ids.len()),
            ));
        }
        for &id in ids {
            if id < 1 || id as usize > n {
                return Err(parse_err(line_no, format!("subset id {id} out of range")));
            }
            incidence[i][id as usize - 1] = true;
        }
    }

    let conflicts = derive_conflicts(&incidence, &costs, tau);
    Instance::new(&incidence, costs, &conflicts)
}

/// Derives the conflict-cost matrix `K` from an intersection-threshold rule: for each
/// pair `i<j`, let `sigma` be the size of their shared element set; if
/// `sigma - tau > 0` then `K[i][j] = K[j][i] = ceil(coeff * (sigma - tau))`, where `coeff`
/// is the largest `round(cost_j / |subset_j|)` across all subsets, clamped to at least 1.
fn derive_conflicts(incidence: &[Vec<bool>], costs: &[f64], tau: i64) -> Vec<Vec<f64>> {
    let n = costs.len();
    let m = incidence.len();

    let coeff = (0..n)
        .map(|j| {
            let size = (0..m).filter(|&i| incidence[i][j]).count().max(1) as f64;
            (costs[j] / size).round()
        })
        .fold(1.0_f64, f64::max);

    let mut k = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let sigma = (0..m).filter(|&e| incidence[e][i] && incidence[e][j]).count() as i64;
            let diff = sigma - tau;
            if diff > 0 {
                let cost = (coeff * diff as f64).ceil();
                k[i][j] = cost;
                k[j][i] = cost;
            }
        }
    }
    k
}
