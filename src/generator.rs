//! Random instance synthesis, matching the plain-text format [`crate::loader`] reads.
//!
//! Subset costs are drawn uniformly from `1..=20`. Each element's covering set size is a
//! fraction of the subset count drawn from `Normal(mean_density, stddev_density)`, clamped
//! to `[0, 1]` and to at least one subset, with the covering subsets themselves chosen by
//! a random permutation.

use std::fmt::Write as _;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Parameters for a synthetic SCPCS instance, matching the generator CLI's flags.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorParams {
    pub num_elements: usize,
    pub num_subsets: usize,
    pub mean_density: f64,
    pub stddev_density: f64,
}

/// Generates a plain-text instance (the same format [`crate::loader::load`] parses).
///
/// After sampling each element's covering set, a final pass guarantees every subset
/// covers at least one element (an [`Instance`](crate::instance::Instance) invariant):
/// any subset no row happened to select is assigned to a randomly chosen element.
pub fn generate(params: &GeneratorParams, rng: &mut impl Rng) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", params.num_elements, params.num_subsets);

    let costs: Vec<u32> = (0..params.num_subsets)
        .map(|_| rng.gen_range(1..=20))
        .collect();
    for cost in &costs {
        let _ = write!(out, "{cost} ");
    }
    out.push('\n');

    let normal = if params.stddev_density > 0.0 {
        Some(Normal::new(params.mean_density, params.stddev_density).expect("stddev checked positive above"))
    } else {
        None
    };

    let mut permutation: Vec<usize> = (0..params.num_subsets).collect();
    let mut rows: Vec<Vec<usize>> = Vec::with_capacity(params.num_elements);
    for _ in 0..params.num_elements {
        let density = normal
            .as_ref()
            .map(|n| n.sample(rng))
            .unwrap_or(params.mean_density)
            .clamp(0.0, 1.0);
        let set_size = ((params.num_subsets as f64 * density) as usize).max(1);

        permutation.shuffle(rng);
        rows.push(permutation.iter().take(set_size).copied().collect());
    }

    let mut covered = vec![false; params.num_subsets];
    for row in &rows {
        for &j in row {
            covered[j] = true;
        }
    }
    for (j, is_covered) in covered.iter().enumerate() {
        if !is_covered {
            let i = rng.gen_range(0..params.num_elements);
            rows[i].push(j);
        }
    }

    for row in &rows {
        let _ = write!(out, "{} ", row.len());
        for &subset in row {
            let _ = write!(out, "{} ", subset + 1);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_instance_parses_and_has_the_right_shape() {
        let params = GeneratorParams {
            num_elements: 5,
            num_subsets: 8,
            mean_density: 0.3,
            stddev_density: 0.1,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let text = generate(&params, &mut rng);

        let inst = crate::loader::load(std::io::Cursor::new(text), 0).unwrap();
        assert_eq!(inst.m(), 5);
        assert_eq!(inst.n(), 8);
    }

    #[test]
    fn set_size_is_never_zero() {
        let params = GeneratorParams {
            num_elements: 20,
            num_subsets: 4,
            mean_density: 0.0,
            stddev_density: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let text = generate(&params, &mut rng);
        let inst = crate::loader::load(std::io::Cursor::new(text), 0).unwrap();
        assert_eq!(inst.m(), 20);
    }

    #[test]
    fn every_subset_covers_at_least_one_element_even_at_low_density() {
        // Few elements, many subsets and a low density make it likely some subset is
        // never sampled by any row; the post-pass must still leave every column covered.
        let params = GeneratorParams {
            num_elements: 3,
            num_subsets: 50,
            mean_density: 0.02,
            stddev_density: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(42);
        let text = generate(&params, &mut rng);
        let inst = crate::loader::load(std::io::Cursor::new(text), 0).unwrap();
        for j in 0..inst.n() {
            assert!(inst.subset_size(j) >= 1);
        }
    }
}
