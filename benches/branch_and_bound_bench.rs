use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

use scpcs_solver::branch_and_bound::{self, SearchOptions};
use scpcs_solver::generator::{self, GeneratorParams};
use scpcs_solver::loader;

fn random_instance(num_elements: usize, num_subsets: usize, seed: u64) -> scpcs_solver::Instance {
    let params = GeneratorParams {
        num_elements,
        num_subsets,
        mean_density: 0.25,
        stddev_density: 0.1,
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let text = generator::generate(&params, &mut rng);
    loader::load(std::io::Cursor::new(text), 2).expect("generated instance parses")
}

fn bench_branch_and_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("branch_and_bound");
    let options = SearchOptions {
        genetic_stall_rounds: 50,
        time_limit: None,
    };

    for &(m, n) in &[(10usize, 15usize), (15, 25), (20, 30)] {
        let instance = random_instance(m, n, 42);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{m}x{n}")), &instance, |b, instance| {
            b.iter(|| {
                let incumbent = branch_and_bound::solve(black_box(instance), &options).unwrap();
                black_box(incumbent.cost)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_branch_and_bound);
criterion_main!(benches);
