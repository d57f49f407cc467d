//! End-to-end scenarios from the SCPCS testable-properties seed data (E1-E6).

use scpcs_solver::branch_and_bound::{self, SearchOptions};
use scpcs_solver::generator::{self, GeneratorParams};
use scpcs_solver::greedy;
use scpcs_solver::loader;
use scpcs_solver::Instance;

fn quick_options() -> SearchOptions {
    SearchOptions {
        genetic_stall_rounds: 10,
        time_limit: None,
    }
}

#[test]
fn e1_trivial_cover() {
    let incidence = vec![vec![true, false], vec![false, true]];
    let inst = Instance::new(
        &incidence,
        vec![1.0, 1.0],
        &[vec![0.0, 0.0], vec![0.0, 0.0]],
    )
    .unwrap();

    let incumbent = branch_and_bound::solve(&inst, &quick_options()).unwrap();
    assert!(inst.feasible(&incumbent.x));
    assert_eq!(incumbent.x, vec![true, true]);
    assert!((incumbent.cost - 2.0).abs() < 1e-6);
}

#[test]
fn e2_cheapest_single_cover_must_pick_both() {
    let incidence = vec![
        vec![true, false],
        vec![true, true],
        vec![false, true],
    ];
    let inst = Instance::new(
        &incidence,
        vec![5.0, 3.0],
        &[vec![0.0, 0.0], vec![0.0, 0.0]],
    )
    .unwrap();

    let incumbent = branch_and_bound::solve(&inst, &quick_options()).unwrap();
    assert!(inst.feasible(&incumbent.x));
    assert!((incumbent.cost - 8.0).abs() < 1e-6);
}

#[test]
fn e3_conflict_forces_redundant_pick() {
    // Each subset covers two of three elements, so any two subsets form a feasible
    // cover; the cheapest pair on linear cost alone ({0,1}) carries a conflict surcharge
    // that makes a costlier, conflict-free pair the true optimum.
    let incidence = vec![
        vec![true, false, true],
        vec![true, true, false],
        vec![false, true, true],
    ];
    let mut conflicts = vec![vec![0.0; 3]; 3];
    conflicts[0][1] = 100.0;
    conflicts[1][0] = 100.0;
    let inst = Instance::new(&incidence, vec![1.0, 1.0, 10.0], &conflicts).unwrap();

    let incumbent = branch_and_bound::solve(&inst, &quick_options()).unwrap();
    assert!(inst.feasible(&incumbent.x));
    assert!((incumbent.cost - 11.0).abs() < 1e-6);
    assert!(!(incumbent.x[0] && incumbent.x[1]));
}

#[test]
fn e4_dominated_conflict_pair() {
    // Subset 2 only covers the element shared with 0 and 1; neither {0,2} nor {1,2}
    // covers the universe, so {0,1} is the only feasible pair despite its surcharge,
    // and it still beats the full triple.
    let incidence = vec![
        vec![true, false, false],
        vec![false, true, false],
        vec![true, true, true],
    ];
    let mut conflicts = vec![vec![0.0; 3]; 3];
    conflicts[0][1] = 1.0;
    conflicts[1][0] = 1.0;
    let inst = Instance::new(&incidence, vec![2.0, 2.0, 2.0], &conflicts).unwrap();

    let incumbent = branch_and_bound::solve(&inst, &quick_options()).unwrap();
    assert!(inst.feasible(&incumbent.x));
    assert!((incumbent.cost - 5.0).abs() < 1e-6);
}

#[test]
fn e5_infeasibility_is_fathomed_without_crashing() {
    // Element 0 is covered only by subset 0; fixing subset 0 off at fixed=1 makes the
    // prefix unrepairable, but the search must still terminate with a valid incumbent.
    let incidence = vec![
        vec![true, false],
        vec![true, true],
    ];
    let inst = Instance::new(
        &incidence,
        vec![1.0, 1.0],
        &[vec![0.0, 0.0], vec![0.0, 0.0]],
    )
    .unwrap();

    let forced_off = vec![false, false];
    let err = greedy::greedy_repair(&inst, &forced_off, 1).unwrap_err();
    assert!(matches!(err, scpcs_solver::ScpcsError::Infeasible));

    let incumbent = branch_and_bound::solve(&inst, &quick_options()).unwrap();
    assert!(inst.feasible(&incumbent.x));
}

#[test]
fn e6_genetic_bound_is_never_worse_than_the_search_result() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let params = GeneratorParams {
        num_elements: 20,
        num_subsets: 30,
        mean_density: 0.2,
        stddev_density: 0.05,
    };
    let mut rng = StdRng::seed_from_u64(11);
    let text = generator::generate(&params, &mut rng);
    let inst = loader::load(std::io::Cursor::new(text), 3).unwrap();

    let genetic_result =
        scpcs_solver::genetic::genetic_heuristic(&inst, &vec![false; inst.n()], 0, 50)
            .expect("low-conflict-density instance should yield a feasible genetic cover");
    assert!(inst.feasible(&genetic_result.x));

    let incumbent = branch_and_bound::solve(&inst, &quick_options()).unwrap();
    assert!(inst.feasible(&incumbent.x));
    assert!(incumbent.cost <= genetic_result.cost + 1e-6);
}

#[test]
fn loader_round_trips_a_generated_instance() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let params = GeneratorParams {
        num_elements: 6,
        num_subsets: 9,
        mean_density: 0.4,
        stddev_density: 0.1,
    };
    let mut rng = StdRng::seed_from_u64(3);
    let text = generator::generate(&params, &mut rng);

    let inst = loader::load(std::io::Cursor::new(text), 0).unwrap();
    assert_eq!(inst.m(), 6);
    assert_eq!(inst.n(), 9);
    for i in 0..inst.m() {
        assert!(!inst.covering_subsets(i).is_empty());
    }
}

#[test]
fn loader_reports_parse_errors_without_panicking() {
    let malformed = "2 2\nnot-a-cost 1\n1 1\n1 2\n";
    let err = loader::load(std::io::Cursor::new(malformed), 0).unwrap_err();
    assert!(matches!(err, scpcs_solver::ScpcsError::Parse { line: 2, .. }));
}
