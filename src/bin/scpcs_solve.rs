//! CLI driver: loads one or more SCPCS instances and solves each with the full MIP model,
//! the Lagrangean branch-and-bound search, or both.

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use scpcs_solver::branch_and_bound::{self, SearchOptions};
use scpcs_solver::loader;
use scpcs_solver::mip::{self, MipStatus};
use scpcs_solver::{Result, ScpcsError};

#[derive(Parser, Debug)]
#[command(name = "scpcs-solve", about = "Solve Set Covering Problems with Conflicts")]
struct Cli {
    /// Space-separated instance file paths, e.g. -inst "a.txt b.txt"
    #[arg(long = "inst")]
    inst: Option<String>,

    /// Solve the full SCPCS MIP model directly via HiGHS.
    #[arg(long = "highs")]
    highs: bool,

    /// Run the Lagrangean branch-and-bound search.
    #[arg(long = "lagrangean")]
    lagrangean: bool,

    /// Conflict derivation threshold tau.
    #[arg(long = "threshold", default_value_t = 0)]
    threshold: i64,

    /// Optional wall-clock bound (seconds) on the Lagrangean search.
    #[arg(long = "time-limit-secs")]
    time_limit_secs: Option<f64>,
}

fn solve_one(path: &str, cli: &Cli) -> Result<()> {
    let file = File::open(path).map_err(ScpcsError::Io)?;
    let instance = loader::load(BufReader::new(file), cli.threshold)?;

    if cli.highs {
        let model = mip::build_full_scpcs(&instance);
        let solved = model.solve()?;
        if !matches!(solved.status, MipStatus::Optimal) {
            return Err(ScpcsError::SolverNonOptimal {
                status: solved.status,
            });
        }
        let x: Vec<bool> = solved.x[..instance.n()].iter().map(|&v| v > 0.5).collect();
        info!(%path, cost = solved.objective, "highs solve complete");
        println!("{path}: highs cost={}", instance.cost(&x));
    }

    if cli.lagrangean {
        let options = SearchOptions {
            time_limit: cli.time_limit_secs.map(std::time::Duration::from_secs_f64),
            ..SearchOptions::default()
        };
        let incumbent = branch_and_bound::solve(&instance, &options)?;
        info!(%path, cost = incumbent.cost, "lagrangean solve complete");
        println!("{path}: lagrangean cost={}", incumbent.cost);
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let Some(inst) = cli.inst.as_deref() else {
        error!("no instance path given (-inst)");
        return ExitCode::FAILURE;
    };
    if !cli.highs && !cli.lagrangean {
        error!("no algorithm selected (-highs and/or -lagrangean)");
        return ExitCode::FAILURE;
    }

    for path in inst.split_whitespace() {
        if let Err(err) = solve_one(path, &cli) {
            error!(%path, %err, "failed to solve instance");
        }
    }

    ExitCode::SUCCESS
}
