//! CLI driver: synthesizes a random SCPCS instance file in the plain-text format.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use scpcs_solver::generator::{self, GeneratorParams};

#[derive(Parser, Debug)]
#[command(name = "scpcs-generate", about = "Generate a random SCPCS instance")]
struct Cli {
    /// Output file path.
    #[arg(long = "out")]
    out: Option<String>,

    /// Number of elements in the universe.
    #[arg(long = "elems")]
    elems: Option<usize>,

    /// Number of subsets.
    #[arg(long = "sets")]
    sets: Option<usize>,

    /// Mean of the per-element covering density.
    #[arg(long = "mean-density")]
    mean_density: Option<f64>,

    /// Standard deviation of the per-element covering density.
    #[arg(long = "stddev-density")]
    stddev_density: Option<f64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let (Some(out), Some(elems), Some(sets), Some(meand), Some(stddevd)) = (
        cli.out,
        cli.elems,
        cli.sets,
        cli.mean_density,
        cli.stddev_density,
    ) else {
        error!(
            "missing required flag: --out, --elems, --sets, --mean-density and --stddev-density are all required"
        );
        return ExitCode::FAILURE;
    };

    let params = GeneratorParams {
        num_elements: elems,
        num_subsets: sets,
        mean_density: meand,
        stddev_density: stddevd,
    };
    let mut rng = rand::thread_rng();
    let text = generator::generate(&params, &mut rng);

    if let Err(err) = fs::write(&out, text) {
        error!(%err, path = %out, "failed to write generated instance");
        return ExitCode::FAILURE;
    }

    info!(path = %out, elems, sets, "generated instance");
    ExitCode::SUCCESS
}
