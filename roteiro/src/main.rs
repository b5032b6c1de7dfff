use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use roteiro_network::{NetworkConfig, RoadNetwork};
use roteiro_optimizer::json::{ProblemInput, build_report};
use roteiro_optimizer::{Method, Solver};

/// Solves a vehicle routing problem from a JSON payload and writes the
/// formatted solution report.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Problem payload (vehicles, points, method)
    #[arg(short, long)]
    input: PathBuf,

    /// Report destination; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// OSM area to route over, e.g. "Maringá, Paraná, Brazil".
    /// Distances fall back to scaled haversine estimates when omitted.
    #[arg(short, long)]
    area: Option<String>,

    /// Override the payload's optimization method (vnd, tabu, grasp)
    #[arg(short, long)]
    method: Option<String>,

    /// Override the payload's iteration cap
    #[arg(long)]
    max_iterations: Option<usize>,

    /// RNG seed for reproducible GRASP runs
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let payload = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let input: ProblemInput = serde_json::from_str(&payload).context("parsing problem payload")?;

    let network: Option<Arc<RoadNetwork>> = match &cli.area {
        Some(area) => {
            info!(area, "loading road network");
            Some(
                RoadNetwork::shared(area, &NetworkConfig::default())
                    .with_context(|| format!("loading road network for {area:?}"))?,
            )
        }
        None => None,
    };

    let (problem, mut params) = input
        .into_problem(network.as_deref())
        .context("building routing problem")?;

    if let Some(name) = &cli.method {
        params.method = Method::from_name(name);
        anyhow::ensure!(params.method.is_some(), "unknown method {name:?}");
    }
    if let Some(max_iterations) = cli.max_iterations {
        params.max_iterations = max_iterations;
    }
    params.seed = cli.seed.or(params.seed);

    let outcome = Solver::new(&problem, params).solve();
    let report = build_report(&problem, &outcome.solution, outcome.elapsed);
    let rendered = serde_json::to_string_pretty(&report)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
