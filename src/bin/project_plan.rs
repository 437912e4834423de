//! Project simulations from a plan file
//!
//! Prints the projection outcomes as JSON, or writes one CSV row per
//! projected year when `--csv` is given.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;
use wealth_projection::model::load_plan;
use wealth_projection::report::write_outcomes_csv;
use wealth_projection::{PlannerConfig, ProjectionService, VersionStatus};

#[derive(Parser, Debug)]
#[command(name = "project_plan", about = "Project yearly wealth for the simulations in a plan file")]
struct Args {
    /// JSON plan file with simulations, versions and their records
    #[arg(long)]
    plan: PathBuf,

    /// Project only this simulation's latest version
    #[arg(long, conflicts_with = "version")]
    simulation: Option<u64>,

    /// Project this specific version
    #[arg(long)]
    version: Option<u64>,

    /// Override the stored status (Alive, Dead, Disabled)
    #[arg(long)]
    status: Option<VersionStatus>,

    /// Last projected year (default 2060)
    #[arg(long)]
    horizon: Option<i32>,

    /// Attach the estimated patrimony breakdown to every year
    #[arg(long)]
    breakdown: bool,

    /// Attach each year's adjusted inflow, outflow and premiums
    #[arg(long)]
    detailed: bool,

    /// JSON config file; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write CSV rows here instead of printing JSON
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let mut config = match &args.config {
        Some(path) => PlannerConfig::from_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => PlannerConfig::default(),
    };
    if let Some(horizon) = args.horizon {
        config.horizon_year = horizon;
    }
    config.include_breakdown |= args.breakdown;
    config.detailed_output |= args.detailed;
    config.validate()?;

    let store = load_plan(&args.plan)
        .with_context(|| format!("Failed to load plan {}", args.plan.display()))?;
    log::info!("Plan loaded in {:?}", start.elapsed());

    let service = ProjectionService::new(&store, config);
    let outcomes = match (args.simulation, args.version) {
        (Some(simulation_id), _) => vec![service.project_simulation(simulation_id, args.status)?],
        (None, Some(version_id)) => vec![service.project_version(version_id, args.status)?],
        (None, None) => {
            if args.status.is_some() {
                bail!("--status needs --simulation or --version");
            }
            service.project_latest_all()
        }
    };

    match &args.csv {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let rows = write_outcomes_csv(BufWriter::new(file), &outcomes)?;
            println!("Wrote {} rows to {}", rows, path.display());
        }
        None => {
            let json = if outcomes.len() == 1 {
                serde_json::to_string_pretty(&outcomes[0])?
            } else {
                serde_json::to_string_pretty(&outcomes)?
            };
            println!("{}", json);
        }
    }

    log::info!("Total time: {:?}", start.elapsed());
    Ok(())
}
