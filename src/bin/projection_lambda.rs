//! AWS Lambda entry point
//!
//! The invocation payload carries one version with its child records; the
//! function projects it and returns the outcome JSON. No store is involved.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use wealth_projection::{
    Allocation, Event, Insurance, PlannerConfig, ProjectionEngine, ProjectionInput,
    ProjectionOutcome, ProjectionReport, SimulationVersion, VersionStatus,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionRequest {
    version: SimulationVersion,
    #[serde(default)]
    allocations: Vec<Allocation>,
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    insurances: Vec<Insurance>,
    #[serde(default)]
    horizon_year: Option<i32>,
    #[serde(default)]
    include_breakdown: bool,
    #[serde(default)]
    status: Option<VersionStatus>,
}

async fn handler(event: LambdaEvent<ProjectionRequest>) -> Result<ProjectionOutcome, Error> {
    let (request, context) = event.into_parts();
    log::info!(
        "Request {}: projecting version {} of simulation {}",
        context.request_id,
        request.version.id,
        request.version.simulation_id
    );

    let mut config = PlannerConfig {
        include_breakdown: request.include_breakdown,
        ..Default::default()
    };
    if let Some(horizon) = request.horizon_year {
        config.horizon_year = horizon;
    }
    config.validate()?;

    let mut input = ProjectionInput::new(
        &request.version,
        &request.allocations,
        &request.events,
        &request.insurances,
    );
    if let Some(status) = request.status {
        input = input.with_status(status);
    }

    let projection = ProjectionEngine::new(config).project(&input)?;
    Ok(ProjectionOutcome::Projected(ProjectionReport::new(
        request.version.simulation_id,
        projection,
    )))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
