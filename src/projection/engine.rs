//! Year-by-year projection of a single simulation version

use super::{
    apply_status_rule, event_flows, initial_balance, premium_total, FlowDetail, PatrimonyBreakdown,
    Projection, ProjectionPoint, ProjectionState,
};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::model::{Allocation, Event, Insurance, SimulationVersion, VersionStatus};
use chrono::Datelike;

/// Everything the engine reads for one projection
///
/// The version's child collections must already be loaded; the engine does
/// no lookups of its own.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub version: &'a SimulationVersion,
    /// Status used for the rule set; defaults to the version's own
    pub status: VersionStatus,
    pub allocations: &'a [Allocation],
    pub events: &'a [Event],
    pub insurances: &'a [Insurance],
}

impl<'a> ProjectionInput<'a> {
    pub fn new(
        version: &'a SimulationVersion,
        allocations: &'a [Allocation],
        events: &'a [Event],
        insurances: &'a [Insurance],
    ) -> Self {
        Self {
            version,
            status: version.status,
            allocations,
            events,
            insurances,
        }
    }

    /// Project under a different status than the stored one
    pub fn with_status(mut self, status: VersionStatus) -> Self {
        self.status = status;
        self
    }
}

/// Pure projection engine
///
/// Holds only configuration, so one engine can serve concurrent projections.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: PlannerConfig,
}

impl ProjectionEngine {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Roll the starting balance forward from the start year to the horizon
    ///
    /// Each year: aggregate event flows and premiums, apply the status rule,
    /// then `balance = (balance + inflow - outflow - premiums) * (1 + rate/100)`.
    /// Produces exactly `horizon - start_year + 1` points. A horizon outside
    /// the range `PlannerConfig::validate` accepts is rejected up front.
    pub fn project(&self, input: &ProjectionInput<'_>) -> Result<Projection> {
        self.config.validate()?;
        validate(input)?;

        let horizon_year = self.config.horizon_year;
        let start_year = input.version.start_date.year();
        if start_year > horizon_year {
            return Err(PlannerError::invalid_input(
                "startDate",
                format!("start year {} is after horizon year {}", start_year, horizon_year),
            ));
        }

        let start_balance = initial_balance(input.allocations, input.version.start_date);
        let mut state = ProjectionState::new(start_year, start_balance, input.version.real_rate);
        let mut points = Vec::with_capacity((horizon_year - start_year + 1) as usize);

        log::debug!(
            "Projecting version {} ({}) {}..={} from balance {:.2}",
            input.version.id,
            input.status,
            start_year,
            horizon_year,
            start_balance
        );

        while state.year <= horizon_year {
            let gross = event_flows(input.events, state.year, horizon_year);
            let premiums = premium_total(input.insurances, state.year);
            let adjusted = apply_status_rule(input.status, gross);
            let year = state.advance(adjusted, premiums);

            log::trace!(
                "{}: in={:.2} out={:.2} premiums={:.2} balance={:.2}",
                year,
                adjusted.inflow,
                adjusted.outflow,
                premiums,
                state.balance
            );

            points.push(ProjectionPoint {
                year,
                balance: state.balance,
                breakdown: self
                    .config
                    .include_breakdown
                    .then(|| PatrimonyBreakdown::estimate(state.balance)),
                flows: self.config.detailed_output.then_some(FlowDetail {
                    inflow: adjusted.inflow,
                    outflow: adjusted.outflow,
                    premiums,
                }),
            });
        }

        Ok(Projection {
            version_id: input.version.id,
            status: input.status,
            start_balance,
            points,
        })
    }
}

/// Reject non-finite numbers before they reach the compounding loop
fn validate(input: &ProjectionInput<'_>) -> Result<()> {
    ensure_finite("realRate", input.version.real_rate)?;
    for allocation in input.allocations {
        ensure_finite("allocation.value", allocation.value)?;
    }
    for event in input.events {
        ensure_finite("event.value", event.value)?;
    }
    for insurance in input.insurances {
        if let Some(premium) = insurance.premium {
            ensure_finite("insurance.premium", premium)?;
        }
    }
    Ok(())
}

fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PlannerError::invalid_input(field, format!("{} is not a finite number", value)))
    }
}
