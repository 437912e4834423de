//! Projection engine for yearly wealth trajectories

mod balance;
mod cashflows;
mod rules;
mod state;
mod engine;
mod result;

pub use balance::initial_balance;
pub use cashflows::{event_flows, premium_total, YearFlows};
pub use rules::apply_status_rule;
pub use state::ProjectionState;
pub use engine::{ProjectionEngine, ProjectionInput};
pub use result::{FlowDetail, PatrimonyBreakdown, Projection, ProjectionPoint};

/// Last projected calendar year when no horizon is configured
pub const DEFAULT_HORIZON_YEAR: i32 = 2060;

// ============================================================================
// Patrimony Breakdown Shares
// ============================================================================
// Display estimates applied to the projected balance. They are not derived
// from per-asset-type balances; the engine tracks a single balance only.

/// Share of the balance shown as financial assets (70%)
pub const FINANCIAL_SHARE: f64 = 0.70;

/// Share of the balance shown as fixed assets (30%)
pub const FIXED_ASSET_SHARE: f64 = 0.30;

/// Share of the balance shown as the total excluding insurance (90%)
pub const WITHOUT_INSURANCE_SHARE: f64 = 0.90;
