//! Wealth Projection - financial-planning backend with a yearly wealth projection engine
//!
//! This library provides:
//! - Simulation, version, allocation, event and insurance records
//! - A pure projection engine rolling a starting balance forward to a horizon year
//! - An in-memory record store and the orchestration service that feeds the engine
//! - Plan-file loading and CSV report output

pub mod error;
pub mod config;
pub mod model;
pub mod projection;
pub mod store;
pub mod service;
pub mod report;

// Re-export commonly used types
pub use error::{PlannerError, Result};
pub use config::PlannerConfig;
pub use model::{Allocation, Event, Insurance, Simulation, SimulationVersion, VersionStatus};
pub use projection::{ProjectionEngine, ProjectionInput, ProjectionPoint, Projection};
pub use store::{InMemoryStore, RecordStore};
pub use service::{ProjectionOutcome, ProjectionReport, ProjectionService};
