//! Plan records and plan-file loading

mod data;
pub mod dates;
pub mod loader;

pub use data::{
    Allocation, AllocationType, Event, EventKind, Financing, Frequency, Insurance, Simulation,
    SimulationVersion, VersionStatus,
};
pub use dates::parse_date;
pub use loader::{load_plan, load_plan_from_reader, PlanFile, PlanSimulation, PlanVersion};
