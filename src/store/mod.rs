//! Record storage for simulations, versions and their child collections
//!
//! The orchestration layer reads through [`RecordStore`]; [`InMemoryStore`]
//! is the non-durable implementation used by the binaries and tests.

mod memory;

pub use memory::InMemoryStore;

use crate::model::{Allocation, Event, Insurance, Simulation, SimulationVersion};

/// Read access needed to resolve and project a simulation
pub trait RecordStore {
    /// All simulations, ordered by id
    fn simulations(&self) -> Vec<Simulation>;

    fn simulation(&self, id: u64) -> Option<Simulation>;

    fn version(&self, id: u64) -> Option<SimulationVersion>;

    /// Versions owned by a simulation, ordered by start date
    fn versions_of(&self, simulation_id: u64) -> Vec<SimulationVersion>;

    /// Allocations owned by a version, ordered by date
    fn allocations_of(&self, version_id: u64) -> Vec<Allocation>;

    /// Events owned by a version, ordered by start date
    fn events_of(&self, version_id: u64) -> Vec<Event>;

    /// Insurances owned by a version, ordered by start date
    fn insurances_of(&self, version_id: u64) -> Vec<Insurance>;

    /// Most recent version by start date; ties go to the higher id
    fn latest_version(&self, simulation_id: u64) -> Option<SimulationVersion> {
        self.versions_of(simulation_id)
            .into_iter()
            .max_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)))
    }

    /// The latest version of every simulation that has one
    fn latest_versions(&self) -> Vec<SimulationVersion> {
        self.simulations()
            .iter()
            .filter_map(|simulation| self.latest_version(simulation.id))
            .collect()
    }
}
