//! Load a plan file into an in-memory record store
//!
//! A plan file mirrors the nested shape a relational store returns when a
//! simulation is fetched together with its versions and their children:
//! `{ "simulations": [ { "id", "name", "versions": [ { ..., "allocations": [...] } ] } ] }`.
//! Parent ids are implied by nesting and need not be repeated in children.

use super::{Allocation, Event, Insurance, SimulationVersion};
use crate::error::Result;
use crate::store::InMemoryStore;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub simulations: Vec<PlanSimulation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSimulation {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub versions: Vec<PlanVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanVersion {
    #[serde(flatten)]
    pub version: SimulationVersion,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub insurances: Vec<Insurance>,
}

/// Load a plan file from disk
pub fn load_plan(path: impl AsRef<Path>) -> Result<InMemoryStore> {
    let file = File::open(path.as_ref())?;
    log::info!("Loading plan from {}", path.as_ref().display());
    load_plan_from_reader(BufReader::new(file))
}

/// Load a plan from any reader
pub fn load_plan_from_reader<R: Read>(reader: R) -> Result<InMemoryStore> {
    let plan: PlanFile = serde_json::from_reader(reader)?;
    plan.into_store()
}

impl PlanFile {
    /// Insert every record, keeping the ids given in the file
    ///
    /// Records without an id (id 0) get the next free one.
    pub fn into_store(self) -> Result<InMemoryStore> {
        let mut store = InMemoryStore::new();
        let mut version_count = 0usize;
        let mut child_count = 0usize;

        for plan_simulation in self.simulations {
            let simulation = store.insert_simulation(plan_simulation.id, plan_simulation.name)?;

            for plan_version in plan_simulation.versions {
                let mut version = plan_version.version;
                version.simulation_id = simulation.id;
                let version = store.insert_version(version)?;
                version_count += 1;

                for mut allocation in plan_version.allocations {
                    allocation.version_id = version.id;
                    store.insert_allocation(allocation)?;
                    child_count += 1;
                }
                for mut event in plan_version.events {
                    event.version_id = version.id;
                    store.insert_event(event)?;
                    child_count += 1;
                }
                for mut insurance in plan_version.insurances {
                    insurance.version_id = version.id;
                    store.insert_insurance(insurance)?;
                    child_count += 1;
                }
            }
        }

        log::info!(
            "Loaded {} simulations, {} versions, {} child records",
            store.simulation_count(),
            version_count,
            child_count
        );
        Ok(store)
    }
}
