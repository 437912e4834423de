//! Non-durable record store
//!
//! Each entity lives in its own id-keyed table. Ids are assigned from a
//! per-table counter when a record arrives with id 0, and preserved otherwise.

use super::RecordStore;
use crate::error::{PlannerError, Result};
use crate::model::{Allocation, Event, Insurance, Simulation, SimulationVersion};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A record addressable by numeric id
trait Keyed: Clone {
    const ENTITY: &'static str;
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

/// A record owned by a simulation version
trait VersionChild: Keyed {
    fn version_id(&self) -> u64;
    fn sort_date(&self) -> NaiveDate;
}

impl Keyed for Simulation {
    const ENTITY: &'static str = "Simulation";
    fn id(&self) -> u64 { self.id }
    fn set_id(&mut self, id: u64) { self.id = id; }
}

impl Keyed for SimulationVersion {
    const ENTITY: &'static str = "Version";
    fn id(&self) -> u64 { self.id }
    fn set_id(&mut self, id: u64) { self.id = id; }
}

impl Keyed for Allocation {
    const ENTITY: &'static str = "Allocation";
    fn id(&self) -> u64 { self.id }
    fn set_id(&mut self, id: u64) { self.id = id; }
}

impl Keyed for Event {
    const ENTITY: &'static str = "Event";
    fn id(&self) -> u64 { self.id }
    fn set_id(&mut self, id: u64) { self.id = id; }
}

impl Keyed for Insurance {
    const ENTITY: &'static str = "Insurance";
    fn id(&self) -> u64 { self.id }
    fn set_id(&mut self, id: u64) { self.id = id; }
}

impl VersionChild for Allocation {
    fn version_id(&self) -> u64 { self.version_id }
    fn sort_date(&self) -> NaiveDate { self.date }
}

impl VersionChild for Event {
    fn version_id(&self) -> u64 { self.version_id }
    fn sort_date(&self) -> NaiveDate { self.start_date }
}

impl VersionChild for Insurance {
    fn version_id(&self) -> u64 { self.version_id }
    fn sort_date(&self) -> NaiveDate { self.start_date }
}

#[derive(Debug, Clone)]
struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: BTreeMap::new(), next_id: 1 }
    }
}

impl<T: Keyed> Table<T> {
    fn insert(&mut self, mut row: T) -> Result<T> {
        if row.id() == 0 {
            row.set_id(self.next_id);
        } else if self.rows.contains_key(&row.id()) {
            return Err(PlannerError::invalid_input(
                "id",
                format!("{} {} already exists", T::ENTITY, row.id()),
            ));
        }
        let following = row.id().checked_add(1).ok_or_else(|| {
            PlannerError::invalid_input(
                "id",
                format!("{} id {} leaves no room for the next id", T::ENTITY, row.id()),
            )
        })?;
        self.next_id = self.next_id.max(following);
        self.rows.insert(row.id(), row.clone());
        Ok(row)
    }

    fn get(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn replace(&mut self, row: T) -> Result<T> {
        match self.rows.get_mut(&row.id()) {
            Some(slot) => {
                *slot = row.clone();
                Ok(row)
            }
            None => Err(PlannerError::not_found(T::ENTITY, row.id())),
        }
    }

    fn remove(&mut self, id: u64) -> Result<T> {
        self.rows.remove(&id).ok_or_else(|| PlannerError::not_found(T::ENTITY, id))
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

impl<T: VersionChild> Table<T> {
    /// Children of one version, ordered by date then id
    fn owned_by(&self, version_id: u64) -> Vec<T> {
        let mut rows: Vec<T> = self
            .rows
            .values()
            .filter(|row| row.version_id() == version_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.sort_date().cmp(&b.sort_date()).then(a.id().cmp(&b.id())));
        rows
    }

    fn remove_owned_by(&mut self, version_id: u64) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, row| row.version_id() != version_id);
        before - self.rows.len()
    }
}

/// In-memory store with cascade deletes and unique simulation names
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    simulations: Table<Simulation>,
    versions: Table<SimulationVersion>,
    allocations: Table<Allocation>,
    events: Table<Event>,
    insurances: Table<Insurance>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simulation_count(&self) -> usize {
        self.simulations.rows.len()
    }

    // ------------------------------------------------------------------
    // Simulations
    // ------------------------------------------------------------------

    /// Create a simulation with the next free id
    pub fn create_simulation(&mut self, name: impl Into<String>) -> Result<Simulation> {
        self.insert_simulation(0, name)
    }

    /// Insert a simulation under a given id (0 assigns the next free one)
    pub fn insert_simulation(&mut self, id: u64, name: impl Into<String>) -> Result<Simulation> {
        let name = name.into();
        self.check_name_available(&name, None)?;
        let simulation = self.simulations.insert(Simulation { id, name })?;
        log::debug!("Created simulation {} '{}'", simulation.id, simulation.name);
        Ok(simulation)
    }

    pub fn rename_simulation(&mut self, id: u64, name: impl Into<String>) -> Result<Simulation> {
        let name = name.into();
        self.check_name_available(&name, Some(id))?;
        self.simulations.replace(Simulation { id, name })
    }

    /// Delete a simulation together with its versions and their children
    pub fn delete_simulation(&mut self, id: u64) -> Result<Simulation> {
        let simulation = self.simulations.remove(id)?;
        let owned: Vec<u64> = self
            .versions
            .rows
            .values()
            .filter(|version| version.simulation_id == id)
            .map(|version| version.id)
            .collect();
        for version_id in &owned {
            self.delete_version(*version_id)?;
        }
        log::info!("Deleted simulation {} and {} versions", id, owned.len());
        Ok(simulation)
    }

    fn check_name_available(&self, name: &str, except: Option<u64>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(PlannerError::invalid_input("name", "simulation name is empty"));
        }
        let taken = self
            .simulations
            .rows
            .values()
            .any(|existing| existing.name == name && Some(existing.id) != except);
        if taken {
            return Err(PlannerError::DuplicateName { name: name.to_string() });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Versions
    // ------------------------------------------------------------------

    pub fn versions(&self) -> Vec<SimulationVersion> {
        self.versions.all()
    }

    pub fn insert_version(&mut self, version: SimulationVersion) -> Result<SimulationVersion> {
        self.require_simulation(version.simulation_id)?;
        let version = self.versions.insert(version)?;
        log::debug!(
            "Created version {} of simulation {} starting {}",
            version.id,
            version.simulation_id,
            version.start_date
        );
        Ok(version)
    }

    pub fn update_version(&mut self, version: SimulationVersion) -> Result<SimulationVersion> {
        self.require_simulation(version.simulation_id)?;
        self.versions.replace(version)
    }

    /// Delete a version and every allocation, event and insurance it owns
    pub fn delete_version(&mut self, id: u64) -> Result<SimulationVersion> {
        let version = self.versions.remove(id)?;
        let removed = self.allocations.remove_owned_by(id)
            + self.events.remove_owned_by(id)
            + self.insurances.remove_owned_by(id);
        log::debug!("Deleted version {} and {} child records", id, removed);
        Ok(version)
    }

    fn require_simulation(&self, id: u64) -> Result<()> {
        self.simulations
            .get(id)
            .map(|_| ())
            .ok_or_else(|| PlannerError::not_found(Simulation::ENTITY, id))
    }

    fn require_version(&self, id: u64) -> Result<()> {
        self.versions
            .get(id)
            .map(|_| ())
            .ok_or_else(|| PlannerError::not_found(SimulationVersion::ENTITY, id))
    }

    // ------------------------------------------------------------------
    // Allocations
    // ------------------------------------------------------------------

    pub fn allocations(&self) -> Vec<Allocation> {
        self.allocations.all()
    }

    pub fn allocation(&self, id: u64) -> Option<Allocation> {
        self.allocations.get(id).cloned()
    }

    pub fn insert_allocation(&mut self, allocation: Allocation) -> Result<Allocation> {
        self.require_version(allocation.version_id)?;
        self.allocations.insert(allocation)
    }

    pub fn update_allocation(&mut self, allocation: Allocation) -> Result<Allocation> {
        self.require_version(allocation.version_id)?;
        self.allocations.replace(allocation)
    }

    pub fn delete_allocation(&mut self, id: u64) -> Result<Allocation> {
        self.allocations.remove(id)
    }

    /// Every valuation recorded under the same asset name, oldest first
    ///
    /// Matches by name across all versions.
    pub fn allocation_history(&self, allocation_id: u64) -> Result<Vec<Allocation>> {
        let anchor = self
            .allocations
            .get(allocation_id)
            .ok_or_else(|| PlannerError::not_found(Allocation::ENTITY, allocation_id))?;
        let mut history: Vec<Allocation> = self
            .allocations
            .rows
            .values()
            .filter(|allocation| allocation.name == anchor.name)
            .cloned()
            .collect();
        history.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(history)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn events(&self) -> Vec<Event> {
        self.events.all()
    }

    pub fn event(&self, id: u64) -> Option<Event> {
        self.events.get(id).cloned()
    }

    pub fn insert_event(&mut self, event: Event) -> Result<Event> {
        self.require_version(event.version_id)?;
        self.events.insert(event)
    }

    pub fn update_event(&mut self, event: Event) -> Result<Event> {
        self.require_version(event.version_id)?;
        self.events.replace(event)
    }

    pub fn delete_event(&mut self, id: u64) -> Result<Event> {
        self.events.remove(id)
    }

    // ------------------------------------------------------------------
    // Insurances
    // ------------------------------------------------------------------

    pub fn insurances(&self) -> Vec<Insurance> {
        self.insurances.all()
    }

    pub fn insurance(&self, id: u64) -> Option<Insurance> {
        self.insurances.get(id).cloned()
    }

    pub fn insert_insurance(&mut self, insurance: Insurance) -> Result<Insurance> {
        self.require_version(insurance.version_id)?;
        self.insurances.insert(insurance)
    }

    pub fn update_insurance(&mut self, insurance: Insurance) -> Result<Insurance> {
        self.require_version(insurance.version_id)?;
        self.insurances.replace(insurance)
    }

    pub fn delete_insurance(&mut self, id: u64) -> Result<Insurance> {
        self.insurances.remove(id)
    }
}

impl RecordStore for InMemoryStore {
    fn simulations(&self) -> Vec<Simulation> {
        self.simulations.all()
    }

    fn simulation(&self, id: u64) -> Option<Simulation> {
        self.simulations.get(id).cloned()
    }

    fn version(&self, id: u64) -> Option<SimulationVersion> {
        self.versions.get(id).cloned()
    }

    fn versions_of(&self, simulation_id: u64) -> Vec<SimulationVersion> {
        let mut versions: Vec<SimulationVersion> = self
            .versions
            .rows
            .values()
            .filter(|version| version.simulation_id == simulation_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        versions
    }

    fn allocations_of(&self, version_id: u64) -> Vec<Allocation> {
        self.allocations.owned_by(version_id)
    }

    fn events_of(&self, version_id: u64) -> Vec<Event> {
        self.events.owned_by(version_id)
    }

    fn insurances_of(&self, version_id: u64) -> Vec<Insurance> {
        self.insurances.owned_by(version_id)
    }
}
