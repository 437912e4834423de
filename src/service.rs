//! Orchestration between the record store and the projection engine
//!
//! Resolves which version to project, loads its child records, runs the
//! engine and shapes the result. A simulation without a resolvable version is
//! reported as a value, leaving transport semantics to the caller.

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::model::{SimulationVersion, VersionStatus};
use crate::projection::{Projection, ProjectionEngine, ProjectionInput, ProjectionPoint};
use crate::store::RecordStore;
use rayon::prelude::*;
use serde::Serialize;

/// Message carried by a not-found outcome
pub const NOT_FOUND_MESSAGE: &str = "Simulation/version not found";

/// Projection of one simulation, ready to serialize
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    pub simulation_id: u64,
    pub version_id: u64,
    pub status: VersionStatus,
    pub projection: Vec<ProjectionPoint>,
}

impl ProjectionReport {
    pub fn new(simulation_id: u64, projection: Projection) -> Self {
        Self {
            simulation_id,
            version_id: projection.version_id,
            status: projection.status,
            projection: projection.points,
        }
    }
}

/// Result of asking for a simulation's projection
///
/// Serializes as the report itself, as `{"error": "..."}`, or, for a
/// simulation whose projection was rejected inside a batch, as
/// `{"simulationId": .., "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProjectionOutcome {
    Projected(ProjectionReport),
    #[serde(rename_all = "camelCase")]
    Failed { simulation_id: u64, error: String },
    NotFound { error: String },
}

impl ProjectionOutcome {
    pub fn not_found() -> Self {
        ProjectionOutcome::NotFound { error: NOT_FOUND_MESSAGE.to_string() }
    }

    pub fn report(&self) -> Option<&ProjectionReport> {
        match self {
            ProjectionOutcome::Projected(report) => Some(report),
            ProjectionOutcome::Failed { .. } | ProjectionOutcome::NotFound { .. } => None,
        }
    }
}

/// Projects simulations held in a record store
pub struct ProjectionService<'a, S: RecordStore> {
    store: &'a S,
    engine: ProjectionEngine,
}

impl<'a, S: RecordStore> ProjectionService<'a, S> {
    pub fn new(store: &'a S, config: PlannerConfig) -> Self {
        Self {
            store,
            engine: ProjectionEngine::new(config),
        }
    }

    /// Project a simulation's most recent version (by start date)
    ///
    /// `status_override` replaces the stored status for this run only.
    pub fn project_simulation(
        &self,
        simulation_id: u64,
        status_override: Option<VersionStatus>,
    ) -> Result<ProjectionOutcome> {
        if self.store.simulation(simulation_id).is_none() {
            log::warn!("Projection requested for unknown simulation {}", simulation_id);
            return Ok(ProjectionOutcome::not_found());
        }
        match self.store.latest_version(simulation_id) {
            Some(version) => self.project_resolved(&version, status_override),
            None => {
                log::warn!("Simulation {} has no versions to project", simulation_id);
                Ok(ProjectionOutcome::not_found())
            }
        }
    }

    /// Project an explicitly chosen version
    pub fn project_version(
        &self,
        version_id: u64,
        status_override: Option<VersionStatus>,
    ) -> Result<ProjectionOutcome> {
        match self.store.version(version_id) {
            Some(version) => self.project_resolved(&version, status_override),
            None => {
                log::warn!("Projection requested for unknown version {}", version_id);
                Ok(ProjectionOutcome::not_found())
            }
        }
    }

    fn project_resolved(
        &self,
        version: &SimulationVersion,
        status_override: Option<VersionStatus>,
    ) -> Result<ProjectionOutcome> {
        let allocations = self.store.allocations_of(version.id);
        let events = self.store.events_of(version.id);
        let insurances = self.store.insurances_of(version.id);

        let mut input = ProjectionInput::new(version, &allocations, &events, &insurances);
        if let Some(status) = status_override {
            input = input.with_status(status);
        }

        let projection = self.engine.project(&input)?;
        log::info!(
            "Projected simulation {} version {} ({}): {} years, final balance {:.2}",
            version.simulation_id,
            version.id,
            projection.status,
            projection.points.len(),
            projection.final_balance().unwrap_or(0.0)
        );
        Ok(ProjectionOutcome::Projected(ProjectionReport::new(version.simulation_id, projection)))
    }
}

impl<'a, S: RecordStore + Sync> ProjectionService<'a, S> {
    /// Project every simulation's latest version in parallel
    ///
    /// Outcomes follow simulation id order; simulations without versions
    /// yield not-found outcomes. A simulation whose projection is rejected
    /// yields a failed outcome and does not stop the others.
    pub fn project_latest_all(&self) -> Vec<ProjectionOutcome> {
        let simulations = self.store.simulations();
        log::info!("Projecting {} simulations", simulations.len());

        simulations
            .par_iter()
            .map(|simulation| {
                self.project_simulation(simulation.id, None)
                    .unwrap_or_else(|err| {
                        log::warn!("Skipping simulation {}: {}", simulation.id, err);
                        ProjectionOutcome::Failed {
                            simulation_id: simulation.id,
                            error: err.to_string(),
                        }
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Allocation, AllocationType, Event, EventKind, Financing, Frequency};
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn version(simulation_id: u64, start: NaiveDate, status: VersionStatus) -> SimulationVersion {
        SimulationVersion {
            id: 0,
            simulation_id,
            status,
            start_date: start,
            real_rate: 4.0,
            is_current: false,
        }
    }

    /// Simulation 1 holds the worked example; simulation 2 has no versions
    fn seeded_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        let sim = store.create_simulation("Family plan").unwrap();
        store.create_simulation("Empty plan").unwrap();

        let v = store
            .insert_version(version(sim.id, date(2025, 1, 1), VersionStatus::Alive))
            .unwrap();
        store
            .insert_allocation(Allocation {
                id: 0,
                version_id: v.id,
                kind: AllocationType::Financial,
                name: "Savings".to_string(),
                value: 10_000.0,
                date: date(2024, 12, 1),
                financing: Financing::default(),
            })
            .unwrap();
        store
            .insert_event(Event {
                id: 0,
                version_id: v.id,
                kind: EventKind::Inflow,
                value: 1_000.0,
                frequency: Frequency::Monthly,
                start_date: date(2025, 1, 1),
                end_date: None,
            })
            .unwrap();
        store
    }

    #[test]
    fn test_project_latest_version() {
        let store = seeded_store();
        let service = ProjectionService::new(&store, PlannerConfig::default());
        let outcome = service.project_simulation(1, None).unwrap();

        let report = outcome.report().expect("projected");
        assert_eq!(report.simulation_id, 1);
        assert_eq!(report.status, VersionStatus::Alive);
        assert_eq!(report.projection.len(), 36);
        assert!((report.projection[0].balance - 22_880.0).abs() < 1e-6);
    }

    #[test]
    fn test_newer_version_wins() {
        let mut store = seeded_store();
        let newer = store
            .insert_version(version(1, date(2030, 1, 1), VersionStatus::Dead))
            .unwrap();
        let service = ProjectionService::new(&store, PlannerConfig::default());
        let report = service.project_simulation(1, None).unwrap().report().cloned().unwrap();

        assert_eq!(report.version_id, newer.id);
        assert_eq!(report.status, VersionStatus::Dead);
        assert_eq!(report.projection[0].year, 2030);
    }

    #[test]
    fn test_status_override() {
        let store = seeded_store();
        let service = ProjectionService::new(&store, PlannerConfig::default());
        let report = service
            .project_simulation(1, Some(VersionStatus::Dead))
            .unwrap()
            .report()
            .cloned()
            .unwrap();
        assert_eq!(report.status, VersionStatus::Dead);
        assert!((report.projection[0].balance - 10_400.0).abs() < 1e-6);
    }

    #[test]
    fn test_not_found_is_a_value() {
        let store = seeded_store();
        let service = ProjectionService::new(&store, PlannerConfig::default());

        for outcome in [
            service.project_simulation(2, None).unwrap(),
            service.project_simulation(99, None).unwrap(),
            service.project_version(99, None).unwrap(),
        ] {
            assert_eq!(outcome, ProjectionOutcome::not_found());
            let json = serde_json::to_value(&outcome).unwrap();
            assert_eq!(json, serde_json::json!({"error": "Simulation/version not found"}));
        }
    }

    #[test]
    fn test_report_json_shape() {
        let store = seeded_store();
        let service = ProjectionService::new(&store, PlannerConfig::default());
        let json = serde_json::to_value(service.project_simulation(1, None).unwrap()).unwrap();

        assert_eq!(json["simulationId"], 1);
        assert_eq!(json["status"], "Alive");
        assert_eq!(json["projection"][0]["year"], 2025);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_project_latest_all() {
        let store = seeded_store();
        let service = ProjectionService::new(&store, PlannerConfig::default());
        let outcomes = service.project_latest_all();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].report().map(|r| r.simulation_id), Some(1));
        assert_eq!(outcomes[1], ProjectionOutcome::not_found());
    }

    #[test]
    fn test_batch_survives_rejected_simulation() {
        let mut store = seeded_store();
        let late = store.create_simulation("Late plan").unwrap();
        store
            .insert_version(version(late.id, date(2070, 1, 1), VersionStatus::Alive))
            .unwrap();
        let service = ProjectionService::new(&store, PlannerConfig::default());

        assert!(service.project_simulation(late.id, None).is_err());

        let outcomes = service.project_latest_all();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].report().map(|r| r.projection.len()), Some(36));
        assert_eq!(outcomes[1], ProjectionOutcome::not_found());
        match &outcomes[2] {
            ProjectionOutcome::Failed { simulation_id, error } => {
                assert_eq!(*simulation_id, late.id);
                assert!(error.contains("2070"), "{}", error);
            }
            other => panic!("expected a failed outcome, got {:?}", other),
        }

        let json = serde_json::to_value(&outcomes[2]).unwrap();
        assert_eq!(json["simulationId"], late.id);
        assert!(json["error"].is_string());
    }
}
