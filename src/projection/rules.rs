//! Status rules applied to a year's gross flows

use super::YearFlows;
use crate::model::VersionStatus;

/// Adjust a year's gross flows for the version's status
///
/// | status   | inflow | outflow     |
/// |----------|--------|-------------|
/// | Alive    | gross  | gross       |
/// | Dead     | 0      | gross / 2   |
/// | Disabled | 0      | gross       |
pub fn apply_status_rule(status: VersionStatus, gross: YearFlows) -> YearFlows {
    match status {
        VersionStatus::Alive => gross,
        VersionStatus::Dead => YearFlows { inflow: 0.0, outflow: gross.outflow / 2.0 },
        VersionStatus::Disabled => YearFlows { inflow: 0.0, outflow: gross.outflow },
    }
}
