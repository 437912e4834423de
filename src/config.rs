//! Projection configuration
//!
//! Loaded from a JSON file (every field optional) and overridden by CLI flags.

use crate::error::{PlannerError, Result};
use crate::projection::DEFAULT_HORIZON_YEAR;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Earliest and latest horizon years accepted by `validate`
const MIN_HORIZON_YEAR: i32 = 1900;
const MAX_HORIZON_YEAR: i32 = 2200;

/// Parameters controlling the shape of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Last projected calendar year, inclusive (default: 2060)
    #[serde(default = "default_horizon_year")]
    pub horizon_year: i32,

    /// Attach the estimated 70/30/90 patrimony breakdown to every year
    #[serde(default)]
    pub include_breakdown: bool,

    /// Attach the year's adjusted inflow, outflow and premiums to every year
    #[serde(default)]
    pub detailed_output: bool,
}

fn default_horizon_year() -> i32 { DEFAULT_HORIZON_YEAR }

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            horizon_year: DEFAULT_HORIZON_YEAR,
            include_breakdown: false,
            detailed_output: false,
        }
    }
}

impl PlannerConfig {
    /// Read a config from a JSON file and validate it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("Loaded config from {}: {:?}", path.as_ref().display(), config);
        Ok(config)
    }

    /// Reject horizons no plan could sensibly target
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HORIZON_YEAR..=MAX_HORIZON_YEAR).contains(&self.horizon_year) {
            return Err(PlannerError::invalid_config(format!(
                "horizon year {} outside {}..={}",
                self.horizon_year, MIN_HORIZON_YEAR, MAX_HORIZON_YEAR
            )));
        }
        Ok(())
    }
}
