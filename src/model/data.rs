//! Record types for simulations, versions and their child collections

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Life/plan state of a simulation version
///
/// Drives the status rule applied to each projected year's cash flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionStatus {
    /// Normal operation
    #[serde(alias = "Vivo")]
    Alive,
    /// Plan holder deceased: no income, spending halved
    #[serde(alias = "Morto")]
    Dead,
    /// Plan holder disabled: no income, spending unchanged
    #[serde(alias = "Inválido", alias = "Invalido")]
    Disabled,
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VersionStatus::Alive => "Alive",
            VersionStatus::Dead => "Dead",
            VersionStatus::Disabled => "Disabled",
        };
        f.write_str(label)
    }
}

impl FromStr for VersionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alive" | "vivo" => Ok(VersionStatus::Alive),
            "dead" | "morto" => Ok(VersionStatus::Dead),
            "disabled" | "inválido" | "invalido" => Ok(VersionStatus::Disabled),
            other => Err(format!("unknown status '{}' (expected Alive, Dead or Disabled)", other)),
        }
    }
}

/// Recurrence of a cash-flow event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "one-time", alias = "única", alias = "unica")]
    OneTime,
    #[serde(rename = "monthly", alias = "mensal")]
    Monthly,
    #[serde(rename = "yearly", alias = "anual")]
    Yearly,
}

impl Frequency {
    /// Number of times the event's value is counted in an active year
    ///
    /// Monthly events are annualized to a full 12 months even in partial years.
    pub fn occurrences_per_year(self) -> f64 {
        match self {
            Frequency::OneTime | Frequency::Yearly => 1.0,
            Frequency::Monthly => 12.0,
        }
    }
}

/// Direction of an event's cash flow
///
/// Stored as a free-form string. Anything other than the inflow/outflow
/// literals is kept verbatim and contributes nothing to a projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Inflow,
    Outflow,
    Unrecognized(String),
}

impl From<String> for EventKind {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "inflow" | "entrada" => EventKind::Inflow,
            "outflow" | "saida" | "saída" => EventKind::Outflow,
            _ => EventKind::Unrecognized(raw),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Inflow => "inflow".to_string(),
            EventKind::Outflow => "outflow".to_string(),
            EventKind::Unrecognized(raw) => raw,
        }
    }
}

/// Kind of asset an allocation values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationType {
    #[serde(rename = "financial", alias = "financeira")]
    Financial,
    #[serde(rename = "fixed-asset", alias = "imobilizada")]
    FixedAsset,
}

/// A named financial plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    #[serde(default)]
    pub id: u64,
    pub name: String,
}

/// A dated snapshot of a simulation's parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationVersion {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub simulation_id: u64,
    pub status: VersionStatus,
    /// First projected year is this date's calendar year
    #[serde(with = "super::dates")]
    pub start_date: NaiveDate,
    /// Real interest rate in percent per year (4.0 = 4%)
    pub real_rate: f64,
    #[serde(default)]
    pub is_current: bool,
}

/// Optional financing terms attached to an allocation
///
/// Carried through storage; the projection does not use them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_financing: Option<bool>,
    #[serde(default, with = "super::dates::option", skip_serializing_if = "Option::is_none")]
    pub financing_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing_installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing_entry_value: Option<f64>,
}

/// One valuation of an asset; same-named allocations form a time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    #[serde(default)]
    pub id: u64,
    #[serde(default, alias = "simulationVersionId")]
    pub version_id: u64,
    #[serde(rename = "type")]
    pub kind: AllocationType,
    pub name: String,
    pub value: f64,
    #[serde(with = "super::dates")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub financing: Financing,
}

/// A recurring or one-off cash flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: u64,
    #[serde(default, alias = "simulationVersionId")]
    pub version_id: u64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub value: f64,
    pub frequency: Frequency,
    #[serde(with = "super::dates")]
    pub start_date: NaiveDate,
    /// Open-ended when absent
    #[serde(default, with = "super::dates::option", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// An insurance policy paying a monthly premium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insurance {
    #[serde(default)]
    pub id: u64,
    #[serde(default, alias = "simulationVersionId")]
    pub version_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(with = "super::dates")]
    pub start_date: NaiveDate,
    #[serde(default)]
    pub duration_months: Option<u32>,
    /// Monthly premium
    #[serde(default)]
    pub premium: Option<f64>,
    #[serde(default)]
    pub insured_value: Option<f64>,
}
