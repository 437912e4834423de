//! Projection output rows

use super::{FINANCIAL_SHARE, FIXED_ASSET_SHARE, WITHOUT_INSURANCE_SHARE};
use crate::model::VersionStatus;
use serde::Serialize;

/// Display-only split of a year's balance
///
/// Fixed shares of the single tracked balance (70% financial, 30% fixed
/// assets, 90% excluding insurance). Approximate; not independently tracked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatrimonyBreakdown {
    pub financial_assets: f64,
    pub fixed_assets: f64,
    pub total_without_insurance: f64,
}

impl PatrimonyBreakdown {
    pub fn estimate(balance: f64) -> Self {
        Self {
            financial_assets: balance * FINANCIAL_SHARE,
            fixed_assets: balance * FIXED_ASSET_SHARE,
            total_without_insurance: balance * WITHOUT_INSURANCE_SHARE,
        }
    }
}

/// Status-adjusted flows that moved the balance during a year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDetail {
    pub inflow: f64,
    pub outflow: f64,
    pub premiums: f64,
}

/// Ending balance of one projected year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub year: i32,
    pub balance: f64,
    #[serde(flatten)]
    pub breakdown: Option<PatrimonyBreakdown>,
    #[serde(flatten)]
    pub flows: Option<FlowDetail>,
}

/// Full trajectory for one version, in ascending year order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub version_id: u64,
    pub status: VersionStatus,
    pub start_balance: f64,
    pub points: Vec<ProjectionPoint>,
}

impl Projection {
    pub fn first_year(&self) -> Option<i32> {
        self.points.first().map(|point| point.year)
    }

    pub fn final_balance(&self) -> Option<f64> {
        self.points.last().map(|point| point.balance)
    }

    /// Ending balance of a given year, if projected
    pub fn balance_in(&self, year: i32) -> Option<f64> {
        let first = self.first_year()?;
        let index = usize::try_from(year - first).ok()?;
        self.points.get(index).map(|point| point.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_shares() {
        let breakdown = PatrimonyBreakdown::estimate(10_000.0);
        assert!((breakdown.financial_assets - 7_000.0).abs() < 1e-9);
        assert!((breakdown.fixed_assets - 3_000.0).abs() < 1e-9);
        assert!((breakdown.total_without_insurance - 9_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_serialization_shapes() {
        let plain = ProjectionPoint { year: 2025, balance: 1.5, breakdown: None, flows: None };
        assert_eq!(serde_json::to_string(&plain).unwrap(), r#"{"year":2025,"balance":1.5}"#);

        let extended = ProjectionPoint {
            year: 2025,
            balance: 100.0,
            breakdown: Some(PatrimonyBreakdown::estimate(100.0)),
            flows: None,
        };
        let value = serde_json::to_value(&extended).unwrap();
        assert_eq!(value["year"], 2025);
        assert!(value.get("financialAssets").is_some());
        assert!(value.get("fixedAssets").is_some());
        assert!(value.get("totalWithoutInsurance").is_some());
        assert!(value.get("premiums").is_none());
    }

    #[test]
    fn test_balance_lookup_by_year() {
        let projection = Projection {
            version_id: 1,
            status: VersionStatus::Alive,
            start_balance: 0.0,
            points: (2025..=2027)
                .map(|year| ProjectionPoint { year, balance: year as f64, breakdown: None, flows: None })
                .collect(),
        };
        assert_eq!(projection.balance_in(2026), Some(2026.0));
        assert_eq!(projection.balance_in(2024), None);
        assert_eq!(projection.balance_in(2028), None);
        assert_eq!(projection.final_balance(), Some(2027.0));
    }
}
