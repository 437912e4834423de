//! CSV output of projection reports

use crate::error::Result;
use crate::model::VersionStatus;
use crate::service::{ProjectionOutcome, ProjectionReport};
use serde::Serialize;
use std::io::Write;

/// One projected year of one simulation
///
/// Breakdown columns are always present and left empty when the projection
/// was run without the breakdown estimate.
#[derive(Debug, Serialize)]
struct ReportRow {
    simulation_id: u64,
    version_id: u64,
    status: VersionStatus,
    year: i32,
    balance: f64,
    financial_assets: Option<f64>,
    fixed_assets: Option<f64>,
    total_without_insurance: Option<f64>,
}

/// Write every projected year of every report as CSV rows
pub fn write_reports_csv<W: Write>(writer: W, reports: &[&ProjectionReport]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0usize;

    for report in reports {
        for point in &report.projection {
            csv_writer.serialize(ReportRow {
                simulation_id: report.simulation_id,
                version_id: report.version_id,
                status: report.status,
                year: point.year,
                balance: point.balance,
                financial_assets: point.breakdown.map(|b| b.financial_assets),
                fixed_assets: point.breakdown.map(|b| b.fixed_assets),
                total_without_insurance: point.breakdown.map(|b| b.total_without_insurance),
            })?;
            rows += 1;
        }
    }

    csv_writer.flush()?;
    Ok(rows)
}

/// Write the projected outcomes, skipping unprojected ones with a warning
pub fn write_outcomes_csv<W: Write>(writer: W, outcomes: &[ProjectionOutcome]) -> Result<usize> {
    let reports: Vec<&ProjectionReport> = outcomes
        .iter()
        .filter_map(|outcome| {
            let report = outcome.report();
            if report.is_none() {
                log::warn!("Skipping unresolved simulation in CSV output");
            }
            report
        })
        .collect();
    write_reports_csv(writer, &reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{PatrimonyBreakdown, ProjectionPoint};

    fn report(with_breakdown: bool) -> ProjectionReport {
        ProjectionReport {
            simulation_id: 3,
            version_id: 8,
            status: VersionStatus::Disabled,
            projection: vec![
                ProjectionPoint {
                    year: 2025,
                    balance: 100.0,
                    breakdown: with_breakdown.then(|| PatrimonyBreakdown::estimate(100.0)),
                    flows: None,
                },
                ProjectionPoint {
                    year: 2026,
                    balance: 50.0,
                    breakdown: with_breakdown.then(|| PatrimonyBreakdown::estimate(50.0)),
                    flows: None,
                },
            ],
        }
    }

    #[test]
    fn test_csv_without_breakdown() {
        let mut out = Vec::new();
        let plain = report(false);
        let rows = write_reports_csv(&mut out, &[&plain]).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "simulation_id,version_id,status,year,balance,financial_assets,fixed_assets,total_without_insurance"
        );
        assert_eq!(lines[1], "3,8,Disabled,2025,100.0,,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_with_breakdown() {
        let mut out = Vec::new();
        let detailed = report(true);
        write_reports_csv(&mut out, &[&detailed]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let fields: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(&fields[..4], &["3", "8", "Disabled", "2025"]);
        let shares: Vec<f64> = fields[5..].iter().map(|f| f.parse().unwrap()).collect();
        assert!((shares[0] - 70.0).abs() < 1e-9);
        assert!((shares[1] - 30.0).abs() < 1e-9);
        assert!((shares[2] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_not_found_outcomes_skipped() {
        let mut out = Vec::new();
        let outcomes = vec![ProjectionOutcome::not_found(), ProjectionOutcome::Projected(report(false))];
        let rows = write_outcomes_csv(&mut out, &outcomes).unwrap();
        assert_eq!(rows, 2);
    }
}
