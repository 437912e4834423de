//! Per-year aggregation of event cash flows and insurance premiums

use crate::model::{Event, EventKind, Insurance};
use chrono::Datelike;

/// Gross (or status-adjusted) flows for one calendar year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearFlows {
    pub inflow: f64,
    pub outflow: f64,
}

/// Sum the inflows and outflows of every event active in `year`
///
/// An event is active from its start year through its end year, or through
/// `horizon_year` when open-ended. Each active year counts the full annual
/// amount: `value` for one-time and yearly events, `value × 12` for monthly
/// ones. Events of an unrecognized type contribute nothing.
pub fn event_flows(events: &[Event], year: i32, horizon_year: i32) -> YearFlows {
    let mut flows = YearFlows::default();

    for event in events {
        let first_year = event.start_date.year();
        let last_year = event.end_date.map_or(horizon_year, |end| end.year());
        if year < first_year || year > last_year {
            continue;
        }

        let amount = event.value * event.frequency.occurrences_per_year();
        match event.kind {
            EventKind::Inflow => flows.inflow += amount,
            EventKind::Outflow => flows.outflow += amount,
            EventKind::Unrecognized(_) => {}
        }
    }

    flows
}

/// Total annual premium of every policy active in `year`
///
/// A policy is active from its start year through
/// `start year + floor(duration_months / 12)` inclusive; without a duration
/// it is active in its start year only. Premiums are monthly, so each active
/// policy costs `premium × 12`.
pub fn premium_total(insurances: &[Insurance], year: i32) -> f64 {
    insurances
        .iter()
        .filter(|insurance| {
            let first_year = insurance.start_date.year();
            let covered_years = insurance.duration_months.map_or(0, |months| (months / 12) as i32);
            year >= first_year && year <= first_year + covered_years
        })
        .map(|insurance| insurance.premium.unwrap_or(0.0) * 12.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frequency;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(kind: &str, value: f64, frequency: Frequency, start: NaiveDate, end: Option<NaiveDate>) -> Event {
        Event {
            id: 0,
            version_id: 1,
            kind: EventKind::from(kind.to_string()),
            value,
            frequency,
            start_date: start,
            end_date: end,
        }
    }

    fn policy(start: NaiveDate, duration_months: Option<u32>, premium: Option<f64>) -> Insurance {
        Insurance {
            id: 0,
            version_id: 1,
            name: "Life".to_string(),
            start_date: start,
            duration_months,
            premium,
            insured_value: Some(100_000.0),
        }
    }

    #[test]
    fn test_monthly_event_annualized() {
        // Starts in November, still counts a full 12 months
        let events = vec![event("inflow", 1_000.0, Frequency::Monthly, date(2025, 11, 1), None)];
        let flows = event_flows(&events, 2025, 2060);
        assert_eq!(flows, YearFlows { inflow: 12_000.0, outflow: 0.0 });
    }

    #[test]
    fn test_one_time_and_yearly_count_once() {
        let events = vec![
            event("outflow", 5_000.0, Frequency::OneTime, date(2026, 3, 1), Some(date(2026, 3, 1))),
            event("outflow", 2_000.0, Frequency::Yearly, date(2025, 1, 1), None),
        ];
        assert_eq!(event_flows(&events, 2025, 2060).outflow, 2_000.0);
        assert_eq!(event_flows(&events, 2026, 2060).outflow, 7_000.0);
        assert_eq!(event_flows(&events, 2027, 2060).outflow, 2_000.0);
    }

    #[test]
    fn test_event_active_window_inclusive() {
        let events = vec![event("entrada", 100.0, Frequency::Yearly, date(2026, 6, 1), Some(date(2028, 2, 1)))];
        assert_eq!(event_flows(&events, 2025, 2060).inflow, 0.0);
        assert_eq!(event_flows(&events, 2026, 2060).inflow, 100.0);
        assert_eq!(event_flows(&events, 2028, 2060).inflow, 100.0);
        assert_eq!(event_flows(&events, 2029, 2060).inflow, 0.0);
    }

    #[test]
    fn test_open_ended_event_runs_to_horizon() {
        let events = vec![event("outflow", 100.0, Frequency::Yearly, date(2025, 1, 1), None)];
        assert_eq!(event_flows(&events, 2040, 2040).outflow, 100.0);
        assert_eq!(event_flows(&events, 2041, 2040).outflow, 0.0);
    }

    #[test]
    fn test_unrecognized_type_ignored() {
        let events = vec![
            event("transfer", 9_999.0, Frequency::Yearly, date(2025, 1, 1), None),
            event("inflow", 10.0, Frequency::Yearly, date(2025, 1, 1), None),
        ];
        assert_eq!(event_flows(&events, 2025, 2060), YearFlows { inflow: 10.0, outflow: 0.0 });
    }

    #[test]
    fn test_premium_window_truncates_duration() {
        // 24 months: active 2025 through 2027 inclusive
        let policies = vec![policy(date(2025, 1, 1), Some(24), Some(100.0))];
        assert_eq!(premium_total(&policies, 2024), 0.0);
        assert_eq!(premium_total(&policies, 2025), 1_200.0);
        assert_eq!(premium_total(&policies, 2027), 1_200.0);
        assert_eq!(premium_total(&policies, 2028), 0.0);

        // 11 months truncates to zero extra years
        let short = vec![policy(date(2025, 1, 1), Some(11), Some(50.0))];
        assert_eq!(premium_total(&short, 2025), 600.0);
        assert_eq!(premium_total(&short, 2026), 0.0);
    }

    #[test]
    fn test_premium_missing_fields() {
        let no_duration = vec![policy(date(2025, 1, 1), None, Some(100.0))];
        assert_eq!(premium_total(&no_duration, 2025), 1_200.0);
        assert_eq!(premium_total(&no_duration, 2026), 0.0);

        let no_premium = vec![policy(date(2025, 1, 1), Some(120), None)];
        assert_eq!(premium_total(&no_premium, 2030), 0.0);
    }
}
