//! Running balance carried from one projected year to the next

use super::YearFlows;

/// Balance state of a projection in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionState {
    /// Calendar year the next `advance` will project
    pub year: i32,
    /// Balance at the end of the previous year (or the starting balance)
    pub balance: f64,
    /// `1 + real_rate / 100`
    growth_factor: f64,
}

impl ProjectionState {
    /// Start at `balance` in `first_year`, compounding at `real_rate` percent a year
    pub fn new(first_year: i32, balance: f64, real_rate: f64) -> Self {
        Self {
            year: first_year,
            balance,
            growth_factor: 1.0 + real_rate / 100.0,
        }
    }

    /// Apply one year's adjusted flows and premiums, then compound once
    ///
    /// Returns the year just projected; `balance` then holds its ending value.
    pub fn advance(&mut self, flows: YearFlows, premiums: f64) -> i32 {
        let projected_year = self.year;
        let after_flows = self.balance + flows.inflow - flows.outflow - premiums;
        self.balance = after_flows * self.growth_factor;
        self.year += 1;
        projected_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interest_applies_after_flows() {
        let mut state = ProjectionState::new(2025, 10_000.0, 4.0);
        let year = state.advance(YearFlows { inflow: 12_000.0, outflow: 0.0 }, 0.0);
        assert_eq!(year, 2025);
        assert_eq!(state.year, 2026);
        assert_relative_eq!(state.balance, 22_880.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_balance_compounds() {
        let mut state = ProjectionState::new(2025, 0.0, 10.0);
        state.advance(YearFlows::default(), 1_000.0);
        assert_relative_eq!(state.balance, -1_100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_rate_is_plain_sum() {
        let mut state = ProjectionState::new(2025, 500.0, 0.0);
        state.advance(YearFlows { inflow: 100.0, outflow: 300.0 }, 50.0);
        assert_eq!(state.balance, 250.0);
    }
}
