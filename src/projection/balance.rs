//! Starting balance as of a version's start date

use crate::model::Allocation;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Sum the latest valuation of every distinct asset at or before `start_date`
///
/// Allocations sharing a name are successive valuations of one asset. Per
/// name, the record with the latest `date <= start_date` is selected; on a
/// date tie the higher id wins. Assets with no qualifying valuation add 0.
pub fn initial_balance(allocations: &[Allocation], start_date: NaiveDate) -> f64 {
    // BTreeMap keeps the summation order fixed between runs
    let mut latest: BTreeMap<&str, &Allocation> = BTreeMap::new();

    for allocation in allocations.iter().filter(|a| a.date <= start_date) {
        latest
            .entry(allocation.name.as_str())
            .and_modify(|current| {
                if (allocation.date, allocation.id) > (current.date, current.id) {
                    *current = allocation;
                }
            })
            .or_insert(allocation);
    }

    latest.values().map(|allocation| allocation.value).sum()
}
