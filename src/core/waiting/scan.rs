//! Reference forward scan.
//!
//! Walks forward from every index until the threshold is met. Quadratic in
//! the series length; used to cross-check the staircase evaluator.

use std::collections::BTreeMap;

use crate::evaluator::WaitingTimes;
use crate::types::{Delta, DeltaSet, Direction, PriceSeries, WaitTime};

pub fn scan_waiting_times(series: &PriceSeries, deltas: &DeltaSet) -> WaitingTimes {
    let prices = series.as_slice();
    let results: BTreeMap<_, _> = deltas
        .pairs()
        .into_iter()
        .map(|(delta, direction)| {
            let times = (0..prices.len())
                .map(|i| scan_from(prices, i, delta, direction))
                .collect();
            ((delta, direction), times)
        })
        .collect();
    WaitingTimes::new(prices.len(), results)
}

/// Waiting time from `index` found by scanning the remaining prices.
pub fn scan_from(prices: &[f64], index: usize, delta: Delta, direction: Direction) -> WaitTime {
    let threshold = direction.threshold(prices[index], delta);
    prices[index + 1..]
        .iter()
        .position(|&p| direction.crosses(p, threshold))
        .map_or(WaitTime::Unreachable, |k| WaitTime::Finite(k + 1))
}
