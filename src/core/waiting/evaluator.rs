use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::error::WaitError;
use crate::staircase::{Staircase, Staircases};
use crate::types::{Delta, DeltaSet, Direction, PriceSeries, WaitTime};

/// How the per-index queries are scheduled. Both produce identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    #[default]
    Parallel,
    Sequential,
}

/// Waiting times for every (delta, direction) pair, one entry per series index.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitingTimes {
    series_len: usize,
    results: BTreeMap<(Delta, Direction), Vec<WaitTime>>,
}

impl WaitingTimes {
    pub(crate) fn new(series_len: usize, results: BTreeMap<(Delta, Direction), Vec<WaitTime>>) -> Self {
        Self { series_len, results }
    }

    pub fn get(&self, delta: Delta, direction: Direction) -> Option<&[WaitTime]> {
        self.results.get(&(delta, direction)).map(Vec::as_slice)
    }

    /// Pairs in ascending delta order, Increase before Decrease.
    pub fn iter(&self) -> impl Iterator<Item = (Delta, Direction, &[WaitTime])> + '_ {
        self.results
            .iter()
            .map(|(&(delta, direction), times)| (delta, direction, times.as_slice()))
    }

    /// Distinct deltas, ascending.
    pub fn deltas(&self) -> Vec<Delta> {
        let mut deltas: Vec<Delta> = self.results.keys().map(|&(delta, _)| delta).collect();
        deltas.dedup();
        deltas
    }

    pub fn series_len(&self) -> usize {
        self.series_len
    }

    /// Number of (delta, direction) pairs.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Waiting times for every delta in `deltas` and both directions, evaluated in parallel.
///
/// # Arguments
/// * `series` - Price series the staircases were built from
/// * `staircases` - Both staircases of `series`
/// * `deltas` - Moves to wait for
pub fn compute_waiting_times(
    series: &PriceSeries,
    staircases: &Staircases,
    deltas: &DeltaSet,
) -> Result<WaitingTimes, WaitError> {
    compute_waiting_times_with(series, staircases, deltas, Evaluation::Parallel)
}

/// Same as [`compute_waiting_times`] with an explicit scheduling choice.
pub fn compute_waiting_times_with(
    series: &PriceSeries,
    staircases: &Staircases,
    deltas: &DeltaSet,
    evaluation: Evaluation,
) -> Result<WaitingTimes, WaitError> {
    for direction in Direction::ALL {
        ensure_matches(series, staircases.get(direction), direction)?;
    }

    let pairs = deltas.pairs();
    info!(
        points = series.len(),
        pairs = pairs.len(),
        ?evaluation,
        "evaluating waiting times"
    );

    let evaluate = |&(delta, direction): &(Delta, Direction)| {
        evaluate_pair(series, staircases.get(direction), delta, evaluation)
            .map(|times| ((delta, direction), times))
    };
    let results = match evaluation {
        Evaluation::Parallel => pairs
            .par_iter()
            .map(evaluate)
            .collect::<Result<BTreeMap<_, _>, _>>()?,
        Evaluation::Sequential => pairs
            .iter()
            .map(evaluate)
            .collect::<Result<BTreeMap<_, _>, _>>()?,
    };

    Ok(WaitingTimes::new(series.len(), results))
}

/// Waiting time from a single index.
pub fn waiting_time(
    series: &PriceSeries,
    staircase: &Staircase,
    index: usize,
    delta: Delta,
) -> Result<WaitTime, WaitError> {
    ensure_matches(series, staircase, staircase.direction())?;
    if index >= series.len() {
        return Err(WaitError::IndexOutOfRange {
            index,
            len: series.len(),
        });
    }
    wait_at(series.as_slice(), staircase, index, delta)
}

fn evaluate_pair(
    series: &PriceSeries,
    staircase: &Staircase,
    delta: Delta,
    evaluation: Evaluation,
) -> Result<Vec<WaitTime>, WaitError> {
    let prices = series.as_slice();
    match evaluation {
        Evaluation::Parallel => (0..prices.len())
            .into_par_iter()
            .map(|i| wait_at(prices, staircase, i, delta))
            .collect(),
        Evaluation::Sequential => (0..prices.len())
            .map(|i| wait_at(prices, staircase, i, delta))
            .collect(),
    }
}

fn wait_at(
    prices: &[f64],
    staircase: &Staircase,
    index: usize,
    delta: Delta,
) -> Result<WaitTime, WaitError> {
    let threshold = staircase.direction().threshold(prices[index], delta);
    match staircase.first_crossing(index + 1, threshold) {
        None => Ok(WaitTime::Unreachable),
        Some(j) if j > index && j < prices.len() => Ok(WaitTime::Finite(j - index)),
        Some(j) => Err(WaitError::IndexOutOfRange {
            index: j,
            len: prices.len(),
        }),
    }
}

fn ensure_matches(
    series: &PriceSeries,
    staircase: &Staircase,
    direction: Direction,
) -> Result<(), WaitError> {
    if staircase.direction() != direction {
        return Err(WaitError::DirectionMismatch {
            expected: direction,
            found: staircase.direction(),
        });
    }
    if !staircase.is_built_from(series) {
        return Err(WaitError::StaircaseMismatch {
            series_len: series.len(),
            staircase_len: staircase.len(),
        });
    }
    Ok(())
}
