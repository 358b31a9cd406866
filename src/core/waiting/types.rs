use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use crate::error::WaitError;

/// Spacing between consecutive samples of a price series.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(60);

/// Deltas analysed when the caller does not choose any.
pub const DEFAULT_DELTAS: [f64; 3] = [5.0, 10.0, 20.0];

// ============================================================================
// Direction
// ============================================================================

/// Direction of the price move being waited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Increase, Direction::Decrease];

    /// Price that has to be reached for a move of `delta` away from `price`.
    pub fn threshold(self, price: f64, delta: Delta) -> f64 {
        match self {
            Direction::Increase => price + delta.value(),
            Direction::Decrease => price - delta.value(),
        }
    }

    /// Whether `price` has reached `threshold` in this direction.
    pub fn crosses(self, price: f64, threshold: f64) -> bool {
        match self {
            Direction::Increase => price >= threshold,
            Direction::Decrease => price <= threshold,
        }
    }

    /// Whether an earlier point at `price` hides a later point at `later`:
    /// any threshold reached by `later` is reached at `price` first.
    pub(crate) fn dominates(self, price: f64, later: f64) -> bool {
        match self {
            Direction::Increase => later <= price,
            Direction::Decrease => later >= price,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Increase => "increase",
            Direction::Decrease => "decrease",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Delta
// ============================================================================

/// Absolute price move defining a threshold. Always finite and positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Delta(f64);

impl Delta {
    pub fn new(value: f64) -> Result<Self, WaitError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(WaitError::InvalidDelta { value });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Delta {
    type Error = WaitError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Delta::new(value)
    }
}

impl From<Delta> for f64 {
    fn from(delta: Delta) -> Self {
        delta.0
    }
}

impl PartialEq for Delta {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Delta {}

impl PartialOrd for Delta {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Delta {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Delta {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Distinct deltas to analyse, kept in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaSet(Vec<Delta>);

impl DeltaSet {
    /// Validate every value and build the set. Duplicates collapse into one entry.
    pub fn new<I: IntoIterator<Item = f64>>(values: I) -> Result<Self, WaitError> {
        let mut deltas = values
            .into_iter()
            .map(Delta::new)
            .collect::<Result<Vec<_>, _>>()?;
        if deltas.is_empty() {
            return Err(WaitError::EmptyDeltaSet);
        }
        deltas.sort();
        deltas.dedup();
        Ok(Self(deltas))
    }

    pub fn iter(&self) -> impl Iterator<Item = Delta> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Delta] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every (delta, direction) pair, delta-major.
    pub fn pairs(&self) -> Vec<(Delta, Direction)> {
        self.iter()
            .flat_map(|delta| Direction::ALL.map(|direction| (delta, direction)))
            .collect()
    }
}

impl Default for DeltaSet {
    fn default() -> Self {
        Self(DEFAULT_DELTAS.iter().map(|&v| Delta(v)).collect())
    }
}

// ============================================================================
// Price series
// ============================================================================

/// Regularly sampled prices. Immutable; clones share the same buffer.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    prices: Arc<[f64]>,
}

impl PriceSeries {
    /// Wrap `prices`, rejecting non-finite values.
    ///
    /// Indices are stored as `u32` internally, so longer series are rejected too.
    pub fn new(prices: Vec<f64>) -> Result<Self, WaitError> {
        if let Some((index, value)) = prices.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(WaitError::InvalidSeries(format!(
                "non-finite price {} at index {}",
                value, index
            )));
        }
        if prices.len() > u32::MAX as usize {
            return Err(WaitError::InvalidSeries(format!(
                "{} prices exceed the supported maximum of {}",
                prices.len(),
                u32::MAX
            )));
        }
        Ok(Self {
            prices: prices.into(),
        })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.prices.get(index).copied()
    }

    /// Fail with `InvalidSeries` when there is nothing to analyse.
    pub fn ensure_non_empty(&self) -> Result<(), WaitError> {
        if self.is_empty() {
            return Err(WaitError::InvalidSeries(
                "series is empty, at least one price is required".to_string(),
            ));
        }
        Ok(())
    }

    /// The first `max_points` prices, or the whole series if it is shorter.
    pub fn truncated(&self, max_points: usize) -> Self {
        if max_points >= self.len() {
            return self.clone();
        }
        Self {
            prices: self.prices[..max_points].into(),
        }
    }

    /// Every price sign-flipped. A decrease in `self` is an increase in the result.
    pub fn negated(&self) -> Self {
        Self {
            prices: self.prices.iter().map(|p| -p).collect(),
        }
    }

    /// True when both values hold the same prices.
    pub fn same_prices(&self, other: &PriceSeries) -> bool {
        Arc::ptr_eq(&self.prices, &other.prices) || self.prices[..] == other.prices[..]
    }
}

impl TryFrom<Vec<f64>> for PriceSeries {
    type Error = WaitError;

    fn try_from(prices: Vec<f64>) -> Result<Self, Self::Error> {
        PriceSeries::new(prices)
    }
}

impl PartialEq for PriceSeries {
    fn eq(&self, other: &Self) -> bool {
        self.same_prices(other)
    }
}

// ============================================================================
// Waiting time
// ============================================================================

/// Steps until a threshold is first crossed.
///
/// `Unreachable` orders after every finite offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WaitTime {
    Finite(usize),
    Unreachable,
}

impl WaitTime {
    pub fn offset(self) -> Option<usize> {
        match self {
            WaitTime::Finite(k) => Some(k),
            WaitTime::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, WaitTime::Finite(_))
    }

    /// Offset converted to wall time for samples spaced by `interval`.
    /// `None` when unreachable or when the product overflows.
    pub fn duration(self, interval: Duration) -> Option<Duration> {
        let steps = u32::try_from(self.offset()?).ok()?;
        interval.checked_mul(steps)
    }
}

impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitTime::Finite(k) => write!(f, "{}", k),
            WaitTime::Unreachable => f.write_str("inf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_validation() {
        assert!(Delta::new(5.0).is_ok());
        assert_eq!(Delta::new(0.0), Err(WaitError::InvalidDelta { value: 0.0 }));
        assert!(Delta::new(-1.0).is_err());
        assert!(Delta::new(f64::NAN).is_err());
        assert!(Delta::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_delta_set_sorts_and_dedups() {
        let set = DeltaSet::new([20.0, 5.0, 10.0, 5.0]).unwrap();
        let values: Vec<f64> = set.iter().map(Delta::value).collect();
        assert_eq!(values, vec![5.0, 10.0, 20.0]);
        assert_eq!(set.pairs().len(), 6);
    }

    #[test]
    fn test_delta_set_rejects_bad_input() {
        assert_eq!(DeltaSet::new(Vec::<f64>::new()), Err(WaitError::EmptyDeltaSet));
        assert!(matches!(
            DeltaSet::new([5.0, -2.0]),
            Err(WaitError::InvalidDelta { .. })
        ));
    }

    #[test]
    fn test_default_deltas() {
        let set = DeltaSet::default();
        let values: Vec<f64> = set.iter().map(Delta::value).collect();
        assert_eq!(values, DEFAULT_DELTAS.to_vec());
    }

    #[test]
    fn test_series_rejects_non_finite() {
        let err = PriceSeries::new(vec![1.0, f64::NAN, 3.0]).unwrap_err();
        match err {
            WaitError::InvalidSeries(msg) => assert!(msg.contains("index 1")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(PriceSeries::new(vec![1.0, f64::NEG_INFINITY]).is_err());
        assert!(PriceSeries::new(Vec::new()).is_ok());
    }

    #[test]
    fn test_series_truncate_and_negate() {
        let series = PriceSeries::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.truncated(2).as_slice(), &[1.0, 2.0]);
        assert_eq!(series.truncated(10).len(), 3);
        assert_eq!(series.negated().as_slice(), &[-1.0, -2.0, -3.0]);
        assert!(series.truncated(0).ensure_non_empty().is_err());
    }

    #[test]
    fn test_wait_time_ordering_and_duration() {
        assert!(WaitTime::Finite(1) < WaitTime::Finite(2));
        assert!(WaitTime::Finite(usize::MAX) < WaitTime::Unreachable);
        assert_eq!(
            WaitTime::Finite(3).duration(SAMPLE_INTERVAL),
            Some(Duration::from_secs(180))
        );
        assert_eq!(WaitTime::Unreachable.duration(SAMPLE_INTERVAL), None);
        assert_eq!(WaitTime::Unreachable.to_string(), "inf");
    }

    #[test]
    fn test_direction_comparators() {
        let delta = Delta::new(10.0).unwrap();
        assert_eq!(Direction::Increase.threshold(1800.0, delta), 1810.0);
        assert_eq!(Direction::Decrease.threshold(1800.0, delta), 1790.0);
        assert!(Direction::Increase.crosses(1810.0, 1810.0));
        assert!(!Direction::Increase.crosses(1809.5, 1810.0));
        assert!(Direction::Decrease.crosses(1790.0, 1790.0));
        assert!(!Direction::Decrease.crosses(1790.5, 1790.0));
    }

    #[test]
    fn test_sub_ulp_delta_rounds_to_price() {
        // Thresholds are computed in f64; a delta below one ulp is absorbed.
        let tiny = Delta::new(f64::MIN_POSITIVE).unwrap();
        assert_eq!(Direction::Increase.threshold(1.0, tiny), 1.0);
        assert_eq!(Direction::Decrease.threshold(1.0, tiny), 1.0);
        assert!(Direction::Increase.crosses(1.0, Direction::Increase.threshold(1.0, tiny)));
    }
}
