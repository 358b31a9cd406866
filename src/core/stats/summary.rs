use serde::Serialize;
use waiting::WaitTime;

/// Counts and offset statistics of one waiting-time array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitSummary {
    pub total: usize,
    pub reached: usize,
    pub unreachable: usize,
    /// `None` for an empty array.
    pub reached_fraction: Option<f64>,
    /// `None` when nothing was reached.
    pub offsets: Option<OffsetStats>,
}

/// Statistics over the finite offsets only, in sample steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsetStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub p90: f64,
}

impl WaitSummary {
    pub fn from_times(times: &[WaitTime]) -> Self {
        let mut offsets: Vec<usize> = times.iter().filter_map(|t| t.offset()).collect();
        offsets.sort_unstable();

        let total = times.len();
        let reached = offsets.len();
        let reached_fraction = (total > 0).then(|| reached as f64 / total as f64);

        Self {
            total,
            reached,
            unreachable: total - reached,
            reached_fraction,
            offsets: OffsetStats::from_sorted(&offsets),
        }
    }
}

impl OffsetStats {
    fn from_sorted(offsets: &[usize]) -> Option<Self> {
        let (&min, &max) = (offsets.first()?, offsets.last()?);
        let values: Vec<f64> = offsets.iter().map(|&k| k as f64).collect();
        let n = values.len() as f64;

        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
            p25: quantile(&values, 0.25)?,
            median: quantile(&values, 0.5)?,
            p75: quantile(&values, 0.75)?,
            p90: quantile(&values, 0.9)?,
        })
    }
}

/// Quantile `q` in [0, 1] of ascending `sorted`, interpolating linearly
/// between the closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}
