use serde::Serialize;
use waiting::WaitTime;

use crate::StatsError;

/// Equal-width histogram over the range of the binned values.
///
/// Bins are half-open except the last, which also holds the maximum. A
/// degenerate range `[v, v]` is widened to `[v - 0.5, v + 0.5]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Result<Self, StatsError> {
        if bins == 0 {
            return Err(StatsError::ZeroBins);
        }
        if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(StatsError::NonFinite(bad));
        }
        if values.is_empty() {
            return Err(StatsError::NoValues);
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0usize; bins];
        for &v in values {
            let bin = (((v - lo) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Midpoint of every bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// Counts normalised so the histogram integrates to one.
    pub fn density(&self) -> Vec<f64> {
        let total = self.total() as f64;
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| c as f64 / (total * (w[1] - w[0])))
            .collect()
    }

    /// `(center, density)` pairs.
    pub fn density_points(&self) -> Vec<(f64, f64)> {
        self.centers().into_iter().zip(self.density()).collect()
    }
}

/// Density histogram of the finite offsets in `times`.
pub fn empirical_pdf(times: &[WaitTime], bins: usize) -> Result<Histogram, StatsError> {
    let offsets: Vec<f64> = times
        .iter()
        .filter_map(|t| t.offset())
        .map(|k| k as f64)
        .collect();
    Histogram::new(&offsets, bins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_edges() {
        let h = Histogram::new(&[1.0, 2.0, 2.0, 3.0, 4.0], 3).unwrap();
        assert_eq!(h.edges.len(), 4);
        assert_eq!(h.edges[0], 1.0);
        assert_eq!(h.edges[3], 4.0);
        // [1, 2), [2, 3), [3, 4]
        assert_eq!(h.counts, vec![1, 2, 2]);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let values: Vec<f64> = (0..97).map(|i| ((i * 31) % 50) as f64).collect();
        let h = Histogram::new(&values, 10).unwrap();
        let area: f64 = h
            .density()
            .iter()
            .zip(h.edges.windows(2))
            .map(|(d, w)| d * (w[1] - w[0]))
            .sum();
        assert!((area - 1.0).abs() < 1e-9);
        assert_eq!(h.density_points().len(), 10);
    }

    #[test]
    fn test_degenerate_range() {
        let h = Histogram::new(&[7.0, 7.0], 2).unwrap();
        assert_eq!(h.edges, vec![6.5, 7.0, 7.5]);
        assert_eq!(h.counts, vec![0, 2]);
        assert_eq!(h.centers(), vec![6.75, 7.25]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(Histogram::new(&[1.0], 0), Err(StatsError::ZeroBins));
        assert_eq!(Histogram::new(&[], 5), Err(StatsError::NoValues));
        assert!(matches!(
            Histogram::new(&[1.0, f64::INFINITY], 5),
            Err(StatsError::NonFinite(_))
        ));
    }

    #[test]
    fn test_empirical_pdf_skips_unreachable() {
        let times = [
            WaitTime::Finite(1),
            WaitTime::Unreachable,
            WaitTime::Finite(3),
            WaitTime::Finite(3),
        ];
        let pdf = empirical_pdf(&times, 2).unwrap();
        assert_eq!(pdf.total(), 3);
        assert_eq!(pdf.counts, vec![1, 2]);
        assert_eq!(empirical_pdf(&[WaitTime::Unreachable], 4), Err(StatsError::NoValues));
    }
}
