use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use series_io::{read_price_series, write_json, write_waiting_times_csv};
use stats::WaitSummary;
use waiting::{
    DeltaSet, Direction, PriceSeries, Staircases, WaitingTimes, compute_waiting_times_with,
    scan_waiting_times,
};

use crate::config::Config;
use crate::report::write_report;
use crate::visualization::render_charts;

/// Summary of one (delta, direction) pair
#[derive(Debug, Clone, Serialize)]
pub struct PairSummary {
    pub delta: f64,
    pub direction: Direction,
    #[serde(flatten)]
    pub summary: WaitSummary,
}

impl PairSummary {
    /// Mean finite waiting time in minutes
    pub fn mean_minutes(&self, sample_seconds: u64) -> Option<f64> {
        let offsets = self.summary.offsets.as_ref()?;
        Some(offsets.mean * sample_seconds as f64 / 60.0)
    }
}

/// Everything computed by one run
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Prices read from the data file
    pub loaded: usize,
    /// The analysed series (after truncation)
    pub series: PriceSeries,
    pub times: WaitingTimes,
    pub summaries: Vec<PairSummary>,
}

/// Contents of `summary.json`
#[derive(Debug, Serialize)]
struct SummaryFile<'a> {
    data_file: &'a PathBuf,
    loaded: usize,
    points: usize,
    sample_seconds: u64,
    pairs: &'a [PairSummary],
}

/// Files written by [`write_outputs`]
#[derive(Debug, Clone, Default)]
pub struct OutputFiles {
    pub csv: PathBuf,
    pub summary: PathBuf,
    pub report: PathBuf,
    pub charts: Vec<PathBuf>,
}

/// Load the configured price file and analyse it.
pub fn run_analysis(config: &Config) -> Result<AnalysisResult> {
    let prices = read_price_series(&config.data_file)
        .with_context(|| format!("Failed to load prices from {}", config.data_file.display()))?;
    analyze(prices, config)
}

/// Waiting times and summaries for already loaded prices.
pub fn analyze(prices: Vec<f64>, config: &Config) -> Result<AnalysisResult> {
    let loaded = prices.len();
    let deltas = config.delta_set()?;

    let mut series = PriceSeries::new(prices)?;
    if let Some(max_points) = config.max_points {
        series = series.truncated(max_points);
    }
    series.ensure_non_empty()?;
    info!(loaded, points = series.len(), deltas = deltas.len(), "series ready");

    let started = Instant::now();
    let staircases = Staircases::build(&series);
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "staircases built");

    let started = Instant::now();
    let times = compute_waiting_times_with(&series, &staircases, &deltas, config.evaluation)?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "waiting times computed");

    if config.cross_check {
        cross_check(&series, &times)?;
    }

    let summaries = times
        .iter()
        .map(|(delta, direction, waits)| PairSummary {
            delta: delta.value(),
            direction,
            summary: WaitSummary::from_times(waits),
        })
        .collect();

    Ok(AnalysisResult {
        loaded,
        series,
        times,
        summaries,
    })
}

fn cross_check(series: &PriceSeries, times: &WaitingTimes) -> Result<()> {
    let started = Instant::now();
    let deltas = DeltaSet::new(times.deltas().into_iter().map(|d| d.value()))?;
    let reference = scan_waiting_times(series, &deltas);

    for (delta, direction, waits) in times.iter() {
        let expected = reference
            .get(delta, direction)
            .context("reference scan is missing a pair")?;
        if let Some(i) = waits.iter().zip(expected).position(|(a, b)| a != b) {
            anyhow::bail!(
                "cross-check failed for {} {} at index {}: staircase gave {}, scan gave {}",
                direction,
                delta,
                i,
                waits[i],
                expected[i]
            );
        }
    }

    info!(elapsed_ms = started.elapsed().as_millis() as u64, "cross-check passed");
    Ok(())
}

/// Write the CSV, JSON summary, text report and (optionally) charts.
pub fn write_outputs(result: &AnalysisResult, config: &Config) -> Result<OutputFiles> {
    let dir = &config.output_dir;

    let csv = dir.join("waiting_times.csv");
    write_waiting_times_csv(&csv, &result.times)
        .with_context(|| format!("Failed to write {}", csv.display()))?;

    let summary = dir.join("summary.json");
    let summary_file = SummaryFile {
        data_file: &config.data_file,
        loaded: result.loaded,
        points: result.series.len(),
        sample_seconds: config.sample_seconds,
        pairs: &result.summaries,
    };
    write_json(&summary, &summary_file)
        .with_context(|| format!("Failed to write {}", summary.display()))?;

    let report = dir.join("WAIT_TIMES.LOG");
    write_report(&report, result, config)?;

    let charts = if config.charts {
        render_charts(result, config)?
    } else {
        Vec::new()
    };
    if config.charts && charts.is_empty() {
        warn!("no chart had any reachable waiting time to draw");
    }

    info!(dir = %dir.display(), charts = charts.len(), "outputs written");
    Ok(OutputFiles {
        csv,
        summary,
        report,
        charts,
    })
}
