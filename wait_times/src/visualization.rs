//! PNG charts of waiting-time arrays.
//!
//! Unreachable entries are never drawn; the report counts them instead.

use anyhow::anyhow;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

use stats::{Histogram, empirical_pdf};
use waiting::{Direction, WaitTime};

use crate::analysis::AnalysisResult;
use crate::config::Config;

type ChartResult = Result<(), Box<dyn std::error::Error>>;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const GOLDEN: RGBColor = RGBColor(230, 190, 30);

/// Draw every chart for `result` into the output directory.
///
/// Per (delta, direction): the waiting time over the time index and its
/// histogram. Per delta: the empirical densities of both directions.
/// Pairs without any reachable target are skipped.
pub fn render_charts(result: &AnalysisResult, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let dir = &config.output_dir;
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for (delta, direction, waits) in result.times.iter() {
        let offsets: Vec<f64> = waits.iter().filter_map(|w| w.offset()).map(|k| k as f64).collect();
        let Ok(histogram) = Histogram::new(&offsets, config.bins) else {
            continue;
        };

        let title = format!("Minimum waiting time for {} by {}", direction, delta);

        let path = dir.join(format!("waiting_{}_{}.png", direction, delta));
        plot_waiting_times(waits, &title, &path).map_err(|e| chart_error(&path, e))?;
        written.push(path);

        let path = dir.join(format!("histogram_{}_{}.png", direction, delta));
        plot_histogram(&histogram, &title, &path).map_err(|e| chart_error(&path, e))?;
        written.push(path);
    }

    for delta in result.times.deltas() {
        let density = |direction: Direction| {
            result
                .times
                .get(delta, direction)
                .and_then(|waits| empirical_pdf(waits, config.bins).ok())
        };
        let increase = density(Direction::Increase);
        let decrease = density(Direction::Decrease);
        if increase.is_none() && decrease.is_none() {
            continue;
        }

        let title = format!("Empirical PDFs of waiting times for delta = {}", delta);
        let path = dir.join(format!("pdf_{}.png", delta));
        plot_densities(increase.as_ref(), decrease.as_ref(), &title, &path)
            .map_err(|e| chart_error(&path, e))?;
        written.push(path);
    }

    Ok(written)
}

fn chart_error(path: &Path, e: Box<dyn std::error::Error>) -> anyhow::Error {
    anyhow!("Failed to draw {}: {}", path.display(), e)
}

/// One bar per index, height = waiting time.
pub fn plot_waiting_times(waits: &[WaitTime], title: &str, output_path: &Path) -> ChartResult {
    let max = waits.iter().filter_map(|w| w.offset()).max().unwrap_or(1) as f64;

    let root = BitMapBackend::new(output_path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..waits.len().max(1) as f64, 0f64..max * 1.05)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Time index")
        .y_desc("Minimum waiting time (samples)")
        .draw()?;

    chart.draw_series(waits.iter().enumerate().filter_map(|(i, w)| {
        let k = w.offset()? as f64;
        let x = i as f64;
        Some(Rectangle::new([(x, 0.0), (x + 1.0, k)], SKY_BLUE.filled()))
    }))?;

    root.present()?;
    Ok(())
}

pub fn plot_histogram(histogram: &Histogram, title: &str, output_path: &Path) -> ChartResult {
    let lo = histogram.edges[0];
    let hi = histogram.edges[histogram.edges.len() - 1];
    let max_count = histogram.counts.iter().copied().max().unwrap_or(1).max(1) as f64;

    let root = BitMapBackend::new(output_path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..max_count * 1.05)?;

    chart
        .configure_mesh()
        .x_desc("Min waiting time (samples)")
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(
        histogram
            .edges
            .windows(2)
            .zip(&histogram.counts)
            .filter(|&(_, &c)| c > 0)
            .map(|(w, &c)| Rectangle::new([(w[0], 0.0), (w[1], c as f64)], GOLDEN.mix(0.7).filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Scatter of both directions' densities, filled down to zero.
pub fn plot_densities(
    increase: Option<&Histogram>,
    decrease: Option<&Histogram>,
    title: &str,
    output_path: &Path,
) -> ChartResult {
    let increase = increase.map(Histogram::density_points).unwrap_or_default();
    let decrease = decrease.map(Histogram::density_points).unwrap_or_default();
    let all = || increase.iter().chain(decrease.iter());

    let x_min = all().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = all().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_max = all().map(|p| p.1).fold(0.0, f64::max);
    let (x_min, x_max) = if x_min < x_max { (x_min, x_max) } else { (x_min - 0.5, x_min + 0.5) };

    let root = BitMapBackend::new(output_path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..(y_max * 1.1).max(f64::EPSILON))?;

    chart
        .configure_mesh()
        .x_desc("Waiting time (samples)")
        .y_desc("Probability density")
        .draw()?;

    if !increase.is_empty() {
        chart.draw_series(AreaSeries::new(increase.iter().copied(), 0.0, BLUE.mix(0.3)))?;
        chart
            .draw_series(
                increase
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, BLUE.mix(0.7).filled())),
            )?
            .label("Increase")
            .legend(|(x, y)| Circle::new((x, y), 4, BLUE.filled()));
    }

    if !decrease.is_empty() {
        chart.draw_series(AreaSeries::new(decrease.iter().copied(), 0.0, RED.mix(0.3)))?;
        chart
            .draw_series(
                decrease
                    .iter()
                    .map(|&(x, y)| Cross::new((x, y), 3, RED.mix(0.7))),
            )?
            .label("Decrease")
            .legend(|(x, y)| Cross::new((x, y), 4, &RED));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}
