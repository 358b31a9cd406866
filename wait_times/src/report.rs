use anyhow::{Context, Result};
use series_io::write_file;
use std::fmt::Write as FmtWrite;
use std::path::Path;

use crate::analysis::AnalysisResult;
use crate::config::Config;

/// Human-readable report of one run.
pub fn format_report(result: &AnalysisResult, config: &Config) -> Result<String, std::fmt::Error> {
    let mut content = String::new();

    writeln!(content, "Waiting times until price moves by a fixed amount")?;
    writeln!(content, "{}", "=".repeat(60))?;
    writeln!(content, "Data file: {}", config.data_file.display())?;
    writeln!(content, "Prices loaded: {}", result.loaded)?;
    writeln!(content, "Prices analysed: {}", result.series.len())?;
    writeln!(content, "Sampling interval: {} s", config.sample_seconds)?;
    writeln!(content, "Evaluation: {:?}", config.evaluation)?;
    writeln!(content)?;

    writeln!(
        content,
        "{:>10} {:>9} {:>10} {:>12} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "delta", "direction", "reached", "unreachable", "mean", "median", "p90", "max", "mean_min"
    )?;

    for pair in &result.summaries {
        let s = &pair.summary;
        write!(
            content,
            "{:>10} {:>9} {:>10} {:>12}",
            pair.delta,
            pair.direction.as_str(),
            s.reached,
            s.unreachable
        )?;
        match (&s.offsets, pair.mean_minutes(config.sample_seconds)) {
            (Some(o), Some(minutes)) => writeln!(
                content,
                " {:>10.2} {:>10.1} {:>10.1} {:>10} {:>10.2}",
                o.mean, o.median, o.p90, o.max, minutes
            )?,
            _ => writeln!(content, " {:>10} {:>10} {:>10} {:>10} {:>10}", "-", "-", "-", "-", "-")?,
        }
    }

    writeln!(content)?;
    writeln!(content, "Offsets are in samples. Unreachable targets are excluded from all statistics.")?;
    Ok(content)
}

pub fn write_report(path: &Path, result: &AnalysisResult, config: &Config) -> Result<()> {
    let content = format_report(result, config).context("Failed to format report")?;
    write_file(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
