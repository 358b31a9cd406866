use anyhow::Result;
use clap::Parser;
use wait_times::*;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.json_logs);

    println!("WAIT_TIMES - Waiting times until the price moves by a fixed amount\n");

    let config = Config::load(&args)?;
    println!("Data file: {}", config.data_file.display());
    let deltas: Vec<String> = config.delta_set()?.iter().map(|d| d.to_string()).collect();
    println!("Deltas: {}", deltas.join(", "));

    let result = run_analysis(&config)?;
    println!(
        "Prices analysed: {} of {} ({} s per sample)",
        result.series.len(),
        result.loaded,
        config.sample_interval().as_secs()
    );

    println!("\n{}", "=".repeat(60));
    println!("{:>10} {:>9} {:>10} {:>12} {:>12}", "delta", "direction", "reached", "unreachable", "mean (min)");
    println!("{}", "=".repeat(60));
    for pair in &result.summaries {
        let mean = pair
            .mean_minutes(config.sample_seconds)
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>10} {:>9} {:>10} {:>12} {:>12}",
            pair.delta,
            pair.direction.as_str(),
            pair.summary.reached,
            pair.summary.unreachable,
            mean
        );
    }

    let longest = result
        .times
        .iter()
        .flat_map(|(_, _, waits)| waits.iter().copied())
        .filter(|w| w.is_reachable())
        .max();
    if let Some(duration) = longest.and_then(|w| w.duration(config.sample_interval())) {
        println!("\nLongest finite wait: {:.1} min", duration.as_secs_f64() / 60.0);
    }

    let outputs = write_outputs(&result, &config)?;
    println!("\nResults written to {}", outputs.csv.display());
    println!("Summary written to {}", outputs.summary.display());
    println!("Report written to {}", outputs.report.display());
    if !outputs.charts.is_empty() {
        println!("Charts written: {}", outputs.charts.len());
    }

    Ok(())
}
