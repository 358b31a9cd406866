use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use waiting::{DEFAULT_DELTAS, DeltaSet, Evaluation};

/// Configuration for a waiting-time analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the price file (one price per line)
    pub data_file: PathBuf,

    /// Price moves to wait for
    #[serde(default = "default_deltas")]
    pub deltas: Vec<f64>,

    /// Only analyse the first N prices
    #[serde(default)]
    pub max_points: Option<usize>,

    /// Directory for the CSV, JSON, log and chart outputs
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Histogram bins for the distribution charts
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Seconds between consecutive prices
    #[serde(default = "default_sample_seconds")]
    pub sample_seconds: u64,

    #[serde(default)]
    pub evaluation: Evaluation,

    /// Re-run the quadratic forward scan and fail if it disagrees
    #[serde(default)]
    pub cross_check: bool,

    /// Render PNG charts
    #[serde(default = "default_charts")]
    pub charts: bool,
}

fn default_deltas() -> Vec<f64> {
    DEFAULT_DELTAS.to_vec()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results/")
}

fn default_bins() -> usize {
    1000
}

fn default_sample_seconds() -> u64 {
    60
}

fn default_charts() -> bool {
    true
}

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "wait_times")]
#[command(about = "Waiting times until a 1-minute price series moves up or down by fixed amounts")]
pub struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Price file, one price per line (overrides the config file)
    #[arg(value_name = "DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Price moves to wait for (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub deltas: Option<Vec<f64>>,

    /// Only analyse the first N prices
    #[arg(long)]
    pub max_points: Option<usize>,

    /// Output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Histogram bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// Evaluate on the current thread only
    #[arg(long)]
    pub sequential: bool,

    /// Cross-check against the quadratic forward scan
    #[arg(long)]
    pub scan: bool,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Config {
    /// Defaults for everything except the data file
    pub fn new<P: Into<PathBuf>>(data_file: P) -> Self {
        Self {
            data_file: data_file.into(),
            deltas: default_deltas(),
            max_points: None,
            output_dir: default_output_dir(),
            bins: default_bins(),
            sample_seconds: default_sample_seconds(),
            evaluation: Evaluation::default(),
            cross_check: false,
            charts: default_charts(),
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Build the configuration from the command line, starting from the
    /// config file when one is given. Explicit flags win.
    pub fn load(args: &Args) -> Result<Self> {
        let mut config = match (&args.config, &args.data_file) {
            (Some(path), _) => Self::read_file(path)?,
            (None, Some(data_file)) => Self::new(data_file.clone()),
            (None, None) => anyhow::bail!("DATA_FILE is required when no --config is given"),
        };

        if let Some(data_file) = &args.data_file {
            config.data_file = data_file.clone();
        }
        if let Some(deltas) = &args.deltas {
            config.deltas = deltas.clone();
        }
        if args.max_points.is_some() {
            config.max_points = args.max_points;
        }
        if let Some(output_dir) = &args.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(bins) = args.bins {
            config.bins = bins;
        }
        if args.sequential {
            config.evaluation = Evaluation::Sequential;
        }
        if args.scan {
            config.cross_check = true;
        }
        if args.no_charts {
            config.charts = false;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.delta_set()?;

        if self.bins == 0 {
            anyhow::bail!("bins must be greater than 0");
        }

        if self.max_points == Some(0) {
            anyhow::bail!("max_points must be greater than 0");
        }

        if self.sample_seconds == 0 {
            anyhow::bail!("sample_seconds must be greater than 0");
        }

        Ok(())
    }

    pub fn delta_set(&self) -> Result<DeltaSet> {
        DeltaSet::new(self.deltas.iter().copied()).context("Invalid deltas")
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_seconds)
    }
}
