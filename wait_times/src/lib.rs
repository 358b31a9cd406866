//! Library side of the `wait_times` binary.
//!
//! # Modules
//!
//! - `config` - TOML configuration merged with command-line flags
//! - `analysis` - Load, compute, cross-check and summarise waiting times
//! - `report` - Plain-text `WAIT_TIMES.LOG`
//! - `visualization` - PNG charts of waiting times and their distributions
//! - `logger` - tracing subscriber setup

pub mod analysis;
pub mod config;
pub mod logger;
pub mod report;
pub mod visualization;

pub use analysis::{AnalysisResult, OutputFiles, PairSummary, analyze, run_analysis, write_outputs};
pub use config::{Args, Config};
pub use logger::init_logger;
pub use report::{format_report, write_report};
pub use visualization::render_charts;
