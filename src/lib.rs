//! Inverse statistics of a price series: how long until the price first
//! moves up or down by a fixed amount.
//!
//! The work is split across the workspace crates re-exported here:
//!
//! - [`waiting`] - staircases and waiting-time evaluation
//! - [`io`] - price file loading and result writers
//! - [`stats`] - summaries and histograms of waiting times

pub use series_io as io;
pub use stats;
pub use waiting;

pub use waiting::{
    Delta, DeltaSet, Direction, PriceSeries, Staircases, WaitTime, WaitingTimes,
    compute_waiting_times,
};

/// Load a price file and compute waiting times for every delta in both directions.
pub fn waiting_times_from_file<P: AsRef<std::path::Path>>(
    path: P,
    deltas: &DeltaSet,
) -> Result<WaitingTimes, Error> {
    let series = PriceSeries::new(io::read_price_series(path)?)?;
    let staircases = Staircases::build(&series);
    Ok(compute_waiting_times(&series, &staircases, deltas)?)
}

/// Failure of [`waiting_times_from_file`]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] io::LoadError),

    #[error(transparent)]
    Wait(#[from] waiting::WaitError),
}
