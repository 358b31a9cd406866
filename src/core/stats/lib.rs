//! Summaries and distributions of waiting-time arrays.
//!
//! Unreachable entries are counted but never enter a numeric statistic.

mod histogram;
mod summary;

pub use histogram::*;
pub use summary::*;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("histogram needs at least one bin")]
    ZeroBins,

    #[error("no finite values to bin")]
    NoValues,

    #[error("non-finite value {0} cannot be binned")]
    NonFinite(f64),
}
