//! Waiting times until a price series moves by a fixed amount.
//!
//! For every index of a regularly sampled series, every delta and both
//! directions, the evaluator reports the number of steps until the price
//! first reaches `price[i] + delta` (Increase) or `price[i] - delta`
//! (Decrease), or [`WaitTime::Unreachable`] when the series ends first.
//!
//! # Modules
//!
//! - `types` - Series, deltas, directions and the waiting-time outcome
//! - `staircase` - Forward-record staircases, one per direction
//! - `evaluator` - Staircase-backed waiting-time evaluation
//! - `scan` - Quadratic reference scan used for cross-checking
//!
//! ```
//! use waiting::{DeltaSet, Direction, PriceSeries, Staircases, WaitTime, compute_waiting_times};
//!
//! let series = PriceSeries::new(vec![1800.0, 1805.0, 1803.0, 1810.0, 1795.0, 1790.0]).unwrap();
//! let staircases = Staircases::build(&series);
//! let deltas = DeltaSet::new([10.0]).unwrap();
//! let times = compute_waiting_times(&series, &staircases, &deltas).unwrap();
//!
//! let up = times.get(deltas.as_slice()[0], Direction::Increase).unwrap();
//! assert_eq!(up[0], WaitTime::Finite(3));
//! ```

pub mod error;
pub mod evaluator;
pub mod scan;
pub mod staircase;
pub mod types;

pub use error::WaitError;
pub use evaluator::{
    Evaluation, WaitingTimes, compute_waiting_times, compute_waiting_times_with, waiting_time,
};
pub use scan::{scan_from, scan_waiting_times};
pub use staircase::{Record, Records, Staircase, Staircases, build_staircase};
pub use types::{
    DEFAULT_DELTAS, Delta, DeltaSet, Direction, PriceSeries, SAMPLE_INTERVAL, WaitTime,
};
