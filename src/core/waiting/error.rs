use thiserror::Error;

use crate::types::Direction;

/// Errors raised by the waiting-time core.
///
/// An unreachable target is not an error; it is reported as
/// [`WaitTime::Unreachable`](crate::WaitTime::Unreachable).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaitError {
    #[error("invalid delta {value}: must be finite and greater than 0")]
    InvalidDelta { value: f64 },

    #[error("invalid delta set: at least one delta is required")]
    EmptyDeltaSet,

    #[error("invalid series: {0}")]
    InvalidSeries(String),

    #[error("index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("staircase was built from a different series (series length {series_len}, staircase length {staircase_len})")]
    StaircaseMismatch { series_len: usize, staircase_len: usize },

    #[error("expected a {expected} staircase, got {found}")]
    DirectionMismatch { expected: Direction, found: Direction },
}
