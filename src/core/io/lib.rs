//! Price-file loading and result writing for waiting-time analyses.

mod read;
mod write;

pub use read::*;
pub use write::*;
