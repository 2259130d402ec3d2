//! Output Generation
//!
//! World snapshots for observers and end-of-run statistics.

pub mod snapshot;
pub mod stats;

pub use snapshot::*;
pub use stats::*;
