//! Summary statistics and trend analysis over a reconciled series.
//!
//! Days without a value (unfillable gaps) are skipped by the statistics and
//! break any moving-average window or day-over-day change that touches them.

pub mod stats;
pub mod trend;

pub use stats::*;
pub use trend::*;
