//! Gap repair for daily rate series.
//!
//! Responsibilities:
//!
//! - enumerate the required calendar days (`range`)
//! - locate the nearest known dates around a gap (`nearest`)
//! - compute a fill value for a gap (`fill`)
//! - assemble the gap-free series (`reconciler`)
//!
//! Everything here is pure: no I/O, no clock, no process control.

pub mod fill;
pub mod nearest;
pub mod range;
pub mod reconciler;

pub use fill::*;
pub use nearest::*;
pub use range::*;
pub use reconciler::*;
