//! Terminal reporting.

pub mod format;

pub use format::*;
