//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the source series (`RateSeries`) and the required window (`DateRange`)
//! - the gap-free output (`ReconciledSeries`) with per-date provenance
//! - run configuration (`RunConfig`, `FillPolicy`, `CurrencyPair`)

pub mod types;

pub use types::*;
