//! `fx-rates` library crate.
//!
//! The binary (`fxr`) is a thin wrapper around this library so that:
//!
//! - the gap-repair core is testable without spawning processes or touching
//!   the network
//! - the provider client, analysis and presentation layers can be swapped
//!   independently

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod reconcile;
pub mod report;
