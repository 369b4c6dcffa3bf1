//! Input/output helpers.
//!
//! - saved provider responses (`input`)
//! - reconciled series exports, JSON/CSV (`export`)

pub mod export;
pub mod input;

pub use export::*;
pub use input::*;
