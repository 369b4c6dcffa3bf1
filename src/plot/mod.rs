//! Charts: a deterministic ASCII plot for the terminal and an SVG file.

pub mod ascii;
pub mod chart;

pub use ascii::render_ascii_chart;
pub use chart::RateChart;
