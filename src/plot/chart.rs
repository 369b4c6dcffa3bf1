//! Plotters-rendered SVG chart: rate, moving average, statistics annotation.
//!
//! The x axis is a day offset from the first date; tick labels are formatted
//! back to `YYYY-MM-DD`. Missing days break both lines. A window with no rates
//! at all renders as a blank chart carrying a note.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{info, warn};

use crate::analysis::{RateStatistics, TrendPoint};
use crate::domain::{CurrencyPair, DATE_FORMAT};
use crate::error::AppError;
use crate::plot::ascii::present_runs;

/// What the chart shows.
pub struct RateChart<'a> {
    pub pair: &'a CurrencyPair,
    pub trend: &'a [TrendPoint],
    pub window: usize,
    pub stats: Option<&'a RateStatistics>,
    /// Pixel size.
    pub size: (u32, u32),
}

impl RateChart<'_> {
    /// Render to an in-memory SVG document.
    pub fn render_svg(&self) -> Result<String, AppError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(chart_err)?;
        }
        Ok(svg)
    }

    /// Render and write to `path`.
    pub fn write_svg(&self, path: &Path) -> Result<(), AppError> {
        let svg = self.render_svg()?;
        std::fs::write(path, svg)
            .map_err(|e| AppError::config(format!("Failed to write chart '{}': {e}", path.display())))?;
        info!(path = %path.display(), "wrote chart");
        Ok(())
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), AppError> {
        root.fill(&WHITE).map_err(chart_err)?;

        let Some(first) = self.trend.first() else {
            return self.draw_note(root, "No days to chart.");
        };
        let origin = first.date;

        let rates = present_runs(self.trend.iter().map(|t| (day_offset(origin, t.date), t.rate)));
        let averages = present_runs(self.trend.iter().map(|t| (day_offset(origin, t.date), t.moving_average)));
        let Some((y0, y1)) = y_bounds(rates.iter().chain(averages.iter()).flatten().map(|&(_, y)| y)) else {
            return self.draw_note(root, "No rates to chart.");
        };
        let x_max = (self.trend.len() as f64 - 1.0).max(1.0);

        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("Exchange Rate and Moving Average ({} days)", self.window),
                ("sans-serif", 20),
            )
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..x_max, y0..y1)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc(format!("{} per {}", self.pair.target, self.pair.base))
            .x_labels(8)
            .y_labels(6)
            .x_label_formatter(&|v| label_date(origin, *v))
            .y_label_formatter(&|v| format!("{v:.4}"))
            .draw()
            .map_err(chart_err)?;

        for (i, run) in rates.into_iter().enumerate() {
            let series = chart
                .draw_series(LineSeries::new(run, &BLUE))
                .map_err(chart_err)?;
            if i == 0 {
                series
                    .label("Exchange Rate")
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
            }
        }

        for (i, run) in averages.into_iter().enumerate() {
            let series = chart
                .draw_series(LineSeries::new(run, &RED))
                .map_err(chart_err)?;
            if i == 0 {
                series
                    .label(format!("{}-day Moving Average", self.window))
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
            }
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(chart_err)?;

        if let Some(stats) = self.stats {
            let (w, h) = root.dim_in_pixel();
            let x = w as i32 - 230;
            let lines = stats_lines(stats);
            let top = h as i32 - 60 - 18 * lines.len() as i32;
            for (i, line) in lines.iter().enumerate() {
                root.draw(&Text::new(
                    line.as_str(),
                    (x, top + 18 * i as i32),
                    ("sans-serif", 14).into_font(),
                ))
                .map_err(chart_err)?;
            }
        }

        Ok(())
    }

    fn draw_note<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, note: &str) -> Result<(), AppError> {
        warn!(pair = %self.pair, "{note}");
        let (w, h) = root.dim_in_pixel();
        let caption = format!("Exchange Rate and Moving Average ({} days)", self.window);
        root.draw(&Text::new(caption, (12, 12), ("sans-serif", 20).into_font()))
            .map_err(chart_err)?;
        root.draw(&Text::new(
            note.to_string(),
            (w as i32 / 2 - 60, h as i32 / 2),
            ("sans-serif", 16).into_font(),
        ))
        .map_err(chart_err)?;
        Ok(())
    }
}

fn stats_lines(stats: &RateStatistics) -> Vec<String> {
    vec![
        match stats.std_dev {
            Some(sd) => format!("Standard Deviation: {sd:.4}"),
            None => "Standard Deviation: n/a".to_string(),
        },
        format!("Min: {:.4}", stats.min),
        format!("Max: {:.4}", stats.max),
        format!("Mean: {:.4}", stats.mean),
        format!("Median: {:.4}", stats.median),
    ]
}

fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

fn label_date(origin: NaiveDate, offset: f64) -> String {
    let date = origin + Duration::days(offset.round() as i64);
    date.format(DATE_FORMAT).to_string()
}

fn y_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    let pad = ((max - min) * 0.05).max(min.abs() * 1e-3).max(1e-6);
    Some((min - pad, max + pad))
}

fn chart_err(e: impl std::fmt::Display) -> AppError {
    AppError::runtime(format!("Chart rendering failed: {e}"))
}
