//! Export the reconciled series to JSON or CSV.
//!
//! Dates are written as `YYYY-MM-DD`; unfillable days are `null` in JSON and
//! an empty field in CSV.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::{CurrencyPair, DATE_FORMAT, ReconciledSeries};
use crate::error::AppError;

/// JSON document shape.
#[derive(Debug, Serialize)]
pub struct SeriesFile {
    pub base: String,
    pub target: String,
    pub start_date: String,
    pub end_date: String,
    pub rates: BTreeMap<String, Option<f64>>,
}

impl SeriesFile {
    pub fn new(pair: &CurrencyPair, series: &ReconciledSeries) -> Self {
        let range = series.range();
        Self {
            base: pair.base.clone(),
            target: pair.target.clone(),
            start_date: range.start.format(DATE_FORMAT).to_string(),
            end_date: range.end.format(DATE_FORMAT).to_string(),
            rates: series
                .rates()
                .map(|(d, v)| (d.format(DATE_FORMAT).to_string(), v))
                .collect(),
        }
    }
}

/// Write the series as pretty JSON.
pub fn write_series_json(path: &Path, pair: &CurrencyPair, series: &ReconciledSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), &SeriesFile::new(pair, series))
        .map_err(|e| AppError::config(format!("Failed to write export JSON: {e}")))?;

    info!(path = %path.display(), days = series.len(), "exported series JSON");
    Ok(())
}

/// Write `date,rate,source` rows.
pub fn write_series_csv(path: &Path, series: &ReconciledSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "date,rate,source")
        .map_err(|e| AppError::config(format!("Failed to write export CSV header: {e}")))?;

    for (date, point) in series.iter() {
        writeln!(
            out,
            "{},{},{}",
            date.format(DATE_FORMAT),
            point.rate.map(|v| v.to_string()).unwrap_or_default(),
            point.source.label(),
        )
        .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::config(format!("Failed to write export CSV: {e}")))?;

    info!(path = %path.display(), days = series.len(), "exported series CSV");
    Ok(())
}
