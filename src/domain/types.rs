//! Shared domain types.
//!
//! Dates are `NaiveDate` everywhere inside the crate. The `YYYY-MM-DD` string
//! form only appears at the edges (API decode, exports, terminal output).

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::RangeBounds;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Wire format for dates at the I/O boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date key.
///
/// Only the fixed-width, zero-padded form is accepted, so that anything which
/// would have sorted differently as a string is rejected rather than reordered.
pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Base/target currency codes for a run (one target per run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub target: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            target: target.into().to_uppercase(),
        }
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.target)
    }
}

/// Observed daily rates for one currency pair, ordered by date.
///
/// Keys are unique by construction. The series is read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSeries {
    rates: BTreeMap<NaiveDate, f64>,
}

impl RateSeries {
    pub fn new(rates: BTreeMap<NaiveDate, f64>) -> Self {
        Self { rates }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.rates.get(&date).copied()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.rates.contains_key(&date)
    }

    /// Known dates, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.rates.iter().map(|(d, v)| (*d, *v))
    }

    pub(crate) fn range_dates<R>(&self, range: R) -> impl DoubleEndedIterator<Item = NaiveDate> + '_
    where
        R: RangeBounds<NaiveDate>,
    {
        self.rates.range(range).map(|(d, _)| *d)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rates.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rates.keys().next_back().copied()
    }
}

impl FromIterator<(NaiveDate, f64)> for RateSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

/// Inclusive calendar-date window.
///
/// `start > end` is allowed and describes an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The window `[today - days, today]`.
    pub fn lookback(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_days(chrono::Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Number of calendar days in the window (0 when inverted).
    pub fn len(&self) -> usize {
        if self.is_inverted() {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_inverted()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Where a reconciled value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointSource {
    /// Copied verbatim from the source series.
    Observed,
    /// Filled by the gap policy.
    Interpolated,
    /// No value could be produced (empty source series).
    Missing,
}

impl PointSource {
    pub fn label(self) -> &'static str {
        match self {
            PointSource::Observed => "observed",
            PointSource::Interpolated => "interpolated",
            PointSource::Missing => "missing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconciledPoint {
    pub rate: Option<f64>,
    pub source: PointSource,
}

/// Gap-free series covering a `DateRange`, one entry per calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledSeries {
    range: DateRange,
    points: BTreeMap<NaiveDate, ReconciledPoint>,
}

impl ReconciledSeries {
    pub(crate) fn from_points(range: DateRange, points: BTreeMap<NaiveDate, ReconciledPoint>) -> Self {
        Self { range, points }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rate for `date`; `None` if outside the window or unfillable.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points.get(&date).and_then(|p| p.rate)
    }

    pub fn point(&self, date: NaiveDate) -> Option<&ReconciledPoint> {
        self.points.get(&date)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, ReconciledPoint> {
        self.points.iter()
    }

    /// `(date, rate)` pairs, ascending, including unfillable days as `None`.
    pub fn rates(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.points.iter().map(|(d, p)| (*d, p.rate))
    }

    /// Present values only, ascending by date.
    pub fn present_values(&self) -> Vec<f64> {
        self.points.values().filter_map(|p| p.rate).collect()
    }

    /// Drop unfillable days and treat every remaining value as observed.
    pub fn to_rate_series(&self) -> RateSeries {
        self.points
            .iter()
            .filter_map(|(d, p)| p.rate.map(|v| (*d, v)))
            .collect()
    }

    pub fn summary(&self) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        for p in self.points.values() {
            match p.source {
                PointSource::Observed => summary.observed += 1,
                PointSource::Interpolated => summary.interpolated += 1,
                PointSource::Missing => summary.missing += 1,
            }
        }
        summary
    }
}

/// Per-source counts of a reconciled series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub observed: usize,
    pub interpolated: usize,
    pub missing: usize,
}

impl ReconcileSummary {
    pub fn total(&self) -> usize {
        self.observed + self.interpolated + self.missing
    }
}

/// Which gap-fill rule to apply to days missing from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FillPolicy {
    /// Unweighted mean of the nearest known rates on either side.
    #[default]
    Midpoint,
    /// Linear in calendar days between the nearest known rates.
    TimeWeighted,
}

/// API access key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Provider endpoint settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_url: String,
    pub end_point: String,
    pub api_key: Option<ApiKey>,
}

/// Analysis and presentation settings.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Moving-average window (days).
    pub moving_average: usize,
    /// Render an ASCII chart in the terminal.
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Optional SVG chart file and its pixel size.
    pub chart: Option<PathBuf>,
    pub fig_width: u32,
    pub fig_height: u32,
}

/// A full run's configuration.
///
/// Built once at process entry from env, config files and CLI flags, then
/// passed by reference. Nothing reads the clock after this is built.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub today: NaiveDate,
    pub lookback_days: u32,
    pub pair: CurrencyPair,
    pub fill: FillPolicy,
    pub provider: ProviderConfig,
    pub analysis: AnalysisConfig,
    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl RunConfig {
    pub fn range(&self) -> DateRange {
        DateRange::lookback(self.today, self.lookback_days)
    }
}
