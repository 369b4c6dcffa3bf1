//! Command-line parsing for the FX rate series tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! reconcile/analysis code. Every flag here is optional and overrides the
//! matching config-file value.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::MAX_LOOKBACK_DAYS;
use crate::domain::FillPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fxr", version, about = "FX rate series: fetch, gap-fill, analyze")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the lookback window from the provider, fill gaps, print statistics.
    Analyze(SeriesArgs),
    /// Fill gaps in a saved provider response (no network).
    Reconcile(ReconcileArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone, Default)]
pub struct SeriesArgs {
    /// Base currency code (e.g. AUD).
    #[arg(short = 'b', long)]
    pub base: Option<String>,

    /// Target currency code (e.g. NZD).
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// Lookback window in days before `--today`.
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_LOOKBACK_DAYS)))]
    pub days: Option<u32>,

    /// Anchor date for the window (YYYY-MM-DD); defaults to the local date.
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Gap-fill rule for missing days.
    #[arg(long, value_enum)]
    pub fill: Option<FillPolicy>,

    /// Moving-average window in days.
    #[arg(long)]
    pub moving_average: Option<usize>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write an SVG chart of rate and moving average.
    #[arg(long, value_name = "SVG")]
    pub chart: Option<PathBuf>,

    /// Export the reconciled series to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Export the reconciled series to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

/// Options for offline reconcile.
#[derive(Debug, Args, Clone)]
pub struct ReconcileArgs {
    /// Saved provider response (timeseries JSON).
    #[arg(long, short = 'i', value_name = "JSON")]
    pub input: PathBuf,

    #[command(flatten)]
    pub series: SeriesArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_flags() {
        let cli = Cli::parse_from([
            "fxr", "analyze", "-b", "eur", "-t", "usd", "-d", "14", "--today", "2024-07-09", "--fill",
            "time-weighted", "--no-plot",
        ]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.base.as_deref(), Some("eur"));
        assert_eq!(args.target.as_deref(), Some("usd"));
        assert_eq!(args.days, Some(14));
        assert_eq!(args.today, NaiveDate::from_ymd_opt(2024, 7, 9));
        assert_eq!(args.fill, Some(FillPolicy::TimeWeighted));
        assert!(args.no_plot);
        assert_eq!(args.width, 80);
    }

    #[test]
    fn parses_reconcile_with_global_verbose() {
        let cli = Cli::parse_from(["fxr", "reconcile", "-i", "resp.json", "-v", "--export-csv", "out.csv"]);
        assert!(cli.verbose);
        let Command::Reconcile(args) = cli.command else {
            panic!("expected reconcile");
        };
        assert_eq!(args.input, PathBuf::from("resp.json"));
        assert_eq!(args.series.export_csv, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn rejects_oversized_lookback() {
        assert!(Cli::try_parse_from(["fxr", "reconcile", "-i", "f.json", "-d", "4000000000"]).is_err());
        assert!(Cli::try_parse_from(["fxr", "analyze", "-d", "3651"]).is_err());
        let cli = Cli::parse_from(["fxr", "analyze", "-d", "3650"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.days, Some(MAX_LOOKBACK_DAYS));
    }

    #[test]
    fn rejects_malformed_today() {
        assert!(Cli::try_parse_from(["fxr", "analyze", "--today", "2024-7-9x"]).is_err());
    }
}
