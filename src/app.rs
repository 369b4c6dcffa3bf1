//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads env and config files into one immutable `RunConfig`
//! - sets up logging
//! - runs the pipeline (fetch or load, reconcile, analyze)
//! - prints reports/plots and writes optional exports

use std::fs::{File, create_dir_all};
use std::path::Path;
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ReconcileArgs, SeriesArgs};
use crate::config::{ConfigFiles, EnvSettings, dated_log_file};
use crate::domain::{AnalysisConfig, CurrencyPair, ProviderConfig, RunConfig, parse_date_key};
use crate::error::AppError;

pub mod pipeline;

use pipeline::RunOutput;

/// Entry point for the `fxr` binary.
pub fn run() -> Result<(), AppError> {
    // `fxr` and `fxr -b EUR ...` behave like `fxr analyze ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let env = EnvSettings::from_env();
    let today = Local::now().date_naive();
    init_logging(env.log_file.as_deref(), today, cli.verbose)?;

    let files = ConfigFiles::load(&env.config_dir)?;

    match cli.command {
        Command::Analyze(args) => handle_analyze(&run_config_from_args(&args, &env, &files, today)),
        Command::Reconcile(args) => handle_reconcile(args, &env, &files, today),
    }
}

fn handle_analyze(config: &RunConfig) -> Result<(), AppError> {
    info!(pair = %config.pair, days = config.lookback_days, "initiating process to retrieve exchange rates");
    let run = pipeline::run_analysis(config)?;
    present(config, &run)
}

fn handle_reconcile(
    args: ReconcileArgs,
    env: &EnvSettings,
    files: &ConfigFiles,
    today: NaiveDate,
) -> Result<(), AppError> {
    let resp = crate::io::read_response_file(&args.input)?;

    // Anchor on the response's own end date unless told otherwise.
    let anchor = resp
        .end_date
        .as_deref()
        .and_then(parse_date_key)
        .unwrap_or(today);
    let config = run_config_from_args(&args.series, env, files, anchor);

    let series = resp.into_series(&config.pair.target)?;
    let run = pipeline::run_with_series(&config, &series);
    present(&config, &run)
}

fn present(config: &RunConfig, run: &RunOutput) -> Result<(), AppError> {
    println!(
        "{}",
        crate::report::format_run_summary(&config.pair, config.range(), config.fill, &run.summary)
    );
    println!("{}", crate::report::format_statistics(run.stats.as_ref()));
    println!(
        "{}",
        crate::report::format_series_table(&run.reconciled, &run.trend, config.analysis.moving_average)
    );

    if config.analysis.plot {
        let plot = crate::plot::render_ascii_chart(
            &run.reconciled,
            &run.trend,
            config.analysis.moving_average,
            config.analysis.plot_width,
            config.analysis.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports, ahead of the chart.
    if let Some(path) = &config.export_json {
        crate::io::write_series_json(path, &config.pair, &run.reconciled)?;
    }
    if let Some(path) = &config.export_csv {
        crate::io::write_series_csv(path, &run.reconciled)?;
    }

    if let Some(path) = &config.analysis.chart {
        crate::plot::RateChart {
            pair: &config.pair,
            trend: &run.trend,
            window: config.analysis.moving_average,
            stats: run.stats.as_ref(),
            size: (config.analysis.fig_width, config.analysis.fig_height),
        }
        .write_svg(path)?;
    }

    Ok(())
}

/// Resolve CLI flags over config files over defaults.
pub fn run_config_from_args(
    args: &SeriesArgs,
    env: &EnvSettings,
    files: &ConfigFiles,
    default_today: NaiveDate,
) -> RunConfig {
    let (fig_width, fig_height) = files.chart_size();
    RunConfig {
        today: args.today.unwrap_or(default_today),
        lookback_days: args.days.unwrap_or_else(|| files.days()),
        pair: CurrencyPair::new(
            args.base.clone().unwrap_or_else(|| files.base_currency()),
            args.target.clone().unwrap_or_else(|| files.target_currency()),
        ),
        fill: args.fill.unwrap_or_default(),
        provider: ProviderConfig {
            api_url: files.api_url(),
            end_point: files.end_point(),
            api_key: env.api_key.clone(),
        },
        analysis: AnalysisConfig {
            moving_average: args.moving_average.unwrap_or_else(|| files.moving_average()),
            plot: !args.no_plot,
            plot_width: args.width,
            plot_height: args.height,
            chart: args.chart.clone(),
            fig_width,
            fig_height,
        },
        export_json: args.export.clone(),
        export_csv: args.export_csv.clone(),
    }
}

/// Install the global `tracing` subscriber.
///
/// With `LOG_FILE` set, logs go to `{LOG_FILE}.{YYYY-MM-DD}.log`; otherwise
/// to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(log_file: Option<&Path>, today: NaiveDate, verbose: bool) -> Result<(), AppError> {
    let default_directive = if verbose { "info,fx_rates=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    match log_file {
        Some(base) => {
            let path = dated_log_file(base, today);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_dir_all(parent).map_err(|e| {
                    AppError::config(format!("Failed to create log dir '{}': {e}", parent.display()))
                })?;
            }
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::config(format!("Failed to open log file '{}': {e}", path.display())))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
    Ok(())
}

/// Rewrite argv so `fxr` defaults to `fxr analyze`.
///
/// Only the first token after any global `-v/--verbose` decides; later tokens
/// may be option values that happen to spell a subcommand.
///
/// Rules:
/// - `fxr`, `fxr -v`            -> `fxr analyze`, `fxr -v analyze`
/// - `fxr -b EUR ...`           -> `fxr analyze -b EUR ...`
/// - `fxr --chart help`         -> `fxr analyze --chart help`
/// - `fxr -v reconcile ...`     -> unchanged (subcommand present)
/// - `fxr --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let first = argv
        .iter()
        .skip(1)
        .find(|a| !matches!(a.as_str(), "-v" | "--verbose"))
        .cloned();
    let Some(arg1) = first else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_or_subcommand = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help" | "analyze" | "reconcile"
    );
    if is_top_level_or_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiKey, FillPolicy, RateSeries};
    use std::path::PathBuf;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_analyze() {
        assert_eq!(rewrite_args(argv(&["fxr"])), argv(&["fxr", "analyze"]));
    }

    #[test]
    fn leading_flags_go_to_analyze() {
        assert_eq!(
            rewrite_args(argv(&["fxr", "-b", "EUR"])),
            argv(&["fxr", "analyze", "-b", "EUR"])
        );
    }

    #[test]
    fn option_values_named_like_subcommands_still_go_to_analyze() {
        assert_eq!(
            rewrite_args(argv(&["fxr", "--chart", "help"])),
            argv(&["fxr", "analyze", "--chart", "help"])
        );
        assert_eq!(
            rewrite_args(argv(&["fxr", "-v", "--export", "reconcile"])),
            argv(&["fxr", "analyze", "-v", "--export", "reconcile"])
        );
        assert_eq!(rewrite_args(argv(&["fxr", "-v"])), argv(&["fxr", "-v", "analyze"]));
    }

    #[test]
    fn explicit_subcommand_is_untouched() {
        let args = argv(&["fxr", "-v", "reconcile", "-i", "x.json"]);
        assert_eq!(rewrite_args(args.clone()), args);
        let args = argv(&["fxr", "--help"]);
        assert_eq!(rewrite_args(args.clone()), args);
    }

    #[test]
    fn cli_flags_override_config_files() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        let env = EnvSettings {
            api_key: Some(ApiKey::new("k")),
            log_file: None,
            config_dir: PathBuf::from("config"),
        };
        let files = ConfigFiles::default();

        let defaults = run_config_from_args(&SeriesArgs::default(), &env, &files, today);
        assert_eq!(defaults.today, today);
        assert_eq!(defaults.lookback_days, 30);
        assert_eq!(defaults.pair, CurrencyPair::new("AUD", "NZD"));
        assert_eq!(defaults.fill, FillPolicy::Midpoint);
        assert_eq!(defaults.analysis.moving_average, 7);
        assert_eq!(defaults.range().len(), 31);
        assert!(defaults.analysis.plot);

        let args = SeriesArgs {
            base: Some("eur".to_string()),
            days: Some(4),
            today: NaiveDate::from_ymd_opt(2024, 1, 10),
            fill: Some(FillPolicy::TimeWeighted),
            no_plot: true,
            ..SeriesArgs::default()
        };
        let config = run_config_from_args(&args, &env, &files, today);
        assert_eq!(config.pair.base, "EUR");
        assert_eq!(config.pair.target, "NZD");
        assert_eq!(config.range().start, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
        assert_eq!(config.fill, FillPolicy::TimeWeighted);
        assert!(!config.analysis.plot);
    }

    #[test]
    fn all_missing_series_still_writes_exports_and_chart() {
        let dir = tempfile::tempdir().unwrap();
        let env = EnvSettings {
            api_key: None,
            log_file: None,
            config_dir: dir.path().to_path_buf(),
        };
        let args = SeriesArgs {
            days: Some(2),
            today: NaiveDate::from_ymd_opt(2024, 7, 3),
            no_plot: true,
            chart: Some(dir.path().join("chart.svg")),
            export: Some(dir.path().join("series.json")),
            export_csv: Some(dir.path().join("series.csv")),
            ..SeriesArgs::default()
        };
        let config = run_config_from_args(&args, &env, &ConfigFiles::default(), args.today.unwrap());

        let run = pipeline::run_with_series(&config, &RateSeries::default());
        assert_eq!(run.summary.missing, 3);
        present(&config, &run).unwrap();

        assert!(dir.path().join("series.json").exists());
        assert!(dir.path().join("series.csv").exists());
        let svg = std::fs::read_to_string(dir.path().join("chart.svg")).unwrap();
        assert!(svg.contains("No rates to chart."));
    }
}
