//! Shared pipeline used by every command.
//!
//! fetch (or load) -> reconcile -> statistics -> trend
//!
//! The commands then focus on presentation (printing, charts, exports).

use tracing::info;

use crate::analysis::{RateStatistics, TrendPoint, compute_statistics, trend_analysis};
use crate::data::RatesClient;
use crate::domain::{RateSeries, ReconcileSummary, ReconciledSeries, RunConfig};
use crate::error::AppError;
use crate::reconcile::reconcile;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub reconciled: ReconciledSeries,
    pub summary: ReconcileSummary,
    pub stats: Option<RateStatistics>,
    pub trend: Vec<TrendPoint>,
}

/// Fetch the configured window from the provider and run the pipeline.
pub fn run_analysis(config: &RunConfig) -> Result<RunOutput, AppError> {
    let client = RatesClient::new(&config.provider)?;
    let series = client.fetch_series(config.range(), &config.pair)?;
    Ok(run_with_series(config, &series))
}

/// Run the pipeline over an already-decoded series.
pub fn run_with_series(config: &RunConfig, source: &RateSeries) -> RunOutput {
    let range = config.range();
    info!(%range, fill = ?config.fill, "preprocessing data to fix date/rate gaps");

    let reconciled = reconcile(source, range, &config.fill);
    let summary = reconciled.summary();
    info!(
        observed = summary.observed,
        interpolated = summary.interpolated,
        missing = summary.missing,
        "reconciled series"
    );

    let stats = compute_statistics(&reconciled);
    let trend = trend_analysis(&reconciled, config.analysis.moving_average);

    RunOutput {
        reconciled,
        summary,
        stats,
        trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisConfig, CurrencyPair, FillPolicy, ProviderConfig};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn config() -> RunConfig {
        RunConfig {
            today: d(2024, 7, 9),
            lookback_days: 3,
            pair: CurrencyPair::new("AUD", "NZD"),
            fill: FillPolicy::Midpoint,
            provider: ProviderConfig {
                api_url: "https://example.test".to_string(),
                end_point: "timeseries".to_string(),
                api_key: None,
            },
            analysis: AnalysisConfig {
                moving_average: 2,
                plot: false,
                plot_width: 80,
                plot_height: 20,
                chart: None,
                fig_width: 1000,
                fig_height: 600,
            },
            export_json: None,
            export_csv: None,
        }
    }

    #[test]
    fn runs_over_decoded_series() {
        let source: RateSeries = [(d(2024, 7, 6), 1.100644), (d(2024, 7, 8), 1.098292)]
            .into_iter()
            .collect();
        let out = run_with_series(&config(), &source);

        assert_eq!(out.reconciled.len(), 4);
        assert_eq!(
            out.summary,
            ReconcileSummary {
                observed: 2,
                interpolated: 2,
                missing: 0
            }
        );
        assert_eq!(out.reconciled.get(d(2024, 7, 9)), Some(1.098292));
        assert_eq!(out.trend.len(), 4);
        assert_eq!(out.stats.unwrap().n, 4);
    }

    #[test]
    fn fetch_without_api_key_fails_before_network() {
        let err = run_analysis(&config()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
