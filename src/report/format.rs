//! Formatted terminal output: run summary, statistics block, daily table.
//!
//! We keep formatting code in one place so the reconcile and analysis code
//! stays free of presentation concerns.

use crate::analysis::{RateStatistics, TrendPoint};
use crate::domain::{CurrencyPair, DateRange, FillPolicy, PointSource, ReconcileSummary, ReconciledSeries};

/// Header block: pair, window, and what the reconciler had to do.
pub fn format_run_summary(
    pair: &CurrencyPair,
    range: DateRange,
    fill: FillPolicy,
    summary: &ReconcileSummary,
) -> String {
    let mut out = String::new();

    out.push_str("=== fxr - FX rate series ===\n");
    out.push_str(&format!("Pair: {pair}\n"));
    out.push_str(&format!("Window: {} -> {} ({} days)\n", range.start, range.end, range.len()));
    out.push_str(&format!("Fill policy: {}\n", fill_label(fill)));
    out.push_str(&format!(
        "Days: observed={} interpolated={} missing={}\n",
        summary.observed, summary.interpolated, summary.missing
    ));
    out.push('\n');

    out
}

/// Statistics block, four decimals like the chart annotation.
pub fn format_statistics(stats: Option<&RateStatistics>) -> String {
    let Some(stats) = stats else {
        return "Statistics: no rates available.\n".to_string();
    };

    let mut out = String::new();
    out.push_str(&format!("Statistics (n={}):\n", stats.n));
    out.push_str(&format!("  Mean: {:.4}\n", stats.mean));
    out.push_str(&format!("  Median: {:.4}\n", stats.median));
    match stats.std_dev {
        Some(sd) => out.push_str(&format!("  Standard Deviation: {sd:.4}\n")),
        None => out.push_str("  Standard Deviation: n/a\n"),
    }
    out.push_str(&format!("  Min: {:.4}\n", stats.min));
    out.push_str(&format!("  Max: {:.4}\n", stats.max));
    out
}

/// Daily table: date, rate, moving average, change, and provenance.
pub fn format_series_table(series: &ReconciledSeries, trend: &[TrendPoint], window: usize) -> String {
    let mut out = String::new();
    let ma_header = format!("ma{window}");

    out.push_str(
        format!(
            "{:<10} {:>10} {:>10} {:>10} {:<12}\n",
            "date", "rate", ma_header, "change", "source"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<10} {:-<10} {:-<10} {:-<12}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for t in trend {
        let source = series
            .point(t.date)
            .map(|p| p.source)
            .unwrap_or(PointSource::Missing);
        out.push_str(
            format!(
                "{:<10} {:>10} {:>10} {:>10} {:<12}\n",
                t.date.to_string(),
                fmt_opt(t.rate, 6),
                fmt_opt(t.moving_average, 6),
                fmt_signed(t.change),
                source.label(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fill_label(fill: FillPolicy) -> &'static str {
    match fill {
        FillPolicy::Midpoint => "midpoint",
        FillPolicy::TimeWeighted => "time-weighted",
    }
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

fn fmt_signed(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:+.6}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{statistics_of, trend_analysis};
    use crate::domain::RateSeries;
    use crate::reconcile::{Midpoint, reconcile};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn summary_lists_counts() {
        let summary = ReconcileSummary {
            observed: 29,
            interpolated: 2,
            missing: 0,
        };
        let txt = format_run_summary(
            &CurrencyPair::new("AUD", "NZD"),
            DateRange::new(d(2024, 6, 9), d(2024, 7, 9)),
            FillPolicy::Midpoint,
            &summary,
        );
        assert!(txt.contains("Pair: AUD/NZD"));
        assert!(txt.contains("Window: 2024-06-09 -> 2024-07-09 (31 days)"));
        assert!(txt.contains("Fill policy: midpoint"));
        assert!(txt.contains("observed=29 interpolated=2 missing=0"));
    }

    #[test]
    fn statistics_block_uses_four_decimals() {
        let stats = statistics_of(&[1.0, 2.0]).unwrap();
        let txt = format_statistics(Some(&stats));
        assert!(txt.contains("Mean: 1.5000"));
        assert!(txt.contains("Min: 1.0000"));
        assert!(txt.contains("Max: 2.0000"));
        assert_eq!(format_statistics(None), "Statistics: no rates available.\n");
    }

    #[test]
    fn table_golden_snapshot_small() {
        let series: RateSeries = [(d(2024, 7, 1), 1.0), (d(2024, 7, 3), 2.0)].into_iter().collect();
        let out = reconcile(&series, DateRange::new(d(2024, 7, 1), d(2024, 7, 3)), &Midpoint);
        let trend = trend_analysis(&out, 2);
        let txt = format_series_table(&out, &trend, 2);
        let expected = concat!(
            "date             rate        ma2     change source\n",
            "---------- ---------- ---------- ---------- ------------\n",
            "2024-07-01   1.000000          -          - observed\n",
            "2024-07-02   1.500000   1.250000  +0.500000 interpolated\n",
            "2024-07-03   2.000000   1.750000  +0.500000 observed\n",
        );
        assert_eq!(txt, expected);
    }
}
