//! Moving average and day-over-day change.

use chrono::NaiveDate;

use crate::domain::ReconciledSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub rate: Option<f64>,
    /// Trailing mean over `window` days; `None` until the window is full or
    /// while it contains a missing day.
    pub moving_average: Option<f64>,
    /// `rate - previous day's rate`.
    pub change: Option<f64>,
}

pub fn trend_analysis(series: &ReconciledSeries, window: usize) -> Vec<TrendPoint> {
    let rates: Vec<(NaiveDate, Option<f64>)> = series.rates().collect();
    let averages = moving_average(&rates.iter().map(|(_, r)| *r).collect::<Vec<_>>(), window);

    rates
        .iter()
        .enumerate()
        .map(|(i, &(date, rate))| {
            let change = match (i.checked_sub(1).and_then(|j| rates[j].1), rate) {
                (Some(prev), Some(curr)) => Some(curr - prev),
                _ => None,
            };
            TrendPoint {
                date,
                rate,
                moving_average: averages[i],
                change,
            }
        })
        .collect()
}

/// Trailing mean of each full window; a zero window yields all `None`.
pub fn moving_average(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum: Option<f64> = slice.iter().copied().sum();
            sum.map(|s| s / window as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateRange, RateSeries};
    use crate::reconcile::{Midpoint, reconcile};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn moving_average_waits_for_full_window() {
        let values = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        assert_eq!(moving_average(&values, 3), vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn moving_average_breaks_on_missing_day() {
        let values = [Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        assert_eq!(moving_average(&values, 2), vec![None, None, None, Some(3.5), Some(4.5)]);
    }

    #[test]
    fn zero_window_is_all_none() {
        assert_eq!(moving_average(&[Some(1.0)], 0), vec![None]);
    }

    #[test]
    fn trend_reports_daily_change() {
        let series: RateSeries = [(d(2024, 7, 1), 1.0), (d(2024, 7, 2), 1.5), (d(2024, 7, 3), 1.25)]
            .into_iter()
            .collect();
        let out = reconcile(&series, DateRange::new(d(2024, 7, 1), d(2024, 7, 3)), &Midpoint);
        let trend = trend_analysis(&out, 2);
        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].change, None);
        assert_eq!(trend[1].change, Some(0.5));
        assert_eq!(trend[2].change, Some(-0.25));
        assert_eq!(trend[0].moving_average, None);
        assert_eq!(trend[1].moving_average, Some(1.25));
        assert_eq!(trend[2].moving_average, Some(1.375));
    }
}
