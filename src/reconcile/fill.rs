//! Gap-fill policies.
//!
//! A policy turns the nearest known rates around a missing day into a value.
//! Boundary handling is shared by every policy:
//!
//! ```text
//! prev    next    result
//! none    none    None            (empty series)
//! some    none    rate(prev)      (carry forward)
//! none    some    rate(next)      (carry backward)
//! p == n          rate(p)         (exact hit, counted once)
//! p != n          policy-specific
//! ```
//!
//! The default `Midpoint` policy takes the unweighted mean of the two
//! neighbors no matter how far apart they are, so a 10-day gap gets the same
//! flat midpoint as a 1-day gap. `TimeWeighted` is the alternative when that
//! matters.

use chrono::NaiveDate;

use crate::domain::{FillPolicy, RateSeries};

/// A rule for estimating a rate on a day missing from the series.
pub trait GapFill {
    /// Combine two distinct neighbors `(date, rate)` around `query`.
    ///
    /// Only called with `prev.0 < query < next.0`.
    fn between(&self, prev: (NaiveDate, f64), next: (NaiveDate, f64), query: NaiveDate) -> f64;

    /// Estimate the rate for `query`, or `None` if the series is empty.
    fn fill(&self, series: &RateSeries, query: NaiveDate) -> Option<f64> {
        let neighbors = series.neighbors(query);
        let prev = neighbors.prev.and_then(|d| series.get(d).map(|v| (d, v)));
        let next = neighbors.next.and_then(|d| series.get(d).map(|v| (d, v)));

        match (prev, next) {
            (None, None) => None,
            (Some((_, v)), None) | (None, Some((_, v))) => Some(v),
            (Some(p), Some(n)) if p.0 == n.0 => Some(p.1),
            (Some(p), Some(n)) => Some(self.between(p, n, query)),
        }
    }
}

/// Unweighted mean of the two neighbors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Midpoint;

impl GapFill for Midpoint {
    fn between(&self, prev: (NaiveDate, f64), next: (NaiveDate, f64), _query: NaiveDate) -> f64 {
        (prev.1 + next.1) / 2.0
    }
}

/// Straight line between the two neighbors, by calendar days.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWeighted;

impl GapFill for TimeWeighted {
    fn between(&self, prev: (NaiveDate, f64), next: (NaiveDate, f64), query: NaiveDate) -> f64 {
        let span = (next.0 - prev.0).num_days() as f64;
        if span <= 0.0 {
            return prev.1;
        }
        let u = (query - prev.0).num_days() as f64 / span;
        prev.1 + u * (next.1 - prev.1)
    }
}

impl GapFill for FillPolicy {
    fn between(&self, prev: (NaiveDate, f64), next: (NaiveDate, f64), query: NaiveDate) -> f64 {
        match self {
            FillPolicy::Midpoint => Midpoint.between(prev, next, query),
            FillPolicy::TimeWeighted => TimeWeighted.between(prev, next, query),
        }
    }
}

/// Fill `query` with the default (midpoint) rule.
pub fn interpolate(series: &RateSeries, query: NaiveDate) -> Option<f64> {
    Midpoint.fill(series, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(points: &[(NaiveDate, f64)]) -> RateSeries {
        points.iter().copied().collect()
    }

    #[test]
    fn interior_gap_is_midpoint() {
        let s = series(&[(d(2024, 6, 9), 1.07808), (d(2024, 6, 11), 1.075373)]);
        let v = interpolate(&s, d(2024, 6, 10)).unwrap();
        assert!((v - 1.0767265).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn midpoint_ignores_gap_length() {
        let s = series(&[(d(2024, 6, 1), 1.0), (d(2024, 6, 11), 2.0)]);
        assert_eq!(interpolate(&s, d(2024, 6, 2)), Some(1.5));
        assert_eq!(interpolate(&s, d(2024, 6, 10)), Some(1.5));
    }

    #[test]
    fn carries_backward_before_first_known() {
        let s = series(&[(d(2024, 6, 10), 1.078204), (d(2024, 6, 11), 1.075373)]);
        assert_eq!(interpolate(&s, d(2024, 6, 9)), Some(1.078204));
    }

    #[test]
    fn carries_forward_after_last_known() {
        let s = series(&[(d(2024, 7, 7), 1.098638), (d(2024, 7, 8), 1.098292)]);
        assert_eq!(interpolate(&s, d(2024, 7, 9)), Some(1.098292));
    }

    #[test]
    fn empty_series_cannot_fill() {
        assert_eq!(interpolate(&RateSeries::default(), d(2024, 7, 9)), None);
        assert_eq!(TimeWeighted.fill(&RateSeries::default(), d(2024, 7, 9)), None);
    }

    #[test]
    fn exact_hit_returns_known_value_once() {
        let s = series(&[(d(2024, 7, 1), 1.25), (d(2024, 7, 3), 9.0)]);
        assert_eq!(interpolate(&s, d(2024, 7, 1)), Some(1.25));
        assert_eq!(TimeWeighted.fill(&s, d(2024, 7, 3)), Some(9.0));
    }

    #[test]
    fn time_weighted_matches_midpoint_on_one_day_gap() {
        let s = series(&[(d(2024, 6, 9), 1.0), (d(2024, 6, 11), 2.0)]);
        assert_eq!(TimeWeighted.fill(&s, d(2024, 6, 10)), Midpoint.fill(&s, d(2024, 6, 10)));
    }

    #[test]
    fn time_weighted_follows_distance() {
        let s = series(&[(d(2024, 6, 1), 1.0), (d(2024, 6, 5), 2.0)]);
        let v = TimeWeighted.fill(&s, d(2024, 6, 2)).unwrap();
        assert!((v - 1.25).abs() < 1e-12);
        let v = TimeWeighted.fill(&s, d(2024, 6, 4)).unwrap();
        assert!((v - 1.75).abs() < 1e-12);
    }

    #[test]
    fn fill_policy_dispatches() {
        let s = series(&[(d(2024, 6, 1), 1.0), (d(2024, 6, 5), 2.0)]);
        let q = d(2024, 6, 2);
        assert_eq!(FillPolicy::Midpoint.fill(&s, q), Some(1.5));
        assert_eq!(FillPolicy::TimeWeighted.fill(&s, q), TimeWeighted.fill(&s, q));
    }
}
