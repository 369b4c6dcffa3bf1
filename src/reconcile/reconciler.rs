//! Build a gap-free series over a required date window.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{DateRange, PointSource, RateSeries, ReconciledPoint, ReconciledSeries};
use crate::reconcile::fill::GapFill;

/// Reconcile `series` against every calendar day of `range`.
///
/// Observed days are copied verbatim; every other day is filled by `policy`.
/// The output has exactly `range.len()` entries. Days the policy cannot fill
/// (only possible when `series` is empty) are kept as `Missing` with no rate.
pub fn reconcile(series: &RateSeries, range: DateRange, policy: &dyn GapFill) -> ReconciledSeries {
    let mut points = BTreeMap::new();

    for date in range.dates() {
        let point = match series.get(date) {
            Some(rate) => ReconciledPoint {
                rate: Some(rate),
                source: PointSource::Observed,
            },
            None => {
                let rate = policy.fill(series, date);
                debug!(%date, ?rate, "filled gap");
                ReconciledPoint {
                    rate,
                    source: if rate.is_some() {
                        PointSource::Interpolated
                    } else {
                        PointSource::Missing
                    },
                }
            }
        };
        points.insert(date, point);
    }

    ReconciledSeries::from_points(range, points)
}
