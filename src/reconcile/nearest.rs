//! Nearest known dates around a query date.

use std::ops::Bound;

use chrono::NaiveDate;

use crate::domain::RateSeries;

/// The closest known dates at-or-before and at-or-after a query.
///
/// When the query itself is known, `prev == next == Some(query)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub prev: Option<NaiveDate>,
    pub next: Option<NaiveDate>,
}

impl Neighbors {
    pub fn is_exact(&self) -> bool {
        matches!((self.prev, self.next), (Some(p), Some(n)) if p == n)
    }
}

/// Find the neighbors of `query` in an unordered collection of dates.
///
/// The dates are ordered first, so the result does not depend on input order.
pub fn find_nearest<I>(known_dates: I, query: NaiveDate) -> Neighbors
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut dates: Vec<NaiveDate> = known_dates.into_iter().collect();
    dates.sort_unstable();
    dates.dedup();

    // First index with date > query; everything before it is <= query.
    let upper = dates.partition_point(|d| *d <= query);
    let prev = upper.checked_sub(1).map(|i| dates[i]);
    let next = match prev {
        Some(p) if p == query => Some(p),
        _ => dates.get(upper).copied(),
    };

    Neighbors { prev, next }
}

impl RateSeries {
    /// Neighbors of `query` among this series' dates.
    ///
    /// Same result as [`find_nearest`] over `self.dates()`, without re-sorting.
    pub fn neighbors(&self, query: NaiveDate) -> Neighbors {
        let prev = self.range_dates((Bound::Unbounded, Bound::Included(query))).next_back();
        let next = self.range_dates((Bound::Included(query), Bound::Unbounded)).next();
        Neighbors { prev, next }
    }
}
