//! Calendar-day enumeration.

use chrono::NaiveDate;

use crate::domain::DateRange;

/// Every calendar day from `start` to `end`, both inclusive, ascending.
///
/// Returns an empty vector when `start > end`.
pub fn generate_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut out = Vec::with_capacity((end - start).num_days() as usize + 1);
    out.extend(start.iter_days().take_while(|d| *d <= end));
    out
}

impl DateRange {
    /// The required date set for this window.
    pub fn dates(&self) -> Vec<NaiveDate> {
        generate_range(self.start, self.end)
    }
}
