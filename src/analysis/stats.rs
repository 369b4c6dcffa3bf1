//! Descriptive statistics.

use crate::domain::ReconciledSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateStatistics {
    /// Number of values the statistics were computed from.
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator); `None` below two values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Statistics over the present values of `series`; `None` if it has none.
pub fn compute_statistics(series: &ReconciledSeries) -> Option<RateStatistics> {
    statistics_of(&series.present_values())
}

pub fn statistics_of(values: &[f64]) -> Option<RateStatistics> {
    if values.is_empty() {
        return None;
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    let std_dev = (n > 1).then(|| {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
        variance.sqrt()
    });

    Some(RateStatistics {
        n,
        mean,
        median,
        std_dev,
        min: sorted[0],
        max: sorted[n - 1],
    })
}
