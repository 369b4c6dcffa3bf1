//! Decoding of the provider's `timeseries` JSON body.
//!
//! The provider nests one object per date keyed by currency code:
//!
//! ```text
//! {"success": true, "timeseries": true, "base": "AUD",
//!  "start_date": "2024-07-06", "end_date": "2024-07-09",
//!  "rates": {"2024-07-06": {"NZD": 1.100644}, ...}}
//! ```
//!
//! Failures come back with `success: false` and an `error` object. Both are
//! decoded here into typed values; nothing in this module exits the process.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use crate::domain::{RateSeries, parse_date_key};
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct TimeseriesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub timeseries: Option<bool>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub rates: Option<BTreeMap<String, HashMap<String, Option<f64>>>>,
    #[serde(default)]
    pub error: Option<ProviderError>,
}

/// Provider-side error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    pub code: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "provider error {}", self.code)?;
        if let Some(kind) = &self.kind {
            write!(f, " ({kind})")?;
        }
        if let Some(info) = &self.info {
            write!(f, ": {info}")?;
        }
        Ok(())
    }
}

/// Parse a response body.
pub fn decode_response(body: &str) -> Result<TimeseriesResponse, AppError> {
    serde_json::from_str(body).map_err(|e| AppError::data(format!("Failed to parse rates response: {e}")))
}

impl TimeseriesResponse {
    /// Extract the `target` currency's daily series.
    ///
    /// - `success: false` becomes a runtime error carrying the provider message.
    /// - A date key that is not `YYYY-MM-DD` is rejected as a data error.
    /// - A date without a finite `target` rate is skipped and left as a gap.
    pub fn into_series(self, target: &str) -> Result<RateSeries, AppError> {
        if !self.success {
            let message = match &self.error {
                Some(err) => format!("Rates request failed: {err}"),
                None => "Rates request failed: provider reported success=false.".to_string(),
            };
            return Err(AppError::runtime(message));
        }

        let rates = self
            .rates
            .ok_or_else(|| AppError::data("Rates response has no 'rates' object."))?;

        let mut out = BTreeMap::new();
        for (key, by_currency) in rates {
            let date = parse_date_key(&key)
                .ok_or_else(|| AppError::data(format!("Invalid date key '{key}' in rates response.")))?;

            match by_currency.get(target).copied().flatten() {
                Some(v) if v.is_finite() => {
                    out.insert(date, v);
                }
                Some(v) => warn!(%date, currency = target, value = v, "skipping non-finite rate"),
                None => warn!(%date, currency = target, "no rate for target currency; treating as gap"),
            }
        }

        Ok(RateSeries::new(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TIMESERIES_BODY: &str = r#"{
        "success": true,
        "timeseries": true,
        "start_date": "2024-07-06",
        "end_date": "2024-07-09",
        "base": "AUD",
        "rates": {
            "2024-07-09": {"NZD": 1.098625},
            "2024-07-06": {"NZD": 1.100644},
            "2024-07-08": {"NZD": 1.098625},
            "2024-07-07": {"NZD": 1.098638}
        }
    }"#;

    #[test]
    fn decodes_timeseries_for_target() {
        let resp = decode_response(TIMESERIES_BODY).unwrap();
        assert!(resp.success);
        assert_eq!(resp.timeseries, Some(true));
        assert_eq!(resp.base.as_deref(), Some("AUD"));
        assert_eq!(resp.start_date.as_deref(), Some("2024-07-06"));

        let series = resp.into_series("NZD").unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.get(d(2024, 7, 6)), Some(1.100644));
        assert_eq!(series.get(d(2024, 7, 7)), Some(1.098638));
        assert_eq!(series.first_date(), Some(d(2024, 7, 6)));
        assert_eq!(series.last_date(), Some(d(2024, 7, 9)));
    }

    #[test]
    fn provider_failure_is_typed_error() {
        let body = r#"{
            "success": false,
            "error": {"code": 404, "type": "not_found", "info": "Resource not found"}
        }"#;
        let resp = decode_response(body).unwrap();
        let err = resp.error.clone().unwrap();
        assert_eq!(err.code, 404);
        assert_eq!(err.kind.as_deref(), Some("not_found"));

        let err = resp.into_series("NZD").unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Resource not found"));
    }

    #[test]
    fn malformed_date_key_is_rejected() {
        let body = r#"{"success": true, "rates": {"2024-7-06": {"NZD": 1.1}}}"#;
        let err = decode_response(body).unwrap().into_series("NZD").unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("2024-7-06"));
    }

    #[test]
    fn dates_without_target_become_gaps() {
        let body = r#"{"success": true, "rates": {
            "2024-07-06": {"NZD": 1.1},
            "2024-07-07": {"USD": 0.67},
            "2024-07-08": {"NZD": null}
        }}"#;
        let series = decode_response(body).unwrap().into_series("NZD").unwrap();
        assert_eq!(series.len(), 1);
        assert!(!series.contains(d(2024, 7, 7)));
        assert!(!series.contains(d(2024, 7, 8)));
    }

    #[test]
    fn missing_rates_object_is_data_error() {
        let err = decode_response(r#"{"success": true}"#).unwrap().into_series("NZD").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn invalid_json_is_data_error() {
        assert_eq!(decode_response("not json").unwrap_err().exit_code(), 3);
    }
}
