//! Blocking client for the exchange-rate provider's timeseries endpoint.

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::data::decode::{TimeseriesResponse, decode_response};
use crate::domain::{ApiKey, CurrencyPair, DATE_FORMAT, DateRange, ProviderConfig, RateSeries};
use crate::error::AppError;

pub struct RatesClient {
    client: Client,
    api_url: String,
    end_point: String,
    api_key: ApiKey,
}

impl RatesClient {
    pub fn new(provider: &ProviderConfig) -> Result<Self, AppError> {
        let api_key = provider
            .api_key
            .clone()
            .ok_or_else(|| AppError::config("Missing API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_url: provider.api_url.clone(),
            end_point: provider.end_point.clone(),
            api_key,
        })
    }

    /// `{api_url}/{end_point}` with redundant slashes collapsed.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            self.end_point.trim_start_matches('/')
        )
    }

    /// Query parameters without the access key (safe to log).
    pub fn public_params(&self, range: DateRange, pair: &CurrencyPair) -> Vec<(&'static str, String)> {
        vec![
            ("start_date", range.start.format(DATE_FORMAT).to_string()),
            ("end_date", range.end.format(DATE_FORMAT).to_string()),
            ("base", pair.base.clone()),
            ("symbols", pair.target.clone()),
        ]
    }

    /// Fetch and decode the raw timeseries response for `range`.
    pub fn fetch_timeseries(&self, range: DateRange, pair: &CurrencyPair) -> Result<TimeseriesResponse, AppError> {
        let params = self.public_params(range, pair);
        let url = self.endpoint_url();
        info!(%url, ?params, "requesting rates timeseries");

        let resp = self
            .client
            .get(&url)
            .query(&[("access_key", self.api_key.expose())])
            .query(&params)
            .send()
            .map_err(|e| AppError::runtime(format!("Rates request failed: {}", e.without_url())))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::runtime(format!("Rates request failed with status {status}.")));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::runtime(format!("Failed to read rates response: {}", e.without_url())))?;
        debug!(bytes = body.len(), "received rates response");

        decode_response(&body)
    }

    /// Fetch the `pair.target` series for `range`.
    pub fn fetch_series(&self, range: DateRange, pair: &CurrencyPair) -> Result<RateSeries, AppError> {
        let series = self.fetch_timeseries(range, pair)?.into_series(&pair.target)?;
        info!(observations = series.len(), %range, "decoded rates");
        Ok(series)
    }
}
