//! Environment and JSON file configuration.
//!
//! Sources, lowest precedence first:
//!
//! - built-in defaults (the `DEFAULT_*` constants)
//! - JSON files in the config directory (`config_common.json`,
//!   `config_exchange_rate_fetcher.json`, `config_exchange_rate_analyze.json`)
//! - environment (after loading `.env`): `API_KEY`, `LOG_FILE`, `FXR_CONFIG_DIR`
//! - CLI flags (applied in `app`)
//!
//! Every file is optional. A file that exists but does not parse is an error.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{ApiKey, DATE_FORMAT};
use crate::error::AppError;

pub const DEFAULT_DAYS: u32 = 30;
/// Longest accepted lookback window (ten years).
pub const MAX_LOOKBACK_DAYS: u32 = 3650;
pub const DEFAULT_BASE: &str = "AUD";
pub const DEFAULT_TARGET: &str = "NZD";
pub const DEFAULT_API_URL: &str = "https://api.exchangeratesapi.io";
pub const DEFAULT_END_POINT: &str = "timeseries";
pub const DEFAULT_MOVING_AVERAGE: usize = 7;
/// Chart size in inches; rendered at `PIXELS_PER_INCH`.
pub const DEFAULT_FIG_WIDTH: f64 = 10.0;
pub const DEFAULT_FIG_HEIGHT: f64 = 6.0;
pub const PIXELS_PER_INCH: f64 = 100.0;

pub const COMMON_FILE: &str = "config_common.json";
pub const FETCHER_FILE: &str = "config_exchange_rate_fetcher.json";
pub const ANALYZE_FILE: &str = "config_exchange_rate_analyze.json";

/// `config_common.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommonConfig {
    #[serde(default)]
    pub defaults_exchange_rate: ExchangeRateDefaults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeRateDefaults {
    pub days: Option<u32>,
    pub base_currency: Option<String>,
    pub target_currency: Option<String>,
}

/// `config_exchange_rate_fetcher.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetcherConfig {
    pub api_url: Option<String>,
    pub end_point: Option<String>,
}

/// `config_exchange_rate_analyze.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeConfig {
    pub moving_average: Option<usize>,
    pub fig_width: Option<f64>,
    pub fig_height: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigFiles {
    pub common: CommonConfig,
    pub fetcher: FetcherConfig,
    pub analyze: AnalyzeConfig,
}

impl ConfigFiles {
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let files = Self {
            common: read_optional_json(&dir.join(COMMON_FILE))?,
            fetcher: read_optional_json(&dir.join(FETCHER_FILE))?,
            analyze: read_optional_json(&dir.join(ANALYZE_FILE))?,
        };
        if files.days() > MAX_LOOKBACK_DAYS {
            return Err(AppError::config(format!(
                "Invalid config '{}': days must be at most {MAX_LOOKBACK_DAYS}, got {}",
                dir.join(COMMON_FILE).display(),
                files.days()
            )));
        }
        Ok(files)
    }

    pub fn days(&self) -> u32 {
        self.common.defaults_exchange_rate.days.unwrap_or(DEFAULT_DAYS)
    }

    pub fn base_currency(&self) -> String {
        self.common
            .defaults_exchange_rate
            .base_currency
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE.to_string())
    }

    pub fn target_currency(&self) -> String {
        self.common
            .defaults_exchange_rate
            .target_currency
            .clone()
            .unwrap_or_else(|| DEFAULT_TARGET.to_string())
    }

    pub fn api_url(&self) -> String {
        self.fetcher.api_url.clone().unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn end_point(&self) -> String {
        self.fetcher.end_point.clone().unwrap_or_else(|| DEFAULT_END_POINT.to_string())
    }

    pub fn moving_average(&self) -> usize {
        self.analyze.moving_average.unwrap_or(DEFAULT_MOVING_AVERAGE)
    }

    /// Chart size in pixels.
    pub fn chart_size(&self) -> (u32, u32) {
        let w = self.analyze.fig_width.unwrap_or(DEFAULT_FIG_WIDTH);
        let h = self.analyze.fig_height.unwrap_or(DEFAULT_FIG_HEIGHT);
        (inches_to_px(w, DEFAULT_FIG_WIDTH), inches_to_px(h, DEFAULT_FIG_HEIGHT))
    }
}

fn inches_to_px(inches: f64, fallback: f64) -> u32 {
    let inches = if inches.is_finite() && inches > 0.0 { inches } else { fallback };
    (inches * PIXELS_PER_INCH).round() as u32
}

fn read_optional_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, AppError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open config '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::config(format!("Invalid config '{}': {e}", path.display())))
}

/// Settings taken from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    pub api_key: Option<ApiKey>,
    /// Base log file name; the run date is appended.
    pub log_file: Option<PathBuf>,
    pub config_dir: PathBuf,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty("API_KEY").map(ApiKey::new),
            log_file: non_empty("LOG_FILE").map(PathBuf::from),
            config_dir: non_empty("FXR_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config")),
        }
    }
}

/// `{base}.{YYYY-MM-DD}.log`
pub fn dated_log_file(base: &Path, today: NaiveDate) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{}.log", today.format(DATE_FORMAT)));
    PathBuf::from(name)
}
