//! Runtime configuration read from the environment (and `.env`).

use std::str::FromStr;
use std::time::Duration;

use crate::error::{RaterError, RaterResult};
use crate::series::SeriesWindow;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_MAX_SAMPLES: usize = 3;
pub const DEFAULT_YEARS_BACK: i32 = 6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Settings for the data source and the historical walk.
///
/// | Variable                  | Field          | Default                 |
/// |---------------------------|----------------|-------------------------|
/// | `ZIP_RATER_BASE_URL`      | `base_url`     | `http://localhost:8080` |
/// | `ZIP_RATER_MAX_SAMPLES`   | `max_samples`  | 3                       |
/// | `ZIP_RATER_YEARS_BACK`    | `years_back`   | 6                       |
/// | `ZIP_RATER_CURRENT_YEAR`  | `current_year` | the present year        |
/// | `ZIP_RATER_TIMEOUT_SECS`  | `timeout`      | 30                      |
#[derive(Debug, Clone, PartialEq)]
pub struct RaterConfig {
    pub base_url: String,
    pub max_samples: usize,
    pub years_back: i32,
    pub current_year: Option<i32>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for RaterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_samples: DEFAULT_MAX_SAMPLES,
            years_back: DEFAULT_YEARS_BACK,
            current_year: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl RaterConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> RaterResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RaterResult<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("ZIP_RATER_BASE_URL") {
            config.base_url = url;
        }
        if let Some(v) = parse_var::<usize>(&lookup, "ZIP_RATER_MAX_SAMPLES")? {
            config.max_samples = v;
        }
        if let Some(v) = parse_var::<i32>(&lookup, "ZIP_RATER_YEARS_BACK")? {
            config.years_back = v;
        }
        if let Some(v) = parse_var::<i32>(&lookup, "ZIP_RATER_CURRENT_YEAR")? {
            config.current_year = Some(v);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "ZIP_RATER_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// The walk window this config describes. Only the year arithmetic is
    /// checked here; the fetcher validates the rest.
    pub fn window(&self) -> RaterResult<SeriesWindow> {
        SeriesWindow::years_back(self.current_year, self.years_back, self.max_samples)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> RaterResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| RaterError::invalid_config(format!("{key}='{raw}': {e}"))),
    }
}
