//! Application Configuration
//! Settings from an optional JSON file, then environment overrides.

use crate::charts::ChartOptions;
use crate::data::{
    BalanceHistoryProvider, CsvBalanceProvider, HttpBalanceProvider, ProviderError,
    DEFAULT_ACCOUNT_ID, DEFAULT_API_BASE_URL,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const ENV_API_URL: &str = "BALANCE_CHART_API_URL";
pub const ENV_ACCOUNT: &str = "BALANCE_CHART_ACCOUNT";
pub const ENV_CSV: &str = "BALANCE_CHART_CSV";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("request_timeout_secs must be at least 1 when reading from the balance API")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub account_id: String,
    /// Per-request timeout for the balance API. Must be non-zero: a
    /// cancelled fetch keeps its worker thread until the request ends.
    pub request_timeout_secs: u64,
    /// Read balances from this CSV file instead of the API.
    pub csv_source: Option<PathBuf>,
    pub surface_width: u32,
    pub surface_height: u32,
    pub chart: ChartOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            request_timeout_secs: 10,
            csv_source: None,
            surface_width: 900,
            surface_height: 450,
            chart: ChartOptions::default(),
        }
    }
}

impl AppConfig {
    /// Load `path` if given, built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `BALANCE_CHART_*` overrides; `lookup` is usually `std::env::var`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = set(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(account) = set(ENV_ACCOUNT) {
            self.account_id = account;
        }
        if let Some(csv) = set(ENV_CSV) {
            self.csv_source = Some(PathBuf::from(csv));
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check settings that only make sense once every override is applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.csv_source.is_none() && self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Provider for the configured source: the CSV file if one is set,
    /// the HTTP API otherwise.
    pub fn build_provider(&self) -> Result<Arc<dyn BalanceHistoryProvider>, ProviderError> {
        match &self.csv_source {
            Some(path) => Ok(Arc::new(CsvBalanceProvider::new(path.clone()))),
            None => Ok(Arc::new(HttpBalanceProvider::new(
                &self.api_base_url,
                self.request_timeout(),
            )?)),
        }
    }
}
