//! HTTP Balance Provider
//! Fetches balance history from the banking backend's REST API.

use crate::data::model::{AccountId, BalanceSeries};
use crate::data::provider::{BalanceHistoryProvider, ProviderError};
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Backend used when the config does not name one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5070/api";

/// Response body of the balance endpoint.
#[derive(Debug, Deserialize)]
struct LineGraphData {
    labels: Vec<String>,
    figures: Vec<f64>,
}

impl LineGraphData {
    fn parse(body: &str) -> Result<BalanceSeries, ProviderError> {
        let data: LineGraphData =
            serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(BalanceSeries::new(data.labels, data.figures)?)
    }
}

/// Blocking REST client for the balance history endpoint.
pub struct HttpBalanceProvider {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBalanceProvider {
    /// Create a client against `base_url`. `timeout` bounds each request,
    /// which also bounds how long a cancelled fetch keeps its worker busy.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL of the twelve-month balance endpoint for an account.
    pub fn balances_url(&self, account: &AccountId) -> String {
        format!(
            "{}/Transaction/GetLast12MonthBalances/{}",
            self.base_url,
            urlencoding::encode(account.as_str())
        )
    }
}

/// Map a non-success status to the matching provider error.
fn status_error(status: StatusCode, account: &AccountId) -> ProviderError {
    if status == StatusCode::NOT_FOUND {
        ProviderError::NotFound(account.clone())
    } else {
        ProviderError::Status(status.as_u16())
    }
}

impl BalanceHistoryProvider for HttpBalanceProvider {
    fn fetch_last_12_month_balances(
        &self,
        account: &AccountId,
    ) -> Result<BalanceSeries, ProviderError> {
        let url = self.balances_url(account);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, account));
        }

        let body = response
            .text()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        // The endpoint already limits the range; pass the series through as sent
        LineGraphData::parse(&body)
    }

    fn describe(&self) -> String {
        format!("API {}", self.base_url)
    }
}
