//! Balance History Provider
//! The seam between the chart view and wherever balances come from.

use crate::data::model::{AccountId, BalanceSeries, SeriesError};
use thiserror::Error;

/// Months of history the CSV provider keeps per account.
pub const TRAILING_MONTHS: usize = 12;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("No balance history for account {0}")]
    NotFound(AccountId),
    #[error("Backend answered with HTTP {0}")]
    Status(u16),
    #[error("Failed to decode balance history: {0}")]
    Parse(String),
    #[error("Invalid balance series: {0}")]
    InvalidSeries(#[from] SeriesError),
    #[error("Failed to read balance file: {0}")]
    Csv(#[from] polars::prelude::PolarsError),
}

/// Produces the trailing twelve-month balance series for an account.
///
/// Implementations are called from a worker thread and may block.
pub trait BalanceHistoryProvider: Send + Sync {
    fn fetch_last_12_month_balances(
        &self,
        account: &AccountId,
    ) -> Result<BalanceSeries, ProviderError>;

    /// Short human readable description used in logs and the status line.
    fn describe(&self) -> String;
}
