//! Data module - balance history sources

mod http;
mod loader;
mod model;
mod provider;

pub use http::{HttpBalanceProvider, DEFAULT_API_BASE_URL};
pub use loader::CsvBalanceProvider;
pub use model::{AccountId, BalanceSeries, SeriesError, DEFAULT_ACCOUNT_ID};
pub use provider::{BalanceHistoryProvider, ProviderError};
