//! CSV Balance Loader Module
//! Reads balance history from a local CSV export using Polars.
//!
//! Expected columns: `account_id`, `label`, `figure`, one row per month,
//! oldest first.

use crate::data::model::{AccountId, BalanceSeries};
use crate::data::provider::{BalanceHistoryProvider, ProviderError, TRAILING_MONTHS};
use log::debug;
use polars::prelude::*;
use std::path::PathBuf;

/// Serves balance history out of a CSV file instead of the backend.
pub struct CsvBalanceProvider {
    file_path: PathBuf,
}

impl CsvBalanceProvider {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Load every row for `account` in file order.
    fn load_rows(&self, account: &AccountId) -> Result<DataFrame, ProviderError> {
        // Use lazy evaluation so only the account's rows get materialized
        let df = LazyCsvReader::new(&self.file_path)
            .with_infer_schema_length(Some(1000))
            .finish()?
            .filter(
                col("account_id")
                    .cast(DataType::String)
                    .eq(lit(account.as_str())),
            )
            .select([
                col("label").cast(DataType::String),
                col("figure").cast(DataType::Float64),
            ])
            .collect()?;

        Ok(df)
    }
}

impl BalanceHistoryProvider for CsvBalanceProvider {
    fn fetch_last_12_month_balances(
        &self,
        account: &AccountId,
    ) -> Result<BalanceSeries, ProviderError> {
        let df = self.load_rows(account)?;
        debug!(
            "Loaded {} rows for {} from {}",
            df.height(),
            account,
            self.file_path.display()
        );

        if df.height() == 0 {
            return Err(ProviderError::NotFound(account.clone()));
        }

        let label_ca = df.column("label")?.str()?;
        let figure_ca = df.column("figure")?.f64()?;

        let mut labels = Vec::with_capacity(df.height());
        let mut figures = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            match (label_ca.get(i), figure_ca.get(i)) {
                (Some(label), Some(figure)) if !figure.is_nan() => {
                    labels.push(label.to_string());
                    figures.push(figure);
                }
                _ => {
                    return Err(ProviderError::Parse(format!(
                        "row {} for account {} is missing a label or figure",
                        i + 1,
                        account
                    )))
                }
            }
        }

        Ok(BalanceSeries::new(labels, figures)?.trailing(TRAILING_MONTHS))
    }

    fn describe(&self) -> String {
        format!("CSV {}", self.file_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ACCOUNT: &str = "aa45e3c9-261d-41fe-a1b0-5b4dcf79cfd3";

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn keeps_trailing_twelve_months_for_account() {
        let mut csv = String::from("account_id,label,figure\n");
        for month in 1..=14 {
            csv.push_str(&format!("{},M{:02},{}\n", ACCOUNT, month, month * 10));
            csv.push_str(&format!("other,M{:02},999\n", month));
        }
        let file = write_csv(&csv);

        let provider = CsvBalanceProvider::new(file.path());
        let series = provider
            .fetch_last_12_month_balances(&AccountId::new(ACCOUNT))
            .unwrap();

        assert_eq!(series.len(), 12);
        assert_eq!(series.labels().first().map(String::as_str), Some("M03"));
        assert_eq!(series.figures().first(), Some(&30.0));
        assert_eq!(series.figures().last(), Some(&140.0));
    }

    #[test]
    fn unknown_account_is_not_found() {
        let file = write_csv(&format!("account_id,label,figure\n{},Jan,100\n", ACCOUNT));
        let provider = CsvBalanceProvider::new(file.path());
        let err = provider
            .fetch_last_12_month_balances(&AccountId::new("missing"))
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let provider = CsvBalanceProvider::new("/definitely/not/here.csv");
        assert!(provider
            .fetch_last_12_month_balances(&AccountId::new(ACCOUNT))
            .is_err());
    }
}
