//! Balance Series Model
//! Account identifiers and the monthly balance series returned by providers.

use std::fmt;
use thiserror::Error;

/// Account used when nothing else is configured.
pub const DEFAULT_ACCOUNT_ID: &str = "aa45e3c9-261d-41fe-a1b0-5b4dcf79cfd3";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Series has {labels} labels but {figures} figures")]
    LengthMismatch { labels: usize, figures: usize },
}

/// Opaque account identifier. Carried as-is to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT_ID)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monthly balances, oldest first.
///
/// `labels` and `figures` always have the same length; [`BalanceSeries::new`]
/// is the only way to build one.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSeries {
    labels: Vec<String>,
    figures: Vec<f64>,
}

impl BalanceSeries {
    pub fn new(labels: Vec<String>, figures: Vec<f64>) -> Result<Self, SeriesError> {
        if labels.len() != figures.len() {
            return Err(SeriesError::LengthMismatch {
                labels: labels.len(),
                figures: figures.len(),
            });
        }
        Ok(Self { labels, figures })
    }

    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            figures: Vec::new(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn figures(&self) -> &[f64] {
        &self.figures
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    /// Keep only the most recent `n` entries.
    pub fn trailing(mut self, n: usize) -> Self {
        if self.len() > n {
            let skip = self.len() - n;
            self.labels.drain(..skip);
            self.figures.drain(..skip);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months() -> Vec<String> {
        [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = BalanceSeries::new(months(), vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::LengthMismatch {
                labels: 12,
                figures: 2
            }
        );
    }

    #[test]
    fn keeps_labels_and_figures_in_order() {
        let series =
            BalanceSeries::new(vec!["Jan".into(), "Feb".into()], vec![10.5, 12.0]).unwrap();
        assert_eq!(series.labels(), &["Jan", "Feb"]);
        assert_eq!(series.figures(), &[10.5, 12.0]);
        assert_eq!(BalanceSeries::empty().len(), 0);
    }

    #[test]
    fn trailing_keeps_most_recent() {
        let figures: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let series = BalanceSeries::new(months(), figures).unwrap().trailing(3);
        assert_eq!(series.labels(), &["Oct", "Nov", "Dec"]);
        assert_eq!(series.figures(), &[9.0, 10.0, 11.0]);
    }

    #[test]
    fn account_id_is_opaque() {
        let id = AccountId::new("not-a-uuid at all");
        assert_eq!(id.as_str(), "not-a-uuid at all");
        assert_eq!(AccountId::default().to_string(), DEFAULT_ACCOUNT_ID);
    }
}
