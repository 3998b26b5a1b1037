//! Statistics Calculator Module
//! Descriptive statistics for a balance series.

use crate::data::BalanceSeries;
use statrs::statistics::Statistics;

/// Summary of a balance series, shown under the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub opening: f64,
    pub closing: f64,
    pub change: f64,
    /// Change relative to the opening balance; `None` when it opened at zero.
    pub change_pct: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation, 0 for a single point.
    pub std_dev: f64,
}

/// Handles statistical calculations over balance series.
pub struct SummaryCalculator;

impl SummaryCalculator {
    /// Summarize `series`, or `None` if it has no points.
    pub fn summarize(series: &BalanceSeries) -> Option<SeriesSummary> {
        let figures = series.figures();
        let (&opening, &closing) = (figures.first()?, figures.last()?);

        let change = closing - opening;
        let change_pct = if opening == 0.0 {
            None
        } else {
            Some(change / opening.abs() * 100.0)
        };

        let std_dev = if figures.len() > 1 {
            Statistics::std_dev(figures.iter())
        } else {
            0.0
        };

        Some(SeriesSummary {
            count: figures.len(),
            opening,
            closing,
            change,
            change_pct,
            min: Statistics::min(figures.iter()),
            max: Statistics::max(figures.iter()),
            mean: Statistics::mean(figures.iter()),
            std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(figures: &[f64]) -> BalanceSeries {
        let labels = (0..figures.len()).map(|i| format!("M{i}")).collect();
        BalanceSeries::new(labels, figures.to_vec()).unwrap()
    }

    #[test]
    fn empty_series_has_no_summary() {
        assert_eq!(SummaryCalculator::summarize(&BalanceSeries::empty()), None);
    }

    #[test]
    fn summarizes_twelve_months() {
        let figures: Vec<f64> = (0..12).map(|i| 100.0 + 10.0 * i as f64).collect();
        let summary = SummaryCalculator::summarize(&series(&figures)).unwrap();

        assert_eq!(summary.count, 12);
        assert_eq!(summary.opening, 100.0);
        assert_eq!(summary.closing, 210.0);
        assert_eq!(summary.change, 110.0);
        assert!((summary.change_pct.unwrap() - 110.0).abs() < 1e-9);
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 210.0);
        assert!((summary.mean - 155.0).abs() < 1e-9);
        assert!((summary.std_dev - 1300f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn single_point_and_zero_opening() {
        let single = SummaryCalculator::summarize(&series(&[42.0])).unwrap();
        assert_eq!(single.std_dev, 0.0);
        assert_eq!(single.change, 0.0);

        let from_zero = SummaryCalculator::summarize(&series(&[0.0, 50.0])).unwrap();
        assert_eq!(from_zero.change_pct, None);
        assert_eq!(from_zero.change, 50.0);
    }
}
