//! Stats module - series summary statistics

mod calculator;

pub use calculator::{SeriesSummary, SummaryCalculator};
