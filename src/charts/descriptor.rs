//! Render Descriptor
//! A complete, self-contained description of one line chart.

use crate::charts::options::{AxisConfig, ChartOptions, Gradient, PointStyle, TooltipConfig};
use crate::charts::style::Rgba;
use crate::data::BalanceSeries;

/// What gets handed to a [`ChartRenderer`](crate::charts::ChartRenderer).
///
/// Built fresh for every successful fetch; owns copies of the series data so
/// the renderer never has to reach back into the view.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescriptor {
    pub series_label: String,
    pub labels: Vec<String>,
    pub points: Vec<f64>,
    /// `None` when the area under the line is not filled.
    pub fill: Option<Gradient>,
    pub stroke: Rgba,
    pub stroke_width: u32,
    pub point: PointStyle,
    pub background: Rgba,
    pub show_legend: bool,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    /// Resolved y range (min, max).
    pub y_bounds: (f64, f64),
    pub tooltip: TooltipConfig,
}

impl RenderDescriptor {
    /// Describe `series` as a filled line chart styled by `options`.
    pub fn line_chart(series: &BalanceSeries, options: &ChartOptions) -> Self {
        let style = &options.series;
        Self {
            series_label: style.label.clone(),
            labels: series.labels().to_vec(),
            points: series.figures().to_vec(),
            fill: style.fill.then(|| style.gradient.clone()),
            stroke: style.border_color,
            stroke_width: style.border_width,
            point: style.point.clone(),
            background: options.background,
            show_legend: options.legend_display,
            x_axis: options.x_axis.clone(),
            y_axis: options.y_axis.clone(),
            y_bounds: options.y_axis.resolve_bounds(series.figures()),
            tooltip: options.tooltip.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Label for category index `index`, if there is one.
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twelve_months() -> BalanceSeries {
        let labels = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let figures = (0..12).map(|i| 100.0 + 10.0 * i as f64).collect();
        BalanceSeries::new(labels, figures).unwrap()
    }

    #[test]
    fn twelve_month_series_becomes_twelve_points() {
        let descriptor = RenderDescriptor::line_chart(&twelve_months(), &ChartOptions::default());

        assert_eq!(descriptor.len(), 12);
        assert_eq!(descriptor.points.first(), Some(&100.0));
        assert_eq!(descriptor.points.last(), Some(&210.0));
        assert_eq!(descriptor.label_at(0), Some("Jan"));
        assert_eq!(descriptor.label_at(11), Some("Dec"));
        assert_eq!(descriptor.fill.as_ref().map(|g| g.stops().len()), Some(3));
        assert_eq!(descriptor.series_label, "Last 12 Month Balances");
        assert_eq!(descriptor.y_bounds, (60.0, 210.0));
    }

    #[test]
    fn preserves_order_for_any_length() {
        for n in [0usize, 1, 5, 12] {
            let labels: Vec<String> = (0..n).map(|i| format!("P{i}")).collect();
            let figures: Vec<f64> = (0..n).map(|i| (n - i) as f64).collect();
            let series = BalanceSeries::new(labels.clone(), figures.clone()).unwrap();

            let descriptor = RenderDescriptor::line_chart(&series, &ChartOptions::default());
            assert_eq!(descriptor.points, figures);
            assert_eq!(descriptor.labels, labels);
        }
    }

    #[test]
    fn fill_can_be_disabled() {
        let mut options = ChartOptions::default();
        options.series.fill = false;
        let descriptor = RenderDescriptor::line_chart(&twelve_months(), &options);
        assert!(descriptor.fill.is_none());
    }
}
