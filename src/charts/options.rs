//! Chart Options
//! Statically typed chart configuration: axes, tooltip, series styling.

use crate::charts::style::Rgba;
use serde::{Deserialize, Deserializer, Serialize};

/// Label shown for the balance dataset.
pub const SERIES_LABEL: &str = "Last 12 Month Balances";

/// Brand red used for the balance line and its fill.
pub const BALANCE_RED: Rgba = Rgba::rgb(236, 37, 13);
const FILL_RED: (u8, u8, u8) = (233, 32, 16);

/// Which point a tooltip refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipMode {
    /// Closest point by distance
    Nearest,
    /// Closest point along the x axis only
    Index,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub background: Rgba,
    pub title_color: Rgba,
    pub body_color: Rgba,
    pub body_spacing: f32,
    pub x_padding: f32,
    pub mode: TooltipMode,
    /// Only show the tooltip when the pointer is on a point marker.
    pub intersect: bool,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(0xf5, 0xf5, 0xf5),
            title_color: Rgba::rgb(0x33, 0x33, 0x33),
            body_color: Rgba::rgb(0x66, 0x66, 0x66),
            body_spacing: 4.0,
            x_padding: 12.0,
            mode: TooltipMode::Nearest,
            intersect: false,
        }
    }
}

/// One chart axis. Read from config through [`AxisOverrides`], so each
/// axis keeps its own defaults for the fields a file leaves out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisConfig {
    pub grid_color: Rgba,
    pub draw_border: bool,
    /// Lower bound the axis stretches to even if the data stays above it.
    pub suggested_min: Option<f64>,
    /// Upper bound the axis stretches to even if the data stays below it.
    pub suggested_max: Option<f64>,
    pub tick_padding: u32,
    pub tick_color: Rgba,
    pub show_ticks: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            grid_color: Rgba::TRANSPARENT,
            draw_border: false,
            suggested_min: None,
            suggested_max: None,
            tick_padding: 20,
            tick_color: Rgba::rgb(0x9a, 0x9a, 0x9a),
            show_ticks: true,
        }
    }
}

impl AxisConfig {
    /// The month axis of the balance chart.
    pub fn category() -> Self {
        Self {
            grid_color: Rgba::new(233, 32, 16, 0.1),
            ..Self::default()
        }
    }

    /// The balance axis, stretched to at least 60..125.
    pub fn value() -> Self {
        Self {
            grid_color: Rgba::new(29, 140, 248, 0.0),
            suggested_min: Some(60.0),
            suggested_max: Some(125.0),
            ..Self::default()
        }
    }

    /// Axis range covering every finite value and the suggested bounds.
    pub fn resolve_bounds(&self, values: &[f64]) -> (f64, f64) {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (data_min, data_max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        let mut lo = match self.suggested_min {
            Some(s) => data_min.min(s),
            None => data_min,
        };
        let mut hi = match self.suggested_max {
            Some(s) => data_max.max(s),
            None => data_max,
        };

        if !lo.is_finite() {
            lo = if hi.is_finite() { hi - 1.0 } else { 0.0 };
        }
        if !hi.is_finite() {
            hi = lo + 1.0;
        }
        if hi - lo < f64::EPSILON {
            lo -= 1.0;
            hi += 1.0;
        }
        (lo, hi)
    }
}

/// Axis fields present in a config file.
#[derive(Deserialize)]
struct AxisOverrides {
    grid_color: Option<Rgba>,
    draw_border: Option<bool>,
    /// `null` clears the bound, a missing key keeps it.
    #[serde(default, deserialize_with = "explicit")]
    suggested_min: Option<Option<f64>>,
    #[serde(default, deserialize_with = "explicit")]
    suggested_max: Option<Option<f64>>,
    tick_padding: Option<u32>,
    tick_color: Option<Rgba>,
    show_ticks: Option<bool>,
}

impl AxisOverrides {
    fn apply(self, mut axis: AxisConfig) -> AxisConfig {
        if let Some(color) = self.grid_color {
            axis.grid_color = color;
        }
        if let Some(border) = self.draw_border {
            axis.draw_border = border;
        }
        if let Some(min) = self.suggested_min {
            axis.suggested_min = min;
        }
        if let Some(max) = self.suggested_max {
            axis.suggested_max = max;
        }
        if let Some(padding) = self.tick_padding {
            axis.tick_padding = padding;
        }
        if let Some(color) = self.tick_color {
            axis.tick_color = color;
        }
        if let Some(show) = self.show_ticks {
            axis.show_ticks = show;
        }
        axis
    }
}

fn explicit<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<f64>>, D::Error> {
    Option::<f64>::deserialize(d).map(Some)
}

fn category_axis<'de, D: Deserializer<'de>>(d: D) -> Result<AxisConfig, D::Error> {
    Ok(AxisOverrides::deserialize(d)?.apply(AxisConfig::category()))
}

fn value_axis<'de, D: Deserializer<'de>>(d: D) -> Result<AxisConfig, D::Error> {
    Ok(AxisOverrides::deserialize(d)?.apply(AxisConfig::value()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// 0 is the bottom of the plot area, 1 the top.
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Vertical linear gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ColorStop>", into = "Vec<ColorStop>")]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    /// Build from stops in any order; they are kept sorted by offset.
    pub fn new(mut stops: Vec<ColorStop>) -> Self {
        for stop in &mut stops {
            stop.offset = stop.offset.clamp(0.0, 1.0);
        }
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { stops }
    }

    /// Red that fades out towards the bottom of the chart.
    pub fn balance_fade() -> Self {
        let (r, g, b) = FILL_RED;
        Self::new(vec![
            ColorStop::new(1.0, Rgba::new(r, g, b, 0.2)),
            ColorStop::new(0.4, Rgba::new(r, g, b, 0.0)),
            ColorStop::new(0.0, Rgba::new(r, g, b, 0.0)),
        ])
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `offset`, interpolated between the neighbouring stops.
    pub fn color_at(&self, offset: f32) -> Rgba {
        let Some(first) = self.stops.first() else {
            return Rgba::TRANSPARENT;
        };
        if offset <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if offset <= hi.offset {
                let span = hi.offset - lo.offset;
                if span <= f32::EPSILON {
                    return hi.color;
                }
                return lo.color.lerp(hi.color, (offset - lo.offset) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

impl From<Vec<ColorStop>> for Gradient {
    fn from(stops: Vec<ColorStop>) -> Self {
        Gradient::new(stops)
    }
}

impl From<Gradient> for Vec<ColorStop> {
    fn from(gradient: Gradient) -> Self {
        gradient.stops
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    pub radius: u32,
    pub hover_radius: u32,
    pub background: Rgba,
    pub hover_background: Rgba,
    pub border_color: Rgba,
    pub border_width: u32,
    pub hover_border_width: u32,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            radius: 4,
            hover_radius: 4,
            background: BALANCE_RED,
            hover_background: BALANCE_RED,
            border_color: Rgba::new(255, 255, 255, 0.0),
            border_width: 20,
            hover_border_width: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStyle {
    pub label: String,
    pub fill: bool,
    pub gradient: Gradient,
    pub border_color: Rgba,
    pub border_width: u32,
    pub point: PointStyle,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            label: SERIES_LABEL.to_string(),
            fill: true,
            gradient: Gradient::balance_fade(),
            border_color: BALANCE_RED,
            border_width: 2,
            point: PointStyle::default(),
        }
    }
}

/// Everything the renderer needs besides the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub background: Rgba,
    pub legend_display: bool,
    pub tooltip: TooltipConfig,
    #[serde(deserialize_with = "category_axis")]
    pub x_axis: AxisConfig,
    #[serde(deserialize_with = "value_axis")]
    pub y_axis: AxisConfig,
    pub series: SeriesStyle,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            legend_display: false,
            tooltip: TooltipConfig::default(),
            x_axis: AxisConfig::category(),
            y_axis: AxisConfig::value(),
            series: SeriesStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gradient_has_three_sorted_stops() {
        let gradient = Gradient::balance_fade();
        let offsets: Vec<f32> = gradient.stops().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.4, 1.0]);
        assert!(gradient.color_at(0.0).is_transparent());
        assert!(gradient.color_at(0.4).is_transparent());
        assert!((gradient.color_at(1.0).a - 0.2).abs() < 1e-6);
        assert!((gradient.color_at(0.7).a - 0.1).abs() < 1e-6);
    }

    #[test]
    fn empty_gradient_is_transparent() {
        assert!(Gradient::new(Vec::new()).color_at(0.5).is_transparent());
    }

    #[test]
    fn bounds_widen_to_suggested_range() {
        let axis = ChartOptions::default().y_axis;
        assert_eq!(axis.resolve_bounds(&[80.0, 100.0]), (60.0, 125.0));
        assert_eq!(axis.resolve_bounds(&[100.0, 210.0]), (60.0, 210.0));
        assert_eq!(axis.resolve_bounds(&[]), (60.0, 125.0));
    }

    #[test]
    fn bounds_never_collapse() {
        let axis = AxisConfig::default();
        assert_eq!(axis.resolve_bounds(&[5.0, 5.0]), (4.0, 6.0));
        assert_eq!(axis.resolve_bounds(&[]), (0.0, 1.0));
        assert_eq!(axis.resolve_bounds(&[f64::NAN, 3.0]), (2.0, 4.0));
    }

    #[test]
    fn options_load_from_partial_json() {
        let json = r##"{
            "y_axis": { "suggested_min": 0, "tick_color": "#000" },
            "tooltip": { "mode": "index" }
        }"##;
        let options: ChartOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.y_axis.suggested_min, Some(0.0));
        assert_eq!(options.y_axis.suggested_max, Some(125.0));
        assert_eq!(options.y_axis.tick_color, Rgba::rgb(0, 0, 0));
        assert_eq!(options.tooltip.mode, TooltipMode::Index);
        assert_eq!(options.series.label, SERIES_LABEL);
    }

    #[test]
    fn partial_axis_keeps_its_own_defaults() {
        let options: ChartOptions = serde_json::from_str(
            r##"{ "y_axis": { "tick_color": "#000" }, "x_axis": { "tick_padding": 5 } }"##,
        )
        .unwrap();

        assert_eq!(options.y_axis.tick_color, Rgba::rgb(0, 0, 0));
        assert_eq!(options.y_axis.suggested_min, Some(60.0));
        assert_eq!(options.y_axis.suggested_max, Some(125.0));
        assert_eq!(options.x_axis.tick_padding, 5);
        assert_eq!(options.x_axis.grid_color, Rgba::new(233, 32, 16, 0.1));
    }

    #[test]
    fn null_clears_a_suggested_bound() {
        let options: ChartOptions =
            serde_json::from_str(r#"{ "y_axis": { "suggested_max": null } }"#).unwrap();
        assert_eq!(options.y_axis.suggested_min, Some(60.0));
        assert_eq!(options.y_axis.suggested_max, None);
    }
}
