//! Chart Renderer
//! Paints a [`RenderDescriptor`] onto a pixel surface with plotters.
//!
//! Layout, back to front:
//! 1. Background fill
//! 2. Horizontal grid (y axis) and category grid (x axis)
//! 3. Gradient fill under the line, bottom of the plot area = offset 0
//! 4. Balance line
//! 5. Point markers

use crate::charts::descriptor::RenderDescriptor;
use crate::charts::options::{Gradient, TooltipMode};
use crate::charts::style::Rgba;
use image::{ImageFormat, RgbImage};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

/// Extra room around a marker that still counts as "on" the point.
const HIT_SLOP: f32 = 2.0;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing surface must have a non-zero area, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
    #[error("No drawing surface attached")]
    NoSurface,
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Failed to encode chart image: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// The 2D surface a chart is painted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingSurface {
    width: u32,
    height: u32,
}

impl DrawingSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptySurface { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Something that can turn a descriptor into a live chart.
///
/// The returned handle owns whatever the chart holds on to; dropping it
/// releases those resources.
pub trait ChartRenderer {
    type Handle;

    fn render_line_chart(
        &mut self,
        surface: &DrawingSurface,
        descriptor: &RenderDescriptor,
    ) -> Result<Self::Handle, RenderError>;
}

/// Pixel position of one data point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMarker {
    pub index: usize,
    pub x: f32,
    pub y: f32,
}

/// Pixel bounds of the plotting area inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// A chart rasterized to RGB pixels.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB, 3 bytes per pixel.
    pub pixels: Vec<u8>,
    pub markers: Vec<PointMarker>,
    pub plot_area: PlotArea,
    pub descriptor: RenderDescriptor,
}

impl RenderedChart {
    /// The point a tooltip at image position (x, y) refers to.
    pub fn nearest_point(
        &self,
        x: f32,
        y: f32,
        mode: TooltipMode,
        intersect: bool,
    ) -> Option<&PointMarker> {
        let distance = |m: &PointMarker| match mode {
            TooltipMode::Nearest => ((m.x - x).powi(2) + (m.y - y).powi(2)).sqrt(),
            TooltipMode::Index => (m.x - x).abs(),
        };
        let nearest = self
            .markers
            .iter()
            .min_by(|a, b| distance(a).total_cmp(&distance(b)))?;

        if intersect {
            let reach = self.descriptor.point.hover_radius.max(self.descriptor.point.radius) as f32
                + HIT_SLOP;
            if distance(nearest) > reach {
                return None;
            }
        }
        Some(nearest)
    }

    fn to_image(&self) -> Result<RgbImage, RenderError> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| RenderError::Draw("pixel buffer does not match image size".into()))
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        self.to_image()?.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// X range for `n` categories, half a band of padding on each side.
fn category_range(n: usize) -> Range<f64> {
    if n == 0 {
        0.0..1.0
    } else {
        -0.5..(n as f64 - 0.5)
    }
}

fn category_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Rasterizes charts into RGB buffers.
#[derive(Debug, Default)]
pub struct BitmapChartRenderer;

impl BitmapChartRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Paint the chart and return the finished image.
    pub fn paint(
        &self,
        surface: &DrawingSurface,
        d: &RenderDescriptor,
    ) -> Result<RenderedChart, RenderError> {
        let (width, height) = (surface.width(), surface.height());
        let mut pixels = vec![0u8; width as usize * height as usize * 3];

        let (markers, plot_area) = {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&d.background.to_plotters()).map_err(draw_err)?;

            let n = d.len();
            let (y_min, y_max) = d.y_bounds;
            let x_label_area = if d.x_axis.show_ticks {
                d.x_axis.tick_padding + 20
            } else {
                0
            };
            let y_label_area = if d.y_axis.show_ticks {
                d.y_axis.tick_padding + 40
            } else {
                0
            };

            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(x_label_area)
                .y_label_area_size(y_label_area)
                .build_cartesian_2d(category_range(n), y_min..y_max)
                .map_err(draw_err)?;

            let border = if d.x_axis.draw_border || d.y_axis.draw_border {
                d.y_axis.tick_color
            } else {
                Rgba::TRANSPARENT
            };
            let x_formatter = |v: &f64| category_label(&d.labels, *v);
            let y_formatter = |v: &f64| format!("{:.0}", v);

            chart
                .configure_mesh()
                .disable_x_mesh()
                .bold_line_style(d.y_axis.grid_color.to_plotters())
                .max_light_lines(0)
                .axis_style(border.to_plotters())
                .x_labels(if d.x_axis.show_ticks { n.max(1) } else { 0 })
                .y_labels(if d.y_axis.show_ticks { 6 } else { 0 })
                .x_label_formatter(&x_formatter)
                .y_label_formatter(&y_formatter)
                .x_label_style(("sans-serif", 12).into_font().color(&d.x_axis.tick_color.to_plotters()))
                .y_label_style(("sans-serif", 12).into_font().color(&d.y_axis.tick_color.to_plotters()))
                .draw()
                .map_err(draw_err)?;

            // Category grid lines, one per data point
            if !d.x_axis.grid_color.is_transparent() {
                let grid = d.x_axis.grid_color.to_plotters().stroke_width(1);
                chart
                    .draw_series((0..n).map(|i| {
                        PathElement::new(vec![(i as f64, y_min), (i as f64, y_max)], grid)
                    }))
                    .map_err(draw_err)?;
            }

            let markers: Vec<PointMarker> = d
                .points
                .iter()
                .enumerate()
                .map(|(index, &value)| {
                    let (x, y) = chart.backend_coord(&(index as f64, value));
                    PointMarker {
                        index,
                        x: x as f32,
                        y: y as f32,
                    }
                })
                .collect();

            let (x_px, y_px) = chart.plotting_area().get_pixel_range();
            let plot_area = PlotArea {
                left: x_px.start,
                top: y_px.start,
                right: x_px.end,
                bottom: y_px.end,
            };

            if let Some(gradient) = &d.fill {
                fill_under_line(&root, &markers, &plot_area, gradient)?;
            }

            let line_style = d.stroke.to_plotters().stroke_width(d.stroke_width);
            let series = chart
                .draw_series(LineSeries::new(
                    d.points
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| (i as f64, v)),
                    line_style,
                ))
                .map_err(draw_err)?;
            if d.show_legend {
                series
                    .label(d.series_label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
            }

            let point = &d.point;
            chart
                .draw_series(d.points.iter().enumerate().map(|(i, &v)| {
                    Circle::new(
                        (i as f64, v),
                        point.radius as i32,
                        point.background.to_plotters().filled(),
                    )
                }))
                .map_err(draw_err)?;
            if point.border_width > 0 && !point.border_color.is_transparent() {
                let ring = point.border_color.to_plotters().stroke_width(point.border_width);
                chart
                    .draw_series(
                        d.points
                            .iter()
                            .enumerate()
                            .map(|(i, &v)| Circle::new((i as f64, v), point.radius as i32, ring)),
                    )
                    .map_err(draw_err)?;
            }

            if d.show_legend {
                chart
                    .configure_series_labels()
                    .background_style(d.background.to_plotters())
                    .label_font(("sans-serif", 12).into_font().color(&d.x_axis.tick_color.to_plotters()))
                    .draw()
                    .map_err(draw_err)?;
            }

            root.present().map_err(draw_err)?;
            (markers, plot_area)
        };

        debug!(
            "Painted {} points on {}x{} surface",
            markers.len(),
            width,
            height
        );

        Ok(RenderedChart {
            width,
            height,
            pixels,
            markers,
            plot_area,
            descriptor: d.clone(),
        })
    }
}

impl ChartRenderer for BitmapChartRenderer {
    type Handle = RenderedChart;

    fn render_line_chart(
        &mut self,
        surface: &DrawingSurface,
        descriptor: &RenderDescriptor,
    ) -> Result<RenderedChart, RenderError> {
        self.paint(surface, descriptor)
    }
}

/// Shade every pixel column between the first and last point, from the line
/// down to the bottom of the plot area.
fn fill_under_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    markers: &[PointMarker],
    area: &PlotArea,
    gradient: &Gradient,
) -> Result<(), RenderError> {
    if markers.len() < 2 {
        return Ok(());
    }
    let height = (area.bottom - area.top).max(1) as f32;
    let last = markers.len() - 2;

    for (segment, pair) in markers.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let (x0, x1) = (a.x.round() as i32, b.x.round() as i32);
        // The shared column between two segments is painted once
        let end = if segment == last { x1 + 1 } else { x1 };

        for px in x0..end {
            let t = if x1 == x0 {
                0.0
            } else {
                (px - x0) as f32 / (x1 - x0) as f32
            };
            let line_y = a.y + (b.y - a.y) * t;
            let start = (line_y.ceil() as i32).max(area.top);

            for py in start..area.bottom {
                let color = gradient.color_at((area.bottom - py) as f32 / height);
                if color.is_transparent() {
                    continue;
                }
                root.draw_pixel((px, py), &color.to_plotters())
                    .map_err(draw_err)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::options::{ChartOptions, BALANCE_RED};
    use crate::data::BalanceSeries;

    /// Options that draw no text, so tests don't depend on system fonts.
    fn textless_options() -> ChartOptions {
        let mut options = ChartOptions::default();
        options.x_axis.show_ticks = false;
        options.y_axis.show_ticks = false;
        options
    }

    /// RGB value at (x, y), if inside the image.
    fn pixel(chart: &RenderedChart, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= chart.width || y >= chart.height {
            return None;
        }
        let i = ((y * chart.width + x) * 3) as usize;
        Some([chart.pixels[i], chart.pixels[i + 1], chart.pixels[i + 2]])
    }

    fn rising_series(n: usize) -> BalanceSeries {
        let labels = (0..n).map(|i| format!("M{i}")).collect();
        let figures = (0..n).map(|i| 100.0 + 10.0 * i as f64).collect();
        BalanceSeries::new(labels, figures).unwrap()
    }

    #[test]
    fn rejects_zero_area_surface() {
        assert!(matches!(
            DrawingSurface::new(0, 100),
            Err(RenderError::EmptySurface { width: 0, height: 100 })
        ));
    }

    #[test]
    fn paints_points_left_to_right() {
        let surface = DrawingSurface::new(400, 300).unwrap();
        let descriptor = RenderDescriptor::line_chart(&rising_series(12), &textless_options());
        let chart = BitmapChartRenderer::new().paint(&surface, &descriptor).unwrap();

        assert_eq!(chart.pixels.len(), 400 * 300 * 3);
        assert_eq!(chart.markers.len(), 12);
        assert!(chart.markers.windows(2).all(|w| w[0].x < w[1].x));
        // Balances rise, so markers climb towards the top of the image
        assert!(chart.markers.windows(2).all(|w| w[0].y > w[1].y));

        let first = chart.markers[0];
        let centre = pixel(&chart, first.x as u32, first.y as u32).unwrap();
        assert_eq!(centre, [BALANCE_RED.r, BALANCE_RED.g, BALANCE_RED.b]);
    }

    #[test]
    fn fades_fill_towards_the_bottom() {
        let surface = DrawingSurface::new(400, 300).unwrap();
        let descriptor = RenderDescriptor::line_chart(&rising_series(12), &textless_options());
        let chart = BitmapChartRenderer::new().paint(&surface, &descriptor).unwrap();

        let last = chart.markers[11];
        let x = (last.x - 6.0) as u32;

        let near_top = pixel(&chart, x, (last.y + 15.0) as u32).unwrap();
        assert!(near_top[0] > near_top[1], "expected red tint, got {:?}", near_top);

        let bottom = pixel(&chart, x, (chart.plot_area.bottom - 2) as u32).unwrap();
        assert_eq!(bottom, [255, 255, 255]);
    }

    #[test]
    fn empty_series_renders_bare_axes() {
        let surface = DrawingSurface::new(200, 120).unwrap();
        let descriptor =
            RenderDescriptor::line_chart(&BalanceSeries::empty(), &textless_options());
        let chart = BitmapChartRenderer::new().paint(&surface, &descriptor).unwrap();
        assert!(chart.markers.is_empty());
        assert!(chart.plot_area.right > chart.plot_area.left);
    }

    #[test]
    fn nearest_point_modes() {
        let surface = DrawingSurface::new(400, 300).unwrap();
        let descriptor = RenderDescriptor::line_chart(&rising_series(4), &textless_options());
        let chart = BitmapChartRenderer::new().paint(&surface, &descriptor).unwrap();
        let second = chart.markers[1];

        // Far above the line, but horizontally at the second point
        let hit = chart.nearest_point(second.x, 0.0, TooltipMode::Index, false);
        assert_eq!(hit.map(|m| m.index), Some(1));

        assert!(chart
            .nearest_point(second.x, 0.0, TooltipMode::Nearest, true)
            .is_none());
        let on_point = chart.nearest_point(second.x + 1.0, second.y, TooltipMode::Nearest, true);
        assert_eq!(on_point.map(|m| m.index), Some(1));
    }

    #[test]
    fn encodes_png() {
        let surface = DrawingSurface::new(120, 80).unwrap();
        let descriptor = RenderDescriptor::line_chart(&rising_series(3), &textless_options());
        let chart = BitmapChartRenderer::new().paint(&surface, &descriptor).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        chart.save_png(&path).unwrap();

        let png = std::fs::read(&path).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }

    #[test]
    fn labels_only_on_whole_categories() {
        let labels = vec!["Jan".to_string(), "Feb".to_string()];
        assert_eq!(category_label(&labels, 1.0), "Feb");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 5.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
