//! Chart Viewer Widget
//! Central panel showing the balance chart, its hover tooltip and a summary table.

use crate::charts::{DrawingSurface, PointStyle, RenderedChart, TooltipConfig};
use crate::data::BalanceSeries;
use crate::gui::texture::ChartTexture;
use crate::stats::{SeriesSummary, SummaryCalculator};
use egui::load::SizedTexture;
use egui::epaint::CircleShape;
use egui::{Color32, RichText, Stroke};

/// Vertical space kept for the title and summary table.
const SUMMARY_HEIGHT: f32 = 110.0;
const MIN_CHART_WIDTH: f32 = 320.0;
const MIN_CHART_HEIGHT: f32 = 200.0;

/// Displays the current chart and its summary.
#[derive(Default)]
pub struct ChartViewer {
    summary: Option<SeriesSummary>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the summary for a newly rendered series.
    pub fn set_series(&mut self, series: Option<&BalanceSeries>) {
        self.summary = series.and_then(SummaryCalculator::summarize);
    }

    pub fn clear(&mut self) {
        self.summary = None;
    }

    /// Surface that fills `available` while leaving room for the summary.
    pub fn surface_for(available: egui::Vec2) -> Option<DrawingSurface> {
        let width = available.x.max(MIN_CHART_WIDTH).floor() as u32;
        let height = (available.y - SUMMARY_HEIGHT).max(MIN_CHART_HEIGHT).floor() as u32;
        DrawingSurface::new(width, height).ok()
    }

    pub fn show(&self, ui: &mut egui::Ui, chart: Option<&ChartTexture>, loading: bool) {
        let Some(chart) = chart else {
            ui.centered_and_justified(|ui| {
                let text = if loading { "Loading balances..." } else { "No Data" };
                ui.label(RichText::new(text).size(20.0));
            });
            return;
        };

        let rendered = chart.chart();
        ui.label(
            RichText::new(&rendered.descriptor.series_label)
                .size(18.0)
                .strong(),
        );
        ui.add_space(4.0);

        let response = ui.add(
            egui::Image::new(SizedTexture::new(chart.texture().id(), chart.size()))
                .sense(egui::Sense::hover()),
        );

        if let Some(pointer) = response.hover_pos() {
            let local = pointer - response.rect.min;
            let tooltip = &rendered.descriptor.tooltip;
            if let Some(marker) = rendered.nearest_point(local.x, local.y, tooltip.mode, tooltip.intersect) {
                let centre = response.rect.min + egui::vec2(marker.x, marker.y);
                ui.painter()
                    .add(hover_marker(&rendered.descriptor.point, centre));
                let (title, body) = tooltip_text(rendered, marker.index);
                response.on_hover_ui_at_pointer(|ui| show_tooltip(ui, tooltip, &title, &body));
            }
        }

        ui.add_space(8.0);
        if let Some(summary) = &self.summary {
            Self::draw_summary_table(ui, summary);
        }
    }

    fn draw_summary_table(ui: &mut egui::Ui, summary: &SeriesSummary) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("balance_summary")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Months", "Opening", "Closing", "Change", "Min", "Max", "Mean", "Std"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        let change_color = if summary.change < 0.0 {
                            Color32::from_rgb(220, 53, 69)
                        } else {
                            Color32::from_rgb(40, 167, 69)
                        };
                        let change = match summary.change_pct {
                            Some(pct) => format!("{:+.2} ({:+.1}%)", summary.change, pct),
                            None => format!("{:+.2}", summary.change),
                        };

                        ui.label(RichText::new(summary.count.to_string()).size(11.0));
                        ui.label(RichText::new(format!("{:.2}", summary.opening)).size(11.0));
                        ui.label(RichText::new(format!("{:.2}", summary.closing)).size(11.0));
                        ui.label(RichText::new(change).size(11.0).color(change_color));
                        ui.label(RichText::new(format!("{:.2}", summary.min)).size(11.0));
                        ui.label(RichText::new(format!("{:.2}", summary.max)).size(11.0));
                        ui.label(RichText::new(format!("{:.2}", summary.mean)).size(11.0));
                        ui.label(RichText::new(format!("{:.2}", summary.std_dev)).size(11.0));
                        ui.end_row();
                    });
            });
    }
}

/// Tooltip title and body for the point at `index`.
/// Marker drawn over the hovered point.
fn hover_marker(point: &PointStyle, centre: egui::Pos2) -> CircleShape {
    CircleShape {
        center: centre,
        radius: point.hover_radius as f32,
        fill: point.hover_background.to_egui(),
        stroke: Stroke::new(point.hover_border_width as f32, point.border_color.to_egui()),
    }
}

fn tooltip_text(chart: &RenderedChart, index: usize) -> (String, String) {
    let d = &chart.descriptor;
    let title = d.label_at(index).unwrap_or_default().to_string();
    let value = d.points.get(index).copied().unwrap_or_default();
    (title, format!("{}: {:.2}", d.series_label, value))
}

fn show_tooltip(ui: &mut egui::Ui, config: &TooltipConfig, title: &str, body: &str) {
    egui::Frame::none()
        .fill(config.background.to_egui())
        .inner_margin(egui::Margin::symmetric(config.x_padding, config.body_spacing))
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.y = config.body_spacing;
            ui.label(RichText::new(title).strong().color(config.title_color.to_egui()));
            ui.label(RichText::new(body).color(config.body_color.to_egui()));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{BitmapChartRenderer, ChartOptions, RenderDescriptor};

    #[test]
    fn surface_leaves_room_for_summary() {
        let surface = ChartViewer::surface_for(egui::vec2(900.0, 600.0)).unwrap();
        assert_eq!((surface.width(), surface.height()), (900, 490));

        let tiny = ChartViewer::surface_for(egui::vec2(10.0, 10.0)).unwrap();
        assert_eq!((tiny.width(), tiny.height()), (320, 200));
    }

    #[test]
    fn tooltip_shows_label_and_balance() {
        let mut options = ChartOptions::default();
        options.x_axis.show_ticks = false;
        options.y_axis.show_ticks = false;
        let series = BalanceSeries::new(
            vec!["Jan 2024".into(), "Feb 2024".into()],
            vec![100.0, 112.5],
        )
        .unwrap();
        let descriptor = RenderDescriptor::line_chart(&series, &options);
        let chart = BitmapChartRenderer::new()
            .paint(&DrawingSurface::new(200, 120).unwrap(), &descriptor)
            .unwrap();

        let (title, body) = tooltip_text(&chart, 1);
        assert_eq!(title, "Feb 2024");
        assert_eq!(body, "Last 12 Month Balances: 112.50");
    }

    #[test]
    fn hover_marker_uses_hover_style() {
        let mut point = PointStyle::default();
        let marker = hover_marker(&point, egui::pos2(10.0, 20.0));
        assert_eq!(marker.center, egui::pos2(10.0, 20.0));
        assert_eq!(marker.radius, 4.0);
        assert_eq!(marker.stroke.width, 15.0);
        assert_eq!(marker.fill, point.hover_background.to_egui());

        point.hover_border_width = 2;
        point.hover_radius = 6;
        let marker = hover_marker(&point, egui::pos2(0.0, 0.0));
        assert_eq!((marker.radius, marker.stroke.width), (6.0, 2.0));
    }

    #[test]
    fn summary_follows_series() {
        let mut viewer = ChartViewer::new();
        let series = BalanceSeries::new(vec!["Jan".into()], vec![5.0]).unwrap();
        viewer.set_series(Some(&series));
        assert_eq!(viewer.summary.as_ref().map(|s| s.count), Some(1));

        viewer.set_series(Some(&BalanceSeries::empty()));
        assert!(viewer.summary.is_none());
    }
}
