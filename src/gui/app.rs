//! Balance Chart Main Application
//! Main window with control panel and chart viewer.

use crate::charts::registry;
use crate::config::AppConfig;
use crate::data::{
    AccountId, BalanceHistoryProvider, CsvBalanceProvider, HttpBalanceProvider,
};
use crate::diagnostics::LogSink;
use crate::gui::balance_view::{BalanceChartView, LoadEvent};
use crate::gui::control_panel::SourceChoice;
use crate::gui::texture::EguiChartRenderer;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use log::warn;
use std::sync::Arc;

/// Main application window.
pub struct BalanceDashboardApp {
    config: AppConfig,
    view: BalanceChartView<EguiChartRenderer>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl BalanceDashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        provider: Arc<dyn BalanceHistoryProvider>,
    ) -> Self {
        let view = BalanceChartView::new(
            provider,
            EguiChartRenderer::new(cc.egui_ctx.clone()),
            Box::new(LogSink),
            registry::options().clone(),
        );
        let control_panel = ControlPanel::new(
            config.account_id.clone(),
            config.api_base_url.clone(),
            config.csv_source.clone(),
        );
        Self {
            config,
            view,
            control_panel,
            chart_viewer: ChartViewer::new(),
        }
    }

    /// Fetch the account currently typed into the control panel.
    fn reload(&mut self) {
        let account = AccountId::new(self.control_panel.account.trim());
        match self.view.load_and_render(account.clone()) {
            Ok(()) => {
                self.control_panel.loading = true;
                self.control_panel
                    .set_status(format!("Loading balances for {}...", account));
            }
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }

    /// Point the view at the source picked in the control panel.
    fn handle_source_changed(&mut self) {
        let provider: Arc<dyn BalanceHistoryProvider> = match &self.control_panel.source {
            SourceChoice::Api => match HttpBalanceProvider::new(
                &self.config.api_base_url,
                self.config.request_timeout(),
            ) {
                Ok(provider) => Arc::new(provider),
                Err(e) => {
                    self.control_panel.set_status(format!("Error: {}", e));
                    return;
                }
            },
            SourceChoice::Csv(Some(path)) => Arc::new(CsvBalanceProvider::new(path.clone())),
            SourceChoice::Csv(None) => {
                self.control_panel.set_status("Pick a CSV file to load balances");
                return;
            }
        };
        self.view.set_provider(provider);
        self.control_panel.loading = false;
        self.reload();
    }

    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.source = SourceChoice::Csv(Some(path));
            self.handle_source_changed();
        }
    }

    fn handle_export_png(&mut self) {
        let Some(chart) = self.view.chart() else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("balances.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match chart.chart().save_png(&output_path) {
            Ok(()) => self
                .control_panel
                .set_status(format!("Exported {}", output_path.display())),
            Err(e) => {
                warn!("PNG export failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Render a finished fetch, if any.
    fn check_load_results(&mut self) {
        if let Some(event) = self.view.poll() {
            self.control_panel.loading = false;
            match event {
                LoadEvent::Rendered { account, points } => {
                    self.chart_viewer.set_series(self.view.series());
                    self.control_panel
                        .set_status(format!("Loaded {} months for {}", points, account));
                }
                LoadEvent::FetchFailed { account } => {
                    self.control_panel
                        .set_status(format!("Error: could not load balances for {}", account));
                }
                LoadEvent::RenderFailed { .. } => {
                    self.chart_viewer.clear();
                    self.control_panel
                        .set_status("Error: the chart could not be drawn");
                }
            }
        }
        self.control_panel.export_enabled = self.view.chart().is_some();
    }
}

impl eframe::App for BalanceDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Keep polling while a fetch is outstanding
        if self.view.is_loading() {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Reload => self.reload(),
                        ControlPanelAction::SourceChanged => self.handle_source_changed(),
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(surface) = ChartViewer::surface_for(ui.available_size()) {
                if self.view.surface().is_none() {
                    // First frame: the chart area exists now
                    self.view.on_view_ready(surface);
                    self.reload();
                } else if self.view.resize(surface) {
                    self.chart_viewer.set_series(self.view.series());
                }
            }
            self.chart_viewer
                .show(ui, self.view.chart(), self.view.is_loading());
        });
    }
}
