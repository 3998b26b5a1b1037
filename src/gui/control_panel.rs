//! Control Panel Widget
//! Left side panel with account selection, data source and export controls.

use egui::{Color32, RichText};
use std::path::PathBuf;

/// Where balances are read from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceChoice {
    Api,
    Csv(Option<PathBuf>),
}

/// Left side control panel.
pub struct ControlPanel {
    pub account: String,
    pub source: SourceChoice,
    pub api_base_url: String,
    pub status: String,
    pub loading: bool,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(account: String, api_base_url: String, csv: Option<PathBuf>) -> Self {
        let source = match csv {
            Some(path) => SourceChoice::Csv(Some(path)),
            None => SourceChoice::Api,
        };
        Self {
            account,
            source,
            api_base_url,
            status: "Ready".to_string(),
            loading: false,
            export_enabled: false,
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Reload needs an account and a source to read it from.
    pub fn can_reload(&self) -> bool {
        !self.loading
            && !self.account.trim().is_empty()
            && self.source != SourceChoice::Csv(None)
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Balance Chart")
                    .size(22.0)
                    .color(Color32::from_rgb(236, 37, 13)),
            );
            ui.label(
                RichText::new("Trailing twelve months")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Account =====
        ui.label(RichText::new("Account").size(14.0).strong());
        ui.add_space(5.0);
        let field = ui.add(
            egui::TextEdit::singleline(&mut self.account)
                .hint_text("Account id")
                .desired_width(f32::INFINITY),
        );
        if field.lost_focus()
            && ui.input(|i| i.key_pressed(egui::Key::Enter))
            && self.can_reload()
        {
            action = ControlPanelAction::Reload;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source =====
        ui.label(RichText::new("Data Source").size(14.0).strong());
        ui.add_space(5.0);

        let mut use_api = self.source == SourceChoice::Api;
        ui.horizontal(|ui| {
            let api = ui.radio_value(&mut use_api, true, "Balance API");
            let csv = ui.radio_value(&mut use_api, false, "CSV File");
            if api.changed() || csv.changed() {
                action = ControlPanelAction::SourceChanged;
            }
        });

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                if use_api {
                    if !matches!(self.source, SourceChoice::Api) {
                        self.source = SourceChoice::Api;
                    }
                    ui.label(RichText::new(&self.api_base_url).size(12.0).color(Color32::GRAY));
                    return;
                }
                if self.source == SourceChoice::Api {
                    self.source = SourceChoice::Csv(None);
                }
                ui.horizontal(|ui| {
                    let path_text = match &self.source {
                        SourceChoice::Csv(Some(path)) => path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| path.display().to_string()),
                        _ => "No file selected".to_string(),
                    };
                    ui.label(RichText::new(path_text).size(12.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.can_reload(), |ui| {
                let button = egui::Button::new(RichText::new("Reload").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_enabled, |ui| {
                let export = egui::Button::new(RichText::new("Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(export).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        ui.label(RichText::new("Status").size(14.0).strong());
        ui.add_space(5.0);
        if self.loading {
            ui.add(egui::Spinner::new());
        }
        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Reload,
    SourceChanged,
    BrowseCsv,
    ExportPng,
}
