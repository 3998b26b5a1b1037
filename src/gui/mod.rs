//! GUI module - chart view and user interface components

mod app;
mod balance_view;
mod chart_viewer;
mod control_panel;
mod texture;

pub use app::BalanceDashboardApp;
pub use balance_view::{BalanceChartView, LoadEvent};
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
