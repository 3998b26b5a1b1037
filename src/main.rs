//! Balance Chart - trailing twelve-month account balance viewer
//!
//! Fetches an account's monthly balances from the banking API (or a CSV
//! export) and draws them as a gradient-filled line chart. Runs as a desktop
//! app, or headless with `--export` to write the chart straight to PNG.

mod charts;
mod config;
mod data;
mod diagnostics;
mod gui;
mod stats;

use anyhow::{bail, Context, Result};
use charts::{registry, BitmapChartRenderer, DrawingSurface};
use clap::Parser;
use config::AppConfig;
use data::{AccountId, BalanceHistoryProvider};
use diagnostics::LogSink;
use eframe::egui;
use gui::{BalanceChartView, BalanceDashboardApp, LoadEvent};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Extra time a headless export waits on top of the request timeout.
const EXPORT_GRACE: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "balance_chart", version, about = "Trailing twelve-month account balance chart")]
struct Cli {
    /// JSON config file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Account to chart
    #[arg(short = 'a', long = "account")]
    account: Option<String>,

    /// Read balances from a CSV file (account_id,label,figure) instead of the API
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Render once and write the chart to this PNG instead of opening a window
    #[arg(short = 'o', long = "export")]
    export: Option<PathBuf>,

    #[arg(long = "width")]
    width: Option<u32>,

    #[arg(long = "height")]
    height: Option<u32>,

    /// Per-request timeout for the balance API, at least 1
    #[arg(long = "timeout-secs")]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(account) = &self.account {
            config.account_id = account.clone();
        }
        if let Some(csv) = &self.csv {
            config.csv_source = Some(csv.clone());
        }
        if let Some(width) = self.width {
            config.surface_width = width;
        }
        if let Some(height) = self.height {
            config.surface_height = height;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env();
    cli.apply(&mut config);
    config.validate()?;

    registry::register(config.chart.clone())?;
    let provider = config.build_provider()?;
    info!("Balance source: {}", provider.describe());

    match &cli.export {
        Some(path) => export_png(&config, provider, path),
        None => run_gui(config, provider),
    }
}

fn run_gui(config: AppConfig, provider: Arc<dyn BalanceHistoryProvider>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 720.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Balance Chart"),
        ..Default::default()
    };

    eframe::run_native(
        "Balance Chart",
        options,
        Box::new(move |cc| Ok(Box::new(BalanceDashboardApp::new(cc, config, provider)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}

/// Fetch, render and save without opening a window.
fn export_png(
    config: &AppConfig,
    provider: Arc<dyn BalanceHistoryProvider>,
    path: &Path,
) -> Result<()> {
    let surface = DrawingSurface::new(config.surface_width, config.surface_height)?;
    let mut view = BalanceChartView::new(
        provider,
        BitmapChartRenderer::new(),
        Box::new(LogSink),
        registry::options().clone(),
    );
    view.on_view_ready(surface);
    view.load_and_render(AccountId::new(config.account_id.as_str()))?;

    let wait = config.request_timeout() + EXPORT_GRACE;
    match view.wait(wait) {
        Some(LoadEvent::Rendered { .. }) => {}
        Some(LoadEvent::FetchFailed { account }) => {
            bail!("Could not load balances for {}", account)
        }
        Some(LoadEvent::RenderFailed { account }) => {
            bail!("Could not draw the balance chart for {}", account)
        }
        None => bail!("No balances after {:?}", wait),
    }

    let chart = view.chart().context("No chart was rendered")?;
    chart
        .save_png(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
