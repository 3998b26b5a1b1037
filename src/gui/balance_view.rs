//! Balance Chart View
//! Bridges a balance history provider to a chart renderer.
//!
//! The fetch runs on a worker thread; the result comes back over a channel
//! and is rendered on whichever thread calls [`BalanceChartView::poll`] (the
//! UI thread in the app). The view owns at most one live chart handle and
//! always releases the old one before creating the next.

use crate::charts::{
    ChartOptions, ChartRenderer, DrawingSurface, RenderDescriptor, RenderError,
};
use crate::data::{AccountId, BalanceHistoryProvider, BalanceSeries, ProviderError};
use crate::diagnostics::DiagnosticSink;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

type FetchResult = Result<BalanceSeries, ProviderError>;

#[derive(Error, Debug, PartialEq)]
pub enum ViewError {
    #[error("Chart surface is not attached yet")]
    SurfaceNotAttached,
    #[error("Could not start balance fetch: {0}")]
    WorkerUnavailable(String),
}

/// What happened to a fetch once it settled.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    Rendered { account: AccountId, points: usize },
    FetchFailed { account: AccountId },
    RenderFailed { account: AccountId },
}

/// A fetch in flight.
struct PendingFetch {
    account: AccountId,
    cancelled: Arc<AtomicBool>,
    rx: Receiver<FetchResult>,
}

impl PendingFetch {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

pub struct BalanceChartView<R: ChartRenderer> {
    provider: Arc<dyn BalanceHistoryProvider>,
    renderer: R,
    sink: Box<dyn DiagnosticSink>,
    options: ChartOptions,
    surface: Option<DrawingSurface>,
    chart: Option<R::Handle>,
    series: Option<BalanceSeries>,
    pending: Option<PendingFetch>,
}

impl<R: ChartRenderer> BalanceChartView<R> {
    pub fn new(
        provider: Arc<dyn BalanceHistoryProvider>,
        renderer: R,
        sink: Box<dyn DiagnosticSink>,
        options: ChartOptions,
    ) -> Self {
        Self {
            provider,
            renderer,
            sink,
            options,
            surface: None,
            chart: None,
            series: None,
            pending: None,
        }
    }

    /// The visual element is attached; remember its surface.
    pub fn on_view_ready(&mut self, surface: DrawingSurface) {
        debug!(
            "Chart surface attached ({}x{})",
            surface.width(),
            surface.height()
        );
        self.surface = Some(surface);
    }

    /// Swap the surface and redraw the current series on it.
    pub fn resize(&mut self, surface: DrawingSurface) -> bool {
        if self.surface == Some(surface) {
            return false;
        }
        self.surface = Some(surface);
        self.rerender()
    }

    pub fn surface(&self) -> Option<&DrawingSurface> {
        self.surface.as_ref()
    }

    /// Use a different data source from the next load on.
    pub fn set_provider(&mut self, provider: Arc<dyn BalanceHistoryProvider>) {
        self.cancel_pending();
        self.provider = provider;
    }

    /// Start fetching `account`'s balances. Returns as soon as the request is
    /// issued; the chart is drawn by a later [`poll`](Self::poll) or
    /// [`wait`](Self::wait). A fetch still in flight is cancelled.
    pub fn load_and_render(&mut self, account: AccountId) -> Result<(), ViewError> {
        if self.surface.is_none() {
            return Err(ViewError::SurfaceNotAttached);
        }
        self.cancel_pending();

        let (tx, rx) = channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let provider = Arc::clone(&self.provider);
        let flag = Arc::clone(&cancelled);
        let worker_account = account.clone();

        info!(
            "Fetching last 12 month balances for {} from {}",
            account,
            provider.describe()
        );
        thread::Builder::new()
            .name("balance-fetch".to_string())
            .spawn(move || {
                let result = provider.fetch_last_12_month_balances(&worker_account);
                if flag.load(Ordering::Acquire) {
                    debug!("Dropping result of cancelled fetch for {}", worker_account);
                    return;
                }
                // The view may be gone already; nobody to tell then
                let _ = tx.send(result);
            })
            .map_err(|e| ViewError::WorkerUnavailable(e.to_string()))?;

        self.pending = Some(PendingFetch {
            account,
            cancelled,
            rx,
        });
        Ok(())
    }

    /// Render a finished fetch, if there is one. Never blocks.
    pub fn poll(&mut self) -> Option<LoadEvent> {
        let received = match self.pending.as_ref()?.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(worker_lost()),
        };
        let pending = self.pending.take()?;
        Some(self.settle(pending.account, received))
    }

    /// Like [`poll`](Self::poll) but waits up to `timeout` for the fetch.
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadEvent> {
        let received = match self.pending.as_ref()?.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => Err(worker_lost()),
        };
        let pending = self.pending.take()?;
        Some(self.settle(pending.account, received))
    }

    /// Draw the cached series again. Returns whether a new chart was made.
    pub fn rerender(&mut self) -> bool {
        let Some(series) = self.series.clone() else {
            return false;
        };
        match self.render(series) {
            Ok(_) => true,
            Err(e) => {
                self.sink.report("Rendering balance chart", &e);
                false
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The live chart, if one has been rendered.
    pub fn chart(&self) -> Option<&R::Handle> {
        self.chart.as_ref()
    }

    /// The series behind the live chart.
    pub fn series(&self) -> Option<&BalanceSeries> {
        self.series.as_ref()
    }

    /// Cancel any fetch in flight and release the chart.
    ///
    /// Cancelling only discards the result: the worker thread lives until the
    /// provider call returns, which the HTTP provider bounds with its
    /// request timeout.
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.chart = None;
        self.series = None;
        self.surface = None;
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Cancelling balance fetch for {}", pending.account);
            pending.cancel();
        }
    }

    fn settle(&mut self, account: AccountId, result: FetchResult) -> LoadEvent {
        match result {
            Ok(series) => match self.render(series) {
                Ok(points) => {
                    info!("Rendered {} balance points for {}", points, account);
                    LoadEvent::Rendered { account, points }
                }
                Err(e) => {
                    self.sink.report("Rendering balance chart", &e);
                    LoadEvent::RenderFailed { account }
                }
            },
            Err(e) => {
                self.sink
                    .report(&format!("Loading balances for {}", account), &e);
                LoadEvent::FetchFailed { account }
            }
        }
    }

    fn render(&mut self, series: BalanceSeries) -> Result<usize, RenderError> {
        let surface = self.surface.ok_or(RenderError::NoSurface)?;
        let descriptor = RenderDescriptor::line_chart(&series, &self.options);

        // Release the previous chart before creating its replacement
        drop(self.chart.take());
        self.series = None;

        let handle = self.renderer.render_line_chart(&surface, &descriptor)?;
        self.chart = Some(handle);
        self.series = Some(series);
        Ok(descriptor.len())
    }
}

impl<R: ChartRenderer> Drop for BalanceChartView<R> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

fn worker_lost() -> ProviderError {
    ProviderError::Network("fetch worker stopped without a result".to_string())
}
