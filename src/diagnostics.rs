//! Where swallowed errors end up.

use log::error;
use std::error::Error;

/// Receives errors the chart view handles internally instead of returning.
pub trait DiagnosticSink: Send {
    fn report(&self, context: &str, error: &dyn Error);
}

/// Writes every report to the `log` facade at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, context: &str, error: &dyn Error) {
        error!("{}: {}", context, error);
    }
}
