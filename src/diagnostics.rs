//! Sink for debug output of the relocation searches.
//!
//! The fallback search buffers one line per candidate cell and flushes the
//! buffer once per region it visits. Flushed lines and one-off messages are
//! forwarded to `log` and kept until the caller takes them. Whether anything
//! is collected at all is decided by the caller through `Settings::debug`.

use crate::location::*;
use log::*;

#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    pending: Vec<String>,
    flushed: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer the verdict for a candidate cell.
    pub fn record_cell(&mut self, loc: Location, verdict: impl std::fmt::Display) {
        self.pending
            .push(format!("({}, {}): {}", loc.x(), loc.y(), verdict));
    }

    /// Emit a single line immediately.
    pub fn message(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.flushed.push(message);
    }

    /// Emit all buffered lines.
    pub fn flush(&mut self) {
        for line in self.pending.drain(..) {
            info!("{}", line);
            self.flushed.push(line);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.flushed
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Hand over the emitted lines, leaving the sink empty for the next decision.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flushed)
    }
}
