//! Best-effort completion side effects.
//!
//! The controller calls every registered [`CompletionSink`] once per
//! natural completion, after the new state has been committed. Sinks return
//! nothing: whatever goes wrong inside one (no audio device, a closed
//! terminal, notifications denied) is logged and swallowed there.
//! Implementations must not block.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const COMPLETION_TITLE: &str = "Timer Complete! 🎉";
pub const COMPLETION_BODY: &str = "Great job! Time for a break.";

/// Fixed payload of the "session completed" signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub title: String,
    pub body: String,
}

impl Default for CompletionNotice {
    fn default() -> Self {
        Self {
            title: COMPLETION_TITLE.into(),
            body: COMPLETION_BODY.into(),
        }
    }
}

pub trait CompletionSink: Send {
    fn session_completed(&self, notice: &CompletionNotice);
}

/// Ordered fan-out over every registered sink.
#[derive(Default)]
pub struct Sinks {
    sinks: Vec<Box<dyn CompletionSink>>,
}

impl Sinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: impl CompletionSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn notify_all(&self, notice: &CompletionNotice) {
        for sink in &self.sinks {
            sink.session_completed(notice);
        }
    }
}

impl fmt::Debug for Sinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sinks").field("len", &self.sinks.len()).finish()
    }
}

/// Rings the terminal bell (`BEL`) as the completion chime.
pub struct TerminalBell<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> CompletionSink for TerminalBell<W> {
    fn session_completed(&self, _notice: &CompletionNotice) {
        let Ok(mut out) = self.out.lock() else {
            warn!("terminal bell writer poisoned, skipping chime");
            return;
        };
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!(error = %e, "failed to ring terminal bell");
        }
    }
}

/// Prints the notice as a single line, the terminal stand-in for a desktop
/// notification.
pub struct TerminalNotifier<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> CompletionSink for TerminalNotifier<W> {
    fn session_completed(&self, notice: &CompletionNotice) {
        let Ok(mut out) = self.out.lock() else {
            warn!("notifier writer poisoned, skipping notification");
            return;
        };
        if let Err(e) = writeln!(out, "{} {}", notice.title, notice.body) {
            warn!(error = %e, "failed to write completion notice");
        }
    }
}

/// Records the notice through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl CompletionSink for LogSink {
    fn session_completed(&self, notice: &CompletionNotice) {
        info!(title = %notice.title, body = %notice.body, "session completed");
    }
}

/// Keeps every notice in memory; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    notices: Arc<Mutex<Vec<CompletionNotice>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<CompletionNotice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.notices.lock().map(|n| n.len()).unwrap_or(0)
    }
}

impl CompletionSink for MemorySink {
    fn session_completed(&self, notice: &CompletionNotice) {
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice.clone()),
            Err(_) => warn!("memory sink poisoned, dropping notice"),
        }
    }
}
