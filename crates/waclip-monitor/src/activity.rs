//! Human-readable notifications emitted by the dispatch loop and the
//! control surfaces, plus the sinks that receive them.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};

pub const DEFAULT_SCROLLBACK: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    MonitorStarted,
    MonitorStopped,
    Detected { number: String },
    SkippedDuplicate { number: String },
    SkippedExtraText,
    OpenedApp { number: String },
    OpenedWeb { number: String },
    GeneratedUrl { number: String, url: String },
    AppFallback { number: String, reason: String },
    OpenFailed { number: String, reason: String },
    CycleFailed { reason: String },
    DuplicatesCleared,
    MessageSaved,
    SettingsSaved,
    SettingsError { reason: String },
    Note(String),
}

impl Activity {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Activity::AppFallback { .. }
                | Activity::OpenFailed { .. }
                | Activity::CycleFailed { .. }
                | Activity::SettingsError { .. }
        )
    }

    /// Mirrors the activity into the structured log.
    pub fn trace(&self) {
        match self {
            Activity::Detected { number } => tracing::info!(%number, "phone number detected"),
            Activity::SkippedDuplicate { number } => {
                tracing::info!(%number, "skipped duplicate number")
            }
            Activity::OpenedApp { number } => tracing::info!(%number, "opened desktop app"),
            Activity::OpenedWeb { number } => tracing::info!(%number, "opened browser"),
            Activity::GeneratedUrl { number, url } => {
                tracing::info!(%number, %url, "generated chat url")
            }
            Activity::AppFallback { number, reason } => {
                tracing::warn!(%number, %reason, "desktop app failed, using web")
            }
            Activity::OpenFailed { number, reason } => {
                tracing::warn!(%number, %reason, "open failed")
            }
            Activity::CycleFailed { reason } => tracing::warn!(%reason, "poll cycle failed"),
            Activity::SettingsError { reason } => tracing::warn!(%reason, "settings error"),
            other => tracing::info!("{other}"),
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activity::MonitorStarted => write!(f, "Started clipboard monitoring"),
            Activity::MonitorStopped => write!(f, "Clipboard monitoring stopped"),
            Activity::Detected { number } => write!(f, "Detected: {number}"),
            Activity::SkippedDuplicate { number } => write!(f, "Skipping duplicate: {number}"),
            Activity::SkippedExtraText => {
                write!(f, "Skipped: clipboard has extra text (numbers only mode)")
            }
            Activity::OpenedApp { number } => {
                write!(f, "Opened WhatsApp desktop app for {number}")
            }
            Activity::OpenedWeb { number } => write!(f, "Opened WhatsApp for {number}"),
            Activity::GeneratedUrl { number, url } => {
                write!(f, "Generated URL for {number}: {url}")
            }
            Activity::AppFallback { number, reason } => {
                write!(f, "Desktop app unavailable for {number} ({reason}), using web")
            }
            Activity::OpenFailed { number, reason } => {
                write!(f, "Error opening WhatsApp for {number}: {reason}")
            }
            Activity::CycleFailed { reason } => write!(f, "Error in clipboard monitoring: {reason}"),
            Activity::DuplicatesCleared => write!(f, "Duplicate detection cleared"),
            Activity::MessageSaved => write!(f, "Default message saved"),
            Activity::SettingsSaved => write!(f, "Settings saved"),
            Activity::SettingsError { reason } => write!(f, "Settings error: {reason}"),
            Activity::Note(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityLine {
    pub at: DateTime<Local>,
    pub activity: Activity,
}

impl ActivityLine {
    pub fn now(activity: Activity) -> Self {
        Self {
            at: Local::now(),
            activity,
        }
    }
}

impl fmt::Display for ActivityLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.activity)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, line: &ActivityLine);
}

/// Bounded in-memory scrollback; the oldest lines are dropped first.
#[derive(Debug)]
pub struct ActivityLog {
    capacity: usize,
    lines: Mutex<VecDeque<ActivityLine>>,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lines: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, line: ActivityLine) {
        let mut lines = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn record(&self, activity: Activity) {
        self.push(ActivityLine::now(activity));
    }

    pub fn lines(&self) -> Vec<ActivityLine> {
        match self.lines.lock() {
            Ok(guard) => guard.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self.lines.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLLBACK)
    }
}

impl Notifier for ActivityLog {
    fn notify(&self, line: &ActivityLine) {
        self.push(line.clone());
    }
}

/// Fans a line out to several sinks in order.
#[derive(Clone, Default)]
pub struct Notifiers {
    sinks: Vec<Arc<dyn Notifier>>,
}

impl Notifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn Notifier>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl Notifier for Notifiers {
    fn notify(&self, line: &ActivityLine) {
        for sink in &self.sinks {
            sink.notify(line);
        }
    }
}

#[cfg(feature = "desktop-notify")]
pub struct DesktopNotifier;

#[cfg(feature = "desktop-notify")]
impl Notifier for DesktopNotifier {
    fn notify(&self, line: &ActivityLine) {
        let Activity::Detected { number } = &line.activity else {
            return;
        };
        if let Err(err) = notify_rust::Notification::new()
            .summary("waclip")
            .body(&format!("Opening chat with {number}"))
            .show()
        {
            tracing::warn!(error = %err, "desktop notification failed");
        }
    }
}
