pub mod activity;
pub mod clipboard;
pub mod error;
pub mod launcher;
pub mod monitor;
pub mod opener;

pub use activity::{Activity, ActivityLine, ActivityLog, Notifier, Notifiers};
pub use clipboard::{ClipboardSource, SystemClipboard};
pub use error::{MonitorError, Result};
pub use launcher::{Launcher, SystemLauncher};
pub use monitor::{run_cycle, CycleOutcome, Monitor, MonitorShared, MonitorState};
pub use opener::{open_chat, OpenKind, OpenOptions, OpenOutcome};
