use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::warn;
use waclip_config::{
    self as config, Settings, MAX_CHECK_INTERVAL_SECS, MIN_CHECK_INTERVAL_SECS,
};
use waclip_monitor::{
    Activity, ActivityLog, ClipboardSource, Launcher, Monitor, Notifier, Notifiers,
};

use crate::app::{App, LogEntry};

const INSTRUCTIONS: [&str; 4] = [
    "Press 's' to start watching the clipboard",
    "Copy any phone number to your clipboard",
    "WhatsApp opens automatically with your message",
    "Press 'e' to change the message, Enter to save it",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    NumbersOnly,
    AvoidDuplicates,
    AutoOpen,
    DesktopApp,
    AutoStart,
}

impl SettingToggle {
    pub const ALL: [SettingToggle; 5] = [
        SettingToggle::NumbersOnly,
        SettingToggle::AvoidDuplicates,
        SettingToggle::AutoOpen,
        SettingToggle::DesktopApp,
        SettingToggle::AutoStart,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingToggle::NumbersOnly => "Numbers only",
            SettingToggle::AvoidDuplicates => "Avoid duplicates",
            SettingToggle::AutoOpen => "Auto-open browser",
            SettingToggle::DesktopApp => "Use desktop app",
            SettingToggle::AutoStart => "Start on launch",
        }
    }

    pub fn get(self, settings: &Settings) -> bool {
        match self {
            SettingToggle::NumbersOnly => settings.numbers_only_mode,
            SettingToggle::AvoidDuplicates => settings.avoid_duplicates,
            SettingToggle::AutoOpen => settings.auto_open_browser,
            SettingToggle::DesktopApp => settings.use_whatsapp_app,
            SettingToggle::AutoStart => settings.monitor_enabled,
        }
    }

    pub fn set(self, settings: &mut Settings, value: bool) {
        match self {
            SettingToggle::NumbersOnly => settings.numbers_only_mode = value,
            SettingToggle::AvoidDuplicates => settings.avoid_duplicates = value,
            SettingToggle::AutoOpen => settings.auto_open_browser = value,
            SettingToggle::DesktopApp => settings.use_whatsapp_app = value,
            SettingToggle::AutoStart => settings.monitor_enabled = value,
        }
    }
}

pub const INTERVAL_STEP_SECS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StartMonitoring,
    StopMonitoring,
    ClearDuplicates,
    UseMessage(String),
    SaveMessage(String),
    Toggle(SettingToggle),
    AdjustInterval(f64),
}

/// Everything the control surface drives: the monitor, its scrollback and
/// the settings as they are on disk.
pub struct Session<C, L> {
    pub monitor: Monitor<C, L>,
    pub log: Arc<ActivityLog>,
    config_path: PathBuf,
    file_settings: Settings,
}

impl<C, L> Session<C, L>
where
    C: ClipboardSource + Send + 'static,
    L: Launcher + Send + Sync + 'static,
{
    /// Loads settings from `config_path`; an unreadable file is reported in
    /// the activity log and replaced by defaults.
    pub fn open(config_path: PathBuf, log: Arc<ActivityLog>, clipboard: C, launcher: L) -> Self {
        let notifiers = Notifiers::new().with(Arc::clone(&log) as Arc<dyn Notifier>);
        #[cfg(feature = "desktop-notify")]
        let notifiers = notifiers.with(Arc::new(waclip_monitor::activity::DesktopNotifier));

        for line in INSTRUCTIONS {
            log.record(Activity::Note(line.to_string()));
        }

        let file_settings = match config::load_at_path(&config_path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "settings unavailable, using defaults");
                log.record(Activity::SettingsError {
                    reason: err.to_string(),
                });
                Settings::default()
            }
        };

        let monitor = Monitor::new(
            file_settings.clone(),
            clipboard,
            launcher,
            Arc::new(notifiers),
        );
        Self {
            monitor,
            log,
            config_path,
            file_settings,
        }
    }

    fn persist(&self, saved: Activity) -> Result<()> {
        match config::save(&self.config_path, &self.file_settings) {
            Ok(()) => {
                self.monitor.notify(saved);
                Ok(())
            }
            Err(err) => {
                self.monitor.notify(Activity::SettingsError {
                    reason: err.to_string(),
                });
                Err(err).with_context(|| format!("save settings {}", self.config_path.display()))
            }
        }
    }
}

pub fn execute_action<C, L>(app: &mut App, session: &mut Session<C, L>, action: Action) -> Result<()>
where
    C: ClipboardSource + Send + 'static,
    L: Launcher + Send + Sync + 'static,
{
    match action {
        Action::StartMonitoring => {
            if session.monitor.start()? {
                app.set_status("Running");
            }
            app.clear_error();
        }
        Action::StopMonitoring => {
            if session.monitor.stop() {
                app.set_status("Stopped");
            }
            app.clear_error();
        }
        Action::ClearDuplicates => session.monitor.clear_duplicates(),
        Action::UseMessage(message) => session.monitor.set_message_override(Some(message)),
        Action::SaveMessage(message) => {
            let message = message.trim().to_string();
            if message.is_empty() {
                app.set_error("message is empty");
                return Ok(());
            }
            session.file_settings.default_message = message.clone();
            session.persist(Activity::MessageSaved)?;
            session
                .monitor
                .update_settings(|settings| settings.default_message = message.clone());
            session.monitor.set_message_override(None);
            app.message = message.clone();
            app.saved_message = message;
            app.clear_error();
        }
        Action::Toggle(toggle) => {
            let value = !toggle.get(&session.monitor.settings());
            toggle.set(&mut session.file_settings, value);
            session
                .monitor
                .update_settings(|settings| toggle.set(settings, value));
            session.persist(Activity::SettingsSaved)?;
            app.clear_error();
        }
        Action::AdjustInterval(delta) => {
            let current = session.monitor.settings().poll_interval().as_secs_f64();
            let next = ((current + delta) * 10.0).round() / 10.0;
            let next = next.clamp(
                INTERVAL_STEP_SECS.max(MIN_CHECK_INTERVAL_SECS),
                MAX_CHECK_INTERVAL_SECS,
            );
            session.file_settings.check_interval = next;
            session
                .monitor
                .update_settings(|settings| settings.check_interval = next);
            session.persist(Activity::SettingsSaved)?;
            app.clear_error();
        }
    }

    Ok(())
}

/// Copies monitor state and the scrollback into the view.
pub fn refresh<C, L>(app: &mut App, session: &Session<C, L>)
where
    C: ClipboardSource + Send + 'static,
    L: Launcher + Send + Sync + 'static,
{
    app.running = session.monitor.is_running();
    app.seen_count = session.monitor.seen_count();
    app.settings = session.monitor.settings();
    app.log = session
        .log
        .lines()
        .into_iter()
        .map(|line| LogEntry {
            failure: line.activity.is_failure(),
            text: line.to_string(),
        })
        .collect();
}
