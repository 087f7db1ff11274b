use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::notify::console_notifier;
use crate::util::yes_no;
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::io::{self, BufRead};
use waclip_config::{is_valid_check_interval, Settings, MAX_CHECK_INTERVAL_SECS};
use waclip_monitor::{
    Activity, CycleOutcome, Monitor, OpenKind, SystemClipboard, SystemLauncher,
};

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Only react when the clipboard holds nothing but a number
    #[arg(long)]
    pub numbers_only: bool,
    /// Dispatch numbers that were already opened in this session
    #[arg(long)]
    pub allow_duplicates: bool,
    /// Try the desktop app before the web link
    #[arg(long)]
    pub app: bool,
    /// Log the chat link instead of opening it
    #[arg(long)]
    pub no_open: bool,
    /// Seconds between clipboard polls
    #[arg(long)]
    pub interval: Option<f64>,
    /// Run a single poll and exit
    #[arg(long)]
    pub once: bool,
    /// Ignore stdin and keep watching until killed
    #[arg(long)]
    pub no_input: bool,
}

impl WatchArgs {
    fn apply(&self, settings: &mut Settings) -> Result<()> {
        if self.numbers_only {
            settings.numbers_only_mode = true;
        }
        if self.allow_duplicates {
            settings.avoid_duplicates = false;
        }
        if self.app {
            settings.use_whatsapp_app = true;
        }
        if self.no_open {
            settings.auto_open_browser = false;
        }
        if let Some(interval) = self.interval {
            if !is_valid_check_interval(interval) {
                return Err(invalid_input(format!(
                    "interval must be between 0 and {MAX_CHECK_INTERVAL_SECS} seconds, got {interval}"
                )));
            }
            settings.check_interval = interval;
        }
        Ok(())
    }
}

/// A line typed on stdin while watching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Start,
    Stop,
    Status,
    Clear,
    Message(Option<String>),
    Save,
    Set { key: String, value: String },
    Help,
    Quit,
}

impl ControlCommand {
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let command = match verb.to_ascii_lowercase().as_str() {
            "start" => ControlCommand::Start,
            "stop" => ControlCommand::Stop,
            "status" => ControlCommand::Status,
            "clear" => ControlCommand::Clear,
            "message" | "msg" => {
                let message = (!rest.is_empty()).then(|| rest.to_string());
                ControlCommand::Message(message)
            }
            "save" => ControlCommand::Save,
            "set" => {
                let Some((key, value)) = rest.split_once(char::is_whitespace) else {
                    return Err("usage: set <key> <value>".to_string());
                };
                ControlCommand::Set {
                    key: key.to_string(),
                    value: value.trim().to_string(),
                }
            }
            "help" | "?" => ControlCommand::Help,
            "quit" | "exit" | "q" => ControlCommand::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(Some(command))
    }
}

const HELP: &str = "\
commands:
  start                 start monitoring
  stop                  stop monitoring
  status                show state and settings
  clear                 forget numbers already opened
  message [text]        use text for new chats (no text: back to the default)
  save                  store the current message as the default
  set <key> <value>     change a setting and save it
  quit                  stop and exit";

#[derive(Debug, Serialize)]
struct PollDto {
    outcome: &'static str,
    number: Option<String>,
    target: Option<String>,
    reason: Option<String>,
}

impl From<CycleOutcome> for PollDto {
    fn from(outcome: CycleOutcome) -> Self {
        let mut dto = PollDto {
            outcome: "",
            number: None,
            target: None,
            reason: None,
        };
        match outcome {
            CycleOutcome::Unchanged => dto.outcome = "unchanged",
            CycleOutcome::Blank => dto.outcome = "blank",
            CycleOutcome::NoNumber => dto.outcome = "no_number",
            CycleOutcome::SkippedExtraText => dto.outcome = "skipped_extra_text",
            CycleOutcome::SkippedDuplicate(number) => {
                dto.outcome = "skipped_duplicate";
                dto.number = Some(number);
            }
            CycleOutcome::Dispatched(opened) => {
                dto.outcome = match opened.kind {
                    OpenKind::App => "opened_app",
                    OpenKind::Browser => "opened_browser",
                    OpenKind::Surfaced => "generated_url",
                };
                dto.number = Some(opened.number);
                dto.target = Some(opened.target);
            }
            CycleOutcome::OpenFailed { number, reason } => {
                dto.outcome = "open_failed";
                dto.number = Some(number);
                dto.reason = Some(reason);
            }
        }
        dto
    }
}

type ConsoleMonitor = Monitor<SystemClipboard, SystemLauncher>;

pub fn watch(ctx: &Context<'_>, args: WatchArgs) -> Result<()> {
    let mut file_settings = ctx.settings_or_default();
    let mut settings = file_settings.clone();
    args.apply(&mut settings)?;

    let mut monitor = Monitor::new(
        settings,
        SystemClipboard,
        SystemLauncher,
        console_notifier(),
    );

    if args.once {
        let outcome = monitor.poll_once()?;
        if ctx.json {
            return print_json(&PollDto::from(outcome));
        }
        if matches!(outcome, CycleOutcome::NoNumber | CycleOutcome::Blank) {
            println!("no phone number on the clipboard");
        }
        return Ok(());
    }

    if monitor.settings().monitor_enabled {
        monitor.start()?;
    } else {
        println!("monitoring is off; type `start` to begin");
    }

    if args.no_input {
        if !monitor.is_running() {
            monitor.start()?;
        }
        return monitor.wait().with_context(|| "monitor worker");
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.with_context(|| "read stdin")?;
        let command = match ControlCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        if command == ControlCommand::Quit {
            break;
        }
        handle(ctx, &mut monitor, &mut file_settings, command)?;
    }

    monitor.shutdown();
    Ok(())
}

fn handle(
    ctx: &Context<'_>,
    monitor: &mut ConsoleMonitor,
    file_settings: &mut Settings,
    command: ControlCommand,
) -> Result<()> {
    match command {
        ControlCommand::Start => {
            if !monitor.start()? {
                println!("already monitoring");
            }
        }
        ControlCommand::Stop => {
            if !monitor.stop() {
                println!("not monitoring");
            }
        }
        ControlCommand::Status => print_status(monitor),
        ControlCommand::Clear => monitor.clear_duplicates(),
        ControlCommand::Message(message) => {
            let using_default = message.is_none();
            monitor.set_message_override(message);
            if using_default {
                println!("using the default message");
            } else {
                println!("message set for new chats");
            }
        }
        ControlCommand::Save => {
            let message = monitor.shared().message();
            file_settings.default_message = message.clone();
            match ctx.save_settings(file_settings) {
                Ok(()) => {
                    monitor.update_settings(|settings| settings.default_message = message);
                    monitor.set_message_override(None);
                    monitor.notify(Activity::MessageSaved);
                }
                Err(err) => monitor.notify(Activity::SettingsError {
                    reason: format!("{err:#}"),
                }),
            }
        }
        ControlCommand::Set { key, value } => {
            let mut live = monitor.settings();
            if let Err(err) = file_settings
                .set_value(&key, &value)
                .and_then(|()| live.set_value(&key, &value))
            {
                eprintln!("{err}");
                return Ok(());
            }
            monitor.update_settings(|settings| *settings = live);
            match ctx.save_settings(file_settings) {
                Ok(()) => monitor.notify(Activity::SettingsSaved),
                Err(err) => monitor.notify(Activity::SettingsError {
                    reason: format!("{err:#}"),
                }),
            }
        }
        ControlCommand::Help => println!("{HELP}"),
        ControlCommand::Quit => {}
    }
    Ok(())
}

fn print_status(monitor: &ConsoleMonitor) {
    let settings = monitor.settings();
    let state = if monitor.is_running() {
        "running"
    } else {
        "stopped"
    };
    println!("state: {state}");
    println!("interval: {:.1}s", settings.poll_interval().as_secs_f64());
    println!("numbers only: {}", yes_no(settings.numbers_only_mode));
    println!("avoid duplicates: {}", yes_no(settings.avoid_duplicates));
    println!("auto open: {}", yes_no(settings.auto_open_browser));
    println!("desktop app: {}", yes_no(settings.use_whatsapp_app));
    println!("numbers seen: {}", monitor.seen_count());
    println!("message: {}", monitor.shared().message());
}
