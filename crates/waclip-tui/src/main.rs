mod actions;
mod app;
mod ui;

use std::fs;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use crate::actions::{execute_action, refresh, Action, Session};
use crate::app::App;
use waclip_config as config;
use waclip_monitor::{ActivityLog, SystemClipboard, SystemLauncher};

#[derive(Debug, Parser)]
#[command(name = "waclip-tui", version, about = "waclip TUI")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    /// Start monitoring right away, regardless of `monitor_enabled`
    #[arg(long)]
    start: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let config_path =
        config::resolve_config_path(args.config).with_context(|| "resolve config path")?;
    info!(path = %config_path.display(), "starting");

    let log = Arc::new(ActivityLog::default());
    let mut session = Session::open(config_path, log, SystemClipboard, SystemLauncher);

    let settings = session.monitor.settings();
    let mut app = App::new(&settings);
    if args.start || settings.monitor_enabled {
        app.enqueue(Action::StartMonitoring);
    }

    let result = {
        let mut terminal = TerminalGuard::new()?;
        run_app(&mut terminal, &mut session, &mut app)
    };
    session.monitor.shutdown();
    result
}

fn run_app(
    terminal: &mut TerminalGuard,
    session: &mut Session<SystemClipboard, SystemLauncher>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        while let Some(action) = app.next_action() {
            if let Err(err) = execute_action(app, session, action) {
                app.set_error(format!("{err:#}"));
            }
        }
        refresh(app, session);

        terminal.terminal_mut().draw(|frame| ui::draw(frame, app))?;

        if app.should_quit {
            break;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_secs(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// The terminal is taken over by the UI, so log lines go to a file only.
fn init_logging() -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let path = config::log_path().with_context(|| "resolve log path")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal();
            original_hook(info);
        }));

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
