mod commands;
mod error;
mod notify;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::debug;

use crate::commands::{check, completions, config as config_cmd, open, tui, watch, Context};
use crate::error::{exit_code_for, report_error};
use waclip_config as config;

#[derive(Debug, Parser)]
#[command(name = "waclip", version, about = "waclip CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Append log lines to this file as well as stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Watch the clipboard and open chats for copied phone numbers
    Watch(watch::WatchArgs),
    /// Report how a piece of text would be detected
    Check(check::CheckArgs),
    /// Print the chat links for the number found in a piece of text
    Link(check::LinkArgs),
    /// Open a chat for the number found in a piece of text
    Open(open::OpenArgs),
    #[command(subcommand)]
    Config(config_cmd::ConfigCommand),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    Tui(tui::TuiArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    if let Err(err) = init_logging(verbose, cli.log_file.as_deref()) {
        report_error(&err, verbose);
        return exit_code_for(&err);
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        log_file: _,
        command,
    } = cli;

    match command {
        Command::Tui(args) => tui::launch(config_path, args, verbose),
        Command::Completions(args) => completions::emit(args),
        command => {
            let resolved =
                config::resolve_config_path(config_path).with_context(|| "resolve config path")?;
            if verbose {
                if resolved.exists() {
                    debug!(path = %resolved.display(), "config resolved");
                } else {
                    debug!(path = %resolved.display(), "config missing, using defaults");
                }
            }

            let ctx = Context {
                config_path: &resolved,
                json,
            };

            match command {
                Command::Watch(args) => watch::watch(&ctx, args),
                Command::Check(args) => check::check(&ctx, args),
                Command::Link(args) => check::link(&ctx, args),
                Command::Open(args) => open::open(&ctx, args),
                Command::Config(cmd) => match cmd {
                    config_cmd::ConfigCommand::Show(args) => config_cmd::show(&ctx, args),
                    config_cmd::ConfigCommand::Path(args) => config_cmd::path(&ctx, args),
                    config_cmd::ConfigCommand::Set(args) => config_cmd::set(&ctx, args),
                    config_cmd::ConfigCommand::Reset(args) => config_cmd::reset(&ctx, args),
                },
                Command::Tui(_) => unreachable!("tui command handled before config resolution"),
                Command::Completions(_) => {
                    unreachable!("completions command handled before config resolution")
                }
            }
        }
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("create log directory {}", parent.display()))?;
                }
            }
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init();
    Ok(())
}
