use anyhow::{Context as _, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use waclip_config::Settings;

use crate::util::load_settings_lenient;

pub mod check;
pub mod completions;
pub mod config;
pub mod open;
pub mod tui;
pub mod watch;

pub struct Context<'a> {
    pub config_path: &'a Path,
    pub json: bool,
}

impl Context<'_> {
    pub fn settings(&self) -> Result<Settings> {
        waclip_config::load_at_path(self.config_path)
            .with_context(|| format!("load settings {}", self.config_path.display()))
    }

    pub fn settings_or_default(&self) -> Settings {
        load_settings_lenient(self.config_path)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        waclip_config::save(self.config_path, settings)
            .with_context(|| format!("save settings {}", self.config_path.display()))
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
