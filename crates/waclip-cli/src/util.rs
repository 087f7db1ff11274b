use anyhow::{Context as _, Result};
use std::io::{self, Read};
use std::path::Path;
use tracing::warn;
use waclip_config::{self as config, Settings};

use crate::error::invalid_input;

/// Text from the argument, or stdin when absent or `-`.
pub fn read_input(text: Option<String>) -> Result<String> {
    match text {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .with_context(|| "read stdin")?;
            if buffer.trim().is_empty() {
                return Err(invalid_input("no text given"));
            }
            Ok(buffer)
        }
    }
}

/// Loads settings, falling back to the defaults when the file is unreadable.
pub fn load_settings_lenient(path: &Path) -> Settings {
    match config::load_at_path(path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "settings unavailable, using defaults");
            Settings::default()
        }
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
