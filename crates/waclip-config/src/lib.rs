use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const APP_DIR: &str = "waclip";
const CONFIG_FILENAME: &str = "config.json";
const LOG_FILENAME: &str = "waclip.log";

pub const DEFAULT_MESSAGE: &str = "Hello! I got your number and wanted to reach out.";
pub const DEFAULT_CHECK_INTERVAL_SECS: f64 = 1.0;
pub const MIN_CHECK_INTERVAL_SECS: f64 = 0.1;
pub const MAX_CHECK_INTERVAL_SECS: f64 = 3600.0;

pub const KEYS: [&str; 7] = [
    "default_message",
    "monitor_enabled",
    "check_interval",
    "avoid_duplicates",
    "auto_open_browser",
    "numbers_only_mode",
    "use_whatsapp_app",
];

/// Flat settings document. Keys the program does not know about are kept
/// in `extra` and written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_message: String,
    pub monitor_enabled: bool,
    pub check_interval: f64,
    pub avoid_duplicates: bool,
    pub auto_open_browser: bool,
    pub numbers_only_mode: bool,
    pub use_whatsapp_app: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_message: DEFAULT_MESSAGE.to_string(),
            monitor_enabled: true,
            check_interval: DEFAULT_CHECK_INTERVAL_SECS,
            avoid_duplicates: true,
            auto_open_browser: true,
            numbers_only_mode: false,
            use_whatsapp_app: false,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("unknown settings key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl Settings {
    /// Interval between clipboard polls. Non-finite or non-positive values
    /// fall back to the default; the rest is clamped to
    /// `MIN_CHECK_INTERVAL_SECS..=MAX_CHECK_INTERVAL_SECS`.
    pub fn poll_interval(&self) -> Duration {
        let secs = self.check_interval;
        let secs = if !secs.is_finite() || secs <= 0.0 {
            DEFAULT_CHECK_INTERVAL_SECS
        } else {
            secs.clamp(MIN_CHECK_INTERVAL_SECS, MAX_CHECK_INTERVAL_SECS)
        };
        Duration::try_from_secs_f64(secs)
            .unwrap_or(Duration::from_secs_f64(DEFAULT_CHECK_INTERVAL_SECS))
    }

    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<()> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        };
        match key {
            "default_message" => self.default_message = raw.to_string(),
            "check_interval" => {
                let secs: f64 = raw.trim().parse().map_err(|_| invalid())?;
                if !is_valid_check_interval(secs) {
                    return Err(invalid());
                }
                self.check_interval = secs;
            }
            "monitor_enabled" => self.monitor_enabled = parse_flag(raw).ok_or_else(invalid)?,
            "avoid_duplicates" => self.avoid_duplicates = parse_flag(raw).ok_or_else(invalid)?,
            "auto_open_browser" => self.auto_open_browser = parse_flag(raw).ok_or_else(invalid)?,
            "numbers_only_mode" => self.numbers_only_mode = parse_flag(raw).ok_or_else(invalid)?,
            "use_whatsapp_app" => self.use_whatsapp_app = parse_flag(raw).ok_or_else(invalid)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(ConfigError::Serialize)
    }
}

/// Accepted range for a user-supplied `check_interval`, in seconds.
pub fn is_valid_check_interval(secs: f64) -> bool {
    secs.is_finite() && secs > 0.0 && secs <= MAX_CHECK_INTERVAL_SECS
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub fn load(config_path: Option<PathBuf>) -> Result<Settings> {
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) => return Ok(Settings::default()),
        Err(err) => return Err(err),
    };
    load_at_path(&path)
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

/// A missing file yields the defaults; missing keys are back-filled.
pub fn load_at_path(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    let mut contents = serde_json::to_string_pretty(settings).map_err(ConfigError::Serialize)?;
    contents.push('\n');
    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_DATA_HOME") {
        let path = PathBuf::from(dir);
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDataPath(path));
        }
        return Ok(path.join(APP_DIR));
    }

    let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
    Ok(home.join(".local").join("share").join(APP_DIR))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(LOG_FILENAME))
}
