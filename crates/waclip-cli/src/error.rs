use anyhow::Error;
use std::process::ExitCode;
use thiserror::Error as ThisError;
use waclip_config::ConfigError;
use waclip_core::CoreError;
use waclip_monitor::MonitorError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            };
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if let Some(monitor_err) = cause.downcast_ref::<MonitorError>() {
            return monitor_exit_code(monitor_err);
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return EXIT_INVALID_INPUT;
        }
    }
    EXIT_FAILURE
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir | ConfigError::Write { .. } | ConfigError::Serialize(_) => {
            EXIT_FAILURE
        }
        ConfigError::InvalidConfigPath(_)
        | ConfigError::InvalidDataPath(_)
        | ConfigError::UnknownKey(_)
        | ConfigError::InvalidValue { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn monitor_exit_code(err: &MonitorError) -> u8 {
    match err {
        MonitorError::Core(_) => EXIT_INVALID_INPUT,
        MonitorError::Clipboard(_)
        | MonitorError::Launch { .. }
        | MonitorError::Io(_)
        | MonitorError::Panicked(_) => EXIT_FAILURE,
    }
}
