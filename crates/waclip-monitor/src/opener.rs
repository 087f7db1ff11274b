use waclip_config::Settings;
use waclip_core::{app_url, web_url};

use crate::activity::Activity;
use crate::launcher::Launcher;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub use_app: bool,
    pub auto_open: bool,
}

impl From<&Settings> for OpenOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            use_app: settings.use_whatsapp_app,
            auto_open: settings.auto_open_browser,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenKind {
    App,
    Browser,
    /// Auto-open is off; the URL was only reported.
    Surfaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOutcome {
    pub kind: OpenKind,
    pub number: String,
    pub target: String,
}

/// Opens a chat with `number`, trying the desktop app first when asked to
/// and falling back to the web link. A failed web launch is returned as an
/// error; everything else is reported through `emit`.
pub fn open_chat(
    launcher: &dyn Launcher,
    number: &str,
    message: &str,
    options: OpenOptions,
    emit: &mut dyn FnMut(Activity),
) -> Result<OpenOutcome> {
    if options.use_app {
        let target = app_url(number, message)?;
        match launcher.launch(&target) {
            Ok(()) => {
                emit(Activity::OpenedApp {
                    number: number.to_string(),
                });
                return Ok(OpenOutcome {
                    kind: OpenKind::App,
                    number: number.to_string(),
                    target,
                });
            }
            Err(err) => emit(Activity::AppFallback {
                number: number.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    let target = web_url(number, message)?;
    if !options.auto_open {
        emit(Activity::GeneratedUrl {
            number: number.to_string(),
            url: target.clone(),
        });
        return Ok(OpenOutcome {
            kind: OpenKind::Surfaced,
            number: number.to_string(),
            target,
        });
    }

    launcher.launch(&target)?;
    emit(Activity::OpenedWeb {
        number: number.to_string(),
    });
    Ok(OpenOutcome {
        kind: OpenKind::Browser,
        number: number.to_string(),
        target,
    })
}
