use crate::{MonitorError, Result};

/// Read side of the system clipboard. There is no change notification;
/// callers poll.
pub trait ClipboardSource {
    fn read_text(&mut self) -> Result<String>;
}

/// Clipboard backed by `arboard`. A handle is opened per read so the
/// source can move freely into the polling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<String> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| MonitorError::Clipboard(err.to_string()))?;
        match clipboard.get_text() {
            Ok(text) => Ok(text),
            // images, files, or nothing at all
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(err) => Err(MonitorError::Clipboard(err.to_string())),
        }
    }
}
