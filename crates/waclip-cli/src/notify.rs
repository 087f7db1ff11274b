use std::io::{self, Write};
use std::sync::Arc;

use waclip_monitor::{ActivityLine, Notifier, Notifiers};

/// Prints each activity line on stdout.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, line: &ActivityLine) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }
}

pub fn console_notifier() -> Arc<dyn Notifier> {
    let notifiers = Notifiers::new().with(Arc::new(StdoutNotifier));
    #[cfg(feature = "desktop-notify")]
    let notifiers = notifiers.with(Arc::new(waclip_monitor::activity::DesktopNotifier));
    Arc::new(notifiers)
}
