use std::process::{Command, Stdio};

use crate::{MonitorError, Result};

/// Hands a URL or custom URI to whatever the OS has registered for it.
pub trait Launcher {
    fn launch(&self, target: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, target: &str) -> Result<()> {
        let mut cmd = platform_command(target);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let status = cmd.status().map_err(|err| MonitorError::Launch {
            target: target.to_string(),
            message: err.to_string(),
        })?;
        if !status.success() {
            return Err(MonitorError::Launch {
                target: target.to_string(),
                message: format!("handler exited with {status}"),
            });
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn platform_command(target: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(target);
    cmd
}

#[cfg(windows)]
fn platform_command(target: &str) -> Command {
    // `cmd /C start` would need `&` escaping; the protocol handler does not.
    let mut cmd = Command::new("rundll32");
    cmd.arg("url.dll,FileProtocolHandler").arg(target);
    cmd
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_command(target: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(target);
    cmd
}
