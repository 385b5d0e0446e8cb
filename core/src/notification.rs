//! User-facing outcome notifications.

use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, info};

/// Application name shown by desktop notification daemons.
const APP_NAME: &str = "davsync";

/// Surfaces outcomes to the user.
///
/// Calls are fire-and-forget: they must return promptly and never fail back
/// into the caller.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, message: &str, is_alert: bool);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, title: &str, message: &str, is_alert: bool) {
        (**self).notify(title, message, is_alert);
    }
}

/// Sink that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, title: &str, message: &str, is_alert: bool) {
        if is_alert {
            info!(alert = true, "{title}: {message}");
        } else {
            info!("{title}: {message}");
        }
    }
}

/// Desktop notifications through the platform's notification command:
/// `osascript` on macOS and `notify-send` elsewhere.
///
/// The command is spawned and left to finish on its own; the runtime reaps
/// it. Must be used from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn command(title: &str, message: &str, is_alert: bool) -> Command {
        if cfg!(target_os = "macos") {
            let mut script = format!(
                "display notification \"{}\" with title \"{}\" subtitle \"{}\"",
                escape_applescript(message),
                escape_applescript(APP_NAME),
                escape_applescript(title),
            );
            if is_alert {
                script.push_str(" sound name \"default\"");
            }
            let mut command = Command::new("osascript");
            command.arg("-e").arg(script);
            command
        } else {
            let mut command = Command::new("notify-send");
            command.arg("--app-name").arg(APP_NAME);
            if is_alert {
                command.arg("--urgency").arg("critical");
            }
            command.arg(title).arg(message);
            command
        }
    }
}

impl NotificationSink for DesktopNotifier {
    fn notify(&self, title: &str, message: &str, is_alert: bool) {
        let mut command = Self::command(title, message, is_alert);
        command
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());

        if let Err(e) = command.spawn() {
            debug!("Desktop notification unavailable: {e}");
        }
    }
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
