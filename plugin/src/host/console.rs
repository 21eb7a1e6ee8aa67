use tracing::{info, warn};

use super::{Navigator, Notification, Notifier, SelectionProvider, Severity};

/// Prints notifications to stdout and mirrors them into the log.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => {
                info!(id = %notification.id, "{}", notification.message);
                println!("[ok] {}", notification.message);
            }
            Severity::Failure => {
                warn!(id = %notification.id, "{}", notification.message);
                println!("[!!] {}", notification.message);
            }
        }
    }
}

/// A command-line session has no router; transitions are only logged.
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn transition_to(&self, path: &str) {
        info!(path, "navigating back");
    }
}

/// Selection captured from command-line flags.
pub struct FixedSelection {
    pub channel_id: Option<String>,
    pub guild_id: Option<String>,
}

impl SelectionProvider for FixedSelection {
    fn current_channel_id(&self) -> Option<String> {
        self.channel_id.clone()
    }

    fn current_guild_id(&self) -> Option<String> {
        self.guild_id.clone()
    }
}
