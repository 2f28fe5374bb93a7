// src/notify/mod.rs
//! User-visible notifications.
//!
//! Every workflow reports its outcome through a [`Notifier`] exactly once:
//! success, a warning for "completed but invalid" results, or an error for
//! transport/HTTP failures. Nothing here terminates the process.

use console::style;
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: Option<String>,
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, title: &str, description: Option<String>) {
        self.notify(Notification { level: Level::Success, title: title.to_string(), description });
    }

    fn info(&self, title: &str, description: Option<String>) {
        self.notify(Notification { level: Level::Info, title: title.to_string(), description });
    }

    fn warning(&self, title: &str, description: Option<String>) {
        self.notify(Notification { level: Level::Warning, title: title.to_string(), description });
    }

    fn error(&self, title: &str, description: Option<String>) {
        self.notify(Notification { level: Level::Error, title: title.to_string(), description });
    }
}

/// Prints notifications to stderr, styled by level.
///
/// In JSON mode stdout carries the machine-readable result, so notifications
/// are routed to the log instead of the terminal.
pub struct ConsoleNotifier {
    json: bool,
}

impl ConsoleNotifier {
    pub fn new(json: bool) -> Self {
        ConsoleNotifier { json }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: Notification) {
        if self.json {
            match n.level {
                Level::Warning | Level::Error => warn!("{}: {}", n.title, n.description.unwrap_or_default()),
                _ => info!("{}: {}", n.title, n.description.unwrap_or_default()),
            }
            return;
        }

        let tag = match n.level {
            Level::Success => style("[OK]").green().bold(),
            Level::Info => style("[INFO]").cyan().bold(),
            Level::Warning => style("[WARN]").yellow().bold(),
            Level::Error => style("[ERROR]").red().bold(),
        };
        eprintln!("{} {}", tag, style(&n.title).bold());
        if let Some(description) = n.description.filter(|d| !d.is_empty()) {
            eprintln!("    {}", description);
        }
    }
}

/// Keeps every notification for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    seen: std::sync::Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, level: Level) -> usize {
        self.all().iter().filter(|n| n.level == level).count()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_set_level() {
        let rec = RecordingNotifier::default();
        rec.success("done", None);
        rec.warning("careful", Some("details".into()));
        rec.error("failed", None);
        assert_eq!(rec.count(Level::Success), 1);
        assert_eq!(rec.count(Level::Warning), 1);
        assert_eq!(rec.count(Level::Error), 1);
        assert_eq!(rec.all()[1].description.as_deref(), Some("details"));
    }
}
