//! # Mosaic Core UI Bridge
//!
//! Collaborator interfaces between the framework and the UI layer:
//!
//! - [`UiSurface`]: resolve elements, replace markup, attach and detach
//!   listeners. [`MemorySurface`] is the in-memory implementation.
//! - [`Notifier`]: user-visible `success`/`warning`/`error` messages.
//!   [`LogNotifier`] forwards to the `log` facade; [`MemoryNotifier`] records
//!   messages for later inspection.
pub mod error;
pub mod surface;

use std::fmt::{self, Debug};
use std::sync::Mutex;
use std::time::SystemTime;

pub use error::UiBridgeError;
pub use surface::{ListenerId, Markup, MemorySurface, UiEvent, UiSurface};

/// UI message severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    /// Operation completed
    Success,
    /// Something degraded but the application keeps running
    Warning,
    /// Something failed
    Error,
}

impl fmt::Display for MessageSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSeverity::Success => write!(f, "success"),
            MessageSeverity::Warning => write!(f, "warning"),
            MessageSeverity::Error => write!(f, "error"),
        }
    }
}

/// A user-visible notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub severity: MessageSeverity,
    pub message: String,
    pub timestamp: SystemTime,
}

/// Trait for user-visible notification sinks
pub trait Notifier: Send + Sync + Debug {
    /// Deliver a notification
    fn notify(&self, severity: MessageSeverity, message: &str);

    fn success(&self, message: &str) {
        self.notify(MessageSeverity::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(MessageSeverity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(MessageSeverity::Error, message);
    }
}

/// Notifier that writes through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: MessageSeverity, message: &str) {
        match severity {
            MessageSeverity::Success => log::info!("[notify] {}", message),
            MessageSeverity::Warning => log::warn!("[notify] {}", message),
            MessageSeverity::Error => log::error!("[notify] {}", message),
        }
    }
}

/// Notifier that keeps every notification in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first
    pub fn messages(&self) -> Vec<Notification> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Messages received with the given severity
    pub fn messages_with(&self, severity: MessageSeverity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|n| n.severity == severity)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, severity: MessageSeverity, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Notification {
                severity,
                message: message.to_string(),
                timestamp: SystemTime::now(),
            });
    }
}
