//! Transient user notifications ("toasts").

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Somewhere to show a notification to the user.
pub trait Notifier: Send {
    fn notify(&mut self, notification: Notification);
}

/// Sends notifications to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, n: Notification) {
        match n.level {
            Level::Success => log::info!("{}", n.message),
            Level::Error => log::error!("{}", n.message),
        }
    }
}

/// Prints one line per notification to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, n: Notification) {
        let tag = match n.level {
            Level::Success => "ok",
            Level::Error => "error",
        };
        let _ = writeln!(std::io::stderr(), "[{tag}] {}", n.message);
    }
}

/// Keeps every notification; clones share the same list.
#[derive(Debug, Default, Clone)]
pub struct MemoryNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == Level::Error)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&mut self, n: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(n);
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_notify.rs"]
mod tests;
