//! Clipboard access.
//!
//! The system clipboard is reached through the platform's copy command
//! (`wl-copy`, `xclip`, `pbcopy`, `clip`), fed on stdin.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::ClipboardError;

pub trait Clipboard: Send {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Pick the copy command for the current platform/session.
    pub fn detect() -> Option<Self> {
        if cfg!(target_os = "macos") {
            return Some(Self::new("pbcopy", &[]));
        }
        if cfg!(windows) {
            return Some(Self::new("clip", &[]));
        }
        if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            return Some(Self::new("wl-copy", &[]));
        }
        if std::env::var_os("DISPLAY").is_some() {
            return Some(Self::new("xclip", &["-selection", "clipboard"]));
        }
        None
    }

    fn fail(&self, message: impl ToString) -> ClipboardError {
        ClipboardError::Command {
            program: self.program.clone(),
            message: message.to_string(),
        }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.fail(e))?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                // reap the child before reporting
                let _ = child.wait();
                return Err(self.fail(e));
            }
        }
        let output = child.wait_with_output().map_err(|e| self.fail(e))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(self.fail(String::from_utf8_lossy(&output.stderr).trim()))
        }
    }
}

/// A clipboard that is never there.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// In-process clipboard; clones share the same contents.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_clipboard.rs"]
mod tests;
