//! The editor's event loop.
//!
//! [`spawn`] moves an [`Editor`] onto a tokio task and returns a
//! [`SessionHandle`] with one method per input control. Debounced controls
//! record their value at once and render after the control has been quiet
//! for the debounce delay; immediate controls render at once.
//!
//! The session ends when every handle is dropped or [`SessionHandle::shutdown`]
//! is called. Pending debounced renders and an in-flight font load are
//! cancelled at that point; call [`SessionHandle::settle`] first to keep
//! pending input.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::clipboard::Clipboard;
use crate::config::{self, ConfigPatch};
use crate::debounce::Debouncer;
use crate::editor::{Control, Editor, Scheduling};
use crate::error::{ConfigError, FontError};
use crate::font::{self, FontHandle};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub debounce: Duration,
    /// Font loaded when the session starts.
    pub default_font: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            default_font: None,
        }
    }
}

enum Event {
    Input(Control, ConfigPatch),
    Commit(ConfigPatch),
    Upload(Vec<u8>),
    FontLoaded(Result<FontHandle, FontError>),
    Copy(Box<dyn Clipboard>, oneshot::Sender<bool>),
    Flush(oneshot::Sender<()>),
    Settle(oneshot::Sender<()>),
    Shutdown,
}

// ─── Handle ──────────────────────────────────────────────────────────────────

/// Sends input events to a running session. Cheap to clone.
#[derive(Clone)]
pub struct SessionHandle {
    tx: UnboundedSender<Event>,
}

impl SessionHandle {
    fn send(&self, event: Event) {
        if self.tx.send(event).is_err() {
            log::debug!("session already closed; event dropped");
        }
    }

    /// Route `patch` as input from `control`.
    pub fn input(&self, control: Control, patch: ConfigPatch) {
        self.send(Event::Input(control, patch));
    }

    pub fn text(&self, text: impl Into<String>) {
        self.input(Control::Text, ConfigPatch::text(text));
    }

    /// Rejects sizes that are not positive numbers without scheduling anything.
    pub fn font_size(&self, raw: &str) -> Result<(), ConfigError> {
        let size = config::parse_font_size(raw).inspect_err(|e| log::warn!("{e}"))?;
        self.input(Control::FontSize, ConfigPatch::font_size(size));
        Ok(())
    }

    pub fn fill(&self, color: impl Into<String>) {
        self.input(Control::Fill, ConfigPatch::fill(color));
    }

    pub fn stroke(&self, color: impl Into<String>) {
        self.input(Control::Stroke, ConfigPatch::stroke(color));
    }

    pub fn stroke_width(&self, width: impl Into<String>) {
        self.input(Control::StrokeWidth, ConfigPatch::stroke_width(width));
    }

    pub fn separate(&self, separate: bool) {
        self.input(Control::Separate, ConfigPatch::separate(separate));
    }

    pub fn filled(&self, filled: bool) {
        self.input(Control::Filled, ConfigPatch::filled(filled));
    }

    pub fn upload_font(&self, bytes: Vec<u8>) {
        self.send(Event::Upload(bytes));
    }

    /// Copy the code view; resolves to whether anything was copied.
    pub async fn copy(&self, clipboard: impl Clipboard + 'static) -> bool {
        let (reply, rx) = oneshot::channel();
        self.send(Event::Copy(Box::new(clipboard), reply));
        rx.await.unwrap_or(false)
    }

    /// Resolve once every event sent before this call has been handled.
    pub async fn flush(&self) {
        let (reply, rx) = oneshot::channel();
        self.send(Event::Flush(reply));
        let _ = rx.await;
    }

    /// Render pending debounced input now; resolves once that is done.
    pub async fn settle(&self) {
        let (reply, rx) = oneshot::channel();
        self.send(Event::Settle(reply));
        let _ = rx.await;
    }

    pub fn shutdown(&self) {
        self.send(Event::Shutdown);
    }
}

// ─── Session ─────────────────────────────────────────────────────────────────

struct Session {
    editor: Editor,
    delay: Duration,
    events: WeakUnboundedSender<Event>,
    debouncers: HashMap<Control, Debouncer<ConfigPatch>>,
    font_load: Option<JoinHandle<()>>,
}

/// Start a session for `editor`. The join handle yields the editor back
/// once the session has ended.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn spawn(editor: Editor, settings: SessionSettings) -> (SessionHandle, JoinHandle<Editor>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let events = tx.downgrade();

    let font_load = settings.default_font.map(|path| {
        let events = events.clone();
        tokio::spawn(async move {
            let result = font::load_font(&path).await;
            if let Some(tx) = events.upgrade() {
                let _ = tx.send(Event::FontLoaded(result));
            }
        })
    });

    let session = Session {
        editor,
        delay: settings.debounce,
        events,
        debouncers: HashMap::new(),
        font_load,
    };
    let task = tokio::spawn(session.run(rx));
    (SessionHandle { tx }, task)
}

impl Session {
    async fn run(mut self, mut rx: UnboundedReceiver<Event>) -> Editor {
        while let Some(event) = rx.recv().await {
            match event {
                Event::Input(control, patch) => self.input(control, patch),
                Event::Commit(patch) => {
                    self.editor.commit(&patch);
                }
                Event::Upload(bytes) => {
                    self.editor.upload_font(bytes);
                }
                Event::FontLoaded(Ok(font)) => {
                    self.font_load = None;
                    self.editor.set_font(font);
                }
                Event::FontLoaded(Err(e)) => {
                    self.font_load = None;
                    self.editor.font_failed(&e);
                }
                Event::Copy(mut clipboard, reply) => {
                    let copied = self.editor.copy(clipboard.as_mut());
                    let _ = reply.send(copied);
                }
                Event::Flush(reply) => {
                    let _ = reply.send(());
                }
                Event::Settle(reply) => self.settle(reply),
                Event::Shutdown => break,
            }
        }
        self.teardown();
        self.editor
    }

    fn input(&mut self, control: Control, patch: ConfigPatch) {
        self.editor.record(&patch);
        match control.scheduling() {
            Scheduling::Debounced => {
                let events = self.events.clone();
                let delay = self.delay;
                self.debouncers
                    .entry(control)
                    .or_insert_with(|| {
                        Debouncer::new(delay, move |patch| {
                            if let Some(tx) = events.upgrade() {
                                let _ = tx.send(Event::Commit(patch));
                            }
                        })
                    })
                    .call(patch);
            }
            Scheduling::Immediate => {
                // the immediate render already reflects every recorded value
                self.debouncers.values_mut().for_each(Debouncer::cancel);
                self.editor.render();
            }
        }
    }

    /// Deliver every pending debounced commit, then answer `reply` once
    /// those commits have been handled.
    fn settle(&mut self, reply: oneshot::Sender<()>) {
        self.debouncers.values_mut().for_each(Debouncer::flush);
        match self.events.upgrade() {
            // queued behind the commits just sent
            Some(tx) => {
                let _ = tx.send(Event::Flush(reply));
            }
            None => {
                let _ = reply.send(());
            }
        }
    }

    fn teardown(&mut self) {
        self.debouncers.clear();
        if let Some(load) = self.font_load.take() {
            load.abort();
        }
        log::debug!("session closed");
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_session.rs"]
mod tests;
