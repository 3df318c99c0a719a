//! The editor: owner of the form state, the current font and the output
//! surfaces. Every input handler goes through here.

use crate::clipboard::Clipboard;
use crate::config::{self, ConfigPatch, FormState, RenderConfig};
use crate::error::FontError;
use crate::font::FontHandle;
use crate::notify::{Notification, Notifier};
use crate::render::{self, RenderStatus};
use crate::surface::Surfaces;

// ─── Dispatch table ──────────────────────────────────────────────────────────

/// An input control of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Text,
    FontSize,
    Fill,
    Stroke,
    StrokeWidth,
    Separate,
    Filled,
    FontUpload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduling {
    /// Render once the control has been quiet for the debounce delay.
    Debounced,
    /// Render right away.
    Immediate,
}

impl Control {
    /// Typing-rate controls are debounced; discrete choices are not.
    pub fn scheduling(self) -> Scheduling {
        match self {
            Control::Text
            | Control::FontSize
            | Control::StrokeWidth
            | Control::Separate
            | Control::Filled => Scheduling::Debounced,
            Control::Fill | Control::Stroke | Control::FontUpload => Scheduling::Immediate,
        }
    }
}

// ─── Editor ──────────────────────────────────────────────────────────────────

pub struct Editor {
    form: FormState,
    font: Option<FontHandle>,
    surfaces: Surfaces,
    notifier: Box<dyn Notifier>,
}

impl Editor {
    /// An editor with the default form and no font.
    pub fn new(surfaces: Surfaces, notifier: impl Notifier + 'static) -> Self {
        Self {
            form: FormState::with_defaults(),
            font: None,
            surfaces,
            notifier: Box::new(notifier),
        }
    }

    pub fn with_form(mut self, form: FormState) -> Self {
        self.form = form;
        self
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn font(&self) -> Option<&FontHandle> {
        self.font.as_ref()
    }

    pub fn surfaces_mut(&mut self) -> &mut Surfaces {
        &mut self.surfaces
    }

    /// Store control values carried by `patch` without rendering.
    pub fn record(&mut self, patch: &ConfigPatch) {
        self.form.apply(patch);
    }

    /// The configuration a render with `overrides` would use right now.
    pub fn assemble(&self, overrides: &ConfigPatch) -> Option<RenderConfig> {
        config::assemble(overrides, &self.form, self.font.as_ref())
    }

    /// Assemble and render. Failures are reported to the user, not returned.
    pub fn render_with(&mut self, overrides: &ConfigPatch) -> RenderStatus {
        let Some(config) = self.assemble(overrides) else {
            log::debug!("no font loaded; render deferred");
            return RenderStatus::NoFont;
        };
        match render::render_to(&config, &mut self.surfaces) {
            Ok(status) => status,
            Err(e) => {
                log::error!("render failed: {e}");
                self.notifier.notify(Notification::error(e.to_string()));
                RenderStatus::Failed
            }
        }
    }

    /// Record `patch` and render the resulting form.
    ///
    /// The patch only updates the form, so two commits that leave the form
    /// in the same state render the same output whichever control sent them.
    pub fn commit(&mut self, patch: &ConfigPatch) -> RenderStatus {
        self.record(patch);
        self.render()
    }

    /// Render the form as it stands.
    pub fn render(&mut self) -> RenderStatus {
        self.render_with(&ConfigPatch::default())
    }

    /// Replace the current font and re-render.
    pub fn set_font(&mut self, font: FontHandle) -> RenderStatus {
        log::info!(
            "font installed: {} ({} glyphs)",
            font.family_name().unwrap_or("unnamed"),
            font.glyph_count()
        );
        self.font = Some(font);
        self.render()
    }

    /// Parse uploaded font bytes and make them the current font.
    ///
    /// A malformed file is reported and leaves font and outputs untouched.
    pub fn upload_font(&mut self, bytes: Vec<u8>) -> RenderStatus {
        match FontHandle::from_bytes(bytes) {
            Ok(font) => self.set_font(font),
            Err(e) => {
                self.font_failed(&e);
                RenderStatus::Failed
            }
        }
    }

    /// Report a font that could not be loaded.
    pub fn font_failed(&mut self, error: &FontError) {
        log::error!("font load failed: {error}");
        self.notifier.notify(Notification::error(error.to_string()));
    }

    /// Copy the code view to `clipboard`. Returns whether anything was copied.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        let Some(code) = self.surfaces.code.as_ref().map(|c| c.code()) else {
            return false;
        };
        if code.trim().is_empty() {
            return false;
        }
        match clipboard.write_text(&code) {
            Ok(()) => {
                self.notifier
                    .notify(Notification::success("Copied to clipboard!"));
                true
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_editor.rs"]
mod tests;
