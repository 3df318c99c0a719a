//! typofy: text in a user-supplied font to SVG/DXF outline geometry.
//!
//! Public API: `render_text()` for one-shot conversion, `editor::Editor`
//! and `session::spawn` for the interactive, debounced pipeline.
//!
//! Modules:
//!   debounce: cancellable delayed invocation
//!   config: RenderConfig, ConfigPatch, FormState, assembler
//!   font: FontHandle (parsed font) and loading
//!   model: text layout into glyph outlines
//!   export: SVG and DXF writers
//!   format: SVG pretty-printer
//!   highlight: ANSI markup highlighting
//!   surface: preview/code output surfaces
//!   notify: user notifications
//!   clipboard: clipboard access
//!   render: render invoker
//!   editor: form/font/surface owner and input handlers
//!   session: event loop with debounced dispatch

pub mod clipboard;
pub mod config;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod export;
pub mod font;
pub mod format;
pub mod highlight;
pub mod model;
pub mod notify;
pub mod render;
pub mod session;
pub mod surface;

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(test)]
#[path = "../tests/support/font_builder.rs"]
pub(crate) mod test_fonts;

use crate::config::{ConfigPatch, FormState};
use crate::error::TypofyError;
use crate::font::FontHandle;
use crate::render::RenderOutput;

/// Render `text` in `font` with every other setting taken from `patch`, or
/// from the editor's default form where `patch` leaves a field unset.
pub fn render_text(
    font: &FontHandle,
    text: &str,
    patch: &ConfigPatch,
) -> Result<RenderOutput, TypofyError> {
    let mut overrides = patch.clone();
    overrides.text = Some(text.to_string());
    let config = config::assemble_with_font(&overrides, &FormState::with_defaults(), font);
    Ok(render::render_outputs(&config)?)
}
