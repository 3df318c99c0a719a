//! WASM bindings for typofy.
//!
//! Exposes `render`, `renderWithOptions` and `renderDxf` to JavaScript via
//! wasm-bindgen. Fonts are passed as raw bytes (`Uint8Array`).

use wasm_bindgen::prelude::*;

use crate::config::ConfigPatch;
use crate::font::FontHandle;

fn parse_font(font: &[u8]) -> Result<FontHandle, JsError> {
    FontHandle::from_bytes(font.to_vec()).map_err(|e| JsError::new(&e.to_string()))
}

/// Render `text` to SVG with the editor's default settings.
#[wasm_bindgen]
pub fn render(font: &[u8], text: &str) -> Result<String, JsError> {
    let font = parse_font(font)?;
    crate::render_text(&font, text, &ConfigPatch::default())
        .map(|out| out.svg)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Render `text` to SVG with full control over paint options.
///
/// - `fill`: colour, or empty string for no fill
/// - `stroke`: colour, or `"none"`
/// - `stroke_width`: numeric string, or empty string for no override
#[wasm_bindgen(js_name = "renderWithOptions")]
#[allow(clippy::too_many_arguments)]
pub fn render_with_options(
    font: &[u8],
    text: &str,
    font_size: f64,
    fill: &str,
    stroke: &str,
    stroke_width: &str,
    separate: bool,
    formatted: bool,
) -> Result<String, JsError> {
    let font = parse_font(font)?;
    let patch = ConfigPatch {
        font_size: Some(font_size),
        filled: Some(!fill.is_empty()),
        fill: (!fill.is_empty()).then(|| fill.to_string()),
        stroke: Some(stroke.to_string()),
        stroke_width: Some(stroke_width.to_string()),
        separate: Some(separate),
        ..ConfigPatch::default()
    };
    let out = crate::render_text(&font, text, &patch).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(if formatted { out.formatted } else { out.svg })
}

/// Render `text` to DXF in the given units (`in`, `ft`, `mm`, `cm`, `m`).
#[wasm_bindgen(js_name = "renderDxf")]
pub fn render_dxf(font: &[u8], text: &str, font_size: f64, units: &str) -> Result<String, JsError> {
    let font = parse_font(font)?;
    let patch = ConfigPatch {
        font_size: Some(font_size),
        units: Some(units.to_string()),
        ..ConfigPatch::default()
    };
    crate::render_text(&font, text, &patch)
        .map(|out| out.dxf)
        .map_err(|e| JsError::new(&e.to_string()))
}
