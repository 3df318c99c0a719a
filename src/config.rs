//! Render configuration: the complete per-render record, partial overrides,
//! the live form state, and the assembler that combines them.
//!
//! Field resolution order is override → form control → default.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::font::FontHandle;

// ─── Defaults ────────────────────────────────────────────────────────────────

/// Placeholder text used when the text field is empty or unset.
pub const DEFAULT_TEXT: &str = "Sample";
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_BEZIER_ACCURACY: f64 = 10.0;
pub const DEFAULT_UNITS: &str = "cm";
/// Stroke value meaning "no stroke".
pub const STROKE_NONE: &str = "none";

// ─── FillRule ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn as_str(self) -> &'static str {
        match self {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        }
    }
}

impl fmt::Display for FillRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nonzero" => Ok(FillRule::NonZero),
            "evenodd" => Ok(FillRule::EvenOdd),
            other => Err(ConfigError::UnknownFillRule(other.to_string())),
        }
    }
}

/// Parse a font size the way the size control does: a positive, finite number.
pub fn parse_font_size(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(size) if size.is_finite() && size > 0.0 => Ok(size),
        _ => Err(ConfigError::InvalidFontSize(raw.to_string())),
    }
}

// ─── RenderConfig ────────────────────────────────────────────────────────────

/// Everything one render needs. Assembled fresh for every render and never
/// kept around afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub font: FontHandle,
    pub text: String,
    pub font_size: f64,
    /// Merge overlapping glyph outlines into one path.
    pub union: bool,
    /// Apply `fill`.
    pub filled: bool,
    pub kerning: bool,
    /// Tag every glyph as its own layer.
    pub separate: bool,
    pub bezier_accuracy: f64,
    /// Linear unit for DXF export.
    pub units: String,
    pub fill: Option<String>,
    /// Hex colour or [`STROKE_NONE`].
    pub stroke: String,
    /// Numeric string; empty means no override.
    pub stroke_width: String,
    pub stroke_non_scaling: bool,
    pub fill_rule: FillRule,
}

fn overlay<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
    if src.is_some() {
        dst.clone_from(src);
    }
}

// ─── ConfigPatch ─────────────────────────────────────────────────────────────

/// A partial configuration: every `Some` field overrides the live value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub font: Option<FontHandle>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub union: Option<bool>,
    pub filled: Option<bool>,
    pub kerning: Option<bool>,
    pub separate: Option<bool>,
    pub bezier_accuracy: Option<f64>,
    pub units: Option<String>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub stroke_non_scaling: Option<bool>,
    pub fill_rule: Option<FillRule>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn font_size(size: f64) -> Self {
        Self {
            font_size: Some(size),
            ..Self::default()
        }
    }

    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn stroke(color: impl Into<String>) -> Self {
        Self {
            stroke: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn stroke_width(width: impl Into<String>) -> Self {
        Self {
            stroke_width: Some(width.into()),
            ..Self::default()
        }
    }

    pub fn separate(separate: bool) -> Self {
        Self {
            separate: Some(separate),
            ..Self::default()
        }
    }

    pub fn filled(filled: bool) -> Self {
        Self {
            filled: Some(filled),
            ..Self::default()
        }
    }

    pub fn units(units: impl Into<String>) -> Self {
        Self {
            units: Some(units.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `other` onto `self`; fields set in `other` win.
    pub fn merge(&mut self, other: &ConfigPatch) {
        overlay(&mut self.font, &other.font);
        overlay(&mut self.text, &other.text);
        overlay(&mut self.font_size, &other.font_size);
        overlay(&mut self.union, &other.union);
        overlay(&mut self.filled, &other.filled);
        overlay(&mut self.kerning, &other.kerning);
        overlay(&mut self.separate, &other.separate);
        overlay(&mut self.bezier_accuracy, &other.bezier_accuracy);
        overlay(&mut self.units, &other.units);
        overlay(&mut self.fill, &other.fill);
        overlay(&mut self.stroke, &other.stroke);
        overlay(&mut self.stroke_width, &other.stroke_width);
        overlay(&mut self.stroke_non_scaling, &other.stroke_non_scaling);
        overlay(&mut self.fill_rule, &other.fill_rule);
    }
}

// ─── FormState ───────────────────────────────────────────────────────────────

/// The live value of every input control; the single source of truth that
/// handlers merge into. `None` means the control is unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub fill: Option<String>,
    /// Value of the stroke colour picker.
    pub stroke_color: Option<String>,
    pub stroke_width: Option<String>,
    pub separate: Option<bool>,
    pub filled: Option<bool>,
    pub union: Option<bool>,
    pub kerning: Option<bool>,
    pub bezier_accuracy: Option<f64>,
    pub units: Option<String>,
    pub stroke_non_scaling: Option<bool>,
    pub fill_rule: Option<FillRule>,
}

impl FormState {
    /// The controls as the editor first shows them.
    pub fn with_defaults() -> Self {
        Self {
            text: Some(DEFAULT_TEXT.to_string()),
            font_size: Some(100.0),
            fill: Some("#FFFFFF".to_string()),
            stroke_color: Some("#FFFFFF".to_string()),
            stroke_width: Some("0".to_string()),
            separate: Some(true),
            filled: Some(true),
            ..Self::default()
        }
    }

    /// Merge the control values carried by `patch`. The font is not a
    /// control and is ignored here.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        overlay(&mut self.text, &patch.text);
        overlay(&mut self.font_size, &patch.font_size);
        overlay(&mut self.fill, &patch.fill);
        overlay(&mut self.stroke_color, &patch.stroke);
        overlay(&mut self.stroke_width, &patch.stroke_width);
        overlay(&mut self.separate, &patch.separate);
        overlay(&mut self.filled, &patch.filled);
        overlay(&mut self.union, &patch.union);
        overlay(&mut self.kerning, &patch.kerning);
        overlay(&mut self.bezier_accuracy, &patch.bezier_accuracy);
        overlay(&mut self.units, &patch.units);
        overlay(&mut self.stroke_non_scaling, &patch.stroke_non_scaling);
        overlay(&mut self.fill_rule, &patch.fill_rule);
    }

    /// Stroke as derived from the controls: the picker colour when a stroke
    /// width is entered, otherwise [`STROKE_NONE`].
    fn derived_stroke(&self) -> String {
        let has_width = self.stroke_width.as_deref().is_some_and(|w| !w.trim().is_empty());
        match self.stroke_color.as_deref() {
            Some(color) if has_width && !color.trim().is_empty() => color.to_string(),
            _ => STROKE_NONE.to_string(),
        }
    }
}

// ─── Assembler ───────────────────────────────────────────────────────────────

/// Build a complete [`RenderConfig`] from `overrides`, the live `form` and
/// the current font.
///
/// Returns `None` when no font is available: that is the "not ready yet"
/// state, not an error.
pub fn assemble(
    overrides: &ConfigPatch,
    form: &FormState,
    current_font: Option<&FontHandle>,
) -> Option<RenderConfig> {
    let font = overrides.font.as_ref().or(current_font)?;
    Some(assemble_with_font(overrides, form, font))
}

/// [`assemble`] for when a font is known to be present. A font in
/// `overrides` still takes precedence over `font`.
pub fn assemble_with_font(
    overrides: &ConfigPatch,
    form: &FormState,
    font: &FontHandle,
) -> RenderConfig {
    let font = overrides.font.clone().unwrap_or_else(|| font.clone());

    let text = overrides
        .text
        .clone()
        .or_else(|| form.text.clone())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TEXT.to_string());

    let font_size = overrides
        .font_size
        .or(form.font_size)
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_FONT_SIZE);

    let stroke = overrides
        .stroke
        .clone()
        .unwrap_or_else(|| form.derived_stroke());

    RenderConfig {
        font,
        text,
        font_size,
        union: overrides.union.or(form.union).unwrap_or(false),
        filled: overrides.filled.or(form.filled).unwrap_or(true),
        kerning: overrides.kerning.or(form.kerning).unwrap_or(true),
        separate: overrides.separate.or(form.separate).unwrap_or(true),
        bezier_accuracy: overrides
            .bezier_accuracy
            .or(form.bezier_accuracy)
            .unwrap_or(DEFAULT_BEZIER_ACCURACY),
        units: overrides
            .units
            .clone()
            .or_else(|| form.units.clone())
            .unwrap_or_else(|| DEFAULT_UNITS.to_string()),
        fill: overrides.fill.clone().or_else(|| form.fill.clone()),
        stroke,
        stroke_width: overrides
            .stroke_width
            .clone()
            .or_else(|| form.stroke_width.clone())
            .unwrap_or_default(),
        stroke_non_scaling: overrides
            .stroke_non_scaling
            .or(form.stroke_non_scaling)
            .unwrap_or(true),
        fill_rule: overrides.fill_rule.or(form.fill_rule).unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_config.rs"]
mod tests;
