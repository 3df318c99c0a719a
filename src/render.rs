//! Render invoker: one [`RenderConfig`] in, updated output surfaces out.
//!
//! Every output is computed before the first surface is touched, and the
//! preview takes the SVG and DXF as a single update. A failing pipeline or
//! preview write therefore leaves both surfaces as they were. The code view
//! is written last; if that write fails, the preview already shows the new
//! render while the code view may still hold the previous markup.

use crate::config::{RenderConfig, STROKE_NONE};
use crate::error::RenderError;
use crate::export::dxf::{self, DxfOptions, Unit};
use crate::export::svg::{self, SvgOptions};
use crate::format::format_svg;
use crate::model::{TextLayout, TextModel, flatten_tolerance};
use crate::surface::Surfaces;

/// Everything one render produces.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub svg: String,
    pub dxf: String,
    /// `svg`, pretty-printed for display.
    pub formatted: String,
}

/// Outcome of a render attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Rendered,
    /// No font loaded yet; nothing was done.
    NoFont,
    /// An output surface is missing; nothing was done.
    NotMounted,
    /// The pipeline failed; the failure was reported and outputs kept.
    Failed,
}

/// SVG paint options derived from `config`.
pub fn svg_options(config: &RenderConfig) -> SvgOptions {
    let stroke = Some(config.stroke.trim())
        .filter(|s| !s.is_empty() && *s != STROKE_NONE)
        .map(str::to_string);
    let stroke_width = Some(config.stroke_width.trim())
        .filter(|w| !w.is_empty())
        .map(str::to_string);
    SvgOptions {
        fill: if config.filled { config.fill.clone() } else { None },
        stroke,
        stroke_width,
        fill_rule: config.fill_rule,
        scaling_stroke: !config.stroke_non_scaling,
    }
}

/// Build the model and run both exporters and the formatter.
pub fn render_outputs(config: &RenderConfig) -> Result<RenderOutput, RenderError> {
    let units: Unit = config.units.parse()?;

    let mut model = TextModel::build(
        &config.font,
        &TextLayout {
            text: &config.text,
            font_size: config.font_size,
            union: config.union,
            kerning: config.kerning,
        },
    )?;
    if config.separate {
        model.tag_layers();
    }

    let svg = svg::to_svg(&model, &svg_options(config));
    let dxf = dxf::to_dxf(
        &model,
        &DxfOptions {
            units,
            use_polyline: true,
            tolerance: flatten_tolerance(config.bezier_accuracy),
        },
    );
    let formatted = format_svg(&svg);

    log::debug!(
        "rendered {:?} at {}: {} glyph models, svg {} bytes, dxf {} bytes",
        config.text,
        config.font_size,
        model.glyphs.len(),
        svg.len(),
        dxf.len()
    );

    Ok(RenderOutput {
        svg,
        dxf,
        formatted,
    })
}

/// Render `config` into `surfaces`.
///
/// Returns [`RenderStatus::NotMounted`] without rendering when either
/// surface is missing.
pub fn render_to(
    config: &RenderConfig,
    surfaces: &mut Surfaces,
) -> Result<RenderStatus, RenderError> {
    let (Some(preview), Some(code)) = (surfaces.preview.as_mut(), surfaces.code.as_mut()) else {
        log::debug!("output surfaces not mounted; skipping render");
        return Ok(RenderStatus::NotMounted);
    };

    let output = render_outputs(config)?;

    preview.show(&output.svg, &output.dxf)?;
    code.show_code(&output.formatted)?;
    code.highlight()?;
    Ok(RenderStatus::Rendered)
}

#[cfg(test)]
#[path = "../tests/rust/test_render.rs"]
mod tests;
