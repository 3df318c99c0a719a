//! SVG exporter: converts a text model to an SVG string.
//!
//! Model space is y-up; the output is translated so the model bounds start
//! at (0, 0) and flipped into SVG's y-down space. Layered sub-models get a
//! `<g id="{layer}">` each; unlayered outlines share one `<path>`.

use kurbo::{BezPath, PathEl, Point, Rect};

use super::fmt_num;
use crate::config::FillRule;
use crate::model::TextModel;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const GROUP_ID: &str = "svgGroup";

/// Paint options for [`to_svg`]. `None` leaves the attribute out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgOptions {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub fill_rule: FillRule,
    /// When false, strokes keep their width regardless of scaling.
    pub scaling_stroke: bool,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Maps model points into SVG space.
struct Frame {
    min_x: f64,
    max_y: f64,
}

impl Frame {
    fn pt(&self, p: Point) -> String {
        format!("{} {}", fmt_num(p.x - self.min_x), fmt_num(self.max_y - p.y))
    }
}

fn path_data(path: &BezPath, frame: &Frame) -> String {
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => format!("M {}", frame.pt(p)),
            PathEl::LineTo(p) => format!("L {}", frame.pt(p)),
            PathEl::QuadTo(c, p) => format!("Q {} {}", frame.pt(c), frame.pt(p)),
            PathEl::CurveTo(c1, c2, p) => {
                format!("C {} {} {}", frame.pt(c1), frame.pt(c2), frame.pt(p))
            }
            PathEl::ClosePath => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn paint_attrs(opts: &SvgOptions) -> String {
    let mut attrs = match opts.fill.as_deref() {
        Some(fill) => format!(r#" fill="{}""#, escape(fill)),
        None => r#" fill="none""#.to_string(),
    };
    attrs.push_str(&format!(r#" fill-rule="{}""#, opts.fill_rule));
    if let Some(stroke) = opts.stroke.as_deref() {
        attrs.push_str(&format!(r#" stroke="{}""#, escape(stroke)));
        if let Some(width) = opts.stroke_width.as_deref() {
            attrs.push_str(&format!(r#" stroke-width="{}""#, escape(width)));
        }
        if !opts.scaling_stroke {
            attrs.push_str(r#" vector-effect="non-scaling-stroke""#);
        }
    }
    attrs
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Render `model` as a single-line SVG document.
pub fn to_svg(model: &TextModel, opts: &SvgOptions) -> String {
    let bounds = model.bounds().unwrap_or(Rect::ZERO);
    let (w, h) = (fmt_num(bounds.width()), fmt_num(bounds.height()));
    let frame = Frame {
        min_x: bounds.x0,
        max_y: bounds.y1,
    };
    let paint = paint_attrs(opts);

    let mut parts = vec![
        format!(r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="{SVG_NS}">"#),
        format!(r#"<g id="{GROUP_ID}" stroke-linecap="round">"#),
    ];

    let mut unlayered = BezPath::new();
    for glyph in &model.glyphs {
        match glyph.layer.as_deref() {
            Some(layer) => {
                let d = path_data(&glyph.path, &frame);
                parts.push(format!(
                    r#"<g id="{}"><path d="{d}"{paint}/></g>"#,
                    escape(layer)
                ));
            }
            None => {
                for el in glyph.path.elements() {
                    unlayered.push(*el);
                }
            }
        }
    }
    if !unlayered.elements().is_empty() {
        let d = path_data(&unlayered, &frame);
        parts.push(format!(r#"<path d="{d}"{paint}/>"#));
    }

    parts.push("</g>".to_string());
    parts.push("</svg>".to_string());
    parts.concat()
}

#[cfg(test)]
#[path = "../../tests/rust/test_export_svg.rs"]
mod tests;
