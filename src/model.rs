//! Text → vector model.
//!
//! Lays out `text` in a font and collects each character's outline as a
//! [`kurbo::BezPath`]. Coordinates are y-up with the baseline at y = 0 and
//! the pen starting at x = 0; one font unit is `font_size / units_per_em`.

use kurbo::{BezPath, Rect, Shape};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::FontError;
use crate::font::FontHandle;

/// Layout parameters for [`TextModel::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout<'a> {
    pub text: &'a str,
    pub font_size: f64,
    pub union: bool,
    pub kerning: bool,
}

/// One top-level sub-model: a glyph outline, or all outlines when unioned.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphModel {
    /// Index of the source character in the text (`"0"` for a union).
    pub key: String,
    /// The characters this outline was built from.
    pub chars: String,
    /// Layer tag; set when glyphs are emitted separately.
    pub layer: Option<String>,
    pub path: BezPath,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextModel {
    pub glyphs: Vec<GlyphModel>,
    /// Pen position after the last character.
    pub advance: f64,
}

struct PathPen {
    path: BezPath,
    scale: f64,
    dx: f64,
}

impl PathPen {
    fn point(&self, x: f32, y: f32) -> (f64, f64) {
        (x as f64 * self.scale + self.dx, y as f64 * self.scale)
    }
}

impl OutlineBuilder for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (c, p) = (self.point(x1, y1), self.point(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (c1, c2, p) = (self.point(x1, y1), self.point(x2, y2), self.point(x, y));
        self.path.curve_to(c1, c2, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Horizontal `kern` adjustment between two glyphs, in font units.
fn pair_kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> i32 {
    let Some(kern) = face.tables().kern else {
        return 0;
    };
    kern.subtables
        .into_iter()
        .filter(|st| st.horizontal && !st.variable && !st.has_cross_stream)
        .filter_map(|st| st.glyphs_kerning(left, right))
        .map(i32::from)
        .sum()
}

impl TextModel {
    pub fn build(font: &FontHandle, layout: &TextLayout<'_>) -> Result<Self, FontError> {
        let mut model = font.with_face(|face| Self::layout(face, layout))?;
        if layout.union {
            model.merge_glyphs();
        }
        Ok(model)
    }

    fn layout(face: &Face<'_>, layout: &TextLayout<'_>) -> Self {
        let scale = layout.font_size / f64::from(face.units_per_em());
        let mut glyphs = Vec::new();
        let mut x = 0.0;
        let mut prev: Option<GlyphId> = None;

        for (index, ch) in layout.text.chars().enumerate() {
            let gid = face.glyph_index(ch).unwrap_or(GlyphId(0));
            if let (true, Some(left)) = (layout.kerning, prev) {
                x += f64::from(pair_kerning(face, left, gid)) * scale;
            }

            let mut pen = PathPen {
                path: BezPath::new(),
                scale,
                dx: x,
            };
            if face.outline_glyph(gid, &mut pen).is_some() && !pen.path.elements().is_empty() {
                glyphs.push(GlyphModel {
                    key: index.to_string(),
                    chars: ch.to_string(),
                    layer: None,
                    path: pen.path,
                });
            }

            x += f64::from(face.glyph_hor_advance(gid).unwrap_or(0)) * scale;
            prev = Some(gid);
        }

        Self { glyphs, advance: x }
    }

    /// Collapse every glyph into a single compound outline keyed `"0"`.
    fn merge_glyphs(&mut self) {
        if self.glyphs.len() < 2 {
            return;
        }
        let mut merged = GlyphModel {
            key: "0".to_string(),
            chars: String::new(),
            layer: None,
            path: BezPath::new(),
        };
        for glyph in self.glyphs.drain(..) {
            merged.chars.push_str(&glyph.chars);
            for el in glyph.path.elements() {
                merged.path.push(*el);
            }
        }
        self.glyphs.push(merged);
    }

    /// Tag each top-level sub-model with its own layer.
    pub fn tag_layers(&mut self) {
        for glyph in &mut self.glyphs {
            glyph.layer = Some(glyph.key.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Bounding box of all outlines, `None` for an empty model.
    pub fn bounds(&self) -> Option<Rect> {
        self.glyphs
            .iter()
            .map(|g| g.path.bounding_box())
            .reduce(|a, b| a.union(b))
    }

    /// Distinct layers in order of first use.
    pub fn layers(&self) -> Vec<&str> {
        let mut layers: Vec<&str> = Vec::new();
        for layer in self.glyphs.iter().filter_map(|g| g.layer.as_deref()) {
            if !layers.contains(&layer) {
                layers.push(layer);
            }
        }
        layers
    }
}

/// Flattening tolerance, in model units, for a Bezier accuracy setting.
pub fn flatten_tolerance(bezier_accuracy: f64) -> f64 {
    let accuracy = if bezier_accuracy.is_finite() && bezier_accuracy > 0.0 {
        bezier_accuracy
    } else {
        crate::config::DEFAULT_BEZIER_ACCURACY
    };
    1.0 / accuracy
}

#[cfg(test)]
#[path = "../tests/rust/test_model.rs"]
mod tests;
