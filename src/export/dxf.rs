//! DXF exporter: writes flattened outlines as an ASCII DXF drawing.
//!
//! Curves are flattened with kurbo at the configured tolerance. Each contour
//! becomes a `POLYLINE` (or a run of `LINE` entities) on the glyph's layer,
//! `0` when the glyph has none.

use std::fmt;
use std::str::FromStr;

use kurbo::{BezPath, PathEl, Point};

use super::fmt_num;
use crate::error::ConfigError;
use crate::model::TextModel;

const DEFAULT_LAYER: &str = "0";

// ─── Unit ────────────────────────────────────────────────────────────────────

/// Drawing units, written to the `$INSUNITS` header variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Inch,
    Foot,
    Millimeter,
    Centimeter,
    Meter,
}

impl Unit {
    /// `$INSUNITS` code.
    pub fn code(self) -> u8 {
        match self {
            Unit::Inch => 1,
            Unit::Foot => 2,
            Unit::Millimeter => 4,
            Unit::Centimeter => 5,
            Unit::Meter => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Unit::Inch),
            2 => Some(Unit::Foot),
            4 => Some(Unit::Millimeter),
            5 => Some(Unit::Centimeter),
            6 => Some(Unit::Meter),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Inch => "in",
            Unit::Foot => "ft",
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "inch" | "inches" => Ok(Unit::Inch),
            "ft" | "foot" | "feet" => Ok(Unit::Foot),
            "mm" | "millimeter" | "millimeters" => Ok(Unit::Millimeter),
            "cm" | "centimeter" | "centimeters" => Ok(Unit::Centimeter),
            "m" | "meter" | "meters" => Ok(Unit::Meter),
            _ => Err(ConfigError::UnknownUnit(s.to_string())),
        }
    }
}

// ─── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DxfOptions {
    pub units: Unit,
    /// Emit `POLYLINE` entities instead of individual `LINE`s.
    pub use_polyline: bool,
    /// Maximum distance between a curve and its flattened polyline.
    pub tolerance: f64,
}

impl Default for DxfOptions {
    fn default() -> Self {
        Self {
            units: Unit::Centimeter,
            use_polyline: true,
            tolerance: 0.1,
        }
    }
}

// ─── Contours ────────────────────────────────────────────────────────────────

struct Contour {
    points: Vec<Point>,
    closed: bool,
}

fn contours(path: &BezPath, tolerance: f64) -> Vec<Contour> {
    let mut out: Vec<Contour> = Vec::new();
    kurbo::flatten(path.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => out.push(Contour {
            points: vec![p],
            closed: false,
        }),
        PathEl::LineTo(p) => {
            if let Some(c) = out.last_mut() {
                c.points.push(p);
            }
        }
        PathEl::ClosePath => {
            if let Some(c) = out.last_mut() {
                if c.points.len() > 1 && c.points.first() == c.points.last() {
                    c.points.pop();
                }
                c.closed = true;
            }
        }
        // flatten only yields lines
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    out.retain(|c| c.points.len() > 1);
    out
}

// ─── Writer ──────────────────────────────────────────────────────────────────

/// Group-code/value pair writer.
struct DxfWriter {
    out: String,
}

impl DxfWriter {
    fn pair(&mut self, code: u16, value: impl fmt::Display) {
        self.out.push_str(&format!("{code}\n{value}\n"));
    }

    fn xy(&mut self, p: Point) {
        self.pair(10, fmt_num(p.x));
        self.pair(20, fmt_num(p.y));
    }

    fn section(&mut self, name: &str) {
        self.pair(0, "SECTION");
        self.pair(2, name);
    }

    fn end_section(&mut self) {
        self.pair(0, "ENDSEC");
    }

    fn polyline(&mut self, layer: &str, contour: &Contour) {
        self.pair(0, "POLYLINE");
        self.pair(8, layer);
        self.pair(66, 1);
        self.pair(70, u8::from(contour.closed));
        for p in &contour.points {
            self.pair(0, "VERTEX");
            self.pair(8, layer);
            self.xy(*p);
        }
        self.pair(0, "SEQEND");
        self.pair(8, layer);
    }

    fn lines(&mut self, layer: &str, contour: &Contour) {
        let mut segments: Vec<(Point, Point)> =
            contour.points.windows(2).map(|w| (w[0], w[1])).collect();
        if let (true, Some(first), Some(last)) =
            (contour.closed, contour.points.first(), contour.points.last())
        {
            segments.push((*last, *first));
        }
        for (a, b) in segments {
            self.pair(0, "LINE");
            self.pair(8, layer);
            self.xy(a);
            self.pair(11, fmt_num(b.x));
            self.pair(21, fmt_num(b.y));
        }
    }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Render `model` as an ASCII DXF document.
pub fn to_dxf(model: &TextModel, opts: &DxfOptions) -> String {
    let mut w = DxfWriter { out: String::new() };

    w.section("HEADER");
    w.pair(9, "$INSUNITS");
    w.pair(70, opts.units.code());
    w.end_section();

    let mut layers = model.layers();
    if layers.is_empty() || model.glyphs.iter().any(|g| g.layer.is_none()) {
        layers.insert(0, DEFAULT_LAYER);
    }
    w.section("TABLES");
    w.pair(0, "TABLE");
    w.pair(2, "LAYER");
    w.pair(70, layers.len());
    for layer in &layers {
        w.pair(0, "LAYER");
        w.pair(2, layer);
        w.pair(70, 0);
        w.pair(62, 7);
        w.pair(6, "CONTINUOUS");
    }
    w.pair(0, "ENDTAB");
    w.end_section();

    w.section("ENTITIES");
    for glyph in &model.glyphs {
        let layer = glyph.layer.as_deref().unwrap_or(DEFAULT_LAYER);
        for contour in contours(&glyph.path, opts.tolerance) {
            if opts.use_polyline {
                w.polyline(layer, &contour);
            } else {
                w.lines(layer, &contour);
            }
        }
    }
    w.end_section();
    w.pair(0, "EOF");
    w.out
}

/// Recover the drawing units from DXF text produced by [`to_dxf`].
pub fn read_units(dxf: &str) -> Option<Unit> {
    let lines: Vec<&str> = dxf.lines().map(str::trim).collect();
    let at = lines.iter().position(|l| *l == "$INSUNITS")?;
    lines[at + 1..]
        .chunks(2)
        .find(|pair| pair.first() == Some(&"70"))
        .and_then(|pair| pair.get(1))
        .and_then(|code| code.parse::<u8>().ok())
        .and_then(Unit::from_code)
}

#[cfg(test)]
#[path = "../../tests/rust/test_export_dxf.rs"]
mod tests;
