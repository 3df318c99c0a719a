//! Exporters from a [`crate::model::TextModel`] to text formats.

pub mod dxf;
pub mod svg;

pub use dxf::{DxfOptions, Unit};
pub use svg::SvgOptions;

/// Format a coordinate with at most three decimals and no trailing zeros.
pub(crate) fn fmt_num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
