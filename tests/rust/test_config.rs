use super::*;
use crate::test_fonts::{alt_test_font_bytes, test_font_bytes};

fn font() -> FontHandle {
    FontHandle::from_bytes(test_font_bytes()).unwrap()
}

#[test]
fn test_assemble_without_font_is_none() {
    let form = FormState::with_defaults();
    assert_eq!(assemble(&ConfigPatch::default(), &form, None), None);
}

#[test]
fn test_assemble_override_font_wins() {
    let current = font();
    let uploaded = FontHandle::from_bytes(alt_test_font_bytes()).unwrap();
    let overrides = ConfigPatch {
        font: Some(uploaded.clone()),
        ..ConfigPatch::default()
    };

    let config = assemble(&overrides, &FormState::default(), Some(&current)).unwrap();
    assert!(config.font.same_font(&uploaded));

    // an override font is enough on its own
    let config = assemble(&overrides, &FormState::default(), None).unwrap();
    assert!(config.font.same_font(&uploaded));
}

#[test]
fn test_resolution_order() {
    let font = font();
    let form = FormState {
        text: Some("form".to_string()),
        font_size: Some(40.0),
        ..FormState::default()
    };

    let config = assemble_with_font(&ConfigPatch::text("override"), &form, &font);
    assert_eq!(config.text, "override");
    assert_eq!(config.font_size, 40.0);

    let config = assemble_with_font(&ConfigPatch::default(), &form, &font);
    assert_eq!(config.text, "form");

    let config = assemble_with_font(&ConfigPatch::default(), &FormState::default(), &font);
    assert_eq!(config.text, DEFAULT_TEXT);
    assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
}

#[test]
fn test_empty_text_uses_placeholder() {
    let config = assemble_with_font(&ConfigPatch::text(""), &FormState::with_defaults(), &font());
    assert_eq!(config.text, "Sample");
}

#[test]
fn test_invalid_size_falls_back() {
    let font = font();
    for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let config = assemble_with_font(&ConfigPatch::font_size(bad), &FormState::default(), &font);
        assert_eq!(config.font_size, 16.0, "size {bad}");
    }
}

#[test]
fn test_defaults_for_unset_fields() {
    let config = assemble_with_font(&ConfigPatch::default(), &FormState::default(), &font());
    assert!(!config.union);
    assert!(config.filled);
    assert!(config.kerning);
    assert!(config.separate);
    assert!(config.stroke_non_scaling);
    assert_eq!(config.bezier_accuracy, 10.0);
    assert_eq!(config.units, "cm");
    assert_eq!(config.fill, None);
    assert_eq!(config.stroke, STROKE_NONE);
    assert_eq!(config.stroke_width, "");
    assert_eq!(config.fill_rule, FillRule::NonZero);
}

#[test]
fn test_with_defaults_form() {
    let config = assemble_with_font(&ConfigPatch::default(), &FormState::with_defaults(), &font());
    assert_eq!(config.text, "Sample");
    assert_eq!(config.font_size, 100.0);
    assert_eq!(config.fill.as_deref(), Some("#FFFFFF"));
    // a width of "0" still counts as entered
    assert_eq!(config.stroke, "#FFFFFF");
    assert_eq!(config.stroke_width, "0");
    assert!(config.separate);
    assert!(config.filled);
}

#[test]
fn test_stroke_derived_from_width() {
    let font = font();
    let mut form = FormState {
        stroke_color: Some("#000000".to_string()),
        stroke_width: Some("2".to_string()),
        ..FormState::default()
    };
    assert_eq!(assemble_with_font(&ConfigPatch::default(), &form, &font).stroke, "#000000");

    form.stroke_width = Some("  ".to_string());
    assert_eq!(assemble_with_font(&ConfigPatch::default(), &form, &font).stroke, "none");

    form.stroke_width = None;
    assert_eq!(assemble_with_font(&ConfigPatch::default(), &form, &font).stroke, "none");
}

#[test]
fn test_stroke_override_beats_derivation() {
    let form = FormState::with_defaults();
    let config = assemble_with_font(&ConfigPatch::stroke("none"), &form, &font());
    assert_eq!(config.stroke, "none");
    assert_eq!(config.stroke_width, "0");
}

#[test]
fn test_parse_font_size() {
    assert_eq!(parse_font_size("12"), Ok(12.0));
    assert_eq!(parse_font_size(" 24.5 "), Ok(24.5));
    for bad in ["0", "-3", "abc", "", "NaN", "inf"] {
        assert_eq!(
            parse_font_size(bad),
            Err(ConfigError::InvalidFontSize(bad.to_string())),
            "input {bad:?}"
        );
    }
}

#[test]
fn test_fill_rule_parse() {
    assert_eq!("evenodd".parse::<FillRule>(), Ok(FillRule::EvenOdd));
    assert_eq!(" NonZero ".parse::<FillRule>(), Ok(FillRule::NonZero));
    assert_eq!(
        "winding".parse::<FillRule>(),
        Err(ConfigError::UnknownFillRule("winding".to_string()))
    );
    assert_eq!(FillRule::EvenOdd.to_string(), "evenodd");
}

#[test]
fn test_patch_merge() {
    let mut patch = ConfigPatch::text("a");
    assert!(!patch.is_empty());
    patch.merge(&ConfigPatch::font_size(20.0));
    patch.merge(&ConfigPatch::text("b"));
    assert_eq!(patch.text.as_deref(), Some("b"));
    assert_eq!(patch.font_size, Some(20.0));
    assert!(ConfigPatch::new().is_empty());
}

#[test]
fn test_form_apply() {
    let mut form = FormState::with_defaults();
    let patch = ConfigPatch {
        font: Some(font()),
        stroke: Some("#123456".to_string()),
        separate: Some(false),
        ..ConfigPatch::default()
    };
    form.apply(&patch);
    assert_eq!(form.stroke_color.as_deref(), Some("#123456"));
    assert_eq!(form.separate, Some(false));
    // untouched controls keep their values
    assert_eq!(form.text.as_deref(), Some("Sample"));
    assert_eq!(form.fill.as_deref(), Some("#FFFFFF"));
}

#[test]
fn test_sequential_edits_accumulate() {
    let mut form = FormState::with_defaults();
    form.apply(&ConfigPatch::text("AB"));
    form.apply(&ConfigPatch::font_size(50.0));
    let config = assemble_with_font(&ConfigPatch::default(), &form, &font());
    assert_eq!(config.text, "AB");
    assert_eq!(config.font_size, 50.0);
}
