use super::*;
use crate::test_fonts::{alt_test_font_bytes, broken_font_bytes, test_font_bytes, write_test_font};

#[test]
fn test_from_bytes_reads_metrics() {
    let font = FontHandle::from_bytes(test_font_bytes()).unwrap();
    assert_eq!(font.units_per_em(), 1000);
    assert_eq!(font.glyph_count(), 4);
    assert_eq!(font.family_name(), None);
    assert_eq!(font.as_bytes(), test_font_bytes().as_slice());
}

#[test]
fn test_from_bytes_empty() {
    let err = FontHandle::from_bytes(Vec::new()).unwrap_err();
    assert_eq!(err, FontError::Parse("font data is empty".to_string()));
}

#[test]
fn test_from_bytes_garbage() {
    let err = FontHandle::from_bytes(broken_font_bytes()).unwrap_err();
    assert!(matches!(err, FontError::Parse(_)), "got {err:?}");
}

#[test]
fn test_clone_is_same_font() {
    let font = FontHandle::from_bytes(test_font_bytes()).unwrap();
    let other = font.clone();
    assert!(font.same_font(&other));
    assert_eq!(font, other);
}

#[test]
fn test_separate_parses_are_different_fonts() {
    let a = FontHandle::from_bytes(test_font_bytes()).unwrap();
    let b = FontHandle::from_bytes(test_font_bytes()).unwrap();
    assert_ne!(a, b);

    let alt = FontHandle::from_bytes(alt_test_font_bytes()).unwrap();
    assert_eq!(alt.glyph_count(), 3);
    assert!(!alt.same_font(&a));
}

#[test]
fn test_with_face() {
    let font = FontHandle::from_bytes(test_font_bytes()).unwrap();
    let gid = font.with_face(|face| face.glyph_index('A')).unwrap();
    assert_eq!(gid, Some(ttf_parser::GlyphId(1)));
    let missing = font.with_face(|face| face.glyph_index('Z')).unwrap();
    assert_eq!(missing, None);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_font(dir.path());
    let font = FontHandle::load(&path).unwrap();
    assert_eq!(font.glyph_count(), 4);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.ttf");
    match FontHandle::load(&path).unwrap_err() {
        FontError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_debug_hides_bytes() {
    let font = FontHandle::from_bytes(test_font_bytes()).unwrap();
    let debug = format!("{font:?}");
    assert!(debug.starts_with("FontHandle"));
    assert!(debug.contains("glyph_count: 4"));
}

#[tokio::test]
async fn test_load_font_async() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_font(dir.path());
    let font = load_font(&path).await.unwrap();
    assert_eq!(font.units_per_em(), 1000);

    let err = load_font(dir.path().join("nope.ttf")).await.unwrap_err();
    assert!(err.to_string().starts_with("cannot read font"));
}
