use super::*;
use crate::clipboard::{MemoryClipboard, NoClipboard};
use crate::config::FormState;
use crate::notify::MemoryNotifier;
use crate::render::render_outputs;
use crate::surface::MemorySurface;
use crate::test_fonts::{alt_test_font_bytes, broken_font_bytes, test_font_bytes, write_test_font};

fn font() -> FontHandle {
    FontHandle::from_bytes(test_font_bytes()).unwrap()
}

fn settings() -> SessionSettings {
    SessionSettings::default()
}

struct Fixture {
    handle: SessionHandle,
    task: JoinHandle<Editor>,
    surface: MemorySurface,
    notifier: MemoryNotifier,
    font: FontHandle,
}

/// A running session whose editor already has the test font and has
/// rendered once.
fn start() -> Fixture {
    let surface = MemorySurface::new();
    let notifier = MemoryNotifier::new();
    let font = font();
    let mut editor = Editor::new(surface.surfaces(), notifier.clone());
    editor.set_font(font.clone());
    let (handle, task) = spawn(editor, settings());
    Fixture {
        handle,
        task,
        surface,
        notifier,
        font,
    }
}

/// The SVG a render of `form` would produce.
fn expected_svg(font: &FontHandle, form: &FormState) -> String {
    let config = config::assemble_with_font(&ConfigPatch::default(), form, font);
    render_outputs(&config).unwrap().svg
}

fn form_with(patches: &[ConfigPatch]) -> FormState {
    let mut form = FormState::with_defaults();
    patches.iter().for_each(|p| form.apply(p));
    form
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_render_final_value() {
    let fx = start();
    fx.handle.text("A");
    fx.handle.text("AB");
    fx.handle.text("B");
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), 1);

    tokio::time::sleep(Duration::from_millis(600)).await;
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), 2);
    assert_eq!(
        fx.surface.svg().unwrap(),
        expected_svg(&fx.font, &form_with(&[ConfigPatch::text("B")]))
    );
}

#[tokio::test(start_paused = true)]
async fn test_debounce_waits_for_quiet() {
    let fx = start();
    fx.handle.text("A");
    tokio::time::sleep(Duration::from_millis(300)).await;
    fx.handle.text("AB");
    tokio::time::sleep(Duration::from_millis(300)).await;
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), 1);

    tokio::time::sleep(Duration::from_millis(300)).await;
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_immediate_control_renders_at_once() {
    let fx = start();
    fx.handle.fill("#112233");
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), 2);
    assert!(fx.surface.svg().unwrap().contains(r##"fill="#112233""##));
}

#[tokio::test(start_paused = true)]
async fn test_immediate_render_absorbs_pending_edits() {
    let fx = start();
    fx.handle.text("AB");
    fx.handle.stroke("#000000");
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), 2);
    assert_eq!(
        fx.surface.svg().unwrap(),
        expected_svg(
            &fx.font,
            &form_with(&[ConfigPatch::text("AB"), ConfigPatch::stroke("#000000")])
        )
    );

    // the debounced text edit was cancelled, not rendered twice
    tokio::time::sleep(Duration::from_secs(1)).await;
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_edits_to_different_fields_combine() {
    let fx = start();
    fx.handle.text("AB");
    fx.handle.font_size("50").unwrap();
    fx.handle.separate(false);
    tokio::time::sleep(Duration::from_millis(600)).await;
    fx.handle.flush().await;

    let svg = fx.surface.svg().unwrap();
    assert!(svg.starts_with(r#"<svg width="50" height="35""#), "{svg}");
    assert!(!svg.contains(r#"<g id="0">"#));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_font_size_rejected() {
    let fx = start();
    assert_eq!(
        fx.handle.font_size("big"),
        Err(ConfigError::InvalidFontSize("big".to_string()))
    );
    tokio::time::sleep(Duration::from_secs(1)).await;
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_filled_toggle() {
    let fx = start();
    fx.handle.filled(false);
    tokio::time::sleep(Duration::from_millis(600)).await;
    fx.handle.flush().await;
    let svg = fx.surface.svg().unwrap();
    assert!(svg.contains(r#"fill="none""#));
    assert!(!svg.contains("#FFFFFF\" fill-rule"));
}

#[tokio::test(start_paused = true)]
async fn test_stroke_width_enables_stroke() {
    let fx = start();
    fx.handle.stroke_width("3");
    tokio::time::sleep(Duration::from_millis(600)).await;
    fx.handle.flush().await;
    assert!(fx
        .surface
        .svg()
        .unwrap()
        .contains(r##"stroke="#FFFFFF" stroke-width="3""##));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_upload_keeps_output() {
    let fx = start();
    let before = fx.surface.snapshot();
    fx.handle.upload_font(broken_font_bytes());
    fx.handle.flush().await;

    assert_eq!(fx.surface.snapshot(), before);
    assert_eq!(fx.notifier.errors().len(), 1);

    fx.handle.shutdown();
    let editor = fx.task.await.unwrap();
    assert!(editor.font().unwrap().same_font(&fx.font));
}

#[tokio::test(start_paused = true)]
async fn test_upload_renders_with_new_font() {
    let fx = start();
    fx.handle.text("A");
    fx.handle.upload_font(alt_test_font_bytes());
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), 2);
    assert!(fx.surface.svg().unwrap().starts_with(r#"<svg width="110""#));
}

#[tokio::test(start_paused = true)]
async fn test_no_font_renders_nothing() {
    let surface = MemorySurface::new();
    let editor = Editor::new(surface.surfaces(), MemoryNotifier::new());
    let (handle, task) = spawn(editor, settings());
    handle.text("AB");
    handle.fill("#000000");
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.flush().await;
    assert_eq!(surface.writes(), 0);

    handle.shutdown();
    let editor = task.await.unwrap();
    assert_eq!(editor.form().text.as_deref(), Some("AB"));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_drops_pending_edit() {
    let fx = start();
    fx.handle.text("B");
    fx.handle.shutdown();
    let editor = fx.task.await.unwrap();
    // recorded, never rendered
    assert_eq!(editor.form().text.as_deref(), Some("B"));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(fx.surface.writes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handles_ends_session() {
    let fx = start();
    fx.handle.text("B");
    drop(fx.handle);
    let editor = fx.task.await.unwrap();
    assert_eq!(editor.form().text.as_deref(), Some("B"));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(fx.surface.writes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_settle_renders_pending_now() {
    let fx = start();
    fx.handle.text("AB");
    fx.handle.font_size("50").unwrap();
    fx.handle.settle().await;
    assert!(fx.surface.svg().unwrap().starts_with(r#"<svg width="50""#));
    let writes = fx.surface.writes();

    tokio::time::sleep(Duration::from_secs(1)).await;
    fx.handle.flush().await;
    assert_eq!(fx.surface.writes(), writes);
}

#[tokio::test(start_paused = true)]
async fn test_copy() {
    let fx = start();
    let clipboard = MemoryClipboard::new();
    assert!(fx.handle.copy(clipboard.clone()).await);
    assert_eq!(clipboard.contents(), fx.surface.snapshot().code);

    assert!(!fx.handle.copy(NoClipboard).await);
    assert_eq!(fx.notifier.errors().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_closed_session_ignores_input() {
    let fx = start();
    fx.handle.shutdown();
    fx.task.await.unwrap();
    fx.handle.text("late");
    fx.handle.flush().await;
    assert!(!fx.handle.copy(MemoryClipboard::new()).await);
}

#[tokio::test]
async fn test_default_font_loaded_on_start() {
    let dir = tempfile::tempdir().unwrap();
    let surface = MemorySurface::new();
    let editor = Editor::new(surface.surfaces(), MemoryNotifier::new());
    let settings = SessionSettings {
        default_font: Some(write_test_font(dir.path())),
        ..SessionSettings::default()
    };
    let (handle, task) = spawn(editor, settings);

    for _ in 0..200 {
        if surface.writes() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(surface.writes(), 1);

    handle.shutdown();
    let editor = task.await.unwrap();
    assert_eq!(editor.font().unwrap().glyph_count(), 4);
}

#[tokio::test]
async fn test_missing_default_font_notified() {
    let dir = tempfile::tempdir().unwrap();
    let surface = MemorySurface::new();
    let notifier = MemoryNotifier::new();
    let editor = Editor::new(surface.surfaces(), notifier.clone());
    let settings = SessionSettings {
        default_font: Some(dir.path().join("absent.ttf")),
        ..SessionSettings::default()
    };
    let (handle, task) = spawn(editor, settings);

    for _ in 0..200 {
        if !notifier.errors().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(notifier.errors().len(), 1);
    assert!(notifier.errors()[0].contains("absent.ttf"));

    handle.shutdown();
    assert!(task.await.unwrap().font().is_none());
}
