//! typofy CLI entry point.
//!
//! One-shot: render TEXT once and write the SVG/DXF outputs.
//! Interactive (`--interactive`): read `field value` commands from stdin and
//! re-render through a debounced session after every edit.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use typofy::clipboard::{Clipboard, CommandClipboard, NoClipboard};
use typofy::config::{self, ConfigPatch, FillRule};
use typofy::editor::Editor;
use typofy::export::Unit;
use typofy::font::FontHandle;
use typofy::highlight::highlight_markup;
use typofy::notify::{Notification, Notifier, StderrNotifier};
use typofy::render_text;
use typofy::session::{self, SessionHandle, SessionSettings};
use typofy::surface::{FilePreview, Surfaces, WriterCode};

/// Text in a TrueType/OpenType font to SVG and DXF outlines.
#[derive(Parser, Debug)]
#[command(name = "typofy", version = env!("TYPOFY_VERSION"))]
struct Cli {
    /// Text to render (reads from stdin if not provided)
    text: Option<String>,

    /// Font file (.ttf, .otf)
    #[arg(short = 'f', long = "font", env = "TYPOFY_FONT")]
    font: Option<PathBuf>,

    /// Font size in output units
    #[arg(short = 's', long = "size", default_value = "100", value_parser = parse_size)]
    size: f64,

    /// Fill colour
    #[arg(long = "fill", default_value = "#FFFFFF")]
    fill: String,

    /// Leave the outlines unfilled
    #[arg(long = "no-fill")]
    no_fill: bool,

    /// Stroke colour, or "none"
    #[arg(long = "stroke", default_value = config::STROKE_NONE)]
    stroke: String,

    /// Stroke width
    #[arg(long = "stroke-width")]
    stroke_width: Option<String>,

    /// Scale the stroke with the drawing
    #[arg(long = "scaling-stroke")]
    scaling_stroke: bool,

    /// nonzero or evenodd
    #[arg(long = "fill-rule")]
    fill_rule: Option<FillRule>,

    /// Emit one path for all glyphs instead of a group per glyph
    #[arg(long = "joined")]
    joined: bool,

    /// Merge all glyph outlines into a single compound path
    #[arg(long = "union")]
    union: bool,

    /// Ignore the font's kerning pairs
    #[arg(long = "no-kerning")]
    no_kerning: bool,

    /// Curve flattening accuracy for DXF output
    #[arg(long = "accuracy", default_value = "10")]
    accuracy: f64,

    /// DXF drawing units (in, ft, mm, cm, m)
    #[arg(short = 'u', long = "units", default_value = config::DEFAULT_UNITS)]
    units: Unit,

    /// Write the SVG to this file instead of stdout
    #[arg(short = 'o', long = "svg")]
    svg: Option<PathBuf>,

    /// Also write a DXF drawing to this file
    #[arg(long = "dxf")]
    dxf: Option<PathBuf>,

    /// Print the formatted SVG markup
    #[arg(long = "code")]
    code: bool,

    /// Copy the formatted SVG markup to the clipboard
    #[arg(long = "copy")]
    copy: bool,

    /// Read edit commands from stdin and re-render after each one
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Quiet period before a typed edit is rendered (interactive mode)
    #[arg(long = "debounce-ms", default_value_t = 500)]
    debounce_ms: u64,

    /// More logging (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_size(raw: &str) -> Result<f64, String> {
    config::parse_font_size(raw).map_err(|e| e.to_string())
}

impl Cli {
    /// Render settings carried by the flags.
    fn patch(&self) -> ConfigPatch {
        ConfigPatch {
            font_size: Some(self.size),
            fill: Some(self.fill.clone()),
            filled: Some(!self.no_fill),
            stroke: Some(self.stroke.clone()),
            stroke_width: self.stroke_width.clone(),
            stroke_non_scaling: Some(!self.scaling_stroke),
            fill_rule: self.fill_rule,
            separate: Some(!self.joined),
            union: Some(self.union),
            kerning: Some(!self.no_kerning),
            bezier_accuracy: Some(self.accuracy),
            units: Some(self.units.as_str().to_string()),
            ..ConfigPatch::default()
        }
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn clipboard() -> Box<dyn Clipboard> {
    match CommandClipboard::detect() {
        Some(c) => Box::new(c),
        None => Box::new(NoClipboard),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(font_path) = cli.font.as_ref() else {
        fail("no font given; use --font or TYPOFY_FONT");
    };
    let font = FontHandle::load(font_path).unwrap_or_else(|e| fail(e));

    if cli.interactive {
        run_interactive(&cli, font);
    } else {
        run_once(&cli, &font);
    }
}

// ─── One-shot ────────────────────────────────────────────────────────────────

fn run_once(cli: &Cli, font: &FontHandle) {
    let text = match &cli.text {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                fail(format!("cannot read stdin: {e}"));
            }
            buf.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let output = render_text(font, &text, &cli.patch()).unwrap_or_else(|e| fail(e));

    if let Some(path) = &cli.dxf {
        if let Err(e) = fs::write(path, &output.dxf) {
            fail(format!("cannot write '{}': {e}", path.display()));
        }
    }

    let mut stdout = io::stdout();
    match &cli.svg {
        Some(path) => {
            if let Err(e) = fs::write(path, &output.svg) {
                fail(format!("cannot write '{}': {e}", path.display()));
            }
        }
        None if !cli.code => {
            let _ = writeln!(stdout, "{}", output.svg);
        }
        None => {}
    }

    if cli.code {
        let code = if stdout.is_terminal() {
            highlight_markup(&output.formatted)
        } else {
            output.formatted.clone()
        };
        let _ = stdout.write_all(code.as_bytes());
    }
    if let Err(e) = stdout.flush() {
        fail(format!("cannot flush stdout: {e}"));
    }

    if cli.copy {
        let mut notifier = StderrNotifier;
        match clipboard().write_text(&output.formatted) {
            Ok(()) => notifier.notify(Notification::success("Copied to clipboard!")),
            Err(e) => notifier.notify(Notification::error(e.to_string())),
        }
    }
}

// ─── Interactive ─────────────────────────────────────────────────────────────

const HELP: &str = "commands: text <s> | size <n> | fill <c> | stroke <c> | stroke-width <w> | \
separate on|off | filled on|off | font <path> | copy | quit";

fn run_interactive(cli: &Cli, font: FontHandle) {
    let preview = FilePreview {
        svg_path: cli.svg.clone().unwrap_or_else(|| PathBuf::from("typofy.svg")),
        dxf_path: cli.dxf.clone(),
    };
    let code_out: Box<dyn Write + Send> = if cli.code {
        Box::new(io::stdout())
    } else {
        Box::new(io::sink())
    };
    let color = cli.code && io::stdout().is_terminal();
    let surfaces = Surfaces::new(preview, WriterCode::new(code_out, color));

    let mut editor = Editor::new(surfaces, StderrNotifier);
    let mut initial = cli.patch();
    initial.text = cli.text.clone();
    editor.record(&initial);
    editor.set_font(font);

    let settings = SessionSettings {
        debounce: Duration::from_millis(cli.debounce_ms),
        default_font: None,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| fail(format!("cannot start runtime: {e}")));

    runtime.block_on(async move {
        let (handle, task) = session::spawn(editor, settings);
        eprintln!("{HELP}");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if !dispatch(&handle, &line).await {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    eprintln!("error: cannot read stdin: {e}");
                    break;
                }
            }
        }

        handle.settle().await;
        handle.shutdown();
        if let Err(e) = task.await {
            fail(format!("session ended abnormally: {e}"));
        }
    });
}

fn parse_switch(value: &str) -> Option<bool> {
    match value {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Handle one command line. Returns false when the user asked to quit.
async fn dispatch(handle: &SessionHandle, line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    let (command, value) = line.split_once(' ').unwrap_or((line, ""));
    let command = command.trim();
    match command {
        "" => {}
        "quit" | "exit" => return false,
        "text" => handle.text(value),
        "size" => {
            if let Err(e) = handle.font_size(value) {
                eprintln!("error: {e}");
            }
        }
        "fill" => handle.fill(value.trim()),
        "stroke" => handle.stroke(value.trim()),
        "stroke-width" => handle.stroke_width(value.trim()),
        "separate" | "filled" => match parse_switch(value.trim()) {
            Some(on) if command == "separate" => handle.separate(on),
            Some(on) => handle.filled(on),
            None => eprintln!("error: expected on or off, got '{}'", value.trim()),
        },
        "font" => match fs::read(value.trim()) {
            Ok(bytes) => handle.upload_font(bytes),
            Err(e) => eprintln!("error: cannot read '{}': {e}", value.trim()),
        },
        "copy" => {
            handle.settle().await;
            let copied = match CommandClipboard::detect() {
                Some(c) => handle.copy(c).await,
                None => handle.copy(NoClipboard).await,
            };
            if !copied {
                log::debug!("nothing copied");
            }
        }
        "help" => eprintln!("{HELP}"),
        other => eprintln!("error: unknown command '{other}'; {HELP}"),
    }
    true
}
