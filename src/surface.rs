//! Output surfaces a render writes to.
//!
//! The preview surface receives the raw SVG plus the DXF text as auxiliary
//! data; the code surface receives the formatted markup and can be asked to
//! highlight it. A surface slot left empty is "not mounted" and makes
//! renders a silent no-op.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tempfile::NamedTempFile;

use crate::highlight::highlight_markup;

pub trait PreviewSurface: Send {
    /// Show `svg` with `dxf` attached as one update. On error the previous
    /// preview must still be in place.
    fn show(&mut self, svg: &str, dxf: &str) -> io::Result<()>;
}

pub trait CodeSurface: Send {
    fn show_code(&mut self, code: &str) -> io::Result<()>;
    /// Plain text currently displayed.
    fn code(&self) -> String;
    fn highlight(&mut self) -> io::Result<()>;
}

/// The pair of surfaces owned by the editor.
#[derive(Default)]
pub struct Surfaces {
    pub preview: Option<Box<dyn PreviewSurface>>,
    pub code: Option<Box<dyn CodeSurface>>,
}

impl Surfaces {
    pub fn new(preview: impl PreviewSurface + 'static, code: impl CodeSurface + 'static) -> Self {
        Self {
            preview: Some(Box::new(preview)),
            code: Some(Box::new(code)),
        }
    }

    /// Neither surface mounted.
    pub fn unmounted() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.preview.is_some() && self.code.is_some()
    }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryState {
    pub svg: Option<String>,
    pub dxf: Option<String>,
    pub code: Option<String>,
    pub highlighted: Option<String>,
    pub writes: usize,
}

/// Both surfaces backed by shared memory; clones observe the same state.
#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> MemoryState {
        self.lock().clone()
    }

    pub fn svg(&self) -> Option<String> {
        self.lock().svg.clone()
    }

    pub fn dxf(&self) -> Option<String> {
        self.lock().dxf.clone()
    }

    pub fn highlighted(&self) -> Option<String> {
        self.lock().highlighted.clone()
    }

    /// Number of completed preview writes.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Mount clones of this surface in both slots.
    pub fn surfaces(&self) -> Surfaces {
        Surfaces::new(self.clone(), self.clone())
    }
}

impl PreviewSurface for MemorySurface {
    fn show(&mut self, svg: &str, dxf: &str) -> io::Result<()> {
        let mut state = self.lock();
        state.svg = Some(svg.to_string());
        state.dxf = Some(dxf.to_string());
        state.writes += 1;
        Ok(())
    }
}

impl CodeSurface for MemorySurface {
    fn show_code(&mut self, code: &str) -> io::Result<()> {
        let mut state = self.lock();
        state.code = Some(code.to_string());
        state.highlighted = None;
        Ok(())
    }

    fn code(&self) -> String {
        self.lock().code.clone().unwrap_or_default()
    }

    fn highlight(&mut self) -> io::Result<()> {
        let mut state = self.lock();
        state.highlighted = state.code.as_deref().map(highlight_markup);
        Ok(())
    }
}

// ─── Files ───────────────────────────────────────────────────────────────────

/// Preview written to disk: the SVG to one file, the DXF to another.
///
/// Both files are written to temporaries next to their targets first and
/// only moved into place once every write has succeeded.
#[derive(Debug, Clone)]
pub struct FilePreview {
    pub svg_path: PathBuf,
    pub dxf_path: Option<PathBuf>,
}

/// Write `contents` to a temporary file in the directory of `dest`.
fn stage(dest: &Path, contents: &str) -> io::Result<NamedTempFile> {
    let dir = match dest.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

impl PreviewSurface for FilePreview {
    fn show(&mut self, svg: &str, dxf: &str) -> io::Result<()> {
        let svg_file = stage(&self.svg_path, svg)?;
        let dxf_file = match &self.dxf_path {
            Some(path) => Some((stage(path, dxf)?, path)),
            None => None,
        };

        svg_file.persist(&self.svg_path).map_err(|e| e.error)?;
        if let Some((file, path)) = dxf_file {
            file.persist(path).map_err(|e| e.error)?;
        }
        Ok(())
    }
}

// ─── Terminal ────────────────────────────────────────────────────────────────

/// Code view that prints to a writer, highlighted when `color` is set.
pub struct WriterCode<W> {
    out: W,
    code: String,
    color: bool,
}

impl<W: Write + Send> WriterCode<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            code: String::new(),
            color,
        }
    }
}

impl<W: Write + Send> CodeSurface for WriterCode<W> {
    fn show_code(&mut self, code: &str) -> io::Result<()> {
        self.code = code.to_string();
        Ok(())
    }

    fn code(&self) -> String {
        self.code.clone()
    }

    fn highlight(&mut self) -> io::Result<()> {
        let text = if self.color {
            highlight_markup(&self.code)
        } else {
            self.code.clone()
        };
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_surface.rs"]
mod tests;
