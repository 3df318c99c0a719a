//! Font handles: an opaque, immutable, cheaply clonable parsed font.
//!
//! A [`FontHandle`] owns the raw font bytes and is validated once on
//! construction. It is never mutated: uploading a new font replaces the
//! handle wholesale.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ttf_parser::Face;

use crate::error::FontError;

struct FontData {
    bytes: Vec<u8>,
    family: Option<String>,
    units_per_em: u16,
    glyph_count: u16,
}

/// A parsed font shared by reference between the editor and its renders.
#[derive(Clone)]
pub struct FontHandle {
    data: Arc<FontData>,
}

impl FontHandle {
    /// Parse font bytes (face 0 of a TrueType/OpenType file or collection).
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        if bytes.is_empty() {
            return Err(FontError::Parse("font data is empty".to_string()));
        }
        let (family, units_per_em, glyph_count) = {
            let face = Face::parse(&bytes, 0)?;
            let family = face
                .names()
                .into_iter()
                .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
                .find_map(|name| name.to_string());
            (family, face.units_per_em(), face.number_of_glyphs())
        };
        Ok(Self {
            data: Arc::new(FontData {
                bytes,
                family,
                units_per_em,
                glyph_count,
            }),
        })
    }

    /// Read and parse a font file, blocking the calling thread.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FontError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_bytes(bytes)
    }

    pub fn family_name(&self) -> Option<&str> {
        self.data.family.as_deref()
    }

    pub fn units_per_em(&self) -> u16 {
        self.data.units_per_em
    }

    pub fn glyph_count(&self) -> u16 {
        self.data.glyph_count
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data.bytes
    }

    /// Run `f` against the parsed face.
    ///
    /// The face is re-parsed from the owned bytes on every call; parsing
    /// only reads the table directory so this is cheap.
    pub fn with_face<R>(&self, f: impl FnOnce(&Face<'_>) -> R) -> Result<R, FontError> {
        let face = Face::parse(&self.data.bytes, 0)?;
        Ok(f(&face))
    }

    /// Two handles are the same font when they share the same bytes.
    pub fn same_font(&self, other: &FontHandle) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_font(other)
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("family", &self.data.family)
            .field("units_per_em", &self.data.units_per_em)
            .field("glyph_count", &self.data.glyph_count)
            .field("bytes", &self.data.bytes.len())
            .finish()
    }
}

/// Read and parse a font file on the tokio runtime.
///
/// Dropping or aborting the returned future abandons the load.
pub async fn load_font(path: impl AsRef<Path>) -> Result<FontHandle, FontError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| FontError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::debug!("read {} font bytes from {}", bytes.len(), path.display());
    FontHandle::from_bytes(bytes)
}

#[cfg(test)]
#[path = "../tests/rust/test_font.rs"]
mod tests;
