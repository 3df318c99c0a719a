//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or parsing a font.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    /// The font file could not be read.
    #[error("cannot read font '{path}': {message}")]
    Io { path: PathBuf, message: String },

    /// The bytes are not a parsable OpenType/TrueType face.
    #[error("font parsing failed: {0}")]
    Parse(String),
}

impl From<ttf_parser::FaceParsingError> for FontError {
    fn from(error: ttf_parser::FaceParsingError) -> Self {
        FontError::Parse(error.to_string())
    }
}

/// Invalid values for a render configuration field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown unit '{0}'; use in, ft, mm, cm or m")]
    UnknownUnit(String),

    #[error("font size must be a positive number, got '{0}'")]
    InvalidFontSize(String),

    #[error("unknown fill rule '{0}'; use nonzero or evenodd")]
    UnknownFillRule(String),
}

/// Failures of the text-to-geometry-to-export pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An output surface rejected the write.
    #[error("cannot update output: {0}")]
    Output(String),
}

impl From<std::io::Error> for RenderError {
    fn from(error: std::io::Error) -> Self {
        RenderError::Output(error.to_string())
    }
}

/// Failures writing to the clipboard.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClipboardError {
    #[error("clipboard is not available")]
    Unavailable,

    #[error("clipboard command '{program}' failed: {message}")]
    Command { program: String, message: String },
}

/// Umbrella error for callers that drive the whole crate (CLI, bindings).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypofyError {
    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error("cannot write '{path}': {message}")]
    Output { path: PathBuf, message: String },
}
