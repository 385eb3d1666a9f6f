use std::io;

use thiserror::Error;

/// Top-level error type for the navdoc crate.
#[derive(Debug, Error)]
pub enum NavdocError {
  #[error("Template error: {0}")]
  Template(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Rendering error: {0}")]
  Render(String),
}

/// Result type for navdoc operations.
pub type Result<T> = std::result::Result<T, NavdocError>;
