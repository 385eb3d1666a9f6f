use std::io;

use thiserror::Error;

/// Error type for navdoc-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("TOML serialization error: {0}")]
  TomlSer(#[from] toml::ser::Error),
}
