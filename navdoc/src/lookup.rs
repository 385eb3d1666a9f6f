//! Parsing of the package lookup tool's output.
//!
//! The lookup tool answers on a single comma-separated line:
//!
//! - `$find,<best>,<match>,...` for a package search, where `<best>` is empty
//!   when there is no exact match
//! - `$list,<entry>,...` for a directory listing
use serde::Serialize;

/// Shown in place of an empty search result.
pub const NOT_FOUND: &str = "<not find>";

/// Parsed lookup tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LookupOutput {
  /// Search result. A `best` match, when present, is also the first entry of
  /// `matches`.
  Find {
    best:    Option<String>,
    matches: Vec<String>,
  },

  /// Directory listing.
  List { entries: Vec<String> },

  /// Output that follows neither format.
  Unrecognized,
}

impl LookupOutput {
  /// Parse one response of the lookup tool.
  #[must_use]
  pub fn parse(output: &str) -> Self {
    let mut fields = output.trim().split(',').map(str::to_string);
    let marker = fields.next();
    let rest: Vec<String> = fields.collect();

    match marker.as_deref() {
      Some("$find") if !rest.is_empty() => {
        let mut matches = rest;
        let best = if matches[0].is_empty() {
          matches.remove(0);
          None
        } else {
          Some(matches[0].clone())
        };
        Self::Find { best, matches }
      },
      Some("$list") => Self::List { entries: rest },
      _ => Self::Unrecognized,
    }
  }

  /// Entries to show to the user, one per line.
  #[must_use]
  pub fn display_entries(&self) -> Vec<&str> {
    match self {
      Self::Find { matches, .. } if matches.is_empty() => vec![NOT_FOUND],
      Self::Find { matches, .. } => matches.iter().map(String::as_str).collect(),
      Self::List { entries } => entries.iter().map(String::as_str).collect(),
      Self::Unrecognized => Vec::new(),
    }
  }
}
