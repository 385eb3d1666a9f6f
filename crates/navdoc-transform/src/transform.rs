//! The navigable-document transform.
use log::{debug, trace};

use crate::{
  fragment::{Element, Fragment, Node},
  title::extract_header,
  types::{HeadingId, HeadingLevel, NavEntry, RawDocument, TransformResult},
};

/// Trimmed lines shorter than this are never treated as headings.
const MIN_HEADING_LEN: usize = 10;

/// Rewrites generated documentation into a navigable page.
///
/// The transformer holds no state, so one instance can be shared freely
/// between threads and reused across documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavDocTransformer;

impl NavDocTransformer {
  #[must_use]
  pub const fn new() -> Self {
    Self
  }

  /// Transform a document.
  ///
  /// The body keeps the line count and order of `raw`. Only lines that parse
  /// as a single `<h2>` or `<h3>` element are replaced, each with an anchor id
  /// and, for `<h2>`, a trailing `[Top]` link.
  #[must_use]
  pub fn transform(&self, raw: &RawDocument) -> TransformResult {
    let header = raw
      .lines()
      .first()
      .and_then(|line| extract_header(line));

    let mut body_lines = Vec::with_capacity(raw.len());
    let mut nav_entries = Vec::new();

    for (index, source) in raw.lines().iter().enumerate() {
      match annotate_heading(source, index + 1) {
        Some((line, entry)) => {
          body_lines.push(line);
          nav_entries.push(entry);
        },
        None => body_lines.push(source.clone()),
      }
    }

    debug!(
      "Transformed {} lines, {} navigation entries",
      body_lines.len(),
      nav_entries.len()
    );

    TransformResult {
      body_lines,
      header,
      nav_entries,
    }
  }
}

/// Transform a `\n`-separated document with a default transformer.
#[must_use]
pub fn transform_str(text: &str) -> TransformResult {
  NavDocTransformer::new().transform(&RawDocument::from(text))
}

/// Rewrite a heading line. `line_number` is 1-based.
///
/// Returns `None` when the line is not a heading or does not parse, in which
/// case the caller keeps the original line. A replaced line loses its
/// indentation but keeps a trailing `\r`, so CRLF documents stay CRLF.
fn annotate_heading(
  source: &str,
  line_number: usize,
) -> Option<(String, NavEntry)> {
  let line = source.trim();
  if line.chars().count() < MIN_HEADING_LEN {
    return None;
  }
  let level = HeadingLevel::from_line(line)?;

  let mut fragment = match Fragment::parse(line) {
    Ok(fragment) => fragment,
    Err(e) => {
      debug!("Skipping malformed heading on line {line_number}: {e}");
      return None;
    },
  };
  if fragment.root.name != level.tag() {
    trace!(
      "Line {line_number} starts like <{}> but is <{}>",
      level.tag(),
      fragment.root.name
    );
    return None;
  }

  let text = fragment.root.text();
  let id = match fragment.root.attribute("id") {
    Some(id) if !id.is_empty() => HeadingId::Explicit(id.to_string()),
    _ => {
      let id = HeadingId::Synthetic(line_number);
      fragment.root.set_attribute("id", id.to_string());
      id
    },
  };

  if level == HeadingLevel::H2 {
    fragment.root.append_child(Node::Element(top_link()));
  }

  let mut replacement = fragment.to_string();
  if source.ends_with('\r') {
    replacement.push('\r');
  }

  Some((replacement, NavEntry { id, text, level }))
}

/// `<span class="navtop"><a href="#top">[Top]</a></span>`
fn top_link() -> Element {
  Element::new("span")
    .with_attribute("class", "navtop")
    .with_child(Node::Element(
      Element::new("a")
        .with_attribute("href", "#top")
        .with_child(Node::Text("[Top]".to_string())),
    ))
}
