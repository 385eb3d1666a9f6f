//! Type definitions shared by the transformer and its callers.
use std::fmt;

/// Opening markup of the navigation fragment.
pub(crate) const NAV_OPEN: &str =
  r#"<table class="unruled"><tbody><tr><td class="first"><dl>"#;

/// Closing markup of the navigation fragment.
///
/// Closes the entry list, then emits an empty second column and a trailing
/// `<tr>` that is never closed.
pub(crate) const NAV_CLOSE: &str =
  "</dl></td><td><dl></dl></td><tr></tbody></table>";

/// An HTML document body as an ordered list of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
  lines: Vec<String>,
}

impl RawDocument {
  /// Build a document from pre-split lines.
  pub fn from_lines<I, S>(lines: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      lines: lines.into_iter().map(Into::into).collect(),
    }
  }

  #[must_use]
  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  #[must_use]
  pub const fn len(&self) -> usize {
    self.lines.len()
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }
}

impl From<&str> for RawDocument {
  /// Split on `\n`. An empty string yields a single empty line, which rejoins
  /// to an empty body.
  fn from(text: &str) -> Self {
    Self::from_lines(text.split('\n'))
  }
}

/// Anchor id of a heading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeadingId {
  /// The heading already carried a non-empty `id` attribute.
  Explicit(String),

  /// Generated from the 1-based line number of the heading.
  Synthetic(usize),
}

impl fmt::Display for HeadingId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Explicit(id) => f.write_str(id),
      Self::Synthetic(line) => write!(f, "tmp_{line}"),
    }
  }
}

/// Heading levels that take part in navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
  /// `<h2>`, rendered as a top-level `<dt>` entry.
  H2,

  /// `<h3>`, rendered as a nested `<dd>` entry.
  H3,
}

impl HeadingLevel {
  /// Element name of the heading.
  #[must_use]
  pub const fn tag(self) -> &'static str {
    match self {
      Self::H2 => "h2",
      Self::H3 => "h3",
    }
  }

  /// Recognise a heading line by its opening characters.
  pub(crate) fn from_line(line: &str) -> Option<Self> {
    if line.starts_with("<h2") {
      Some(Self::H2)
    } else if line.starts_with("<h3") {
      Some(Self::H3)
    } else {
      None
    }
  }

  const fn nav_tag(self) -> &'static str {
    match self {
      Self::H2 => "dt",
      Self::H3 => "dd",
    }
  }
}

/// One entry of the navigation fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
  pub id:    HeadingId,
  pub text:  String,
  pub level: HeadingLevel,
}

impl NavEntry {
  /// Render as `<dt><a href="#id">text</a></dt>` (or `<dd>` for `<h3>`).
  #[must_use]
  pub fn to_markup(&self) -> String {
    let tag = self.level.nav_tag();
    format!(
      "<{tag}><a href=\"#{}\">{}</a></{tag}>",
      html_escape::encode_double_quoted_attribute(&self.id.to_string()),
      html_escape::encode_text(&self.text)
    )
  }
}

/// Output of a single transform pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformResult {
  /// Body lines in input order, heading lines replaced.
  pub body_lines: Vec<String>,

  /// `<h1>` header taken from the title comment on the first line.
  pub header: Option<String>,

  /// Navigation entries in document order.
  pub nav_entries: Vec<NavEntry>,
}

impl TransformResult {
  /// The rewritten body, lines joined with `\n`.
  #[must_use]
  pub fn body(&self) -> String {
    self.body_lines.join("\n")
  }

  /// The navigation fragment markup.
  #[must_use]
  pub fn nav(&self) -> String {
    let mut nav = String::from(NAV_OPEN);
    for entry in &self.nav_entries {
      nav.push_str(&entry.to_markup());
    }
    nav.push_str(NAV_CLOSE);
    nav
  }

  /// The generated header, or `fallback` when the document had no title.
  #[must_use]
  pub fn header_or<'a>(&'a self, fallback: &'a str) -> &'a str {
    self.header.as_deref().unwrap_or(fallback)
  }
}
