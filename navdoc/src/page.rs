//! Page assembly: splicing a transformed document into a page template.
use std::{fs, path::Path};

use log::warn;
use navdoc_templates::{
  CONTENT_PLACEHOLDER,
  HEADER_PLACEHOLDER,
  NAV_PLACEHOLDER,
  PAGE_TEMPLATE,
};
use navdoc_transform::TransformResult;

use crate::error::{NavdocError, Result};

/// Per-page rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
  /// Header markup that replaces the generated one when non-empty. Inserted
  /// verbatim.
  pub header: Option<String>,

  /// Whether the navigation fragment is included.
  pub nav: bool,
}

impl Default for PageOptions {
  fn default() -> Self {
    Self {
      header: None,
      nav:    true,
    }
  }
}

impl PageOptions {
  #[must_use]
  pub fn with_header(mut self, header: impl Into<String>) -> Self {
    self.header = Some(header.into());
    self
  }

  #[must_use]
  pub const fn with_nav(mut self, nav: bool) -> Self {
    self.nav = nav;
    self
  }
}

/// A page template with `{header}`, `{nav}` and `{content}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
  source: String,
}

impl Default for PageTemplate {
  fn default() -> Self {
    Self::new(PAGE_TEMPLATE)
  }
}

impl PageTemplate {
  pub fn new(source: impl Into<String>) -> Self {
    let source = source.into();
    for placeholder in [HEADER_PLACEHOLDER, NAV_PLACEHOLDER, CONTENT_PLACEHOLDER]
    {
      if !source.contains(placeholder) {
        warn!("Page template has no {placeholder} placeholder");
      }
    }
    Self { source }
  }

  /// Load a template from disk.
  ///
  /// # Errors
  ///
  /// Returns [`NavdocError::Template`] if the file cannot be read.
  pub fn from_file(path: &Path) -> Result<Self> {
    let source = fs::read_to_string(path).map_err(|e| {
      NavdocError::Template(format!(
        "Failed to read template {}: {e}",
        path.display()
      ))
    })?;
    Ok(Self::new(source))
  }

  /// Load `path` if given, else the embedded template.
  ///
  /// # Errors
  ///
  /// Returns an error if a given template cannot be read.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    path.map_or_else(|| Ok(Self::default()), Self::from_file)
  }

  #[must_use]
  pub fn source(&self) -> &str {
    &self.source
  }

  /// Render a page.
  ///
  /// The header is the first non-empty of: `options.header`, the header
  /// extracted from the document, `fallback_header`. Placeholders are replaced
  /// in the order header, nav, content.
  #[must_use]
  pub fn render(
    &self,
    result: &TransformResult,
    options: &PageOptions,
    fallback_header: &str,
  ) -> String {
    let header = options
      .header
      .as_deref()
      .filter(|header| !header.is_empty())
      .unwrap_or_else(|| result.header_or(fallback_header));
    let nav = if options.nav {
      result.nav()
    } else {
      String::new()
    };

    self
      .source
      .replace(HEADER_PLACEHOLDER, header)
      .replace(NAV_PLACEHOLDER, &nav)
      .replace(CONTENT_PLACEHOLDER, &result.body())
  }
}
