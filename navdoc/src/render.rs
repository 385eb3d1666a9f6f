//! Rendering documents from files or streams into full pages.
use std::{
  collections::HashMap,
  fs,
  io::{self, Read},
  path::{Path, PathBuf},
};

use log::{debug, info};
use navdoc_config::Config;
use navdoc_templates::PAGE_CSS;
use navdoc_transform::{NavDocTransformer, RawDocument, TransformResult};
use rayon::prelude::*;

use crate::{
  error::{NavdocError, Result},
  page::{PageOptions, PageTemplate},
};

/// File name the embedded page template links its stylesheet as.
pub const STYLESHEET_NAME: &str = "page.css";

/// Transforms documents and splices them into a page template.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
  transformer:     NavDocTransformer,
  template:        PageTemplate,
  fallback_header: String,
}

impl Renderer {
  #[must_use]
  pub fn new(template: PageTemplate, fallback_header: impl Into<String>) -> Self {
    Self {
      transformer: NavDocTransformer::new(),
      template,
      fallback_header: fallback_header.into(),
    }
  }

  /// Build a renderer from configuration, loading the configured template.
  ///
  /// # Errors
  ///
  /// Returns an error if the configured template cannot be read.
  pub fn from_config(config: &Config) -> Result<Self> {
    let template = PageTemplate::load(config.template_path.as_deref())?;
    Ok(Self::new(template, config.fallback_header.clone()))
  }

  #[must_use]
  pub const fn template(&self) -> &PageTemplate {
    &self.template
  }

  /// Transform a document without rendering a page.
  #[must_use]
  pub fn transform(&self, html: &str) -> TransformResult {
    self.transformer.transform(&RawDocument::from(html))
  }

  /// Transform a document and render it as a full page.
  #[must_use]
  pub fn render_document(&self, html: &str, options: &PageOptions) -> String {
    let result = self.transform(html);
    self.template.render(&result, options, &self.fallback_header)
  }

  /// Render `input` into `output`.
  ///
  /// # Errors
  ///
  /// Returns an error if the input cannot be read or the output written.
  pub fn render_file(
    &self,
    input: &Path,
    output: &Path,
    options: &PageOptions,
  ) -> Result<()> {
    let html = read_document(input)?;
    let page = self.render_document(&html, options);
    write_page(output, &page)?;
    info!("Rendered {} -> {}", input.display(), output.display());
    Ok(())
  }

  /// Render several files in parallel into `output_dir`, each as
  /// `<stem>.html`, next to the stylesheet. `options_for` picks the options
  /// per input.
  ///
  /// # Errors
  ///
  /// Fails before writing anything if two inputs share an output name.
  /// Otherwise returns the first error encountered, and files rendered before
  /// it stay on disk.
  pub fn render_batch<F>(
    &self,
    inputs: &[PathBuf],
    output_dir: &Path,
    options_for: F,
  ) -> Result<Vec<PathBuf>>
  where
    F: Fn(&Path) -> PageOptions + Sync,
  {
    let mut seen = HashMap::with_capacity(inputs.len());
    let mut outputs = Vec::with_capacity(inputs.len());
    for input in inputs {
      let name = output_name(input)?;
      if let Some(previous) = seen.insert(name.clone(), input) {
        return Err(NavdocError::Render(format!(
          "{} and {} would both be written to {}",
          previous.display(),
          input.display(),
          name.display()
        )));
      }
      outputs.push((input, output_dir.join(name)));
    }

    fs::create_dir_all(output_dir)?;
    self.write_stylesheet(output_dir)?;

    outputs
      .into_par_iter()
      .map(|(input, output)| -> Result<PathBuf> {
        self.render_file(input, &output, &options_for(input))?;
        Ok(output)
      })
      .collect()
  }

  /// Write the embedded stylesheet into `dir` when the template links it.
  /// An existing stylesheet is left alone.
  ///
  /// Returns the path written, if any.
  ///
  /// # Errors
  ///
  /// Returns an error if the stylesheet cannot be written.
  pub fn write_stylesheet(&self, dir: &Path) -> Result<Option<PathBuf>> {
    if !self.template.source().contains(STYLESHEET_NAME) {
      return Ok(None);
    }
    let path = dir.join(STYLESHEET_NAME);
    if path.exists() {
      debug!("Keeping existing stylesheet {}", path.display());
      return Ok(None);
    }
    write_page(&path, PAGE_CSS)?;
    debug!("Wrote stylesheet {}", path.display());
    Ok(Some(path))
  }
}

/// Output file name for a batch input.
fn output_name(input: &Path) -> Result<PathBuf> {
  let stem = input.file_stem().ok_or_else(|| {
    NavdocError::Render(format!("Input has no file name: {}", input.display()))
  })?;
  Ok(PathBuf::from(stem).with_extension("html"))
}

/// Read a document, `-` meaning stdin. Invalid UTF-8 is replaced rather than
/// rejected.
///
/// # Errors
///
/// Returns an error if the document cannot be read.
pub fn read_document(path: &Path) -> Result<String> {
  let bytes = if path.as_os_str() == "-" {
    debug!("Reading document from stdin");
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;
    buffer
  } else {
    fs::read(path).map_err(|e| {
      NavdocError::Render(format!("Failed to read {}: {e}", path.display()))
    })?
  };
  Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write a rendered page, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the page cannot be written.
pub fn write_page(path: &Path, page: &str) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent)?;
  }
  fs::write(path, page).map_err(|e| {
    NavdocError::Render(format!("Failed to write {}: {e}", path.display()))
  })
}
