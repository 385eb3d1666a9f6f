//! Resolution of documentation requests against a documentation root.
//!
//! A request is whatever a link inside a rendered page points to: a path like
//! `/doc/effective_go.html`, a source link such as
//! `/src/pkg/fmt/print.go?s=1032:1070#L25`, a package name like `net/http`, or
//! an external URL. [`DocContext::resolve`] decides what the request refers to
//! without touching anything but the filesystem metadata.
use std::{
  fmt,
  path::{Component, Path, PathBuf},
};

use log::{debug, warn};

/// Directory listings that are produced by the lookup tool instead of an
/// `index.html`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
  Pkg,
  Cmd,
}

impl ListingKind {
  fn from_dir_name(name: &str) -> Option<Self> {
    match name {
      "pkg" => Some(Self::Pkg),
      "cmd" => Some(Self::Cmd),
      _ => None,
    }
  }

  /// Source tree the listing covers, relative to the root.
  #[must_use]
  pub const fn source_dir(self) -> &'static str {
    match self {
      Self::Pkg => "src/pkg",
      Self::Cmd => "src/cmd",
    }
  }
}

impl fmt::Display for ListingKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.source_dir())
  }
}

/// What a documentation request refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTarget {
  /// A URL with a non-`file` scheme, handed to the system browser.
  External(String),

  /// An HTML page to transform and render.
  Page { path: PathBuf, nav: bool },

  /// A Go source file, optionally with a byte offset to jump to.
  Source {
    path:   PathBuf,
    offset: Option<usize>,
  },

  /// A document opened with the system viewer (PDF).
  Document(PathBuf),

  /// A `pkg`/`cmd` directory listing.
  Listing { kind: ListingKind, path: PathBuf },

  /// An existing path with no viewer.
  Unsupported(PathBuf),

  /// Nothing matched on disk, so the request names a package.
  Package(String),
}

impl DocTarget {
  /// Header shown above the rendered page, if the target implies one.
  #[must_use]
  pub fn header(&self) -> Option<String> {
    match self {
      Self::Package(name) => Some(format!("Package {name}")),
      Self::Listing { kind, .. } => Some(format!("Directory /{kind}")),
      _ => None,
    }
  }

  /// Whether a page rendered for this target carries navigation.
  #[must_use]
  pub const fn nav(&self) -> bool {
    match self {
      Self::Page { nav, .. } => *nav,
      Self::Listing { .. } => false,
      _ => true,
    }
  }
}

impl fmt::Display for DocTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::External(url) => write!(f, "external {url}"),
      Self::Page { path, .. } => write!(f, "page {}", path.display()),
      Self::Source {
        path,
        offset: Some(offset),
      } => write!(f, "source {}:{offset}", path.display()),
      Self::Source { path, offset: None } => {
        write!(f, "source {}", path.display())
      },
      Self::Document(path) => write!(f, "document {}", path.display()),
      Self::Listing { kind, path } => {
        write!(f, "listing {kind} {}", path.display())
      },
      Self::Unsupported(path) => write!(f, "unsupported {}", path.display()),
      Self::Package(name) => write!(f, "package {name}"),
    }
  }
}

/// Resolution context. Holds what used to be ambient state of the viewer: the
/// documentation root and the pages shown without navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocContext {
  root:         PathBuf,
  no_nav_pages: Vec<String>,
}

impl DocContext {
  #[must_use]
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root:         root.into(),
      no_nav_pages: vec!["docs.html".to_string()],
    }
  }

  /// Replace the list of file names rendered without navigation.
  #[must_use]
  pub fn with_no_nav_pages(mut self, pages: Vec<String>) -> Self {
    self.no_nav_pages = pages;
    self
  }

  /// Resolve a request.
  ///
  /// The path is looked up under the root first and under `<root>/doc` second.
  #[must_use]
  pub fn resolve(&self, request: &str) -> DocTarget {
    let request = request.trim();
    let Some(parts) = RequestParts::parse(request) else {
      debug!("Request {request} is an external URL");
      return DocTarget::External(request.to_string());
    };

    let relative = parts.path.trim_start_matches('/');
    if Path::new(relative).components().any(|component| {
      matches!(
        component,
        Component::ParentDir | Component::RootDir | Component::Prefix(_)
      )
    }) {
      warn!("Refusing to resolve {request} outside of the root");
      return DocTarget::Unsupported(PathBuf::from(relative));
    }

    let Some(found) = [self.root.join(relative), self.root.join("doc").join(relative)]
      .into_iter()
      .find(|candidate| candidate.exists())
    else {
      debug!("{relative} not found under {}", self.root.display());
      return DocTarget::Package(relative.to_string());
    };

    let file = if found.is_dir() {
      let dir_name = found.file_name().and_then(|name| name.to_str());
      if let Some(kind) = dir_name.and_then(ListingKind::from_dir_name) {
        return DocTarget::Listing { kind, path: found };
      }
      let index = found.join("index.html");
      if !index.is_file() {
        return DocTarget::Unsupported(found);
      }
      index
    } else {
      found
    };

    self.classify_file(file, parts.query)
  }

  fn classify_file(&self, path: PathBuf, query: Option<&str>) -> DocTarget {
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match extension.as_deref() {
      Some("html") => {
        let file_name = path
          .file_name()
          .and_then(|name| name.to_str())
          .unwrap_or_default();
        let nav = !self
          .no_nav_pages
          .iter()
          .any(|page| page.eq_ignore_ascii_case(file_name));
        DocTarget::Page { path, nav }
      },
      Some("go") => {
        DocTarget::Source {
          offset: query.and_then(source_offset),
          path,
        }
      },
      Some("pdf") => DocTarget::Document(path),
      _ => DocTarget::Unsupported(path),
    }
  }
}

/// Path and query of a local request.
#[derive(Debug, PartialEq, Eq)]
struct RequestParts<'a> {
  path:  &'a str,
  query: Option<&'a str>,
}

impl<'a> RequestParts<'a> {
  /// Split a request into path and query. Returns `None` for URLs with a
  /// scheme other than `file`.
  fn parse(request: &'a str) -> Option<Self> {
    let rest = match scheme(request) {
      Some(scheme) if scheme.eq_ignore_ascii_case("file") => {
        let rest = &request[scheme.len() + 1..];
        rest.strip_prefix("//").unwrap_or(rest)
      },
      Some(_) => return None,
      None => request,
    };

    let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
    let (path, query) = match rest.split_once('?') {
      Some((path, query)) => (path, Some(query)),
      None => (rest, None),
    };
    Some(Self { path, query })
  }
}

/// URL scheme of `request`. Single letters are taken as drive letters, not
/// schemes.
fn scheme(request: &str) -> Option<&str> {
  let (scheme, _) = request.split_once(':')?;
  let mut chars = scheme.chars();
  let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
  (valid && scheme.len() > 1).then_some(scheme)
}

/// Begin offset of an `s=<begin>:<end>` query item.
fn source_offset(query: &str) -> Option<usize> {
  let selection = query
    .split('&')
    .find_map(|item| item.strip_prefix("s="))?;
  let (begin, end) = selection.split_once(':')?;
  if end.contains(':') {
    return None;
  }
  begin.parse().ok()
}
