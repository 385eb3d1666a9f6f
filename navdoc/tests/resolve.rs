#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{fs, path::Path};

use navdoc::resolve::{DocContext, DocTarget, ListingKind};
use tempfile::TempDir;

/// Lay out a small documentation root:
///
/// ```text
/// root/
///   doc/effective_go.html
///   doc/docs.html
///   doc/go_spec.pdf
///   doc/articles/index.html
///   misc/vim/README
///   src/pkg/fmt/print.go
///   src/cmd/go/main.go
/// ```
fn doc_root() -> TempDir {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let root = dir.path();
  for file in [
    "doc/effective_go.html",
    "doc/docs.html",
    "doc/go_spec.pdf",
    "doc/articles/index.html",
    "misc/vim/README",
    "src/pkg/fmt/print.go",
    "src/cmd/go/main.go",
  ] {
    let path = root.join(file);
    fs::create_dir_all(path.parent().expect("file has a parent"))
      .expect("Failed to create directory");
    fs::write(&path, "<p>stub</p>").expect("Failed to write file");
  }
  dir
}

fn page(path: &Path, nav: bool) -> DocTarget {
  DocTarget::Page {
    path: path.to_path_buf(),
    nav,
  }
}

#[test]
fn html_page_under_root() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());

  assert_eq!(
    context.resolve("/doc/effective_go.html"),
    page(&dir.path().join("doc/effective_go.html"), true)
  );
}

#[test]
fn falls_back_to_doc_directory() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());

  assert_eq!(
    context.resolve("effective_go.html"),
    page(&dir.path().join("doc/effective_go.html"), true)
  );
}

#[test]
fn docs_page_has_no_navigation() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());
  let docs = dir.path().join("doc/docs.html");

  assert_eq!(context.resolve("/doc/docs.html"), page(&docs, false));

  let context = context.with_no_nav_pages(Vec::new());
  assert_eq!(context.resolve("/doc/docs.html"), page(&docs, true));
}

#[test]
fn directory_resolves_to_index() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());

  assert_eq!(
    context.resolve("/articles/"),
    page(&dir.path().join("doc/articles/index.html"), true)
  );
}

#[test]
fn directory_without_index_is_unsupported() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());

  assert_eq!(
    context.resolve("/misc/vim"),
    DocTarget::Unsupported(dir.path().join("misc/vim"))
  );
  assert_eq!(
    context.resolve("/misc/vim/README"),
    DocTarget::Unsupported(dir.path().join("misc/vim/README"))
  );
}

#[test]
fn pkg_and_cmd_directories_are_listings() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());

  let pkg = context.resolve("/src/pkg/");
  assert_eq!(pkg, DocTarget::Listing {
    kind: ListingKind::Pkg,
    path: dir.path().join("src/pkg/"),
  });
  assert_eq!(pkg.header().as_deref(), Some("Directory /src/pkg"));
  assert!(!pkg.nav());

  assert!(matches!(
    context.resolve("/src/cmd"),
    DocTarget::Listing {
      kind: ListingKind::Cmd,
      ..
    }
  ));
}

#[test]
fn source_file_with_selection() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());
  let print_go = dir.path().join("src/pkg/fmt/print.go");

  assert_eq!(
    context.resolve("/src/pkg/fmt/print.go?s=1032:1070#L25"),
    DocTarget::Source {
      path:   print_go.clone(),
      offset: Some(1032),
    }
  );
  assert_eq!(context.resolve("/src/pkg/fmt/print.go"), DocTarget::Source {
    path:   print_go,
    offset: None,
  });
}

#[test]
fn pdf_is_a_document() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());

  assert_eq!(
    context.resolve("file:///doc/go_spec.pdf"),
    DocTarget::Document(dir.path().join("doc/go_spec.pdf"))
  );
}

#[test]
fn external_urls_are_not_resolved() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());

  assert_eq!(
    context.resolve("http://golang.org/doc/"),
    DocTarget::External("http://golang.org/doc/".to_string())
  );
}

#[test]
fn unknown_path_names_a_package() {
  let dir = doc_root();
  let context = DocContext::new(dir.path());

  let target = context.resolve("net/http");
  assert_eq!(target, DocTarget::Package("net/http".to_string()));
  assert_eq!(target.header().as_deref(), Some("Package net/http"));
  assert!(target.nav());
}

#[test]
fn parent_components_are_refused() {
  let dir = doc_root();
  let context = DocContext::new(dir.path().join("doc"));

  assert!(matches!(
    context.resolve("/../src/pkg/fmt/print.go"),
    DocTarget::Unsupported(_)
  ));
}

#[test]
fn absolute_requests_stay_under_root() {
  let dir = doc_root();
  let outside = TempDir::new().expect("Failed to create temp dir");
  let secret = outside.path().join("secret.html");
  fs::write(&secret, "<p>secret</p>").expect("Failed to write file");
  let context = DocContext::new(dir.path());

  for request in [
    format!("/{}", secret.display()),
    format!("///{}", secret.display()),
    format!("file:///{}", secret.display()),
  ] {
    let target = context.resolve(&request);
    assert!(
      !matches!(&target, DocTarget::Page { path, .. } if path == &secret),
      "{request} escaped the root: {target:?}"
    );
  }

  // Extra slashes are dropped and the path is looked up under the root
  assert_eq!(
    context.resolve("//doc/effective_go.html"),
    page(&dir.path().join("doc/effective_go.html"), true)
  );
}
