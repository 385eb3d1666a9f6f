#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::fs;

use navdoc::{
  page::{PageOptions, PageTemplate},
  render::{Renderer, STYLESHEET_NAME, read_document, write_page},
};
use navdoc_config::Config;
use tempfile::TempDir;

const FMT_PAGE: &str = r#"<!-- title Package fmt -->
<h2 id="Overview">Overview</h2>
<p>Package fmt implements formatted I/O.</p>
<h3 id="Printf">func Printf</h3>"#;

const SPEC_PAGE: &str = "<h2>Introduction</h2>\n<p>This is a reference.</p>";

#[test]
fn embedded_template_page() {
  let page =
    Renderer::default().render_document(FMT_PAGE, &PageOptions::default());

  assert!(page.contains(r#"<div id="header"><h1>Package fmt</h1></div>"#));
  assert!(page.contains(r##"<dt><a href="#Overview">Overview</a></dt>"##));
  assert!(page.contains(r##"<dd><a href="#Printf">func Printf</a></dd>"##));
  assert!(page.contains(r#"<a name="top" id="top"></a>"#));
  assert!(!page.contains("{content}"));
}

#[test]
fn explicit_header_wins_and_nav_can_be_disabled() {
  let renderer = Renderer::new(
    PageTemplate::new("{header}|{nav}|{content}"),
    "<h1>Fallback</h1>",
  );
  let options = PageOptions::default()
    .with_header("<h1>Directory /src/pkg</h1>")
    .with_nav(false);
  let page = renderer.render_document(FMT_PAGE, &options);

  let (header, rest) = page.split_once('|').expect("header separator");
  let (nav, content) = rest.split_once('|').expect("nav separator");
  assert_eq!(header, "<h1>Directory /src/pkg</h1>");
  assert_eq!(nav, "");
  assert_eq!(content.lines().count(), FMT_PAGE.lines().count());
}

#[test]
fn empty_explicit_header_is_ignored() {
  let renderer = Renderer::new(PageTemplate::new("{header}"), "");
  let page = renderer
    .render_document(FMT_PAGE, &PageOptions::default().with_header(""));
  assert_eq!(page, "<h1>Package fmt</h1>");
}

#[test]
fn custom_template_from_config() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let template = dir.path().join("page.html");
  fs::write(&template, "<main>{nav}{content}</main>")
    .expect("Failed to write template");

  let config = Config {
    template_path: Some(template),
    ..Default::default()
  };
  let renderer = Renderer::from_config(&config).expect("Failed to load");
  assert_eq!(renderer.template().source(), "<main>{nav}{content}</main>");

  let missing = Config {
    template_path: Some(dir.path().join("missing.html")),
    ..Default::default()
  };
  assert!(Renderer::from_config(&missing).is_err());
}

#[test]
fn render_file_creates_parent_directories() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let input = dir.path().join("fmt.godoc");
  let output = dir.path().join("out/pkg/fmt.html");
  fs::write(&input, FMT_PAGE).expect("Failed to write input");

  Renderer::default()
    .render_file(&input, &output, &PageOptions::default())
    .expect("Failed to render");

  let page = fs::read_to_string(&output).expect("Failed to read output");
  assert!(page.contains("<h1>Package fmt</h1>"));
}

#[test]
fn batch_render_uses_per_file_options() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let fmt = dir.path().join("fmt.godoc");
  let docs = dir.path().join("docs.html");
  fs::write(&fmt, FMT_PAGE).expect("Failed to write input");
  fs::write(&docs, SPEC_PAGE).expect("Failed to write input");
  let output_dir = dir.path().join("site");

  let config = Config::default();
  let renderer = Renderer::new(PageTemplate::new("[{nav}]{content}"), "");
  let mut written = renderer
    .render_batch(&[fmt, docs], &output_dir, |input| {
      let name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
      PageOptions::default().with_nav(config.nav_for(name))
    })
    .expect("Failed to render batch");
  written.sort();

  assert_eq!(written, vec![
    output_dir.join("docs.html"),
    output_dir.join("fmt.html")
  ]);
  let docs_page =
    fs::read_to_string(output_dir.join("docs.html")).expect("docs output");
  assert!(docs_page.starts_with("[]"));
  let fmt_page =
    fs::read_to_string(output_dir.join("fmt.html")).expect("fmt output");
  assert!(fmt_page.starts_with("[<table"));
}

#[test]
fn batch_render_reports_missing_input() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let result = Renderer::default().render_batch(
    &[dir.path().join("absent.html")],
    &dir.path().join("site"),
    |_| PageOptions::default(),
  );
  assert!(result.is_err());
}

#[test]
fn invalid_utf8_is_replaced() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let input = dir.path().join("latin1.html");
  fs::write(&input, b"<p>caf\xe9</p>").expect("Failed to write input");

  let html = read_document(&input).expect("Failed to read");
  assert_eq!(html, "<p>caf\u{fffd}</p>");
}

#[test]
fn write_page_into_working_directory_name() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let path = dir.path().join("index.html");
  write_page(&path, "<p>x</p>").expect("Failed to write");
  assert_eq!(fs::read_to_string(path).expect("read back"), "<p>x</p>");
}

#[test]
fn batch_render_rejects_colliding_output_names() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let first = dir.path().join("a/fmt.html");
  let second = dir.path().join("b/fmt.godoc");
  for input in [&first, &second] {
    fs::create_dir_all(input.parent().expect("input has a parent"))
      .expect("Failed to create directory");
    fs::write(input, FMT_PAGE).expect("Failed to write input");
  }
  let output_dir = dir.path().join("site");

  let err = Renderer::default()
    .render_batch(&[first, second], &output_dir, |_| PageOptions::default())
    .expect_err("colliding outputs must be rejected");

  assert!(err.to_string().contains("fmt.html"), "{err}");
  assert!(!output_dir.exists());
}

#[test]
fn batch_render_writes_linked_stylesheet() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let input = dir.path().join("fmt.godoc");
  fs::write(&input, FMT_PAGE).expect("Failed to write input");
  let output_dir = dir.path().join("site");

  Renderer::default()
    .render_batch(&[input], &output_dir, |_| PageOptions::default())
    .expect("Failed to render batch");

  assert_eq!(
    fs::read_to_string(output_dir.join(STYLESHEET_NAME)).expect("stylesheet"),
    navdoc_templates::PAGE_CSS
  );
}

#[test]
fn existing_stylesheet_is_kept() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let stylesheet = dir.path().join(STYLESHEET_NAME);
  fs::write(&stylesheet, "body { color: red; }").expect("Failed to write");

  let renderer = Renderer::default();
  assert_eq!(renderer.write_stylesheet(dir.path()).expect("write"), None);
  assert_eq!(
    fs::read_to_string(&stylesheet).expect("read back"),
    "body { color: red; }"
  );

  let unstyled = Renderer::new(PageTemplate::new("{header}{nav}{content}"), "");
  let empty = TempDir::new().expect("Failed to create temp dir");
  assert_eq!(unstyled.write_stylesheet(empty.path()).expect("write"), None);
  assert!(!empty.path().join(STYLESHEET_NAME).exists());
}
