//! Page title extraction from a leading HTML comment.

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const TITLE_PREFIX: &str = "title ";

/// Extract the page header from the first line of a document.
///
/// The line must contain `<!--` followed (not overlapping) by a later `-->`.
/// The text between them is trimmed and a leading `title ` marker is dropped.
/// The result is wrapped in `<h1>` verbatim, without escaping.
///
/// # Examples
///
/// ```
/// use navdoc_transform::extract_header;
///
/// assert_eq!(
///   extract_header("<!-- title Foo Bar -->").as_deref(),
///   Some("<h1>Foo Bar</h1>")
/// );
/// assert_eq!(
///   extract_header("<!-- Just A Title -->").as_deref(),
///   Some("<h1>Just A Title</h1>")
/// );
/// assert_eq!(extract_header("<p>no comment</p>"), None);
/// ```
#[must_use]
pub fn extract_header(first_line: &str) -> Option<String> {
  let open = first_line.find(COMMENT_OPEN)?;
  let close = first_line.rfind(COMMENT_CLOSE)?;
  let start = open + COMMENT_OPEN.len();
  if start > close {
    return None;
  }

  let title = first_line[start..close].trim();
  let title = title.strip_prefix(TITLE_PREFIX).unwrap_or(title);
  Some(format!("<h1>{title}</h1>"))
}
