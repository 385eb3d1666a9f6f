//! # navdoc-transform
//!
//! Turns the HTML emitted by a documentation generator (such as `godoc -html`)
//! into a navigable page. The transformer works line by line:
//!
//! - a leading `<!-- title ... -->` comment on the first line becomes the page
//!   header
//! - every `<h2>` and `<h3>` line gets a stable anchor id, either the one it
//!   already carries or a synthetic `tmp_<line>` id
//! - `<h2>` headings gain a `[Top]` link back to the top of the page
//! - a navigation fragment listing all headings is built alongside the body
//!
//! ## Quick Start
//!
//! ```rust
//! use navdoc_transform::transform_str;
//!
//! let result = transform_str("<!-- title Widgets -->\n<h2>Overview</h2>");
//!
//! assert_eq!(result.header.as_deref(), Some("<h1>Widgets</h1>"));
//! assert!(result.body().contains(r#"<h2 id="tmp_2">Overview"#));
//! assert!(result.nav().contains(r##"<dt><a href="#tmp_2">Overview</a></dt>"##));
//! ```
//!
//! ## Error Recovery
//!
//! The transform never fails. Lines that look like headings but cannot be
//! parsed as a single well-formed element are passed through untouched and
//! left out of the navigation fragment.
//!
//! Applying the transform twice is not idempotent: every pass appends another
//! `[Top]` link to each `<h2>`.

pub mod fragment;
mod title;
pub mod transform;
mod types;

pub use crate::{
  fragment::{Element, Fragment, FragmentError, Node},
  title::extract_header,
  transform::{NavDocTransformer, transform_str},
  types::{HeadingId, HeadingLevel, NavEntry, RawDocument, TransformResult},
};
