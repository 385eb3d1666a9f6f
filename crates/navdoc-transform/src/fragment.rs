//! Parser and serializer for single-element markup fragments.
//!
//! Generated documentation is mostly loose HTML, but the heading lines we
//! rewrite have to be handled precisely: a line is only touched when it is
//! exactly one well-formed element. The rules here are XML-strict (quoted
//! attribute values, matching close tags, no stray `&`), except that HTML named
//! character references are accepted in text and attribute values.
//!
//! # Examples
//!
//! ```
//! use navdoc_transform::Fragment;
//!
//! let mut fragment = Fragment::parse(r#"<h2 class="pkg">Index &amp; Types</h2>"#)?;
//! assert_eq!(fragment.root.text(), "Index & Types");
//!
//! fragment.root.set_attribute("id", "index");
//! assert_eq!(
//!   fragment.to_string(),
//!   r#"<h2 class="pkg" id="index">Index &amp; Types</h2>"#
//! );
//! # Ok::<(), navdoc_transform::FragmentError>(())
//! ```
use std::fmt;

use thiserror::Error;

/// Nesting limit for elements inside a fragment.
const MAX_DEPTH: usize = 128;

/// Errors raised while parsing a fragment. Offsets are byte positions in the
/// parsed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
  #[error("unexpected end of input")]
  UnexpectedEof,

  #[error("expected {expected} at byte {offset}")]
  Expected {
    expected: &'static str,
    offset:   usize,
  },

  #[error("invalid name at byte {0}")]
  InvalidName(usize),

  #[error("closing tag </{found}> does not match <{expected}> at byte {offset}")]
  MismatchedClose {
    expected: String,
    found:    String,
    offset:   usize,
  },

  #[error("duplicate attribute `{name}` at byte {offset}")]
  DuplicateAttribute { name: String, offset: usize },

  #[error("invalid character reference at byte {0}")]
  InvalidReference(usize),

  #[error("unsupported markup at byte {0}")]
  Unsupported(usize),

  #[error("elements nested deeper than {MAX_DEPTH} levels")]
  TooDeep,

  #[error("unexpected content after the root element at byte {0}")]
  TrailingContent(usize),
}

/// A node inside a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Element(Element),
  /// Decoded character data.
  Text(String),
  Comment(String),
  CData(String),
}

/// An element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
  pub name:       String,
  pub attributes: Vec<(String, String)>,
  pub children:   Vec<Node>,
}

impl Element {
  #[must_use]
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:       name.into(),
      attributes: Vec::new(),
      children:   Vec::new(),
    }
  }

  /// Builder-style [`Element::set_attribute`].
  #[must_use]
  pub fn with_attribute(
    mut self,
    name: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    self.set_attribute(name, value);
    self
  }

  /// Builder-style [`Element::append_child`].
  #[must_use]
  pub fn with_child(mut self, child: Node) -> Self {
    self.append_child(child);
    self
  }

  /// Value of an attribute, if present.
  #[must_use]
  pub fn attribute(&self, name: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }

  /// Set an attribute. Existing attributes keep their position, new ones are
  /// appended.
  pub fn set_attribute(
    &mut self,
    name: impl Into<String>,
    value: impl Into<String>,
  ) {
    let name = name.into();
    let value = value.into();
    if let Some(slot) = self.attributes.iter_mut().find(|(key, _)| *key == name)
    {
      slot.1 = value;
    } else {
      self.attributes.push((name, value));
    }
  }

  pub fn append_child(&mut self, child: Node) {
    self.children.push(child);
  }

  /// Concatenated text of all descendant text and CDATA nodes.
  #[must_use]
  pub fn text(&self) -> String {
    let mut text = String::new();
    self.collect_text(&mut text);
    text
  }

  fn collect_text(&self, out: &mut String) {
    for child in &self.children {
      match child {
        Node::Text(text) | Node::CData(text) => out.push_str(text),
        Node::Element(element) => element.collect_text(out),
        Node::Comment(_) => {},
      }
    }
  }
}

impl fmt::Display for Element {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<{}", self.name)?;
    for (name, value) in &self.attributes {
      write!(
        f,
        " {name}=\"{}\"",
        html_escape::encode_double_quoted_attribute(value)
      )?;
    }
    if self.children.is_empty() {
      return f.write_str("/>");
    }
    f.write_str(">")?;
    for child in &self.children {
      write!(f, "{child}")?;
    }
    write!(f, "</{}>", self.name)
  }
}

impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Element(element) => write!(f, "{element}"),
      Self::Text(text) => f.write_str(&html_escape::encode_text(text)),
      Self::Comment(comment) => write!(f, "<!--{comment}-->"),
      Self::CData(data) => write!(f, "<![CDATA[{data}]]>"),
    }
  }
}

/// A parsed fragment: one root element, optionally followed by comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
  pub root:     Element,
  pub trailing: Vec<Node>,
}

impl Fragment {
  /// Parse `source` as exactly one element.
  ///
  /// Leading whitespace is skipped. After the root element only whitespace and
  /// comments are allowed.
  ///
  /// # Errors
  ///
  /// Returns a [`FragmentError`] describing the first violation found.
  pub fn parse(source: &str) -> Result<Self, FragmentError> {
    let mut parser = Parser { src: source, pos: 0 };
    parser.skip_whitespace();
    let root = parser.element(0)?;

    let mut trailing = Vec::new();
    loop {
      parser.skip_whitespace();
      if parser.at_end() {
        break;
      }
      if parser.rest().starts_with("<!--") {
        trailing.push(parser.comment()?);
      } else {
        return Err(FragmentError::TrailingContent(parser.pos));
      }
    }

    Ok(Self { root, trailing })
  }
}

impl fmt::Display for Fragment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.root)?;
    for node in &self.trailing {
      write!(f, "{node}")?;
    }
    Ok(())
  }
}

struct Parser<'a> {
  src: &'a str,
  pos: usize,
}

impl<'a> Parser<'a> {
  fn rest(&self) -> &'a str {
    &self.src[self.pos..]
  }

  const fn at_end(&self) -> bool {
    self.pos >= self.src.len()
  }

  fn peek(&self) -> Option<char> {
    self.rest().chars().next()
  }

  fn skip_whitespace(&mut self) -> bool {
    let rest = self.rest();
    let trimmed = rest.trim_start();
    self.pos += rest.len() - trimmed.len();
    rest.len() != trimmed.len()
  }

  fn expect(
    &mut self,
    token: &'static str,
  ) -> Result<(), FragmentError> {
    if self.rest().starts_with(token) {
      self.pos += token.len();
      Ok(())
    } else if self.at_end() {
      Err(FragmentError::UnexpectedEof)
    } else {
      Err(FragmentError::Expected {
        expected: token,
        offset:   self.pos,
      })
    }
  }

  /// Consume everything up to `terminator` and the terminator itself.
  fn take_until(
    &mut self,
    terminator: &str,
  ) -> Result<&'a str, FragmentError> {
    let rest = self.rest();
    let end = rest.find(terminator).ok_or(FragmentError::UnexpectedEof)?;
    self.pos += end + terminator.len();
    Ok(&rest[..end])
  }

  fn name(&mut self) -> Result<&'a str, FragmentError> {
    let rest = self.rest();
    let mut chars = rest.char_indices();
    match chars.next() {
      Some((_, c)) if c.is_alphabetic() || c == '_' || c == ':' => {},
      Some(_) => return Err(FragmentError::InvalidName(self.pos)),
      None => return Err(FragmentError::UnexpectedEof),
    }
    let end = chars
      .find(|&(_, c)| {
        !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
      })
      .map_or(rest.len(), |(index, _)| index);
    self.pos += end;
    Ok(&rest[..end])
  }

  fn element(&mut self, depth: usize) -> Result<Element, FragmentError> {
    if depth >= MAX_DEPTH {
      return Err(FragmentError::TooDeep);
    }

    self.expect("<")?;
    let mut element = Element::new(self.name()?);

    // Attributes, then either `/>` or `>`
    loop {
      let had_space = self.skip_whitespace();
      if self.rest().starts_with("/>") {
        self.pos += 2;
        return Ok(element);
      }
      if self.rest().starts_with('>') {
        self.pos += 1;
        break;
      }
      if self.at_end() {
        return Err(FragmentError::UnexpectedEof);
      }
      if !had_space {
        return Err(FragmentError::Expected {
          expected: "whitespace",
          offset:   self.pos,
        });
      }

      let offset = self.pos;
      let name = self.name()?;
      self.skip_whitespace();
      self.expect("=")?;
      self.skip_whitespace();
      let value = self.attribute_value()?;

      if element.attribute(name).is_some() {
        return Err(FragmentError::DuplicateAttribute {
          name: name.to_string(),
          offset,
        });
      }
      element.attributes.push((name.to_string(), value));
    }

    self.content(&mut element, depth)?;
    Ok(element)
  }

  fn attribute_value(&mut self) -> Result<String, FragmentError> {
    let quote = match self.peek() {
      Some(quote @ ('"' | '\'')) => quote,
      Some(_) => {
        return Err(FragmentError::Expected {
          expected: "quoted attribute value",
          offset:   self.pos,
        });
      },
      None => return Err(FragmentError::UnexpectedEof),
    };
    self.pos += 1;

    let start = self.pos;
    let rest = self.rest();
    let end = rest.find(quote).ok_or(FragmentError::UnexpectedEof)?;
    let raw = &rest[..end];
    if let Some(lt) = raw.find('<') {
      return Err(FragmentError::Unsupported(start + lt));
    }
    self.pos += end + 1;
    decode_references(raw, start)
  }

  /// Children of `element` up to and including its closing tag.
  fn content(
    &mut self,
    element: &mut Element,
    depth: usize,
  ) -> Result<(), FragmentError> {
    loop {
      let rest = self.rest();
      if rest.is_empty() {
        return Err(FragmentError::UnexpectedEof);
      }

      if rest.starts_with("</") {
        self.pos += 2;
        let offset = self.pos;
        let name = self.name()?;
        if name != element.name {
          return Err(FragmentError::MismatchedClose {
            expected: element.name.clone(),
            found: name.to_string(),
            offset,
          });
        }
        self.skip_whitespace();
        return self.expect(">");
      }

      if rest.starts_with("<!--") {
        let comment = self.comment()?;
        element.append_child(comment);
      } else if rest.starts_with("<![CDATA[") {
        self.pos += "<![CDATA[".len();
        let data = self.take_until("]]>")?;
        element.append_child(Node::CData(data.to_string()));
      } else if rest.starts_with("<!") || rest.starts_with("<?") {
        return Err(FragmentError::Unsupported(self.pos));
      } else if rest.starts_with('<') {
        let child = self.element(depth + 1)?;
        element.append_child(Node::Element(child));
      } else {
        let start = self.pos;
        let end = rest.find('<').unwrap_or(rest.len());
        self.pos += end;
        let text = decode_references(&rest[..end], start)?;
        // Adjacent text is merged so `text()` and serialization stay stable
        if let Some(Node::Text(previous)) = element.children.last_mut() {
          previous.push_str(&text);
        } else {
          element.append_child(Node::Text(text));
        }
      }
    }
  }

  fn comment(&mut self) -> Result<Node, FragmentError> {
    self.expect("<!--")?;
    let body = self.take_until("-->")?;
    Ok(Node::Comment(body.to_string()))
  }
}

/// Decode character references in `raw`, rejecting unknown or unterminated
/// ones. `offset` is the position of `raw` in the parsed input.
fn decode_references(raw: &str, offset: usize) -> Result<String, FragmentError> {
  let mut decoded = String::with_capacity(raw.len());
  let mut rest = raw;
  let mut at = offset;

  while let Some(amp) = rest.find('&') {
    decoded.push_str(&rest[..amp]);
    let tail = &rest[amp..];
    let end = tail
      .find(';')
      .ok_or(FragmentError::InvalidReference(at + amp))?;
    let reference = &tail[..=end];
    if reference[1..end].contains(|c: char| c == '&' || c.is_whitespace()) {
      return Err(FragmentError::InvalidReference(at + amp));
    }

    let value = html_escape::decode_html_entities(reference);
    if value == reference {
      return Err(FragmentError::InvalidReference(at + amp));
    }
    decoded.push_str(&value);

    rest = &tail[end + 1..];
    at += amp + end + 1;
  }

  decoded.push_str(rest);
  Ok(decoded)
}
