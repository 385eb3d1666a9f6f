use std::collections::HashMap;

/// Placeholder replaced with the page header.
pub const HEADER_PLACEHOLDER: &str = "{header}";
/// Placeholder replaced with the navigation fragment.
pub const NAV_PLACEHOLDER: &str = "{nav}";
/// Placeholder replaced with the transformed document body.
pub const CONTENT_PLACEHOLDER: &str = "{content}";

pub const PAGE_TEMPLATE: &str = include_str!("../templates/page.html");
pub const PAGE_CSS: &str = include_str!("../templates/page.css");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("page.html", PAGE_TEMPLATE);
  templates.insert("page.css", PAGE_CSS);
  templates
}
