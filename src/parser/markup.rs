//! Minimal tag scanner over raw markup.
//!
//! No tree is built. Callers walk tags with an explicit byte cursor and use
//! [`find_closing`] to match nested same-named elements by depth counting.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)([a-z][a-z0-9]*)\b([^>]*)>").unwrap());
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

#[derive(Debug, Clone)]
pub struct Tag<'a> {
    /// Lower-cased tag name.
    pub name: String,
    pub attrs: &'a str,
    pub closing: bool,
    /// Offset of `<`.
    pub start: usize,
    /// Offset just past `>`.
    pub end: usize,
}

impl Tag<'_> {
    pub fn self_closing(&self) -> bool {
        self.attrs.trim_end().ends_with('/')
    }

    /// Heading level for `h1`..`h6`.
    pub fn heading_level(&self) -> Option<u8> {
        heading_level(&self.name)
    }
}

/// A complete element: opening tag, inner markup, matching close tag.
#[derive(Debug, Clone)]
pub struct Element<'a> {
    pub name: String,
    pub attrs: &'a str,
    pub inner: &'a str,
    pub outer: &'a str,
    /// Offset just past the closing tag.
    pub end: usize,
}

pub fn heading_level(name: &str) -> Option<u8> {
    match name.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}

/// Next tag (opening or closing) at or after `from`.
pub fn next_tag(html: &str, from: usize) -> Option<Tag<'_>> {
    if from > html.len() {
        return None;
    }
    let caps = TAG_RE.captures_at(html, from)?;
    let whole = caps.get(0)?;
    Some(Tag {
        name: caps[2].to_ascii_lowercase(),
        attrs: caps.get(3).map_or("", |m| m.as_str()),
        closing: !caps[1].is_empty(),
        start: whole.start(),
        end: whole.end(),
    })
}

/// Locate the close tag matching an element of `name` whose opening tag ends
/// at `from`. Returns `(close_start, close_end)`.
pub fn find_closing(html: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut cursor = from;
    while let Some(tag) = next_tag(html, cursor) {
        cursor = tag.end;
        if tag.name != name {
            continue;
        }
        if tag.closing {
            depth -= 1;
            if depth == 0 {
                return Some((tag.start, tag.end));
            }
        } else if !tag.self_closing() {
            depth += 1;
        }
    }
    None
}

/// Build the element opened by `open`, if its close tag exists.
pub fn element_at<'a>(html: &'a str, open: &Tag<'a>) -> Option<Element<'a>> {
    let (close_start, close_end) = find_closing(html, open.end, &open.name)?;
    Some(Element {
        name: open.name.clone(),
        attrs: open.attrs,
        inner: &html[open.end..close_start],
        outer: &html[open.start..close_end],
        end: close_end,
    })
}

/// Non-overlapping elements whose name is in `names`, in document order.
/// An element swallows everything nested in it; unclosed openers are skipped.
pub fn elements<'a>(html: &'a str, names: &[&str]) -> Vec<Element<'a>> {
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(tag) = next_tag(html, cursor) {
        cursor = tag.end;
        if tag.closing || !names.contains(&tag.name.as_str()) {
            continue;
        }
        if let Some(element) = element_at(html, &tag) {
            cursor = element.end;
            found.push(element);
        }
    }
    found
}

/// First element named `name`.
pub fn first_element<'a>(html: &'a str, name: &str) -> Option<Element<'a>> {
    elements(html, &[name]).into_iter().next()
}

/// Value of attribute `name` in a raw attribute string.
pub fn attr<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTR_RE.captures_iter(attrs).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
    })
}

/// True when the `class` attribute contains every one of `classes`.
pub fn has_classes(attrs: &str, classes: &[&str]) -> bool {
    let Some(class_attr) = attr(attrs, "class") else {
        return false;
    };
    let found: Vec<&str> = class_attr.split_whitespace().collect();
    classes.iter().all(|c| found.contains(c))
}
