//! Inline fragment → flat list of editor nodes.

use super::markup::{self, Element};
use super::sanitize::strip_tags;
use crate::document::{InlineNode, LinkAttrs, ListItem, Paragraph};
use crate::redirects::RedirectTable;

#[derive(Debug)]
enum Segment<'a> {
    Literal(&'a str),
    Anchor(Element<'a>),
    Break,
    List(Element<'a>),
}

impl Segment<'_> {
    fn is_token(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }
}

/// Split on anchors, line breaks and whole list elements; everything in
/// between is literal text.
fn tokenize(fragment: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_from = 0;
    let mut cursor = 0;

    while let Some(tag) = markup::next_tag(fragment, cursor) {
        cursor = tag.end;
        if tag.closing {
            continue;
        }
        let token = match tag.name.as_str() {
            "br" => Some((Segment::Break, tag.end)),
            "a" => markup::element_at(fragment, &tag).map(|el| {
                let end = el.end;
                (Segment::Anchor(el), end)
            }),
            "ul" | "ol" => markup::element_at(fragment, &tag).map(|el| {
                let end = el.end;
                (Segment::List(el), end)
            }),
            _ => None,
        };
        let Some((segment, end)) = token else {
            continue;
        };
        if tag.start > literal_from {
            segments.push(Segment::Literal(&fragment[literal_from..tag.start]));
        }
        segments.push(segment);
        literal_from = end;
        cursor = end;
    }
    if literal_from < fragment.len() {
        segments.push(Segment::Literal(&fragment[literal_from..]));
    }
    segments
}

pub fn parse_inline(fragment: &str, redirects: &RedirectTable) -> Vec<InlineNode> {
    let segments = tokenize(fragment);
    let mut nodes = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let next = segments.get(i + 1);
        match segment {
            Segment::Literal(raw) => {
                let mut text = strip_tags(raw);
                if text.is_empty() {
                    continue;
                }
                if matches!(next, Some(Segment::Anchor(_)))
                    && !text.ends_with(char::is_whitespace)
                {
                    text.push(' ');
                }
                nodes.push(InlineNode::text(text));
            }
            Segment::Anchor(el) => {
                let mut text = strip_tags(el.inner);
                if next.is_some_and(Segment::is_token) {
                    text.push(' ');
                }
                nodes.push(InlineNode::link(text, link_attrs(el.attrs, redirects)));
            }
            Segment::Break => {
                nodes.push(InlineNode::HardBreak);
                nodes.push(InlineNode::HardBreak);
            }
            Segment::List(el) => nodes.extend(list_node(el, redirects)),
        }
    }
    nodes
}

/// A `ul`/`ol` element as a list node; `None` when it has no items.
pub fn list_node(list: &Element<'_>, redirects: &RedirectTable) -> Option<InlineNode> {
    let items: Vec<ListItem> = markup::elements(list.inner, &["li"])
        .iter()
        .map(|li| ListItem {
            content: vec![Paragraph::new(parse_inline(li.inner, redirects))],
        })
        .collect();
    if items.is_empty() {
        return None;
    }
    Some(if list.name == "ol" {
        InlineNode::OrderedList { content: items }
    } else {
        InlineNode::BulletList { content: items }
    })
}

fn link_attrs(attrs: &str, redirects: &RedirectTable) -> LinkAttrs {
    LinkAttrs {
        href: markup::attr(attrs, "href")
            .map(|href| redirects.rewrite(href))
            .unwrap_or_default(),
        rel: None,
        target: markup::attr(attrs, "target").map(str::to_string),
        title: markup::attr(attrs, "title").map(str::to_string),
    }
}
