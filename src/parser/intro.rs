use super::inline::{list_node, parse_inline};
use super::markup;
use super::sanitize::strip_tags;
use crate::document::{Heading, InlineNode, IntroNode, Paragraph};
use crate::redirects::RedirectTable;

/// Intro field built from the leading sections of a page: paragraphs (each
/// closed by two hard breaks), lists and headings, in document order.
pub fn extract_intro(sections: &[&str], redirects: &RedirectTable) -> Vec<IntroNode> {
    let mut intro = Vec::new();
    for html in sections {
        let mut cursor = 0;
        while let Some(tag) = markup::next_tag(html, cursor) {
            cursor = tag.end;
            if tag.closing {
                continue;
            }
            let heading = tag.heading_level();
            if heading.is_none() && !matches!(tag.name.as_str(), "p" | "ul" | "ol") {
                continue;
            }
            let Some(el) = markup::element_at(html, &tag) else {
                continue;
            };
            cursor = el.end;

            if let Some(level) = heading {
                let text = strip_tags(el.inner).trim().to_string();
                let node = if level == 3 {
                    InlineNode::bold(text)
                } else {
                    InlineNode::text(text)
                };
                intro.push(IntroNode::Heading(Heading::new(level, vec![node])));
            } else if el.name == "p" {
                let mut content = parse_inline(el.inner, redirects);
                content.extend([InlineNode::HardBreak, InlineNode::HardBreak]);
                intro.push(IntroNode::Paragraph(Paragraph::new(content)));
            } else if let Some(list) = list_node(&el, redirects) {
                intro.push(IntroNode::List(list));
            }
        }
    }
    intro
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Mark;

    #[test]
    fn paragraphs_end_with_two_breaks() {
        let intro = extract_intro(&["<p>Hello <a href='/x'>world</a></p>"], &RedirectTable::default());
        let [IntroNode::Paragraph(p)] = intro.as_slice() else {
            panic!("expected one paragraph, got {intro:?}");
        };
        assert_eq!(p.content.len(), 4);
        assert_eq!(p.content[0].as_text(), Some("Hello "));
        assert_eq!(p.content[2], InlineNode::HardBreak);
        assert_eq!(p.content[3], InlineNode::HardBreak);
    }

    #[test]
    fn level_three_headings_are_bold() {
        let intro = extract_intro(
            &["<h2>Plain <em>title</em></h2>", "<h3>Bold</h3>"],
            &RedirectTable::default(),
        );
        assert_eq!(intro.len(), 2);
        let IntroNode::Heading(h2) = &intro[0] else {
            panic!("expected heading");
        };
        assert_eq!(h2.attrs.level, Some(2));
        assert_eq!(h2.content, vec![InlineNode::text("Plain title")]);
        let IntroNode::Heading(h3) = &intro[1] else {
            panic!("expected heading");
        };
        let InlineNode::Text { marks, .. } = &h3.content[0] else {
            panic!("expected text");
        };
        assert_eq!(marks, &vec![Mark::Bold]);
    }

    #[test]
    fn lists_become_list_nodes() {
        let intro = extract_intro(
            &["<div><ul><li>A</li><li>B</li></ul><ol></ol></div>"],
            &RedirectTable::default(),
        );
        assert_eq!(intro.len(), 1);
        assert!(matches!(
            &intro[0],
            IntroNode::List(InlineNode::BulletList { content }) if content.len() == 2
        ));
    }

    #[test]
    fn no_sections_no_intro() {
        assert!(extract_intro(&[], &RedirectTable::default()).is_empty());
    }
}
