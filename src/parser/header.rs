use super::markup;
use super::sanitize::strip_tags;
use crate::document::{ButtonStyle, HeaderComponents, InlineNode, Item, ItemKind, Paragraph, TextStyle};
use crate::guide::CtaButton;

/// Text collected from the page's `<header>` block.
#[derive(Debug, Default)]
struct HeaderText {
    title: String,
    texts: Vec<String>,
    headers: Vec<String>,
}

fn collect(header: &str) -> HeaderText {
    let mut found = HeaderText::default();
    for el in markup::elements(header, &["h1", "p", "h2"]) {
        let text = strip_tags(el.inner).replace('\n', "");
        match el.name.as_str() {
            "h1" => found.title = text,
            "p" => found.texts.push(text),
            _ => found.headers.push(text),
        }
    }
    found
}

/// Title, optional description and the three call-to-action components
/// (text, order button, text) of the page header.
pub fn extract_header(html: &str, button: &CtaButton) -> HeaderComponents {
    let Some(header) = markup::first_element(html, "header") else {
        return HeaderComponents::default();
    };
    let HeaderText {
        title,
        texts,
        headers,
    } = collect(header.inner);

    let (description, first, last) = if headers.len() > 1 && texts.len() > 2 {
        (pick(&texts, 0), pick(&headers, 0), pick(&texts, 1))
    } else if headers.len() > 1 && texts.len() == 2 {
        (None, pick(&headers, 0), pick(&headers, 1))
    } else {
        let description = if texts.len() > 1 { pick(&texts, 0) } else { None };
        (description, pick(&headers, 0), pick(&texts, 1))
    };

    HeaderComponents {
        title_content: title,
        description_content: description.map(text_paragraph),
        cta_components: vec![
            text_item(first),
            Item::new(ItemKind::SimpleButton {
                label: button.label.clone(),
                link: button.link.clone(),
                style: ButtonStyle::default(),
            }),
            text_item(last),
        ],
    }
}

fn pick(list: &[String], i: usize) -> Option<&str> {
    list.get(i).map(String::as_str)
}

fn text_paragraph(text: &str) -> Paragraph {
    let text = text.trim();
    if text.is_empty() {
        Paragraph::new(Vec::new())
    } else {
        Paragraph::new(vec![InlineNode::text(text)])
    }
}

/// Text component; a missing entry yields one with empty content.
fn text_item(text: Option<&str>) -> Item {
    Item::new(ItemKind::Text {
        text: vec![text_paragraph(text.unwrap_or_default())],
        style: TextStyle::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> CtaButton {
        CtaButton {
            label: "Incorporate Now".into(),
            link: "https://orders.bizee.com/form-order-now.php?entityType=CCorporation&entityState=ME".into(),
        }
    }

    fn text_of(item: &Item) -> Option<&str> {
        match &item.kind {
            ItemKind::Text { text, .. } => text[0].content.first().and_then(InlineNode::as_text),
            _ => None,
        }
    }

    #[test]
    fn one_text_two_headers() {
        let html = "<header><h1>Title</h1><p>Desc</p><h2>H1</h2><h2>H2</h2></header>";
        let header = extract_header(html, &button());
        assert_eq!(header.title_content, "Title");
        assert_eq!(header.description_content, None);
        assert_eq!(header.cta_components.len(), 3);
        assert_eq!(text_of(&header.cta_components[0]), Some("H1"));
        assert!(matches!(
            header.cta_components[1].kind,
            ItemKind::SimpleButton { .. }
        ));
        // texts[1] is missing: empty text component
        assert_eq!(text_of(&header.cta_components[2]), None);
    }

    #[test]
    fn many_texts_use_description_and_second_text() {
        let html = "<header><h1>T</h1><p>D</p><p>Second</p><p>Third</p><h2>A</h2><h2>B</h2></header>";
        let header = extract_header(html, &button());
        let description = header.description_content.unwrap();
        assert_eq!(description.content[0].as_text(), Some("D"));
        assert_eq!(text_of(&header.cta_components[0]), Some("A"));
        assert_eq!(text_of(&header.cta_components[2]), Some("Second"));
    }

    #[test]
    fn two_texts_two_headers_use_both_headers() {
        let html = "<header><p>x</p><p>y</p><h2>A</h2><h2>B</h2></header>";
        let header = extract_header(html, &button());
        assert_eq!(header.description_content, None);
        assert_eq!(text_of(&header.cta_components[0]), Some("A"));
        assert_eq!(text_of(&header.cta_components[2]), Some("B"));
    }

    #[test]
    fn single_header_falls_through() {
        let html = "<header><h1>T</h1><p>first</p><p>second</p><h2>Only</h2></header>";
        let header = extract_header(html, &button());
        assert_eq!(
            header.description_content.unwrap().content[0].as_text(),
            Some("first")
        );
        assert_eq!(text_of(&header.cta_components[0]), Some("Only"));
        assert_eq!(text_of(&header.cta_components[2]), Some("second"));
    }

    #[test]
    fn last_title_wins_and_newlines_are_removed() {
        let html = "<header><h1>First</h1><h1>Main\n<span>Title</span></h1></header>";
        let header = extract_header(html, &button());
        assert_eq!(header.title_content, "MainTitle");
    }

    #[test]
    fn no_header_no_components() {
        let header = extract_header("<main><h1>x</h1></main>", &button());
        assert_eq!(header.title_content, "");
        assert!(header.cta_components.is_empty());
        assert!(header.description_content.is_none());
    }

    #[test]
    fn button_comes_from_guide() {
        let header = extract_header("<header><h2>a</h2></header>", &button());
        let ItemKind::SimpleButton { label, link, style } = &header.cta_components[1].kind else {
            panic!("expected button");
        };
        assert_eq!(label, "Incorporate Now");
        assert!(link.ends_with("entityState=ME"));
        assert_eq!(style.variant, "primary");
    }
}
