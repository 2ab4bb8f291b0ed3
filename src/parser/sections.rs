use super::blocks::{self, Block};
use super::markup;
use super::sanitize::strip_tags;
use crate::redirects::RedirectTable;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub title: Option<String>,
    pub content: Vec<Block>,
}

/// Scan state shared by every region of one page.
struct Segmenter<'r> {
    redirects: &'r RedirectTable,
    sections: Vec<Section>,
    current: Option<Section>,
    title_level: Option<u8>,
}

/// Cut the content regions into titled sections of typed blocks. The first
/// heading level seen becomes the section title level for the whole page.
pub fn segment(regions: &[&str], redirects: &RedirectTable) -> Vec<Section> {
    let mut segmenter = Segmenter {
        redirects,
        sections: Vec::new(),
        current: None,
        title_level: None,
    };
    for region in regions {
        segmenter.scan(region);
    }
    segmenter.finish()
}

impl Segmenter<'_> {
    fn scan(&mut self, html: &str) {
        let mut cursor = 0;
        while let Some(tag) = markup::next_tag(html, cursor) {
            cursor = tag.end;
            if tag.closing {
                continue;
            }

            if let Some(level) = tag.heading_level() {
                if let Some(el) = markup::element_at(html, &tag) {
                    cursor = el.end;
                    self.heading(level, strip_tags(el.inner).trim().to_string());
                }
                continue;
            }

            match tag.name.as_str() {
                "p" => {
                    if let Some(el) = markup::element_at(html, &tag) {
                        cursor = el.end;
                        self.push(Block::Paragraph(el.inner.trim().to_string()));
                    }
                }
                "ul" | "ol" => {
                    if let Some(el) = markup::element_at(html, &tag) {
                        cursor = el.end;
                        self.push(Block::List {
                            ordered: el.name == "ol",
                            markup: el.inner.trim().to_string(),
                        });
                    }
                }
                "div" => {
                    let Some(el) = markup::element_at(html, &tag) else {
                        continue;
                    };
                    let Some(kind) = blocks::classify_div(el.attrs, el.inner) else {
                        // Generic container: keep scanning its children.
                        continue;
                    };
                    cursor = el.end;
                    if let Some(block) = blocks::container_block(kind, &el, self.redirects) {
                        self.push(block);
                    }
                }
                "iframe" => {
                    if let Some(block) = blocks::video_block(tag.attrs) {
                        self.push(block);
                    }
                    if let Some((_, end)) = markup::find_closing(html, tag.end, "iframe") {
                        cursor = end;
                    }
                }
                _ => {}
            }
        }
    }

    fn heading(&mut self, level: u8, text: String) {
        let title_level = *self.title_level.get_or_insert(level);
        if level == title_level {
            if let Some(done) = self.current.take() {
                self.sections.push(done);
            }
            self.current = Some(Section {
                title: Some(text),
                content: Vec::new(),
            });
        } else {
            self.current
                .get_or_insert_with(Section::default)
                .content
                .push(Block::Subtitle { text, level });
        }
    }

    fn push(&mut self, block: Block) {
        match self.current.as_mut() {
            Some(section) => section.content.push(block),
            None => tracing::debug!(?block, "dropping content before the first section"),
        }
    }

    fn finish(mut self) -> Vec<Section> {
        if let Some(done) = self.current.take() {
            self.sections.push(done);
        }
        self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Vec<Section> {
        segment(&[html], &RedirectTable::default())
    }

    fn titles(sections: &[Section]) -> Vec<Option<&str>> {
        sections.iter().map(|s| s.title.as_deref()).collect()
    }

    #[test]
    fn title_level_lock_in() {
        let sections = run("<h2>T1</h2><p>x</p><h3>Sub</h3><h2>T2</h2>");
        assert_eq!(titles(&sections), vec![Some("T1"), Some("T2")]);
        assert_eq!(
            sections[0].content,
            vec![
                Block::Paragraph("x".into()),
                Block::Subtitle {
                    text: "Sub".into(),
                    level: 3
                },
            ]
        );
        assert!(sections[1].content.is_empty());
    }

    #[test]
    fn lock_spans_regions() {
        let sections = segment(
            &["<h3>A</h3><p>a</p>", "<h2>Not a title</h2><h3>B</h3>"],
            &RedirectTable::default(),
        );
        assert_eq!(titles(&sections), vec![Some("A"), Some("B")]);
        assert!(matches!(
            sections[0].content[1],
            Block::Subtitle { level: 2, .. }
        ));
    }

    #[test]
    fn content_before_first_heading_is_dropped() {
        let sections = run("<p>orphan</p><div><a href='/x'>orphan link</a></div><h2>T</h2><p>kept</p>");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, vec![Block::Paragraph("kept".into())]);
    }

    #[test]
    fn generic_divs_are_descended() {
        let sections = run("<div class='wrap'><h2>T</h2><div><p>inner</p></div></div>");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, vec![Block::Paragraph("inner".into())]);
    }

    #[test]
    fn matched_containers_are_skipped_whole() {
        let html = r#"<h2>T</h2><div class="liststyledefaulticon"><div><p>a</p></div><span>b</span></div><p>after</p>"#;
        let sections = run(html);
        assert_eq!(
            sections[0].content,
            vec![
                Block::InfoCard("<span><p>a</p><span>b</span></span>".into()),
                Block::Paragraph("after".into()),
            ]
        );
    }

    #[test]
    fn lists_keep_raw_markup() {
        let sections = run("<h2>T</h2><ol><li>one</li><li>two</li></ol>");
        assert_eq!(
            sections[0].content,
            vec![Block::List {
                ordered: true,
                markup: "<li>one</li><li>two</li>".into()
            }]
        );
    }

    #[test]
    fn iframe_video_and_skip() {
        let html = r#"<h2>T</h2><iframe src="https://player.vimeo.com/video/1"><p>fallback</p></iframe><iframe src="https://ads.example.com"></iframe>"#;
        let sections = run(html);
        assert_eq!(
            sections[0].content,
            vec![Block::Video("https://player.vimeo.com/video/1".into())]
        );
    }

    #[test]
    fn unclosed_tags_are_skipped() {
        let sections = run("<h2>T</h2><p>never closed<div class='x'>");
        assert_eq!(titles(&sections), vec![Some("T")]);
        assert!(sections[0].content.is_empty());
    }

    #[test]
    fn fixture_page_sections() {
        let html = std::fs::read_to_string("tests/fixtures/maine_corporation.html").unwrap();
        let main = markup::first_element(&html, "main").unwrap();
        let regions: Vec<&str> = markup::elements(main.inner, &["section"])
            .iter()
            .map(|s| s.inner)
            .collect();
        let sections = segment(&regions, &RedirectTable::default());
        assert!(sections.len() >= 3);
        assert!(sections.iter().all(|s| s.title.is_some()));
        let blocks: Vec<&Block> = sections.iter().flat_map(|s| &s.content).collect();
        assert!(blocks.iter().any(|b| matches!(b, Block::Card { .. })));
        assert!(blocks.iter().any(|b| matches!(b, Block::Video(_))));
        assert!(blocks.iter().any(|b| matches!(b, Block::SimpleButton { .. })));
    }
}
