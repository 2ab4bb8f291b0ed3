//! Extracted page → destination page document.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::{
    new_item_id, ButtonStyle, Heading, InlineNode, Item, ItemKind, PageDefaults, PageDocument,
    Paragraph, SectionGroup, TableColumn, TextStyle,
};
use crate::error::Result;
use crate::guide::{Guide, GuidePage};
use crate::identity::IdentityRegistry;
use crate::parser::blocks::Block;
use crate::parser::inline::parse_inline;
use crate::parser::sanitize::clean_html;
use crate::parser::sections::Section;
use crate::parser::ExtractedPage;
use crate::redirects::RedirectTable;

static LIST_MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(ul|ol|li)\b[^>]*>").unwrap());

const SECTION_TITLE_LEVEL: u8 = 2;
const TABLE_PLACEHOLDER_TITLE: &str = "state Fee";

pub struct Assembler<'a> {
    guide: &'a Guide,
    redirects: &'a RedirectTable,
}

impl<'a> Assembler<'a> {
    pub fn new(guide: &'a Guide, redirects: &'a RedirectTable) -> Self {
        Self { guide, redirects }
    }

    pub fn assemble(
        &self,
        extracted: ExtractedPage,
        page: &GuidePage,
        registry: &mut dyn IdentityRegistry,
    ) -> Result<PageDocument> {
        let id = registry.get_or_create(&self.guide.filename(page.page_type))?;
        let items = section_items(&extracted.sections, self.redirects);
        let sections = if items.is_empty() {
            Vec::new()
        } else {
            vec![SectionGroup::new(items)]
        };

        Ok(PageDocument {
            id,
            blueprint: "guide",
            title: self.guide.title(page.page_type),
            defaults: PageDefaults::default(),
            meta: extracted.meta,
            header: extracted.header,
            intro: extracted.intro,
            sections,
        })
    }
}

/// Items of every section, flattened in order.
pub fn section_items(sections: &[Section], redirects: &RedirectTable) -> Vec<Item> {
    let mut items = Vec::new();
    for section in sections {
        if let Some(title) = section.title.as_deref().filter(|t| !t.is_empty()) {
            items.push(Item::new(ItemKind::Title {
                title: vec![Heading::new(
                    SECTION_TITLE_LEVEL,
                    vec![InlineNode::text(title)],
                )],
            }));
        }
        items.extend(
            merge_paragraphs(&section.content)
                .iter()
                .filter_map(|block| block_item(block, redirects)),
        );
    }
    items
}

/// Join runs of adjacent paragraphs with a line break, unless either side
/// carries list markup.
fn merge_paragraphs(blocks: &[Block]) -> Vec<Block> {
    let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let (Some(Block::Paragraph(last)), Block::Paragraph(next)) = (merged.last_mut(), block) {
            if !LIST_MARKUP_RE.is_match(last) && !LIST_MARKUP_RE.is_match(next) {
                last.push_str("<br>");
                last.push_str(next);
                continue;
            }
        }
        merged.push(block.clone());
    }
    merged
}

fn paragraph_item(markup: &str, redirects: &RedirectTable) -> Option<Item> {
    let content = parse_inline(markup, redirects);
    if content.is_empty() {
        return None;
    }
    Some(Item::new(ItemKind::Paragraph {
        paragraph: vec![Paragraph::new(content)],
    }))
}

fn block_item(block: &Block, redirects: &RedirectTable) -> Option<Item> {
    let kind = match block {
        Block::Paragraph(markup) => return paragraph_item(markup, redirects),
        Block::List { ordered, markup } => {
            let tag = if *ordered { "ol" } else { "ul" };
            return paragraph_item(&format!("<{tag}>{markup}</{tag}>"), redirects);
        }
        Block::Subtitle { text, level } => ItemKind::Subtitle {
            subtitle: vec![Heading::new(*level, vec![InlineNode::text(clean_html(text))])],
        },
        Block::Card {
            text,
            button_label,
            href,
        } => ItemKind::Card {
            text: vec![Paragraph::new(vec![InlineNode::bold(clean_html(text))])],
            label: clean_html(button_label),
            link: href.clone(),
            button: ButtonStyle::default(),
            style: TextStyle::default(),
        },
        Block::Link { text, href, kind } => ItemKind::Link {
            link_type: kind.as_str().to_string(),
            url: href.clone(),
            label: clean_html(text),
        },
        Block::SimpleButton { label, href } => ItemKind::SimpleButton {
            label: clean_html(label),
            link: href.clone(),
            style: ButtonStyle::default(),
        },
        Block::InfoCard(markup) => ItemKind::InfoCard {
            card_components: paragraph_item(markup, redirects).into_iter().collect(),
        },
        Block::InfoTable => ItemKind::InfoTable {
            columns: vec![TableColumn {
                id: new_item_id(),
                title: vec![Paragraph::new(vec![InlineNode::bold(TABLE_PLACEHOLDER_TITLE)])],
            }],
        },
        Block::Video(url) => ItemKind::Video {
            video_url: url.clone(),
        },
    };
    Some(Item::new(kind))
}
