//! Destination page-document shape.
//!
//! Rich text follows the editor's node schema (`paragraph`, `heading`,
//! `text` with marks, `hardBreak`, `bulletList` ...). Page sections are flat
//! lists of typed items, each with its own short id.

use serde::{Serialize, Serializer};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attrs {
    pub text_align: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl Attrs {
    pub fn left() -> Self {
        Self {
            text_align: "left",
            level: None,
        }
    }

    pub fn heading(level: u8) -> Self {
        Self {
            text_align: "left",
            level: Some(level),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkAttrs {
    pub href: String,
    pub rel: Option<String>,
    pub target: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mark {
    Link { attrs: LinkAttrs },
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineNode {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    HardBreak,
    BulletList { content: Vec<ListItem> },
    OrderedList { content: Vec<ListItem> },
}

impl InlineNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: vec![Mark::Bold],
        }
    }

    pub fn link(text: impl Into<String>, attrs: LinkAttrs) -> Self {
        Self::Text {
            text: text.into(),
            marks: vec![Mark::Link { attrs }],
        }
    }

    #[cfg(test)]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "paragraph")]
pub struct Paragraph {
    pub attrs: Attrs,
    pub content: Vec<InlineNode>,
}

impl Paragraph {
    pub fn new(content: Vec<InlineNode>) -> Self {
        Self {
            attrs: Attrs::left(),
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "heading")]
pub struct Heading {
    pub attrs: Attrs,
    pub content: Vec<InlineNode>,
}

impl Heading {
    pub fn new(level: u8, content: Vec<InlineNode>) -> Self {
        Self {
            attrs: Attrs::heading(level),
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "listItem")]
pub struct ListItem {
    pub content: Vec<Paragraph>,
}

/// One node of the intro field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IntroNode {
    Paragraph(Paragraph),
    Heading(Heading),
    List(InlineNode),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextStyle {
    pub bard_alignment: bool,
    pub secondary_font: bool,
    pub custom_font_size: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonStyle {
    pub target_blank: bool,
    pub custom_size: bool,
    pub custom_alignment: bool,
    pub capitalized: bool,
    pub custom_icon: bool,
    pub variant: &'static str,
    pub custom_text_align: bool,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            target_blank: false,
            custom_size: false,
            custom_alignment: false,
            capitalized: false,
            custom_icon: false,
            variant: "primary",
            custom_text_align: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub id: String,
    pub title: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Title {
        title: Vec<Heading>,
    },
    Subtitle {
        subtitle: Vec<Heading>,
    },
    Paragraph {
        paragraph: Vec<Paragraph>,
    },
    Text {
        text: Vec<Paragraph>,
        #[serde(flatten)]
        style: TextStyle,
    },
    Link {
        link_type: String,
        url: String,
        label: String,
    },
    SimpleButton {
        label: String,
        link: String,
        #[serde(flatten)]
        style: ButtonStyle,
    },
    Card {
        text: Vec<Paragraph>,
        label: String,
        link: String,
        #[serde(flatten)]
        button: ButtonStyle,
        #[serde(flatten)]
        style: TextStyle,
    },
    InfoCard {
        card_components: Vec<Item>,
    },
    InfoTable {
        columns: Vec<TableColumn>,
    },
    Video {
        video_url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    pub enabled: bool,
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            id: new_item_id(),
            kind,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionGroup {
    pub id: String,
    pub items: Vec<Item>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub enabled: bool,
}

impl SectionGroup {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            id: new_item_id(),
            items,
            kind: "section",
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderComponents {
    pub title_content: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "single_paragraph"
    )]
    pub description_content: Option<Paragraph>,
    pub cta_components: Vec<Item>,
}

fn single_paragraph<S: Serializer>(p: &Option<Paragraph>, s: S) -> Result<S::Ok, S::Error> {
    p.as_ref().map(std::slice::from_ref).serialize(s)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeoMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_custom_meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_custom_meta_description: Option<String>,
}

/// Flags every guide page carries regardless of its content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDefaults {
    pub include_initial_cta: bool,
    pub no_index: bool,
    pub hide_breadcrumbs: bool,
    pub hide_footer: bool,
    pub hide_on_production: bool,
    pub enabled_scripts: Vec<&'static str>,
    pub seo_title: &'static str,
    pub seo_meta_description: &'static str,
    pub seo_canonical: &'static str,
    pub seo_og_description: &'static str,
    pub seo_og_title: &'static str,
    pub seo_tw_title: &'static str,
    pub seo_tw_description: &'static str,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            include_initial_cta: true,
            no_index: false,
            hide_breadcrumbs: false,
            hide_footer: false,
            hide_on_production: false,
            enabled_scripts: vec!["fullstory", "ahrefs"],
            seo_title: "custom",
            seo_meta_description: "custom",
            seo_canonical: "none",
            seo_og_description: "general",
            seo_og_title: "title",
            seo_tw_title: "title",
            seo_tw_description: "general",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDocument {
    pub id: String,
    pub blueprint: &'static str,
    pub title: String,
    #[serde(flatten)]
    pub defaults: PageDefaults,
    #[serde(flatten)]
    pub meta: SeoMeta,
    #[serde(flatten)]
    pub header: HeaderComponents,
    pub intro: Vec<IntroNode>,
    pub sections: Vec<SectionGroup>,
}

/// Short editor-style id: `m` followed by 13 base-36 characters.
pub fn new_item_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(14);
    id.push('m');
    for _ in 0..13 {
        id.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    id
}
