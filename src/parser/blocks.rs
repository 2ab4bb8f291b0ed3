use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::markup::{self, Element};
use super::sanitize::strip_tags;
use crate::redirects::RedirectTable;

pub const CANONICAL_HOST: &str = "bizee.com";
pub const ORDER_HOST: &str = "orders.bizee.com";
/// Registrable domains of the embeddable video providers.
const VIDEO_PROVIDERS: &[&str] = &[
    "wistia.com",
    "wistia.net",
    "youtube.com",
    "youtube-nocookie.com",
    "vimeo.com",
];

const CARD_CLASSES: &[&str] = &[
    "rounded-6",
    "border-primary-600",
    "tablet:flex-row",
    "tablet:items-stretch",
    "mx-auto",
    "flex",
    "w-full",
    "max-w-[800px]",
    "flex-col",
    "items-center",
    "overflow-hidden",
    "border",
    "bg-white",
    "shadow-xl",
];
const TABLE_CLASSES: &[&str] = &[
    "flex",
    "flex-col",
    "group",
    "max-w-[500px]",
    "h-full",
    "max-h-full",
    "w-full",
    "overflow-hidden",
    "rounded-6",
    "border",
    "border-gray-300",
    "bg-white",
];
/// Link containers must open with the anchor within this many bytes.
const LINK_LOOKAHEAD: usize = 200;

static LIST_STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)liststyledefaulticon").unwrap());
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Own,
    Extern,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Own => "own",
            LinkKind::Extern => "extern",
        }
    }
}

/// One typed content block inside a section. Paragraph, list and info-card
/// blocks keep raw markup; it is parsed when the page is assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(String),
    List { ordered: bool, markup: String },
    Subtitle { text: String, level: u8 },
    Card { text: String, button_label: String, href: String },
    Link { text: String, href: String, kind: LinkKind },
    SimpleButton { label: String, href: String },
    InfoCard(String),
    InfoTable,
    Video(String),
}

/// Special `div` containers, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Card,
    ListStyle,
    Table,
    Link,
}

/// Classify a `div` by its attributes and leading content. `None` means the
/// container is generic and its children are scanned as usual.
pub fn classify_div(attrs: &str, inner: &str) -> Option<Container> {
    if markup::has_classes(attrs, CARD_CLASSES) {
        Some(Container::Card)
    } else if LIST_STYLE_RE.is_match(attrs) {
        Some(Container::ListStyle)
    } else if markup::has_classes(attrs, TABLE_CLASSES) {
        Some(Container::Table)
    } else if leading_anchor(inner).is_some() {
        Some(Container::Link)
    } else {
        None
    }
}

/// Build the block for a classified container. `None` when the container
/// has nothing usable (no list parts, no anchor href).
pub fn container_block(
    kind: Container,
    div: &Element<'_>,
    redirects: &RedirectTable,
) -> Option<Block> {
    match kind {
        Container::Card => Some(card_block(div.inner, redirects)),
        Container::ListStyle => info_card_block(div.inner),
        Container::Table => {
            tracing::debug!("table container replaced by placeholder info table");
            Some(Block::InfoTable)
        }
        Container::Link => link_block(div.inner, redirects),
    }
}

fn card_block(inner: &str, redirects: &RedirectTable) -> Block {
    let anchor = markup::elements(inner, &["a"])
        .into_iter()
        .find(|a| markup::attr(a.attrs, "href").is_some());
    let (button_label, href) = match anchor {
        Some(a) => (
            strip_tags(a.inner).trim().to_string(),
            markup::attr(a.attrs, "href")
                .map(|href| redirects.rewrite(href))
                .unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };
    let without_anchors = ANCHOR_RE.replace_all(inner, "");
    let text = markup_to_spaced_text(&without_anchors);
    Block::Card {
        text,
        button_label,
        href,
    }
}

fn markup_to_spaced_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    while let Some(tag) = markup::next_tag(html, cursor) {
        out.push_str(&html[cursor..tag.start]);
        out.push(' ');
        cursor = tag.end;
    }
    out.push_str(&html[cursor..]);
    out.trim().to_string()
}

fn info_card_block(inner: &str) -> Option<Block> {
    let parts: Vec<&str> = markup::elements(inner, &["span", "p", "ul", "ol", "li", "strong"])
        .iter()
        .map(|el| el.outer)
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(Block::InfoCard(format!("<span>{}</span>", parts.concat())))
}

/// The anchor a link container opens with, if any.
fn leading_anchor<'a>(inner: &'a str) -> Option<Element<'a>> {
    let tag = markup::next_tag(inner, 0)?;
    if tag.closing || tag.name != "a" || tag.start >= LINK_LOOKAHEAD {
        return None;
    }
    if !inner[..tag.start].trim().is_empty() {
        return None;
    }
    markup::element_at(inner, &tag)
}

fn link_block(inner: &str, redirects: &RedirectTable) -> Option<Block> {
    let anchor = leading_anchor(inner)?;
    let href = markup::attr(anchor.attrs, "href")?;
    let text = strip_tags(anchor.inner).trim().to_string();
    let host = host_of(href);
    if host.as_deref() == Some(ORDER_HOST) {
        return Some(Block::SimpleButton {
            label: text,
            href: href.to_string(),
        });
    }
    let kind = match host.as_deref() {
        None => LinkKind::Own,
        Some(h) if on_domain(h, CANONICAL_HOST) => LinkKind::Own,
        Some(_) => LinkKind::Extern,
    };
    Some(Block::Link {
        text,
        href: redirects.rewrite(href),
        kind,
    })
}

/// Video block for an `iframe` whose source is a known video provider.
pub fn video_block(attrs: &str) -> Option<Block> {
    let src = markup::attr(attrs, "src")?;
    let absolute = if src.starts_with("//") {
        format!("https:{src}")
    } else {
        src.to_string()
    };
    let host = host_of(&absolute)?;
    VIDEO_PROVIDERS
        .iter()
        .any(|provider| on_domain(&host, provider))
        .then_some(Block::Video(absolute))
}

/// `host` is `domain` itself or one of its subdomains.
fn on_domain(host: &str, domain: &str) -> bool {
    host.strip_suffix(domain)
        .is_some_and(|rest| rest.is_empty() || rest.ends_with('.'))
}

/// Host of an absolute URL; `None` for relative references.
fn host_of(href: &str) -> Option<String> {
    Url::parse(href).ok()?.host_str().map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div(html: &str) -> Element<'_> {
        let tag = markup::next_tag(html, 0).unwrap();
        markup::element_at(html, &tag).unwrap()
    }

    fn classify(html: &str) -> Option<Container> {
        let el = div(html);
        classify_div(el.attrs, el.inner)
    }

    #[test]
    fn card_wins_over_table_classes() {
        let classes = CARD_CLASSES.iter().chain(TABLE_CLASSES).copied().collect::<Vec<_>>();
        let html = format!(r#"<div class="{}"><a href="/x">Go</a></div>"#, classes.join(" "));
        assert_eq!(classify(&html), Some(Container::Card));
    }

    #[test]
    fn list_style_marker_is_case_insensitive() {
        let html = r#"<div class="ListStyleDefaultIcon x"><span>a</span></div>"#;
        assert_eq!(classify(html), Some(Container::ListStyle));
    }

    #[test]
    fn link_container_needs_leading_anchor() {
        assert_eq!(classify(r#"<div>  <a href="/x">x</a></div>"#), Some(Container::Link));
        assert_eq!(classify(r#"<div>text <a href="/x">x</a></div>"#), None);
        assert_eq!(classify(r#"<div class="flex"><p>x</p></div>"#), None);
    }

    #[test]
    fn card_reads_button_and_text() {
        let el = div(
            r#"<div><h3>Need help?</h3><p>We file <b>fast</b>.</p><a href="/maine-corporation"><span>Start</span></a></div>"#,
        );
        let block = container_block(Container::Card, &el, &RedirectTable::default()).unwrap();
        let Block::Card {
            text,
            button_label,
            href,
        } = block
        else {
            panic!("expected card");
        };
        assert_eq!(button_label, "Start");
        assert_eq!(href, "/maine-corporation");
        assert!(text.starts_with("Need help?"));
        assert!(text.contains("fast"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn info_card_wraps_parts() {
        let el = div(r#"<div><i class="icon"></i><span>One</span><p>Two</p></div>"#);
        assert_eq!(
            container_block(Container::ListStyle, &el, &RedirectTable::default()),
            Some(Block::InfoCard("<span><span>One</span><p>Two</p></span>".into()))
        );
        let empty = div(r#"<div><i></i></div>"#);
        assert_eq!(
            container_block(Container::ListStyle, &empty, &RedirectTable::default()),
            None
        );
    }

    #[test]
    fn link_kinds() {
        let redirects = RedirectTable::default();
        let own = div(r#"<div><a href="https://bizee.com/x">Own</a></div>"#);
        let rel = div(r#"<div><a href="/x">Rel</a></div>"#);
        let ext = div(r#"<div><a href="https://irs.gov/x">Ext</a></div>"#);
        let order = div(
            r#"<div><a href="https://orders.bizee.com/form-order-now.php?entityState=ME">Order</a></div>"#,
        );
        let kind = |el: &Element<'_>| match container_block(Container::Link, el, &redirects) {
            Some(Block::Link { kind, .. }) => Some(kind),
            _ => None,
        };
        assert_eq!(kind(&own), Some(LinkKind::Own));
        assert_eq!(kind(&rel), Some(LinkKind::Own));
        assert_eq!(kind(&ext), Some(LinkKind::Extern));
        assert_eq!(
            container_block(Container::Link, &order, &redirects),
            Some(Block::SimpleButton {
                label: "Order".into(),
                href: "https://orders.bizee.com/form-order-now.php?entityState=ME".into(),
            })
        );
    }

    #[test]
    fn videos_only_from_known_providers() {
        assert_eq!(
            video_block(r#" src="//fast.wistia.net/embed/iframe/abc""#),
            Some(Block::Video("https://fast.wistia.net/embed/iframe/abc".into()))
        );
        assert_eq!(
            video_block(r#" src="https://www.youtube.com/embed/xyz""#),
            Some(Block::Video("https://www.youtube.com/embed/xyz".into()))
        );
        assert_eq!(video_block(r#" src="https://maps.google.com/embed""#), None);
        assert_eq!(video_block(" title='no src'"), None);
    }

    #[test]
    fn video_provider_must_own_the_host() {
        assert_eq!(video_block(r#" src="https://notyoutube.example.com/embed/x""#), None);
        assert_eq!(video_block(r#" src="https://evilvimeo.com/embed/x""#), None);
        assert_eq!(video_block(r#" src="https://youtube.com.example.net/x""#), None);
        assert!(video_block(r#" src="https://player.vimeo.com/video/1""#).is_some());
        assert!(on_domain("bizee.com", CANONICAL_HOST));
        assert!(!on_domain("notbizee.com", CANONICAL_HOST));
    }
}
