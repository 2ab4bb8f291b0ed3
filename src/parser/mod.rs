pub mod blocks;
pub mod header;
pub mod inline;
pub mod intro;
pub mod markup;
pub mod sanitize;
pub mod sections;

use std::sync::LazyLock;

use regex::Regex;

use crate::boundaries::Boundaries;
use crate::document::{HeaderComponents, IntroNode, SeoMeta};
use crate::guide::CtaButton;
use crate::redirects::RedirectTable;
use sections::Section;

static META_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]*name="description"[^>]*content="([^"]*)""#).unwrap()
});

/// Everything pulled out of one rendered page.
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub sections: Vec<Section>,
    pub intro: Vec<IntroNode>,
    pub header: HeaderComponents,
    pub meta: SeoMeta,
}

/// Four passes over the page: SEO meta, header block, intro sections,
/// content sections.
pub fn extract_page(
    html: &str,
    boundaries: Boundaries,
    redirects: &RedirectTable,
    button: &CtaButton,
) -> ExtractedPage {
    let regions = page_regions(html);
    let intro = intro::extract_intro(&regions[boundaries.intro_range(regions.len())], redirects);
    let content = &regions[boundaries.content_range(regions.len())];
    tracing::debug!(
        regions = regions.len(),
        content = content.len(),
        "page split into sections"
    );

    ExtractedPage {
        sections: sections::segment(content, redirects),
        intro,
        header: header::extract_header(html, button),
        meta: extract_meta(html),
    }
}

/// Top-level `<section>` bodies inside `<main>` (or the whole page when there
/// is no `<main>`). A page without sections is one region.
fn page_regions(html: &str) -> Vec<&str> {
    let content = markup::first_element(html, "main").map_or(html, |main| main.inner);
    let regions: Vec<&str> = markup::elements(content, &["section"])
        .into_iter()
        .map(|section| section.inner)
        .collect();
    if regions.is_empty() {
        vec![content]
    } else {
        regions
    }
}

fn extract_meta(html: &str) -> SeoMeta {
    SeoMeta {
        seo_custom_meta_title: markup::first_element(html, "title")
            .map(|title| sanitize::clean_html(title.inner)),
        seo_custom_meta_description: META_DESCRIPTION_RE
            .captures(html)
            .map(|caps| sanitize::clean_html(&caps[1])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::{Guide, GuideKind, Jurisdiction};

    fn button() -> CtaButton {
        Guide::new(GuideKind::Corporation, Jurisdiction::new("maine", 20)).cta_button()
    }

    #[test]
    fn minimal_page_end_to_end() {
        let html = "<html><body>\
            <header><h1>Title</h1><p>Desc</p><h2>H1</h2><h2>H2</h2></header>\
            <main>\
              <section><h2>First</h2><p>one</p></section>\
              <section><h2>Second</h2><p>two</p></section>\
            </main></body></html>";
        let page = extract_page(html, Boundaries::default(), &RedirectTable::default(), &button());
        assert_eq!(page.header.title_content, "Title");
        assert_eq!(page.header.cta_components.len(), 3);
        assert_eq!(page.sections.len(), 2);
        assert!(page.intro.is_empty());
    }

    #[test]
    fn boundaries_split_intro_from_content() {
        let html = "<main>\
            <section><p>intro text</p></section>\
            <section><h2>A</h2><p>a</p></section>\
            <section><h2>B</h2><p>b</p></section>\
            <section><h2>Footer</h2></section>\
            </main>";
        let page = extract_page(html, Boundaries::new(1, 3), &RedirectTable::default(), &button());
        assert_eq!(page.intro.len(), 1);
        let titles: Vec<_> = page.sections.iter().map(|s| s.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("A"), Some("B")]);
    }

    #[test]
    fn meta_is_cleaned() {
        let html = r#"<head><title>Maine &amp; You</title><meta name="description" content="Start a corporation&nbsp;today"></head>"#;
        let meta = extract_meta(html);
        assert_eq!(meta.seo_custom_meta_title.as_deref(), Some("Maine & You"));
        assert_eq!(
            meta.seo_custom_meta_description.as_deref(),
            Some("Start a corporation today")
        );
        assert_eq!(extract_meta("<p>none</p>"), SeoMeta::default());
    }

    #[test]
    fn page_without_sections_is_one_region() {
        let regions = page_regions("<main><h2>T</h2><p>x</p></main>");
        assert_eq!(regions, vec!["<h2>T</h2><p>x</p>"]);
    }

    #[test]
    fn fixture_page() {
        let html = std::fs::read_to_string("tests/fixtures/maine_corporation.html").unwrap();
        let page = extract_page(&html, Boundaries::new(1, 5), &RedirectTable::default(), &button());
        assert_eq!(
            page.header.title_content,
            "Maine Corporation: How to Start a Corporation in Maine"
        );
        assert_eq!(page.header.cta_components.len(), 3);
        assert!(page.header.description_content.is_some());
        assert!(!page.intro.is_empty());
        assert_eq!(page.sections.len(), 4);
        assert_eq!(
            page.meta.seo_custom_meta_title.as_deref(),
            Some("Maine Corporation | Start a Corporation in Maine | Bizee")
        );
    }
}
