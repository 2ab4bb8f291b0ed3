//! Guide catalogue: which legacy pages make up a jurisdiction's guide and
//! where each one lands in the content store.

use clap::ValueEnum;

use crate::redirects::RedirectEntry;

const STATE_CODES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new-hampshire", "NH"),
    ("new-jersey", "NJ"),
    ("new-mexico", "NM"),
    ("new-york", "NY"),
    ("north-carolina", "NC"),
    ("north-dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode-island", "RI"),
    ("south-carolina", "SC"),
    ("south-dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west-virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

/// A US state as addressed by the legacy site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jurisdiction {
    pub slug: String,
    pub name: String,
    /// Upper-case postal code.
    pub code: String,
    pub ordinal: u32,
}

impl Jurisdiction {
    pub fn new(slug: &str, ordinal: u32) -> Self {
        let slug = slug.trim().to_ascii_lowercase();
        let name = slug
            .split('-')
            .filter(|w| !w.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ");
        let code = STATE_CODES
            .iter()
            .find(|(s, _)| *s == slug)
            .map(|(_, code)| code.to_string())
            .unwrap_or_else(|| slug.chars().take(2).collect::<String>().to_ascii_uppercase());
        Self {
            slug,
            name,
            code,
            ordinal,
        }
    }

    pub fn code_lower(&self) -> String {
        self.code.to_ascii_lowercase()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageType {
    Main,
    BusinessNames,
    RegisteredAgent,
    FilingFeesRequirements,
    BusinessTaxes,
    StartACorporation,
    Faqs,
}

impl PageType {
    /// Destination path segment; `None` for the guide's main page.
    pub fn segment(self) -> Option<&'static str> {
        match self {
            PageType::Main => None,
            PageType::BusinessNames => Some("business-names"),
            PageType::RegisteredAgent => Some("registered-agent"),
            PageType::FilingFeesRequirements => Some("filing-fees-requirements"),
            PageType::BusinessTaxes => Some("business-taxes"),
            PageType::StartACorporation => Some("start-a-corporation"),
            PageType::Faqs => Some("faqs"),
        }
    }

    fn generic_title(self) -> Option<&'static str> {
        match self {
            PageType::Main => None,
            PageType::BusinessNames => Some("Business Names"),
            PageType::RegisteredAgent => Some("Registered Agent"),
            PageType::FilingFeesRequirements => Some("Filing Fees & Requirements"),
            PageType::BusinessTaxes => Some("Business Taxes"),
            PageType::StartACorporation => Some("Start a Corporation"),
            PageType::Faqs => Some("FAQs"),
        }
    }
}

/// One legacy page to migrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidePage {
    /// Legacy path without the leading slash.
    pub slug: String,
    pub page_type: PageType,
}

/// Order-form call to action shown in every page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtaButton {
    pub label: String,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GuideKind {
    #[value(name = "corp")]
    Corporation,
    Llc,
}

/// A guide kind bound to one jurisdiction.
#[derive(Debug, Clone)]
pub struct Guide {
    pub kind: GuideKind,
    pub jurisdiction: Jurisdiction,
}

impl Guide {
    pub fn new(kind: GuideKind, jurisdiction: Jurisdiction) -> Self {
        Self { kind, jurisdiction }
    }

    pub fn pages(&self) -> Vec<GuidePage> {
        let s = &self.jurisdiction.slug;
        let page = |slug: String, page_type| GuidePage { slug, page_type };
        match self.kind {
            GuideKind::Corporation => {
                let code = self.jurisdiction.code_lower();
                vec![
                    page(format!("{s}-corporation"), PageType::Main),
                    page(format!("{s}-corporation/{s}-corporation-names"), PageType::BusinessNames),
                    page(format!("{s}-corporation/how-to-name-your-corporation"), PageType::BusinessNames),
                    page(format!("{s}-corporation/registered-agents-{s}"), PageType::RegisteredAgent),
                    page(format!("{s}-corporation/{s}-registered-agents"), PageType::RegisteredAgent),
                    page(format!("{s}-corporation/{s}-incorporation-fees"), PageType::FilingFeesRequirements),
                    page(format!("{s}-corporation/form-filling-permit-requirements"), PageType::FilingFeesRequirements),
                    page(format!("{s}-corporation/{s}-taxes"), PageType::BusinessTaxes),
                    page(format!("{s}-corporation/taxes-and-fees-for-your-corporation"), PageType::BusinessTaxes),
                    page(format!("{s}-corporation/start-a-{code}-corporation"), PageType::StartACorporation),
                ]
            }
            GuideKind::Llc => vec![
                page(format!("{s}-llc"), PageType::Main),
                page(format!("{s}-llc/{s}-business-names"), PageType::BusinessNames),
                page(format!("{s}-llc/registered-agents-{s}-llc"), PageType::RegisteredAgent),
                page(format!("{s}-llc/fees-filing-requirements"), PageType::FilingFeesRequirements),
                page(format!("{s}-llc/business-taxes"), PageType::BusinessTaxes),
                page(format!("{s}-llc/faq"), PageType::Faqs),
            ],
        }
    }

    pub fn filename(&self, page_type: PageType) -> String {
        let s = &self.jurisdiction.slug;
        match (self.kind, page_type.segment()) {
            (GuideKind::Corporation, None) => format!("{s}.1.md"),
            (GuideKind::Corporation, Some(seg)) => format!("{seg}.{s}-corp.md"),
            (GuideKind::Llc, None) => format!("{s}.md"),
            (GuideKind::Llc, Some(seg)) => format!("{seg}.{s}.md"),
        }
    }

    pub fn title(&self, page_type: PageType) -> String {
        page_type
            .generic_title()
            .map_or_else(|| self.jurisdiction.name.clone(), str::to_string)
    }

    pub fn cta_button(&self) -> CtaButton {
        let (label, entity_type) = match self.kind {
            GuideKind::Corporation => ("Incorporate Now", "CCorporation"),
            GuideKind::Llc => ("Form your llc Now", "LLC"),
        };
        CtaButton {
            label: label.to_string(),
            link: format!(
                "https://orders.bizee.com/form-order-now.php?entityType={entity_type}&entityState={}",
                self.jurisdiction.code
            ),
        }
    }

    /// Tree entry the guide's main page hangs under.
    pub fn tree_anchor(&self) -> &'static str {
        match self.kind {
            GuideKind::Corporation => "e12f30bb-70fe-41e6-9c6e-6a0feb550a69",
            GuideKind::Llc => "267d09b7-82a4-48b1-bfa1-e1967ebcddd2",
        }
    }

    /// Route prefix of migrated pages. Guides without one produce no
    /// redirects and no route-table entries.
    pub fn destination_prefix(&self) -> Option<&'static str> {
        match self.kind {
            GuideKind::Corporation => Some("/corp-formation-by-state"),
            GuideKind::Llc => None,
        }
    }

    /// New route of a page type, when the guide has a destination prefix.
    pub fn destination_path(&self, page_type: PageType) -> Option<String> {
        let prefix = self.destination_prefix()?;
        let s = &self.jurisdiction.slug;
        Some(match page_type.segment() {
            None => format!("{prefix}/{s}"),
            Some(seg) => format!("{prefix}/{s}/{seg}"),
        })
    }

    /// Redirects from every legacy page of this guide to its new route, plus
    /// the top-level start-a-corporation alias.
    pub fn generated_redirects(&self) -> Vec<RedirectEntry> {
        let mut entries: Vec<RedirectEntry> = self
            .pages()
            .into_iter()
            .filter_map(|page| {
                let new_path = self.destination_path(page.page_type)?;
                Some(RedirectEntry::new(format!("/{}", page.slug), new_path))
            })
            .collect();
        if let Some(new_path) = self.destination_path(PageType::StartACorporation) {
            let code = self.jurisdiction.code_lower();
            entries.push(RedirectEntry::new(format!("/start-a-{code}-corporation"), new_path));
        }
        entries
    }
}
