//! Redirect table and boundary-aware link rewriting.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']+)'\s*=>\s*'([^']+)'").unwrap());
static HOST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://[^/]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEntry {
    pub old_path: String,
    pub new_path: String,
}

impl RedirectEntry {
    pub fn new(old_path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
        }
    }
}

/// All known redirects, most specific (longest old path) first.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    entries: Vec<RedirectEntry>,
    /// Old paths of the retired-page table; those pages are no longer live.
    retired: HashSet<String>,
}

impl RedirectTable {
    pub fn new(mut entries: Vec<RedirectEntry>) -> Self {
        // Stable: equal-length entries keep their source order.
        entries.sort_by(|a, b| b.old_path.len().cmp(&a.old_path.len()));
        Self {
            entries,
            retired: HashSet::new(),
        }
    }

    /// Combine the generated guide list with the retired-page and gone-page
    /// tables, in that precedence order among equal-length paths.
    pub fn build(
        generated: Vec<RedirectEntry>,
        retired: Vec<RedirectEntry>,
        gone: Vec<RedirectEntry>,
    ) -> Self {
        let retired_paths = retired.iter().map(|e| e.old_path.clone()).collect();
        let mut table = Self::new(generated.into_iter().chain(retired).chain(gone).collect());
        table.retired = retired_paths;
        table
    }

    /// Read every `'old' => 'new'` pair from a routing table source.
    pub fn parse_entries(text: &str) -> Vec<RedirectEntry> {
        ENTRY_RE
            .captures_iter(text)
            .map(|caps| RedirectEntry::new(&caps[1], &caps[2]))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the retired-page table already redirects `path`.
    pub fn has_rule_for(&self, path: &str) -> bool {
        self.retired.contains(path)
    }

    /// Replace the first matching old path with its new path. Scheme, host,
    /// query and fragment of `href` are kept.
    pub fn rewrite(&self, href: &str) -> String {
        let normalized = HOST_RE.replace(href, "");
        let offset = href.len() - normalized.len();
        for entry in &self.entries {
            if let Some(at) = find_at_boundary(&normalized, &entry.old_path) {
                let start = offset + at;
                let end = start + entry.old_path.len();
                return format!("{}{}{}", &href[..start], entry.new_path, &href[end..]);
            }
        }
        href.to_string()
    }
}

/// Position of `needle` in `haystack` where it ends the string or is followed
/// by `/`, `?` or `#`.
fn find_at_boundary(haystack: &str, needle: &str) -> Option<usize> {
    haystack.match_indices(needle).map(|(at, _)| at).find(|&at| {
        matches!(
            haystack[at + needle.len()..].chars().next(),
            None | Some('/' | '?' | '#')
        )
    })
}
