use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Tag-shaped markup only: a bare `<` in text (`< $100`) is not a tag.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:/?[A-Za-z]|!)[^>]*>").unwrap());
static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^<br\b[^>]*>$").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&#x27;", "\u{2019}"),
    ("&#39;", "\u{2019}"),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
];

/// Reduce a markup fragment to display text: drop every tag except line
/// breaks, decode the known entities, collapse whitespace.
pub fn clean_html(html: &str) -> String {
    let mut current = clean_pass(html);
    // A pass either shortens the text or only normalizes whitespace, so this reaches a fixed point.
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(html: &str) -> String {
    let without_tags = TAG_RE.replace_all(html, |caps: &Captures| {
        let tag = &caps[0];
        if LINE_BREAK_RE.is_match(tag) {
            tag.to_string()
        } else {
            String::new()
        }
    });
    let decoded = ENTITIES
        .iter()
        .fold(without_tags.into_owned(), |text, (entity, plain)| text.replace(entity, plain));
    WHITESPACE_RE.replace_all(&decoded, " ").into_owned()
}

/// Remove every tag, line breaks included. Text and entities are untouched.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Run `clean_html` over every string value of a document tree. Mapping keys
/// are left alone.
pub fn sanitize_strings(value: &mut serde_yaml::Value) {
    match value {
        serde_yaml::Value::String(s) => *s = clean_html(s),
        serde_yaml::Value::Sequence(items) => items.iter_mut().for_each(sanitize_strings),
        serde_yaml::Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                sanitize_strings(v);
            }
        }
        serde_yaml::Value::Tagged(tagged) => sanitize_strings(&mut tagged.value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_entities() {
        assert_eq!(clean_html("A&nbsp;B&amp;C"), "A B&C");
        assert_eq!(clean_html("it&#39;s &quot;ok&quot;"), "it\u{2019}s \"ok\"");
        assert_eq!(clean_html("don&#x27;t"), "don\u{2019}t");
    }

    #[test]
    fn keeps_line_breaks_only() {
        assert_eq!(
            clean_html("<p>one<br>two<br/>three <strong>four</strong></p>"),
            "one<br>two<br/>three four"
        );
    }

    #[test]
    fn collapses_whitespace_and_newlines() {
        assert_eq!(clean_html("Title with\n        newline"), "Title with newline");
        assert_eq!(clean_html("a \t\n b"), "a b");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "A&nbsp;B&amp;C",
            "&amp;lt;b&amp;gt;bold&amp;lt;/b&amp;gt;",
            "&lt;em&gt;x&lt;/em&gt;",
            "<div>\n  <p>Filing fees &amp; requirements</p>\n</div>",
            "plain",
            "",
            "a < b > c",
        ];
        for input in inputs {
            let once = clean_html(input);
            assert_eq!(clean_html(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn escaped_comparisons_survive() {
        assert_eq!(
            clean_html("Fees &lt; $100 and &gt; $50 apply"),
            "Fees < $100 and > $50 apply"
        );
        assert_eq!(clean_html("a < b > c"), "a < b > c");
        assert_eq!(clean_html("x <!-- note --> y"), "x y");
    }

    #[test]
    fn malformed_input_degrades() {
        assert_eq!(clean_html("<p>unclosed <a href='x'"), "unclosed <a href='x'");
    }

    #[test]
    fn strip_tags_removes_breaks_too() {
        assert_eq!(strip_tags("<b>Maine</b><br> LLC &amp; Co"), "Maine LLC &amp; Co");
    }

    #[test]
    fn sanitize_strings_walks_values_not_keys() {
        let mut value: serde_yaml::Value =
            serde_yaml::from_str("'a&amp;b': 'x&nbsp;y'\nlist:\n  - '<b>bold</b>'\n  - 3\n").unwrap();
        sanitize_strings(&mut value);
        assert_eq!(value["a&amp;b"].as_str(), Some("x y"));
        assert_eq!(value["list"][0].as_str(), Some("bold"));
        assert_eq!(value["list"][1].as_i64(), Some(3));
    }
}
