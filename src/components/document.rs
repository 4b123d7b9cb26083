//! Placeholder Documents
//!
//! The page model fragments are injected into. [`HtmlDocument`] works directly
//! on HTML text: a placeholder is any non-void element whose `id` attribute
//! equals the component identifier, and injection replaces everything between
//! its opening tag and the matching closing tag.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Page model the assembler injects fragments into
pub trait PlaceholderDocument: Send {
    /// Replace the content of the placeholder keyed by `identifier`.
    ///
    /// Returns `false` when no such placeholder exists; the document is left
    /// unchanged in that case.
    fn replace_placeholder(&mut self, identifier: &str, markup: &str) -> bool;
}

/// Elements that cannot have content
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// HTML page held as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlDocument {
    html: String,
}

impl HtmlDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    /// Check whether a placeholder with this identifier can receive content
    pub fn has_placeholder(&self, identifier: &str) -> bool {
        self.content_range(identifier).is_some()
    }

    /// Current inner markup of a placeholder
    pub fn placeholder_content(&self, identifier: &str) -> Option<&str> {
        self.content_range(identifier).map(|r| &self.html[r])
    }

    /// Byte range of the placeholder's inner content
    fn content_range(&self, identifier: &str) -> Option<Range<usize>> {
        let scan = scan_copy(&self.html)?;

        let open = start_tag_regex()
            .captures_iter(&scan)
            .find(|caps| caps.get(2).is_some_and(|attrs| has_id(attrs.as_str(), identifier)))?;
        let open_match = open.get(0)?;
        let tag = open.get(1)?.as_str().to_ascii_lowercase();

        if open_match.as_str().ends_with("/>") || VOID_ELEMENTS.contains(&tag.as_str()) {
            return None;
        }

        let content_start = open_match.end();
        let close_at = matching_close(&scan, &tag, content_start)?;

        Some(content_start..close_at)
    }
}

/// Elements whose content is text, not markup
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "template", "textarea"];

fn start_tag_regex() -> &'static Regex {
    static START_TAG: OnceLock<Regex> = OnceLock::new();
    START_TAG.get_or_init(|| {
        Regex::new(r#"<([a-zA-Z][a-zA-Z0-9-]*)((?:[\s/](?:"[^"]*"|'[^']*'|[^'">])*)?)>"#)
            .expect("start tag pattern is valid")
    })
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
            .expect("attribute pattern is valid")
    })
}

fn comment_regex() -> &'static Regex {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"))
}

fn raw_text_regexes() -> &'static [Regex] {
    static RAW_TEXT: OnceLock<Vec<Regex>> = OnceLock::new();
    RAW_TEXT.get_or_init(|| {
        RAW_TEXT_ELEMENTS
            .iter()
            .map(|tag| {
                Regex::new(&format!(
                    r#"(?is)<{tag}(?:[\s/](?:"[^"]*"|'[^']*'|[^'">])*)?>(.*?)</{tag}\s*>"#
                ))
                .expect("raw text pattern is valid")
            })
            .collect()
    })
}

/// Whether an attribute list carries `id` equal to `identifier`
///
/// The attribute name is case-insensitive, the value is compared exactly.
fn has_id(attributes: &str, identifier: &str) -> bool {
    attribute_regex().captures_iter(attributes).any(|caps| {
        let is_id = caps
            .get(1)
            .is_some_and(|name| name.as_str().eq_ignore_ascii_case("id"));
        let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4));
        is_id && value.is_some_and(|v| v.as_str() == identifier)
    })
}

/// Copy of `html` with comments and raw-text element bodies blanked to spaces
///
/// Byte offsets are preserved, so ranges found in the copy apply to the
/// original text.
fn scan_copy(html: &str) -> Option<String> {
    let mut bytes = html.as_bytes().to_vec();

    for m in comment_regex().find_iter(html) {
        bytes[m.range()].fill(b' ');
    }

    for raw_re in raw_text_regexes() {
        let current = String::from_utf8(bytes.clone()).ok()?;
        for caps in raw_re.captures_iter(&current) {
            if let Some(body) = caps.get(1) {
                bytes[body.range()].fill(b' ');
            }
        }
    }

    String::from_utf8(bytes).ok()
}

/// Find the closing tag that balances an element opened just before `from`
fn matching_close(scan: &str, tag: &str, from: usize) -> Option<usize> {
    let tag_re = Regex::new(&format!(
        r#"(?i)<(/)?{}(?:[\s/](?:"[^"]*"|'[^']*'|[^'">])*)?>"#,
        regex::escape(tag)
    ))
    .ok()?;

    let mut depth = 1usize;
    for caps in tag_re.captures_iter(&scan[from..]) {
        let m = caps.get(0)?;
        if caps.get(1).is_some() {
            depth -= 1;
            if depth == 0 {
                return Some(from + m.start());
            }
        } else if !m.as_str().ends_with("/>") {
            depth += 1;
        }
    }

    // Unclosed element
    None
}

impl PlaceholderDocument for HtmlDocument {
    fn replace_placeholder(&mut self, identifier: &str, markup: &str) -> bool {
        match self.content_range(identifier) {
            Some(range) => {
                self.html.replace_range(range, markup);
                true
            }
            None => false,
        }
    }
}

impl From<String> for HtmlDocument {
    fn from(html: String) -> Self {
        Self::new(html)
    }
}

impl std::fmt::Display for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHELL: &str = r#"<!DOCTYPE html>
<html>
<body>
  <div id="header-placeholder"></div>
  <main>
    <section class="panel" id='about-placeholder'>Loading...</section>
  </main>
  <div id="footer-placeholder" data-role="footer"><span>old</span></div>
</body>
</html>"#;

    #[test]
    fn test_replace_empty_placeholder() {
        let mut doc = HtmlDocument::new(SHELL);

        assert!(doc.replace_placeholder("header-placeholder", "<nav>Home</nav>"));
        assert!(doc
            .as_str()
            .contains(r#"<div id="header-placeholder"><nav>Home</nav></div>"#));
    }

    #[test]
    fn test_replace_existing_content() {
        let mut doc = HtmlDocument::new(SHELL);

        assert!(doc.replace_placeholder("about-placeholder", "<p>Bio</p>"));
        assert_eq!(doc.placeholder_content("about-placeholder"), Some("<p>Bio</p>"));
        assert!(!doc.as_str().contains("Loading..."));

        assert!(doc.replace_placeholder("footer-placeholder", "<small>2026</small>"));
        assert_eq!(
            doc.placeholder_content("footer-placeholder"),
            Some("<small>2026</small>")
        );
    }

    #[test]
    fn test_missing_placeholder_leaves_document() {
        let mut doc = HtmlDocument::new(SHELL);

        assert!(!doc.replace_placeholder("projects-placeholder", "<ul></ul>"));
        assert_eq!(doc.as_str(), SHELL);
    }

    #[test]
    fn test_nested_same_tag() {
        let mut doc = HtmlDocument::new(
            r#"<div id="outer"><div class="inner"><div>x</div></div></div><div>after</div>"#,
        );

        assert!(doc.replace_placeholder("outer", "new"));
        assert_eq!(doc.as_str(), r#"<div id="outer">new</div><div>after</div>"#);
    }

    #[test]
    fn test_id_must_match_exactly() {
        let doc = HtmlDocument::new(
            r#"<div data-id="hero"></div><div id="hero-banner"></div><div id="a.b"></div>"#,
        );

        assert!(!doc.has_placeholder("hero"));
        assert!(doc.has_placeholder("hero-banner"));
        assert!(doc.has_placeholder("a.b"));
        assert!(!doc.has_placeholder("aXb"));

        let doc = HtmlDocument::new(r#"<div id="HERO"></div><div ID="Hero"></div>"#);
        assert!(!doc.has_placeholder("hero"));
        assert!(doc.has_placeholder("Hero"));
    }

    #[test]
    fn test_id_value_is_case_sensitive() {
        let mut doc = HtmlDocument::new(r#"<div id="Hero"></div><div id="hero"></div>"#);

        assert!(doc.replace_placeholder("hero", "X"));
        assert_eq!(doc.as_str(), r#"<div id="Hero"></div><div id="hero">X</div>"#);
    }

    #[test]
    fn test_commented_placeholder_is_skipped() {
        let mut doc =
            HtmlDocument::new(r#"<!-- <div id="about"></div> --><div id="about"></div>"#);

        assert!(doc.replace_placeholder("about", "X"));
        assert_eq!(
            doc.as_str(),
            r#"<!-- <div id="about"></div> --><div id="about">X</div>"#
        );

        let doc = HtmlDocument::new(r#"<!-- <div id="old"></div> -->"#);
        assert!(!doc.has_placeholder("old"));
    }

    #[test]
    fn test_raw_text_elements_are_skipped() {
        let mut doc = HtmlDocument::new(
            r#"<script>const tpl = '<div id="nav"></div>';</script><template><div id="nav"></div></template><nav id="nav"><div></div></nav>"#,
        );

        assert!(doc.replace_placeholder("nav", "links"));
        assert!(doc.as_str().ends_with(r#"<nav id="nav">links</nav>"#));
        assert!(doc.as_str().starts_with(r#"<script>const tpl = '<div id="nav"></div>';</script>"#));
    }

    #[test]
    fn test_closing_tags_in_comments_do_not_count() {
        let mut doc = HtmlDocument::new(r#"<div id="panel"><!-- </div> --><p>old</p></div><div>after</div>"#);

        assert!(doc.replace_placeholder("panel", "new"));
        assert_eq!(doc.as_str(), r#"<div id="panel">new</div><div>after</div>"#);
    }

    #[test]
    fn test_quoted_attribute_may_contain_angle_bracket() {
        let mut doc = HtmlDocument::new(r#"<div title="a>b" id="x">old</div>"#);

        assert!(doc.replace_placeholder("x", "new"));
        assert_eq!(doc.as_str(), r#"<div title="a>b" id="x">new</div>"#);

        let doc = HtmlDocument::new(r#"<section data-note='x > y' id=bare></section>"#);
        assert!(doc.has_placeholder("bare"));
    }

    #[test]
    fn test_void_and_unclosed_are_missing() {
        let doc = HtmlDocument::new(r#"<img id="avatar" src="me.png"><div id="open">"#);

        assert!(!doc.has_placeholder("avatar"));
        assert!(!doc.has_placeholder("open"));

        let doc = HtmlDocument::new(r#"<div id="self" />"#);
        assert!(!doc.has_placeholder("self"));
    }

    #[test]
    fn test_repeated_replacement() {
        let mut doc = HtmlDocument::new(r#"<footer id="footer"></footer>"#);

        assert!(doc.replace_placeholder("footer", "one"));
        assert!(doc.replace_placeholder("footer", "two"));
        assert_eq!(doc.to_string(), r#"<footer id="footer">two</footer>"#);
    }
}
