//! Markup (HTML) extraction into normalized flow text.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Node};

use crate::error::ExtractError;

/// Tags whose subtrees carry no readable content.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "meta", "link", "iframe", "svg",
];

/// Tags that break the text flow into separate lines.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "aside", "header", "footer", "nav", "h1", "h2",
    "h3", "h4", "h5", "h6", "ul", "ol", "li", "table", "tr", "blockquote", "pre", "figure",
    "figcaption", "details", "summary", "hr",
];

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\n\s*)+\n").expect("valid blank-run pattern"));

/// Converts HTML documents into plain flow text.
///
/// The document tree is walked once: non-content subtrees are skipped
/// entirely, block-level elements produce line breaks, and runs of blank
/// lines collapse to a single blank line afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract normalized text from raw HTML bytes.
    pub fn extract(&self, content: &[u8]) -> Result<String, ExtractError> {
        let html = String::from_utf8_lossy(content);
        Ok(self.extract_str(&html))
    }

    /// Extract normalized text from an HTML string.
    pub fn extract_str(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        let mut raw = String::new();
        walk(document.tree.root(), &mut raw);
        collapse_blank_lines(&raw)
    }
}

fn walk(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&text.text),
        Node::Element(element) => {
            let name = element.name();
            if SKIP_TAGS.contains(&name) {
                return;
            }
            if name == "br" {
                out.push('\n');
                return;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            for child in node.children() {
                walk(child, out);
            }
            if block {
                out.push('\n');
            }
        }
        _ => {
            for child in node.children() {
                walk(child, out);
            }
        }
    }
}

/// Collapse runs of blank lines to a single blank line and trim the edges.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    let trimmed_lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = trimmed_lines.join("\n");
    BLANK_RUNS.replace_all(&joined, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_paragraphs_with_blank_line_separation() {
        let html = "<html><body><p>First paragraph.</p><p>Second paragraph.</p></body></html>";
        let text = HtmlExtractor::new().extract(html.as_bytes()).unwrap();
        assert_eq!(text, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn skips_script_and_style_content() {
        let html = r#"<html><head><style>p { color: red; }</style></head>
            <body><script>alert("nope")</script><p>Visible text.</p></body></html>"#;
        let text = HtmlExtractor::new().extract(html.as_bytes()).unwrap();
        assert!(text.contains("Visible text."));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn collapses_runs_of_blank_lines() {
        let html = "<body><div><p>a</p></div><div></div><div></div><div><p>b</p></div></body>";
        let text = HtmlExtractor::new().extract(html.as_bytes()).unwrap();
        assert_eq!(text, "a\n\nb");
    }

    #[test]
    fn headings_and_lists_break_flow() {
        let html = "<body><h1>Title</h1><ul><li>one</li><li>two</li></ul></body>";
        let text = HtmlExtractor::new().extract(html.as_bytes()).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["Title", "one", "two"]);
    }

    #[test]
    fn inline_markup_stays_in_flow() {
        let html = "<body><p>keep <em>emphasis</em> and <a href=\"#\">links</a> inline</p></body>";
        let text = HtmlExtractor::new().extract(html.as_bytes()).unwrap();
        assert_eq!(text, "keep emphasis and links inline");
    }
}
