use std::collections::HashMap;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// syntect theme used for fenced code blocks.
const CODE_THEME: &str = "InspiredGitHub";

/// Marker paragraph replaced by the generated table of contents.
const TOC_MARKER: &str = "<p>[TOC]</p>";

/// Parser options shared by the live preview and the PDF exporter, so both
/// follow identical conversion rules. Fenced code blocks are core CommonMark
/// and always on.
pub fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options
}

/// One table-of-contents entry, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub depth: usize,
    pub text: String,
    pub slug: String,
}

/// Markdown to HTML conversion with tables, fenced code blocks, syntax
/// highlighting and a table of contents.
///
/// The conversion is total and deterministic: it never fails, and identical
/// input yields identical output. Syntax and theme sets are loaded once at
/// startup because re-rendering happens on every keystroke.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render markdown text to an HTML fragment.
    pub fn to_html(&self, text: &str) -> String {
        let headings = collect_headings(text);
        let mut slugs = headings.iter();

        // Fenced code blocks are swallowed and re-emitted as pre-highlighted
        // HTML; headings get their slug as an id attribute.
        let mut events: Vec<Event> = Vec::new();
        let mut fenced: Option<(String, String)> = None;
        for event in Parser::new_ext(text, parser_options()) {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
                    fenced = Some((lang.to_string(), String::new()));
                }
                Event::Text(chunk) if fenced.is_some() => {
                    if let Some((_, code)) = fenced.as_mut() {
                        code.push_str(&chunk);
                    }
                }
                Event::End(TagEnd::CodeBlock) if fenced.is_some() => {
                    if let Some((lang, code)) = fenced.take() {
                        events.push(Event::Html(CowStr::from(self.highlight_block(&lang, &code))));
                    }
                }
                Event::Start(Tag::Heading { level, id, classes, attrs }) => {
                    let slug = slugs.next().map(|entry| entry.slug.clone());
                    events.push(Event::Start(Tag::Heading {
                        level,
                        id: id.or_else(|| slug.map(CowStr::from)),
                        classes,
                        attrs,
                    }));
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(text.len() * 2);
        html::push_html(&mut out, events.into_iter());

        if out.contains(TOC_MARKER) {
            out = out.replace(TOC_MARKER, &toc_html(&headings));
        }
        out
    }

    /// Highlight one fenced code block. Unknown languages and highlighter
    /// failures fall back to an escaped plain block.
    fn highlight_block(&self, lang: &str, code: &str) -> String {
        if !lang.is_empty() {
            if let Some(syntax) = self.syntax_set.find_syntax_by_token(lang) {
                let theme = &self.theme_set.themes[CODE_THEME];
                match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
                    Ok(highlighted) => return highlighted,
                    Err(e) => log::warn!("Highlighting failed for language {:?}: {}", lang, e),
                }
            }
        }

        if lang.is_empty() {
            format!("<pre><code>{}</code></pre>\n", escape_html(code))
        } else {
            format!(
                "<pre><code class=\"language-{}\">{}</code></pre>\n",
                escape_html(lang),
                escape_html(code)
            )
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap an HTML fragment in the font tags the FLTK help view understands.
pub fn wrap_html_for_preview(html: &str) -> String {
    format!("<font face=\"Helvetica\" size=\"4\">{}</font>", html)
}

pub fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Collect all headings with deduplicated slugs, in document order.
pub fn collect_headings(text: &str) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for event in Parser::new_ext(text, parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_depth(level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((depth, text)) = current.take() {
                    entries.push(TocEntry {
                        depth,
                        text,
                        slug: String::new(),
                    });
                }
            }
            Event::Text(chunk) | Event::Code(chunk) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&chunk);
                }
            }
            _ => {}
        }
    }

    // Duplicate heading titles get -2, -3, ... suffixes so anchors stay unique.
    let mut seen: HashMap<String, usize> = HashMap::new();
    for entry in &mut entries {
        let base = slugify(&entry.text);
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        entry.slug = if *count == 1 {
            base
        } else {
            format!("{}-{}", base, count)
        };
    }

    entries
}

/// Lowercased anchor id: alphanumerics kept, whitespace and separators
/// collapsed to single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

/// Build the nested table-of-contents list.
pub fn toc_html(entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return "<div class=\"toc\"></div>\n".to_string();
    }

    let mut out = String::from("<div class=\"toc\">\n<ul>\n");
    let mut depth_stack = vec![entries[0].depth];
    let mut first = true;

    for entry in entries {
        if !first {
            let current = *depth_stack.last().unwrap_or(&1);
            if entry.depth > current {
                out.push_str("<ul>\n");
                depth_stack.push(entry.depth);
            } else {
                out.push_str("</li>\n");
                while depth_stack.len() > 1 && entry.depth < *depth_stack.last().unwrap_or(&1) {
                    depth_stack.pop();
                    out.push_str("</ul>\n</li>\n");
                }
            }
        }
        out.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            entry.slug,
            escape_html(&entry.text)
        ));
        first = false;
    }

    out.push_str("</li>\n");
    while depth_stack.len() > 1 {
        depth_stack.pop();
        out.push_str("</ul>\n</li>\n");
    }
    out.push_str("</ul>\n</div>\n");
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new()
    }

    #[test]
    fn test_heading_renders_h1_with_anchor() {
        let html = renderer().to_html("# Hello");
        assert!(html.contains("<h1 id=\"hello\">Hello</h1>"), "got: {}", html);
    }

    #[test]
    fn test_render_is_deterministic() {
        let r = renderer();
        let input = "# A\n\nsome *text*\n\n```rust\nfn main() {}\n```\n";
        assert_eq!(r.to_html(input), r.to_html(input));
    }

    #[test]
    fn test_render_never_panics_on_garbage() {
        let r = renderer();
        for input in [
            "",
            "]([*`~ weird **unclosed",
            "| broken | table\n|---|\n| x |",
            "```\nunclosed fence",
            "\u{0}\u{fffd}",
        ] {
            let _ = r.to_html(input);
        }
    }

    #[test]
    fn test_bold_renders_strong() {
        let html = renderer().to_html("**bold**");
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_tables_enabled() {
        let html = renderer().to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_fenced_code_is_highlighted() {
        let html = renderer().to_html("```rust\nfn main() {}\n```\n");
        // syntect emits span-styled markup instead of a bare code block
        assert!(html.contains("<pre"));
        assert!(html.contains("main"));
        assert!(html.contains("<span"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_block() {
        let html = renderer().to_html("```nosuchlang\na < b\n```\n");
        assert!(html.contains("class=\"language-nosuchlang\""));
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn test_toc_marker_is_replaced() {
        let html = renderer().to_html("[TOC]\n\n# One\n\n## Two\n");
        assert!(!html.contains("[TOC]"));
        assert!(html.contains("<div class=\"toc\">"));
        assert!(html.contains("<a href=\"#one\">One</a>"));
        assert!(html.contains("<a href=\"#two\">Two</a>"));
    }

    #[test]
    fn test_no_toc_marker_no_toc() {
        let html = renderer().to_html("# One\n");
        assert!(!html.contains("class=\"toc\""));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Spaces  everywhere "), "spaces-everywhere");
        assert_eq!(slugify("C'est l'été!"), "cest-lété");
        assert_eq!(slugify("snake_case_title"), "snake-case-title");
        assert_eq!(slugify("???"), "section");
    }

    #[test]
    fn test_duplicate_headings_get_unique_slugs() {
        let headings = collect_headings("# Setup\n\n# Setup\n\n# Setup\n");
        let slugs: Vec<&str> = headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["setup", "setup-2", "setup-3"]);
    }

    #[test]
    fn test_collect_headings_depth_and_text() {
        let headings = collect_headings("# Top\n\n## `inline` code\n");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].depth, 1);
        assert_eq!(headings[0].text, "Top");
        assert_eq!(headings[1].depth, 2);
        assert_eq!(headings[1].text, "inline code");
    }

    #[test]
    fn test_toc_html_nesting() {
        let entries = vec![
            TocEntry { depth: 1, text: "A".into(), slug: "a".into() },
            TocEntry { depth: 2, text: "B".into(), slug: "b".into() },
            TocEntry { depth: 2, text: "C".into(), slug: "c".into() },
            TocEntry { depth: 1, text: "D".into(), slug: "d".into() },
        ];
        let html = toc_html(&entries);
        let flat = html.replace('\n', "");
        assert!(flat.contains("<li><a href=\"#a\">A</a><ul><li><a href=\"#b\">B</a></li><li><a href=\"#c\">C</a></li></ul></li><li><a href=\"#d\">D</a></li>"), "got: {}", flat);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn test_wrap_html_for_preview() {
        let wrapped = wrap_html_for_preview("<p>Hello</p>");
        assert!(wrapped.starts_with("<font face=\"Helvetica\""));
        assert!(wrapped.contains("<p>Hello</p>"));
    }
}
