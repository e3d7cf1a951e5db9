//! Markdown rendering with sanitization and syntax highlighting
//!
//! Page bodies are user content. The event stream coming out of the parser is
//! sanitized first, and only the sanitized events are handed to the HTML
//! writer, so nothing the author typed can reach the output as live markup.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// URL schemes that are never allowed in link or image destinations
const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:", "file:"];

/// Replacement destination for neutralized links
const SAFE_URL: &str = "#";

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_highlight(true)
    }

    /// Create a renderer with code highlighting switched on or off
    pub fn with_highlight(highlight: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "base16-ocean.dark".to_string(),
            highlight,
        }
    }

    /// Render raw page bytes to sanitized HTML
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn render(&self, markdown: &[u8]) -> String {
        self.render_str(&String::from_utf8_lossy(markdown))
    }

    /// Render markdown text to sanitized HTML
    pub fn render_str(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options).map(sanitize_event);

        let mut events: Vec<Event> = Vec::new();
        // Language and collected text of the fenced block being highlighted
        let mut code_block: Option<(String, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if self.highlight => {
                    match fence_language(&info) {
                        Some(lang) => code_block = Some((lang.to_string(), String::new())),
                        None => events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                            info,
                        )))),
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if code_block.is_some() => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, &lang);
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a fenced code block, falling back to an escaped plain block
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang));

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let lang = html_escape(lang);

        if let (Some(syntax), Some(theme)) = (syntax, theme) {
            if let Ok(highlighted) =
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
            {
                return format!(
                    r#"<div class="highlight language-{}">{}</div>"#,
                    lang, highlighted
                );
            }
        }

        format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            lang,
            html_escape(code)
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Neutralize a single parser event
///
/// Raw HTML becomes literal text and dangerous link targets are replaced.
fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::HtmlBlock) => Event::Start(Tag::Paragraph),
        Event::End(TagEnd::HtmlBlock) => Event::End(TagEnd::Paragraph),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_dangerous_url(&url) {
        CowStr::Borrowed(SAFE_URL)
    } else {
        url
    }
}

/// Browsers ignore whitespace and control characters inside a scheme
fn is_dangerous_url(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    DANGEROUS_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

/// First word of a fence info string (```` ```rust,ignore ```` -> `rust`)
fn fence_language(info: &str) -> Option<&str> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .filter(|lang| !lang.is_empty())
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(b"# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = MarkdownRenderer::new();
        let markdown = b"# Title\n\n* one\n* two\n\n```rust\nfn main() {}\n```\n";
        assert_eq!(renderer.render(markdown), renderer.render(markdown));
    }

    #[test]
    fn test_script_block_is_neutralized() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(b"before\n\n<script>alert('x')</script>\n\nafter");
        assert!(!html.contains("<script"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn test_inline_html_is_neutralized() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(b"click <img src=x onerror=alert(1)> here");
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn test_dangerous_links_are_replaced() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(b"[a](javascript:alert(1)) [b](<JaVaScRiPt:alert(1)>) ![c](data:text/html,x)");
        assert!(!html.to_lowercase().contains("javascript:"));
        assert!(!html.contains("data:"));
        assert!(html.contains(r##"<a href="#">a</a>"##));
    }

    #[test]
    fn test_safe_links_are_kept() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(b"[home](/view/Home) [site](https://example.com)");
        assert!(html.contains(r#"href="/view/Home""#));
        assert!(html.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(b"```rust\nfn main() {}\n```");
        assert!(html.contains("highlight language-rust"));
    }

    #[test]
    fn test_code_block_without_highlighting() {
        let renderer = MarkdownRenderer::with_highlight(false);
        let html = renderer.render(b"```rust\nlet x = 1 < 2;\n```");
        assert!(!html.contains("highlight"));
        assert!(html.contains("1 &lt; 2"));
    }

    #[test]
    fn test_unknown_fence_language_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(b"```\"><b>x\n<i>code</i>\n```");
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<i>"));
        assert!(html.contains("&lt;i&gt;code&lt;/i&gt;"));
    }

    #[test]
    fn test_tables_are_enabled() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(b"| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(&[b'o', b'k', 0xff, b'!']);
        assert!(html.contains("ok\u{FFFD}!"));
    }
}
