//! Markdown rendering for blog posts
//!
//! Posts are written in Markdown. Raw HTML blocks pass through untouched so
//! content pasted from the old editor keeps rendering.

use pulldown_cmark::{html, Options, Parser};

/// Markdown to HTML renderer
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Renderer with tables, strikethrough, task lists and smart punctuation
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        Self { options }
    }

    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let html = MarkdownRenderer::new().render("# Choosing a Shed\n\nPick **wood** or _metal_.");
        assert!(html.contains("<h1>Choosing a Shed</h1>"));
        assert!(html.contains("<strong>wood</strong>"));
        assert!(html.contains("<em>metal</em>"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = MarkdownRenderer::new().render("<div class=\"callout\">Free delivery</div>\n");
        assert!(html.contains("<div class=\"callout\">Free delivery</div>"));
    }

    #[test]
    fn test_tables_and_lists() {
        let renderer = MarkdownRenderer::new();
        let table = renderer.render("| Size | Price |\n|---|---|\n| 8x10 | $2,400 |");
        assert!(table.contains("<table>"));

        let list = renderer.render("- Ramp\n- Loft\n");
        assert!(list.contains("<li>Ramp</li>"));
    }

    #[test]
    fn test_code_is_escaped() {
        let html = MarkdownRenderer::new().render("`<b>`");
        assert!(html.contains("<code>&lt;b&gt;</code>"));
    }
}
