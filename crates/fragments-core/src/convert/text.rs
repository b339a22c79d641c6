//! Markup transforms: markdown rendering and HTML stripping.

use pulldown_cmark::{Options, Parser, html};

/// Column width used when wrapping plain text rendered from HTML.
pub const TEXT_WRAP_WIDTH: usize = 80;

/// Renders CommonMark into an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Strips markup from an HTML document, leaving wrapped plain text.
pub fn html_to_text(html: &[u8]) -> Result<String, html2text::Error> {
    html2text::config::plain().string_from_read(html, TEXT_WRAP_WIDTH)
}

/// Renders markdown and strips the resulting markup.
pub fn markdown_to_text(markdown: &str) -> Result<String, html2text::Error> {
    html_to_text(markdown_to_html(markdown).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_heading() {
        assert!(markdown_to_html("## Title").contains("<h2>Title</h2>"));
    }

    #[test]
    fn renders_emphasis_and_lists() {
        let html = markdown_to_html("- *one*\n- two\n");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<em>one</em>"));
    }

    #[test]
    fn strips_tags() {
        let text = html_to_text(b"<p>Hello <b>world</b></p>").unwrap();
        assert!(text.contains("Hello"));
        assert!(text.contains("world"));
        assert!(!text.contains("<b>"));
    }

    #[test]
    fn markdown_to_plain_text() {
        let text = markdown_to_text("Some **bold** words").unwrap();
        assert!(text.contains("bold"));
        assert!(!text.contains("<strong>"));
    }
}
