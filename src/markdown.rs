use pulldown_cmark::{html, Event, Options, Parser};

/// Render model-produced markdown to HTML for the output areas.
///
/// Tables and strikethrough are enabled. Raw HTML in the input is emitted as
/// escaped text, never passed through.
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Backslash-escape characters that would change markdown structure, so user
/// text can sit inside a heading or a table cell.
pub fn escape_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '`' | '*' | '_' | '|' | '#' | '[' | ']' | '<' | '>' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' | '\r' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let md = "| Title | Strength |\n| ----- | -------- |\n| Grow | Recipes |\n";
        let html = render_html(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>Strength</th>"));
        assert!(html.contains("<td>Recipes</td>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_html("hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_escape_inline() {
        assert_eq!(escape_inline("pizza | *bakery*"), r"pizza \| \*bakery\*");
        assert_eq!(escape_inline("plain text"), "plain text");
        assert_eq!(escape_inline("two\nlines"), "two lines");
    }

    #[test]
    fn test_escaped_pipe_stays_in_one_cell() {
        let cell = escape_inline("a|b");
        let md = format!("| Domain |\n| --- |\n| {} |\n", cell);
        let html = render_html(&md);
        assert!(html.contains("<td>a|b</td>"));
    }
}
