//! Minimal line-oriented markdown renderer for the resume document.
//!
//! Single pass over lines, with the only carried state being whether a
//! bullet list is currently open. Inline formatting is applied to content
//! text only, after HTML-escaping it, so document text can never inject
//! markup.

/// Escapes text for interpolation into HTML element bodies and attributes.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders a whole markdown document to HTML.
pub fn render_document(input: &str) -> String {
    let mut html = String::new();
    let mut in_list = false;

    for raw in input.lines() {
        let line = raw.trim_end();

        if line.is_empty() {
            close_list(&mut html, &mut in_list);
            continue;
        }

        if let Some(text) = line.strip_prefix("# ") {
            close_list(&mut html, &mut in_list);
            html.push_str(&format!("<h1>{}</h1>\n", render_inline(text)));
        } else if let Some(text) = line.strip_prefix("## ") {
            close_list(&mut html, &mut in_list);
            html.push_str(&format!("<h2>{}</h2>\n", render_inline(text)));
        } else if let Some(text) = line.strip_prefix("### ") {
            close_list(&mut html, &mut in_list);
            html.push_str(&format!("<h3>{}</h3>\n", render_inline(text)));
        } else if let Some(text) = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
        {
            if !in_list {
                html.push_str("<ul>\n");
                in_list = true;
            }
            html.push_str(&format!("<li>{}</li>\n", render_inline(text)));
        } else {
            close_list(&mut html, &mut in_list);
            html.push_str(&format!("<p>{}</p>\n", render_inline(line)));
        }
    }

    close_list(&mut html, &mut in_list);
    html
}

fn close_list(html: &mut String, in_list: &mut bool) {
    if *in_list {
        html.push_str("</ul>\n");
        *in_list = false;
    }
}

/// Inline pass, in fixed order: escape first, then links, code, bold,
/// italic. Bold must run before italic so a single-asterisk rule cannot
/// match inside a double-asterisk span.
fn render_inline(text: &str) -> String {
    let escaped = escape_html(text);
    let linked = replace_links(&escaped);
    let coded = replace_span(&linked, "`", "<code>", "</code>");
    let bolded = replace_span(&coded, "**", "<strong>", "</strong>");
    replace_span(&bolded, "*", "<em>", "</em>")
}

/// Replaces `[text](url)` with an anchor opened in a new browsing context.
/// Input is already escaped, so the url is attribute-safe.
fn replace_links(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('[') {
        let Some(text_end) = rest[start..].find("](") else {
            break;
        };
        let text_end = start + text_end;
        let Some(url_len) = rest[text_end + 2..].find(')') else {
            break;
        };
        let url_end = text_end + 2 + url_len;

        let text = &rest[start + 1..text_end];
        let url = &rest[text_end + 2..url_end];
        out.push_str(&rest[..start]);
        out.push_str(&format!(
            "<a href=\"{url}\" target=\"_blank\" rel=\"noreferrer\">{text}</a>"
        ));
        rest = &rest[url_end + 1..];
    }

    out.push_str(rest);
    out
}

/// Replaces non-empty `{delim}text{delim}` spans with `{open}text{close}`.
fn replace_span(input: &str, delim: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(delim) {
        let after = &rest[start + delim.len()..];
        let Some(span_len) = after.find(delim) else {
            out.push_str(&rest[..start + delim.len()]);
            rest = after;
            continue;
        };
        if span_len == 0 {
            // Empty span, leave the delimiters alone.
            out.push_str(&rest[..start + delim.len()]);
            rest = after;
            continue;
        }

        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(&after[..span_len]);
        out.push_str(close);
        rest = &after[span_len + delim.len()..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trip() {
        let html = render_document("# Title\n\n- one\n- two\n\nplain *em* and **bold**");
        assert_eq!(html.matches("<h1>").count(), 1);
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("</ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 2);
        let one = html.find("<li>one</li>").unwrap();
        let two = html.find("<li>two</li>").unwrap();
        assert!(one < two);
        assert_eq!(html.matches("<p>").count(), 1);
        assert!(html.contains("<em>em</em>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn list_closes_at_end_of_document() {
        let html = render_document("- only item");
        assert!(html.ends_with("</ul>\n"));
    }

    #[test]
    fn blank_line_closes_list_before_paragraph() {
        let html = render_document("- item\n\ntext");
        let close = html.find("</ul>").unwrap();
        let para = html.find("<p>text</p>").unwrap();
        assert!(close < para);
    }

    #[test]
    fn headings_map_to_levels() {
        let html = render_document("# a\n## b\n### c");
        assert!(html.contains("<h1>a</h1>"));
        assert!(html.contains("<h2>b</h2>"));
        assert!(html.contains("<h3>c</h3>"));
    }

    #[test]
    fn star_bullets_join_the_same_list() {
        let html = render_document("- one\n* two");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 2);
    }

    #[test]
    fn escaping_happens_before_link_substitution() {
        let html = render_document("see [<script>alert(1)</script>](https://example.com)");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<a href=\"https://example.com\""));
    }

    #[test]
    fn links_open_in_new_context() {
        let html = render_document("[docs](https://example.com/a)");
        assert!(html.contains("target=\"_blank\""));
        assert!(html.contains("rel=\"noreferrer\""));
    }

    #[test]
    fn bold_runs_before_italic() {
        let html = render_document("**strong** then *soft*");
        assert!(html.contains("<strong>strong</strong>"));
        assert!(html.contains("<em>soft</em>"));
        assert!(!html.contains("<em>*"));
    }

    #[test]
    fn inline_code_is_preserved() {
        let html = render_document("run `cargo doc` locally");
        assert!(html.contains("<code>cargo doc</code>"));
    }

    #[test]
    fn unmatched_delimiters_pass_through() {
        let html = render_document("a lone * star and [half](link");
        assert!(html.contains("a lone * star"));
        assert!(html.contains("[half](link"));
    }
}
