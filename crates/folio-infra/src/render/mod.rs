//! Rich text to HTML.
//!
//! Understands the structured-text block format of the content service:
//! typed blocks carrying `text` plus character-offset `spans`.

use std::cmp::Reverse;

use serde::Deserialize;
use serde_json::Value;

use folio_core::domain::RichText;
use folio_core::ports::RichTextRenderer;

#[derive(Debug, Deserialize)]
struct Span {
    start: usize,
    end: usize,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl Span {
    fn open_tag(&self) -> String {
        match self.kind.as_str() {
            "strong" => "<strong>".to_string(),
            "em" => "<em>".to_string(),
            "hyperlink" => {
                let url = self
                    .data
                    .get("url")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let href = html_escape::encode_double_quoted_attribute(url);
                match self.data.get("target").and_then(Value::as_str) {
                    Some("_blank") => {
                        format!("<a href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\">")
                    }
                    _ => format!("<a href=\"{href}\">"),
                }
            }
            "label" => {
                let label = self
                    .data
                    .get("label")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                format!(
                    "<span class=\"{}\">",
                    html_escape::encode_double_quoted_attribute(label)
                )
            }
            _ => "<span>".to_string(),
        }
    }

    fn close_tag(&self) -> &'static str {
        match self.kind.as_str() {
            "strong" => "</strong>",
            "em" => "</em>",
            "hyperlink" => "</a>",
            _ => "</span>",
        }
    }
}

/// Renders rich text blocks as HTML. Text and attributes are escaped;
/// embed blocks carry provider markup and are emitted as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRichTextRenderer;

impl HtmlRichTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl RichTextRenderer for HtmlRichTextRenderer {
    fn render(&self, body: &RichText) -> String {
        let mut html = String::new();
        let mut list: Option<&'static str> = None;

        for block in body.blocks() {
            let kind = block
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default();

            let wanted = match kind {
                "list-item" => Some("ul"),
                "o-list-item" => Some("ol"),
                _ => None,
            };
            if list != wanted {
                if let Some(tag) = list {
                    html.push_str(&format!("</{tag}>"));
                }
                if let Some(tag) = wanted {
                    html.push_str(&format!("<{tag}>"));
                }
                list = wanted;
            }

            match kind {
                "paragraph" => push_text_block(&mut html, "p", block),
                "preformatted" => push_text_block(&mut html, "pre", block),
                "list-item" | "o-list-item" => push_text_block(&mut html, "li", block),
                "image" => push_image(&mut html, block),
                "embed" => push_embed(&mut html, block),
                _ => match heading_level(kind) {
                    Some(level) => push_text_block(&mut html, &format!("h{level}"), block),
                    None => tracing::debug!(kind = %kind, "Skipping unsupported rich text block"),
                },
            }
        }

        if let Some(tag) = list {
            html.push_str(&format!("</{tag}>"));
        }

        html
    }
}

fn heading_level(kind: &str) -> Option<u8> {
    kind.strip_prefix("heading")
        .and_then(|level| level.parse().ok())
        .filter(|level| (1..=6).contains(level))
}

fn push_text_block(html: &mut String, tag: &str, block: &Value) {
    let text = block
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let spans: Vec<Span> = block
        .get("spans")
        .cloned()
        .and_then(|spans| serde_json::from_value(spans).ok())
        .unwrap_or_default();

    html.push_str(&format!("<{tag}>"));
    html.push_str(&render_spans(text, spans));
    html.push_str(&format!("</{tag}>"));
}

fn push_image(html: &mut String, block: &Value) {
    let Some(url) = block.get("url").and_then(Value::as_str) else {
        return;
    };
    let alt = block
        .get("alt")
        .and_then(Value::as_str)
        .unwrap_or_default();

    html.push_str(&format!(
        "<p class=\"block-img\"><img src=\"{}\" alt=\"{}\" /></p>",
        html_escape::encode_double_quoted_attribute(url),
        html_escape::encode_double_quoted_attribute(alt),
    ));
}

fn push_embed(html: &mut String, block: &Value) {
    let oembed = block.get("oembed").unwrap_or(&Value::Null);
    let Some(markup) = oembed.get("html").and_then(Value::as_str) else {
        return;
    };
    let provider = oembed
        .get("provider_name")
        .and_then(Value::as_str)
        .unwrap_or_default();

    html.push_str(&format!(
        "<div data-oembed-provider=\"{}\">{markup}</div>",
        html_escape::encode_double_quoted_attribute(provider),
    ));
}

/// Interleave span tags with escaped text. Overlapping spans are closed and
/// reopened so the output stays well nested.
fn render_spans(text: &str, mut spans: Vec<Span>) -> String {
    let chars: Vec<char> = text.chars().collect();
    spans.retain(|span| span.start < span.end && span.end <= chars.len());
    spans.sort_by_key(|span| (span.start, Reverse(span.end)));

    let mut out = String::new();
    let mut pending = String::new();
    let mut open: Vec<&Span> = Vec::new();
    let mut next = 0;

    for i in 0..=chars.len() {
        let closes_here = open.iter().any(|span| span.end == i);
        let opens_here = spans.get(next).is_some_and(|span| span.start == i);

        if closes_here || opens_here {
            flush(&mut out, &mut pending);
        }

        if closes_here {
            let mut reopen = Vec::new();
            while open.iter().any(|span| span.end == i) {
                let Some(span) = open.pop() else { break };
                out.push_str(span.close_tag());
                if span.end != i {
                    reopen.push(span);
                }
            }
            for span in reopen.into_iter().rev() {
                out.push_str(&span.open_tag());
                open.push(span);
            }
        }

        while let Some(span) = spans.get(next).filter(|span| span.start == i) {
            out.push_str(&span.open_tag());
            open.push(span);
            next += 1;
        }

        if let Some(&c) = chars.get(i) {
            pending.push(c);
        }
    }

    flush(&mut out, &mut pending);
    out
}

fn flush(out: &mut String, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    out.push_str(&html_escape::encode_text(pending.as_str()).replace('\n', "<br />"));
    pending.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(blocks: Vec<Value>) -> String {
        HtmlRichTextRenderer::new().render(&RichText::new(blocks))
    }

    #[test]
    fn test_paragraph_and_heading() {
        let html = render(vec![
            json!({ "type": "heading2", "text": "Title", "spans": [] }),
            json!({ "type": "paragraph", "text": "Body", "spans": [] }),
        ]);
        assert_eq!(html, "<h2>Title</h2><p>Body</p>");
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render(vec![json!({
            "type": "paragraph",
            "text": "<script>alert(1)</script> & co",
            "spans": []
        })]);
        assert_eq!(html, "<p>&lt;script&gt;alert(1)&lt;/script&gt; &amp; co</p>");
    }

    #[test]
    fn test_spans() {
        let html = render(vec![json!({
            "type": "paragraph",
            "text": "read the docs now",
            "spans": [
                { "start": 0, "end": 4, "type": "strong" },
                { "start": 9, "end": 13, "type": "hyperlink", "data": { "url": "https://docs.rs" } }
            ]
        })]);
        assert_eq!(
            html,
            "<p><strong>read</strong> the <a href=\"https://docs.rs\">docs</a> now</p>"
        );
    }

    #[test]
    fn test_overlapping_spans_stay_nested() {
        let html = render(vec![json!({
            "type": "paragraph",
            "text": "abcdef",
            "spans": [
                { "start": 0, "end": 4, "type": "strong" },
                { "start": 2, "end": 6, "type": "em" }
            ]
        })]);
        assert_eq!(
            html,
            "<p><strong>ab<em>cd</em></strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_list_items_are_grouped() {
        let html = render(vec![
            json!({ "type": "list-item", "text": "one", "spans": [] }),
            json!({ "type": "list-item", "text": "two", "spans": [] }),
            json!({ "type": "o-list-item", "text": "first", "spans": [] }),
            json!({ "type": "paragraph", "text": "end", "spans": [] }),
        ]);
        assert_eq!(
            html,
            "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>end</p>"
        );
    }

    #[test]
    fn test_image_and_unknown_blocks() {
        let html = render(vec![
            json!({ "type": "image", "url": "https://img/a.png", "alt": "a \"quoted\" alt" }),
            json!({ "type": "mystery", "text": "ignored" }),
        ]);
        assert_eq!(
            html,
            "<p class=\"block-img\"><img src=\"https://img/a.png\" alt=\"a &quot;quoted&quot; alt\" /></p>"
        );
    }

    #[test]
    fn test_line_breaks_and_missing_text() {
        let html = render(vec![
            json!({ "type": "preformatted", "text": "a\nb", "spans": [] }),
            json!({ "type": "paragraph" }),
        ]);
        assert_eq!(html, "<pre>a<br />b</pre><p></p>");
    }
}
