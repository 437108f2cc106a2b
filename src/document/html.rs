// Read-only HTML rendering of a document, matching what the editor displays.

use std::fmt::Write;

use super::node::{Document, Mark, MarkKind, Node, NodeKind};
use super::validate::is_safe_href;

const LINK_REL: &str = "noopener noreferrer nofollow";

/// Render the document body as an HTML fragment.
///
/// Unknown nodes render their children; unknown marks are skipped. Links with
/// unsafe targets keep their text but lose the anchor.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    render_children(doc.root(), &mut out);
    out
}

/// Escape text for element content and double-quoted attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn render_children(node: &Node, out: &mut String) {
    for child in node.children() {
        render_node(child, out);
    }
}

fn align_attr(node: &Node) -> String {
    match node.text_align() {
        Some(align) if node.kind.supports_alignment() => {
            format!(" style=\"text-align: {}\"", align.as_str())
        }
        _ => String::new(),
    }
}

fn render_node(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Doc => render_children(node, out),
        NodeKind::Paragraph => {
            let _ = write!(out, "<p{}>", align_attr(node));
            render_children(node, out);
            out.push_str("</p>");
        }
        NodeKind::Heading => {
            let level = node.heading_level();
            let _ = write!(out, "<h{}{}>", level, align_attr(node));
            render_children(node, out);
            let _ = write!(out, "</h{}>", level);
        }
        NodeKind::BulletList => wrap(node, "ul", out),
        NodeKind::OrderedList => {
            match node.ordered_list_start() {
                1 => out.push_str("<ol>"),
                start => {
                    let _ = write!(out, "<ol start=\"{}\">", start);
                }
            }
            render_children(node, out);
            out.push_str("</ol>");
        }
        NodeKind::ListItem => wrap(node, "li", out),
        NodeKind::Blockquote => wrap(node, "blockquote", out),
        NodeKind::CodeBlock => {
            match node.code_language() {
                Some(language) => {
                    let _ = write!(out, "<pre><code class=\"language-{}\">", escape(language));
                }
                None => out.push_str("<pre><code>"),
            }
            for child in node.children() {
                out.push_str(&escape(child.text.as_deref().unwrap_or_default()));
            }
            out.push_str("</code></pre>");
        }
        NodeKind::HardBreak => out.push_str("<br>"),
        NodeKind::HorizontalRule => out.push_str("<hr>"),
        NodeKind::Text => render_text(node, out),
        NodeKind::Other(_) => render_children(node, out),
    }
}

fn wrap(node: &Node, tag: &str, out: &mut String) {
    let _ = write!(out, "<{}>", tag);
    render_children(node, out);
    let _ = write!(out, "</{}>", tag);
}

fn render_text(node: &Node, out: &mut String) {
    let text = escape(node.text.as_deref().unwrap_or_default());
    let open: Vec<(String, &'static str)> = node.marks().iter().filter_map(mark_tags).collect();

    for (tag, _) in &open {
        out.push_str(tag);
    }
    out.push_str(&text);
    for (_, close) in open.iter().rev() {
        out.push_str(close);
    }
}

/// Opening and closing tags for a mark, `None` when it renders as nothing
fn mark_tags(mark: &Mark) -> Option<(String, &'static str)> {
    let tags = match &mark.kind {
        MarkKind::Bold => ("<strong>".to_string(), "</strong>"),
        MarkKind::Italic => ("<em>".to_string(), "</em>"),
        MarkKind::Strike => ("<s>".to_string(), "</s>"),
        MarkKind::Code => ("<code>".to_string(), "</code>"),
        MarkKind::Underline => ("<u>".to_string(), "</u>"),
        MarkKind::Superscript => ("<sup>".to_string(), "</sup>"),
        MarkKind::Subscript => ("<sub>".to_string(), "</sub>"),
        MarkKind::Link => {
            let href = mark.href().filter(|href| is_safe_href(href))?;
            (
                format!(
                    "<a target=\"_blank\" rel=\"{}\" href=\"{}\">",
                    LINK_REL,
                    escape(href.trim())
                ),
                "</a>",
            )
        }
        MarkKind::Other(_) => return None,
    };
    Some(tags)
}
