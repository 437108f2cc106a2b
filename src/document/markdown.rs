// Markdown export.
//
// Blocks are separated by a blank line, list items by a newline. Marks with no
// markdown syntax (underline, superscript, subscript) fall back to inline HTML.

use super::html::escape as escape_html;
use super::node::{Document, Mark, MarkKind, Node, NodeKind};
use super::validate::is_safe_href;

pub fn to_markdown(doc: &Document) -> String {
    let blocks = render_blocks(doc.root().children());
    if blocks.is_empty() {
        String::new()
    } else {
        format!("{}\n", blocks.join("\n\n"))
    }
}

fn render_blocks(nodes: &[Node]) -> Vec<String> {
    nodes.iter().filter_map(render_block).collect()
}

fn render_block(node: &Node) -> Option<String> {
    let rendered = match &node.kind {
        NodeKind::Paragraph => escape_line_starts(&inline(node.children())),
        NodeKind::Heading => {
            let text = inline(node.children());
            format!("{} {}", "#".repeat(node.heading_level() as usize), text)
        }
        NodeKind::CodeBlock => {
            let code: String = node
                .children()
                .iter()
                .filter_map(|child| child.text.as_deref())
                .collect();
            let fence = fence_for(&code);
            format!(
                "{fence}{}\n{}\n{fence}",
                node.code_language().unwrap_or_default(),
                code,
                fence = fence
            )
        }
        NodeKind::Blockquote => {
            let inner = render_blocks(node.children()).join("\n\n");
            inner
                .lines()
                .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {}", line) })
                .collect::<Vec<_>>()
                .join("\n")
        }
        NodeKind::BulletList => list(node, |_| "- ".to_string()),
        NodeKind::OrderedList => {
            let start = node.ordered_list_start();
            list(node, |index| format!("{}. ", start.saturating_add(index as u64)))
        }
        NodeKind::HorizontalRule => "---".to_string(),
        NodeKind::Text | NodeKind::HardBreak => inline(std::slice::from_ref(node)),
        NodeKind::Doc | NodeKind::ListItem | NodeKind::Other(_) => {
            if node.children().iter().any(|child| matches!(child.kind, NodeKind::Text | NodeKind::HardBreak)) {
                escape_line_starts(&inline(node.children()))
            } else {
                render_blocks(node.children()).join("\n\n")
            }
        }
    };
    (!rendered.is_empty()).then_some(rendered)
}

fn list(node: &Node, marker: impl Fn(usize) -> String) -> String {
    node.children()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let marker = marker(index);
            let indent = " ".repeat(marker.len());
            let body = render_blocks(item.children()).join("\n\n");
            let mut lines = body.lines();
            let mut out = format!("{}{}", marker, lines.next().unwrap_or_default());
            for line in lines {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&indent);
                    out.push_str(line);
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A backtick fence longer than any run inside the code
fn fence_for(code: &str) -> String {
    let mut longest = 0;
    let mut current = 0;
    for ch in code.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn inline(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node.kind {
            NodeKind::Text => out.push_str(&text_run(node)),
            NodeKind::HardBreak => out.push_str("\\\n"),
            _ => out.push_str(&inline(node.children())),
        }
    }
    out
}

fn text_run(node: &Node) -> String {
    let raw = node.text.as_deref().unwrap_or_default();
    let is_code = node.has_mark(&MarkKind::Code);

    // Delimiters must hug the text, so surrounding whitespace stays outside.
    let core = raw.trim();
    if core.is_empty() {
        return raw.to_string();
    }
    let leading = &raw[..raw.len() - raw.trim_start().len()];
    let trailing = &raw[raw.trim_end().len()..];

    let mut body = if is_code {
        let ticks = if core.contains('`') { "``" } else { "`" };
        format!("{ticks}{}{ticks}", core, ticks = ticks)
    } else {
        escape_markdown(core)
    };

    for mark in node.marks().iter().rev() {
        body = apply_mark(mark, body);
    }
    format!("{}{}{}", leading, body, trailing)
}

fn apply_mark(mark: &Mark, body: String) -> String {
    match &mark.kind {
        MarkKind::Bold => format!("**{}**", body),
        MarkKind::Italic => format!("*{}*", body),
        MarkKind::Strike => format!("~~{}~~", body),
        MarkKind::Underline => format!("<u>{}</u>", body),
        MarkKind::Superscript => format!("<sup>{}</sup>", body),
        MarkKind::Subscript => format!("<sub>{}</sub>", body),
        MarkKind::Link => match mark.href().filter(|href| is_safe_href(href)) {
            Some(href) => format!("[{}]({})", body, escape_link_target(href.trim())),
            None => body,
        },
        MarkKind::Code | MarkKind::Other(_) => body,
    }
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '*' | '_' | '`' | '[' | ']' | '~' | '<' | '>' | '#') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escape a leading `-`, `+`, `|` or `1.` so paragraph text never reads as a
/// list item or table row
fn escape_line_starts(text: &str) -> String {
    text.split('\n').map(escape_line_start).collect::<Vec<_>>().join("\n")
}

fn escape_line_start(line: &str) -> String {
    let trimmed = line.trim_start_matches(' ');
    let indent = &line[..line.len() - trimmed.len()];
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();

    let marker_at = if digits > 0 && matches!(trimmed[digits..].chars().next(), Some('.' | ')')) {
        Some(digits)
    } else if matches!(trimmed.chars().next(), Some('-' | '+' | '|')) {
        Some(0)
    } else {
        None
    };

    match marker_at {
        Some(at) => format!("{}{}\\{}", indent, &trimmed[..at], &trimmed[at..]),
        None => line.to_string(),
    }
}

fn escape_link_target(href: &str) -> String {
    if href.contains([' ', '(', ')']) {
        format!("<{}>", escape_html(href))
    } else {
        href.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn md(value: serde_json::Value) -> String {
        to_markdown(&Document::from_value(value).unwrap())
    }

    #[test]
    fn exports_welcome_document() {
        let out = to_markdown(&Document::welcome());
        assert!(out.starts_with("# Getting Started with Notes App\n\n"));
        assert!(out.contains("developer-friendly *rich text editor* built"));
        assert!(out.contains("```\npnpm notes-app\n```"));
        assert!(out.contains("## Features"));
        assert!(out.contains("**Fast and fully responsive editor.**"));
        assert!(out.contains("Supports \\*\\*markdown\\*\\* shortcuts"));
        assert!(out.contains("like `⌘+B` for"));
    }

    #[test]
    fn whitespace_stays_outside_delimiters() {
        let out = md(json!([
            { "type": "paragraph", "content": [
                { "type": "text", "text": "a" },
                { "type": "text", "text": " bold ", "marks": [{ "type": "bold" }] },
                { "type": "text", "text": "b" }
            ]}
        ]));
        assert_eq!(out, "a **bold** b\n");
    }

    #[test]
    fn nested_lists_are_indented() {
        let out = md(json!([
            { "type": "orderedList", "attrs": { "start": 2 }, "content": [
                { "type": "listItem", "content": [
                    { "type": "paragraph", "content": [{ "type": "text", "text": "two" }] },
                    { "type": "bulletList", "content": [
                        { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "nested" }] }] }
                    ]}
                ]},
                { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "three" }] }] }
            ]}
        ]));
        assert_eq!(out, "2. two\n\n   - nested\n3. three\n");
    }

    #[test]
    fn quotes_links_and_fallback_marks() {
        let out = md(json!([
            { "type": "blockquote", "content": [
                { "type": "paragraph", "content": [
                    { "type": "text", "text": "see" },
                    { "type": "text", "text": " " },
                    { "type": "text", "text": "docs", "marks": [{ "type": "link", "attrs": { "href": "https://example.com" } }] },
                    { "type": "text", "text": "x", "marks": [{ "type": "underline" }] }
                ]},
                { "type": "paragraph", "content": [{ "type": "text", "text": "second" }] }
            ]},
            { "type": "horizontalRule" },
            { "type": "codeBlock", "attrs": { "language": "rust" }, "content": [{ "type": "text", "text": "let x = \"```\";" }] }
        ]));
        assert_eq!(
            out,
            "> see [docs](https://example.com)<u>x</u>\n>\n> second\n\n---\n\n````rust\nlet x = \"```\";\n````\n"
        );
    }

    #[test]
    fn huge_list_start_does_not_overflow() {
        let out = md(json!([
            { "type": "orderedList", "attrs": { "start": u64::MAX }, "content": [
                { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "a" }] }] },
                { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "b" }] }] }
            ]}
        ]));
        assert_eq!(out, format!("{max}. a\n{max}. b\n", max = u64::MAX));
    }

    #[test]
    fn paragraph_text_never_becomes_a_block() {
        let out = md(json!([
            { "type": "paragraph", "content": [{ "type": "text", "text": "- buy milk" }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "12. done" }] },
            { "type": "paragraph", "content": [
                { "type": "text", "text": "line" },
                { "type": "hardBreak" },
                { "type": "text", "text": "+ more | pipes" }
            ]},
            { "type": "paragraph", "content": [{ "type": "text", "text": "a - b, 3.5 and 4) fine" }] }
        ]));
        assert_eq!(
            out,
            "\\- buy milk\n\n12\\. done\n\nline\\\n\\+ more | pipes\n\na - b, 3.5 and 4) fine\n"
        );
    }

    #[test]
    fn empty_document_exports_nothing_visible() {
        assert_eq!(md(json!({ "type": "doc", "content": [] })), "");
    }
}
