// Plain-text views of a document: card excerpts, counts and the heading outline.

use serde::Serialize;
use serde_json::Value;

use super::node::{Document, Node, NodeKind};

/// Shown on cards when a note has no text at all
pub const NO_CONTENT: &str = "No content";

/// Default excerpt length on note cards, in characters
pub const DEFAULT_PREVIEW_LENGTH: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub level: u8,
    pub text: String,
}

/// Text of the document, one line per text block. Blank blocks are skipped.
pub fn plain_text(doc: &Document) -> String {
    let mut lines = Vec::new();
    collect_blocks(doc.root(), &mut lines);
    lines.join("\n")
}

/// Single-line text with whitespace runs collapsed
pub fn excerpt_text(doc: &Document) -> String {
    collapse_whitespace(&plain_text(doc))
}

/// Card excerpt: at most `limit` characters, `...` appended when cut.
pub fn preview(doc: &Document, limit: usize) -> String {
    truncate_excerpt(&excerpt_text(doc), limit)
}

/// Excerpt for stored content that may be missing or not parse as a document.
///
/// Falls back to collecting every `text` string in the JSON tree so a card
/// still shows something for content written by older editor versions.
pub fn preview_value(content: Option<&Value>, limit: usize) -> String {
    let text = match content {
        None | Some(Value::Null) => String::new(),
        Some(value) => match Document::from_value(value.clone()) {
            Ok(doc) => excerpt_text(&doc),
            Err(_) => {
                let mut parts = Vec::new();
                collect_json_text(value, &mut parts);
                collapse_whitespace(&parts.join(" "))
            }
        },
    };
    truncate_excerpt(&text, limit)
}

pub fn has_content(doc: &Document) -> bool {
    !excerpt_text(doc).is_empty()
}

pub fn word_count(doc: &Document) -> usize {
    plain_text(doc).split_whitespace().count()
}

pub fn character_count(doc: &Document) -> usize {
    excerpt_text(doc).chars().count()
}

/// Headings in document order
pub fn outline(doc: &Document) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    doc.root().walk(&mut |node, _| {
        if node.kind == NodeKind::Heading {
            let mut text = String::new();
            inline_text(node, &mut text);
            entries.push(OutlineEntry {
                level: node.heading_level(),
                text: collapse_whitespace(&text),
            });
        }
    });
    entries
}

fn truncate_excerpt(text: &str, limit: usize) -> String {
    if text.is_empty() {
        return NO_CONTENT.to_string();
    }
    if text.chars().count() > limit {
        let cut: String = text.chars().take(limit).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_textblock(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::Paragraph | NodeKind::Heading | NodeKind::CodeBlock
    ) || node
        .children()
        .iter()
        .any(|child| matches!(child.kind, NodeKind::Text | NodeKind::HardBreak))
}

fn collect_blocks(node: &Node, lines: &mut Vec<String>) {
    for child in node.children() {
        if is_textblock(child) {
            let mut line = String::new();
            inline_text(child, &mut line);
            if !line.trim().is_empty() {
                lines.push(line);
            }
        } else {
            collect_blocks(child, lines);
        }
    }
}

fn inline_text(node: &Node, out: &mut String) {
    for child in node.children() {
        match child.kind {
            NodeKind::Text => out.push_str(child.text.as_deref().unwrap_or_default()),
            NodeKind::HardBreak => out.push('\n'),
            _ => inline_text(child, out),
        }
    }
}

fn collect_json_text(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::String(text) => parts.push(text.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_json_text(item, parts)),
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                parts.push(text.clone());
            }
            for (key, child) in map {
                if matches!(key.as_str(), "type" | "attrs" | "marks" | "text") {
                    continue;
                }
                if child.is_array() || child.is_object() {
                    collect_json_text(child, parts);
                }
            }
        }
        _ => {}
    }
}
