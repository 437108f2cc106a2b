use crate::document::{html, markdown, text, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Html,
    Markdown,
    Text,
    Json,
}

/// A rendered download
#[derive(Debug, Clone, PartialEq)]
pub struct Exported {
    pub content_type: &'static str,
    pub extension: &'static str,
    pub body: String,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "html" => Some(ExportFormat::Html),
            "markdown" | "md" => Some(ExportFormat::Markdown),
            "text" | "txt" => Some(ExportFormat::Text),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn export(self, title: &str, doc: &Document) -> Exported {
        match self {
            ExportFormat::Html => Exported {
                content_type: "text/html; charset=utf-8",
                extension: "html",
                body: format!(
                    "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
                    html::escape(title),
                    html::to_html(doc)
                ),
            },
            ExportFormat::Markdown => Exported {
                content_type: "text/markdown; charset=utf-8",
                extension: "md",
                body: markdown::to_markdown(doc),
            },
            ExportFormat::Text => {
                let mut body = text::plain_text(doc);
                if !body.is_empty() {
                    body.push('\n');
                }
                Exported {
                    content_type: "text/plain; charset=utf-8",
                    extension: "txt",
                    body,
                }
            }
            ExportFormat::Json => Exported {
                content_type: "application/json",
                extension: "json",
                // Value serialization cannot fail
                body: serde_json::to_string_pretty(&doc.to_value()).unwrap_or_default(),
            },
        }
    }
}

/// ASCII file name for a download derived from the title
pub fn file_name(title: &str, extension: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '-' })
        .collect();
    let stem = stem
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let stem = if stem.is_empty() { "note".to_string() } else { stem };
    format!("{}.{}", stem, extension)
}
