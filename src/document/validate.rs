use serde_json::Value;

use super::error::{DocumentError, Violation};
use super::node::{Document, MarkKind, Node, NodeKind, TextAlign};
use crate::config::DocumentConfig;

/// Limits and strictness applied before a document is persisted
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub max_depth: usize,
    pub max_nodes: usize,
    /// Accept node and mark types this model has no variant for
    pub allow_unknown_types: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_nodes: 20_000,
            allow_unknown_types: true,
        }
    }
}

impl From<&DocumentConfig> for ValidationOptions {
    fn from(config: &DocumentConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_nodes: config.max_nodes,
            allow_unknown_types: config.allow_unknown_types,
        }
    }
}

/// Check the structural rules of the editor schema.
///
/// Every violation is collected; the error lists all of them with their paths.
pub fn validate(doc: &Document, options: &ValidationOptions) -> Result<(), DocumentError> {
    let mut validator = Validator {
        options,
        violations: Vec::new(),
        nodes_seen: 0,
        node_limit_hit: false,
    };
    validator.visit(doc.root(), None, "", 0);

    if validator.violations.is_empty() {
        Ok(())
    } else {
        Err(DocumentError::Invalid(validator.violations))
    }
}

/// Whether a link target is safe to store and render.
///
/// Absolute URLs must use http, https, mailto or tel. Relative references
/// (`/notes/1`, `#top`, `page.html`) are allowed.
pub fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() {
        return false;
    }
    match url::Url::parse(href) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "mailto" | "tel"),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

struct Validator<'a> {
    options: &'a ValidationOptions,
    violations: Vec<Violation>,
    nodes_seen: usize,
    node_limit_hit: bool,
}

impl Validator<'_> {
    fn report(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    fn visit(&mut self, node: &Node, parent: Option<&NodeKind>, path: &str, depth: usize) {
        self.nodes_seen += 1;
        if self.nodes_seen > self.options.max_nodes {
            if !self.node_limit_hit {
                self.node_limit_hit = true;
                let limit = self.options.max_nodes;
                self.report(path, format!("document exceeds the limit of {} nodes", limit));
            }
            return;
        }
        if depth > self.options.max_depth {
            let limit = self.options.max_depth;
            self.report(path, format!("document is nested deeper than {} levels", limit));
            return;
        }

        self.check_placement(node, parent, path);
        self.check_node(node, path);

        for (index, child) in node.children().iter().enumerate() {
            let child_path = format!("{}/content/{}", path, index);
            self.visit(child, Some(&node.kind), &child_path, depth + 1);
        }
    }

    fn check_placement(&mut self, node: &Node, parent: Option<&NodeKind>, path: &str) {
        match (&node.kind, parent) {
            (NodeKind::Doc, Some(_)) => self.report(path, "doc may only appear at the root"),
            (NodeKind::ListItem, Some(parent)) if !parent.is_list() => {
                self.report(path, "listItem must be inside a bulletList or orderedList")
            }
            (kind, Some(parent)) if parent.is_list() && *kind != NodeKind::ListItem => {
                self.report(path, format!("{} may only contain listItem nodes", parent))
            }
            (kind, Some(NodeKind::CodeBlock)) if *kind != NodeKind::Text => {
                self.report(path, "codeBlock may only contain text")
            }
            _ => {}
        }
    }

    fn check_node(&mut self, node: &Node, path: &str) {
        if !node.kind.is_known() && !self.options.allow_unknown_types {
            self.report(path, format!("unsupported node type '{}'", node.kind));
        }

        if node.kind == NodeKind::Text {
            self.check_text(node, path);
        } else {
            if node.text.is_some() {
                self.report(path, "only text nodes may carry text");
            }
            if !node.marks().is_empty() {
                self.report(path, "marks are only allowed on text nodes");
            }
            if node.kind.is_atom() && !node.children().is_empty() {
                self.report(path, format!("{} cannot have content", node.kind));
            }
        }

        if let Some(align) = node.attr("textAlign") {
            let valid = match align {
                Value::Null => true,
                Value::String(value) => TextAlign::parse(value).is_some(),
                _ => false,
            };
            if !valid {
                self.report(path, "textAlign must be one of left, center, right, justify");
            }
        }

        match node.kind {
            NodeKind::Heading => {
                if let Some(level) = node.attr("level") {
                    let in_range = level.as_u64().is_some_and(|level| (1..=6).contains(&level));
                    if !in_range {
                        self.report(path, "heading level must be an integer from 1 to 6");
                    }
                }
            }
            NodeKind::OrderedList => {
                if let Some(start) = node.attr("start") {
                    if !start.is_null() && start.as_u64().is_none() {
                        self.report(path, "orderedList start must be a non-negative integer");
                    }
                }
            }
            _ => {}
        }
    }

    fn check_text(&mut self, node: &Node, path: &str) {
        match node.text.as_deref() {
            Some(text) if !text.is_empty() => {}
            _ => self.report(path, "text nodes must have non-empty text"),
        }
        if node.content.is_some() {
            self.report(path, "text nodes cannot have content");
        }

        for (index, mark) in node.marks().iter().enumerate() {
            let mark_path = format!("{}/marks/{}", path, index);
            match &mark.kind {
                MarkKind::Link => match mark.href() {
                    Some(href) if is_safe_href(href) => {}
                    Some(_) => self.report(&mark_path, "link href uses a disallowed scheme"),
                    None => self.report(&mark_path, "link marks require an href"),
                },
                MarkKind::Other(name) if !self.options.allow_unknown_types => {
                    self.report(&mark_path, format!("unsupported mark type '{}'", name));
                }
                _ => {}
            }
        }
    }
}
