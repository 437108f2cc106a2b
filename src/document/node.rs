use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::error::{DocumentError, Violation};

/// Node types understood by the editor. Anything else is kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading,
    Text,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    Blockquote,
    HardBreak,
    HorizontalRule,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Text => "text",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::Blockquote => "blockquote",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::HorizontalRule => "horizontalRule",
            NodeKind::Other(name) => name,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::BulletList | NodeKind::OrderedList)
    }

    /// Leaf nodes that never hold children
    pub fn is_atom(&self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::HardBreak | NodeKind::HorizontalRule)
    }

    /// Whether `textAlign` applies to this node type
    pub fn supports_alignment(&self) -> bool {
        matches!(self, NodeKind::Paragraph | NodeKind::Heading)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, NodeKind::Other(_))
    }
}

impl From<String> for NodeKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "doc" => NodeKind::Doc,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "text" => NodeKind::Text,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            "codeBlock" => NodeKind::CodeBlock,
            "blockquote" => NodeKind::Blockquote,
            "hardBreak" => NodeKind::HardBreak,
            "horizontalRule" => NodeKind::HorizontalRule,
            _ => NodeKind::Other(name),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline formatting attached to text nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkKind {
    Bold,
    Italic,
    Strike,
    Code,
    Underline,
    Link,
    Superscript,
    Subscript,
    Other(String),
}

impl MarkKind {
    pub fn as_str(&self) -> &str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Strike => "strike",
            MarkKind::Code => "code",
            MarkKind::Underline => "underline",
            MarkKind::Link => "link",
            MarkKind::Superscript => "superscript",
            MarkKind::Subscript => "subscript",
            MarkKind::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MarkKind::Other(_))
    }
}

impl From<String> for MarkKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "bold" => MarkKind::Bold,
            "italic" => MarkKind::Italic,
            "strike" => MarkKind::Strike,
            "code" => MarkKind::Code,
            "underline" => MarkKind::Underline,
            "link" => MarkKind::Link,
            "superscript" => MarkKind::Superscript,
            "subscript" => MarkKind::Subscript,
            _ => MarkKind::Other(name),
        }
    }
}

impl From<MarkKind> for String {
    fn from(kind: MarkKind) -> Self {
        match kind {
            MarkKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for MarkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values of the `textAlign` attribute on paragraphs and headings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
    /// Keys the model does not know about, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            attrs: None,
            extra: Map::new(),
        }
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self::new(MarkKind::Link).with_attr("href", Value::String(href.into()))
    }

    pub fn with_attr(mut self, key: &str, value: Value) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(key))
    }

    /// Link target, for `link` marks
    pub fn href(&self) -> Option<&str> {
        self.attr("href").and_then(Value::as_str)
    }
}

/// One node of the editor tree.
///
/// `attrs`, `content` and `marks` are optional so that "absent" and "empty"
/// stay distinguishable after a round trip. A key sent as explicit `null` is
/// kept in `extra` and written back as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: None,
            content: None,
            marks: None,
            text: None,
            extra: Map::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Text);
        node.text = Some(text.into());
        node
    }

    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        let mut node = Self::text(text);
        node.marks = Some(marks);
        node
    }

    pub fn block(kind: NodeKind, content: Vec<Node>) -> Self {
        let mut node = Self::new(kind);
        node.content = Some(content);
        node
    }

    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::block(NodeKind::Paragraph, content)
    }

    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        Self::block(NodeKind::Heading, content).with_attr("level", Value::from(level))
    }

    pub fn with_attr(mut self, key: &str, value: Value) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(key))
    }

    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or(&[])
    }

    pub fn marks(&self) -> &[Mark] {
        self.marks.as_deref().unwrap_or(&[])
    }

    pub fn has_mark(&self, kind: &MarkKind) -> bool {
        self.marks().iter().any(|mark| &mark.kind == kind)
    }

    /// Heading level clamped to 1..=6; 1 when absent or unusable
    pub fn heading_level(&self) -> u8 {
        self.attr("level")
            .and_then(Value::as_u64)
            .map(|level| level.clamp(1, 6) as u8)
            .unwrap_or(1)
    }

    pub fn text_align(&self) -> Option<TextAlign> {
        self.attr("textAlign")
            .and_then(Value::as_str)
            .and_then(TextAlign::parse)
    }

    pub fn code_language(&self) -> Option<&str> {
        self.attr("language")
            .and_then(Value::as_str)
            .filter(|language| !language.is_empty())
    }

    /// Target of the first link mark on a text node
    pub fn link_href(&self) -> Option<&str> {
        self.marks()
            .iter()
            .find(|mark| mark.kind == MarkKind::Link)
            .and_then(Mark::href)
    }

    pub fn ordered_list_start(&self) -> u64 {
        self.attr("start").and_then(Value::as_u64).unwrap_or(1)
    }

    /// Depth-first walk; `visit` receives each node and its depth (root = 0)
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Node, usize)) {
        visit(self, depth);
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
    }

    pub fn to_value(&self) -> Value {
        Value::from(self)
    }
}

impl From<&Mark> for Value {
    fn from(mark: &Mark) -> Self {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(mark.kind.as_str().to_string()));
        if let Some(attrs) = &mark.attrs {
            map.insert("attrs".into(), Value::Object(attrs.clone()));
        }
        for (key, value) in &mark.extra {
            map.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(map)
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(node.kind.as_str().to_string()));
        if let Some(attrs) = &node.attrs {
            map.insert("attrs".into(), Value::Object(attrs.clone()));
        }
        if let Some(content) = &node.content {
            map.insert(
                "content".into(),
                Value::Array(content.iter().map(Value::from).collect()),
            );
        }
        if let Some(marks) = &node.marks {
            map.insert(
                "marks".into(),
                Value::Array(marks.iter().map(Value::from).collect()),
            );
        }
        if let Some(text) = &node.text {
            map.insert("text".into(), Value::String(text.clone()));
        }
        for (key, value) in &node.extra {
            map.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(map)
    }
}

/// A whole editor document: a `doc` node at the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    root: Node,
}

impl Document {
    /// Parse editor JSON.
    ///
    /// Accepts the `{"type": "doc", ...}` object the editor emits, or a bare
    /// array of block nodes which is wrapped into a `doc`. A one-element array
    /// holding a `doc` is unwrapped.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let mut parser = Parser::default();
        let root = match value {
            Value::Object(_) => parser.node(value, ""),
            Value::Array(mut items) => {
                let single_doc = items.len() == 1
                    && items[0].get("type").and_then(Value::as_str) == Some("doc");
                if single_doc {
                    parser.node(items.remove(0), "")
                } else {
                    let content = parser.nodes(items, "");
                    Some(Node::block(NodeKind::Doc, content))
                }
            }
            Value::Null => return Err(DocumentError::UnexpectedShape("null")),
            Value::Bool(_) => return Err(DocumentError::UnexpectedShape("boolean")),
            Value::Number(_) => return Err(DocumentError::UnexpectedShape("number")),
            Value::String(_) => return Err(DocumentError::UnexpectedShape("string")),
        };

        match root {
            Some(root) if parser.violations.is_empty() => Self::from_root(root),
            Some(root) => {
                parser.check_root(&root);
                Err(DocumentError::Invalid(parser.violations))
            }
            None => Err(DocumentError::Invalid(parser.violations)),
        }
    }

    pub fn from_root(root: Node) -> Result<Self, DocumentError> {
        let mut parser = Parser::default();
        parser.check_root(&root);
        if !parser.violations.is_empty() {
            return Err(DocumentError::Invalid(parser.violations));
        }
        Ok(Self { root })
    }

    /// A document holding a single empty paragraph, what the editor shows for a blank note
    pub fn empty() -> Self {
        Self {
            root: Node::block(NodeKind::Doc, vec![Node::new(NodeKind::Paragraph)]),
        }
    }

    /// The editor's built-in "Getting Started" content
    pub fn welcome() -> Self {
        let blocks = vec![
            Node::heading(1, vec![Node::text("Getting Started with Notes App")]),
            Node::paragraph(vec![
                Node::text("App Notes is your powerful, developer-friendly "),
                Node::marked_text("rich text editor", vec![Mark::new(MarkKind::Italic)]),
                Node::text(" built for speed and simplicity."),
            ]),
            Node::paragraph(vec![Node::text(
                "It integrates open-source UI components and modern TipTap extensions - all MIT licensed - so you can build, write and ship faster.",
            )]),
            Node::block(NodeKind::CodeBlock, vec![Node::text("pnpm notes-app")]),
            Node::heading(2, vec![Node::text("Features")]),
            Node::paragraph(vec![Node::marked_text(
                "Fast and fully responsive editor.",
                vec![Mark::new(MarkKind::Bold)],
            )]),
            Node::paragraph(vec![Node::text(
                "Supports **markdown** shortcuts and slash commands.",
            )]),
            Node::paragraph(vec![
                Node::text("Use keyboard shortcuts like "),
                Node::marked_text("⌘+B", vec![Mark::new(MarkKind::Code)]),
                Node::text(" for most common markdown marks."),
            ]),
        ];
        Self {
            root: Node::block(NodeKind::Doc, blocks),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Top-level blocks
    pub fn blocks(&self) -> &[Node] {
        self.root.children()
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.walk(&mut |_, _| count += 1);
        count
    }

    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }

    pub fn into_root(self) -> Node {
        self.root
    }
}

/// Reads editor JSON into nodes, collecting shape problems with their paths
#[derive(Default)]
struct Parser {
    violations: Vec<Violation>,
}

impl Parser {
    fn report(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    fn check_root(&mut self, root: &Node) {
        if root.kind != NodeKind::Doc {
            self.report("", format!("document root must be 'doc', found '{}'", root.kind));
        }
    }

    /// Children of the node at `path`, each at `{path}/content/{index}`
    fn nodes(&mut self, items: Vec<Value>, path: &str) -> Vec<Node> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| self.node(item, &format!("{}/content/{}", path, index)))
            .collect()
    }

    fn node(&mut self, value: Value, path: &str) -> Option<Node> {
        let Value::Object(mut map) = value else {
            self.report(path, "node must be an object");
            return None;
        };
        let kind = NodeKind::from(self.type_name(&mut map, path, "node")?);

        let mut node = Node::new(kind);
        node.attrs = self.attrs(&mut map, path);
        node.content = match take_non_null(&mut map, "content") {
            None => None,
            Some(Value::Array(items)) => Some(self.nodes(items, path)),
            Some(_) => {
                self.report(path, "content must be an array");
                None
            }
        };
        node.marks = match take_non_null(&mut map, "marks") {
            None => None,
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, item)| self.mark(item, &format!("{}/marks/{}", path, index)))
                    .collect(),
            ),
            Some(_) => {
                self.report(path, "marks must be an array");
                None
            }
        };
        node.text = match take_non_null(&mut map, "text") {
            None => None,
            Some(Value::String(text)) => Some(text),
            Some(_) => {
                self.report(path, "text must be a string");
                None
            }
        };
        node.extra = map;
        Some(node)
    }

    fn mark(&mut self, value: Value, path: &str) -> Option<Mark> {
        let Value::Object(mut map) = value else {
            self.report(path, "mark must be an object");
            return None;
        };
        let kind = MarkKind::from(self.type_name(&mut map, path, "mark")?);

        let mut mark = Mark::new(kind);
        mark.attrs = self.attrs(&mut map, path);
        mark.extra = map;
        Some(mark)
    }

    fn type_name(&mut self, map: &mut Map<String, Value>, path: &str, what: &str) -> Option<String> {
        match map.remove("type") {
            Some(Value::String(name)) => Some(name),
            Some(_) => {
                self.report(path, format!("{} type must be a string", what));
                None
            }
            None => {
                self.report(path, format!("{} is missing its type", what));
                None
            }
        }
    }

    fn attrs(&mut self, map: &mut Map<String, Value>, path: &str) -> Option<Map<String, Value>> {
        match take_non_null(map, "attrs") {
            None => None,
            Some(Value::Object(attrs)) => Some(attrs),
            Some(_) => {
                self.report(path, "attrs must be an object");
                None
            }
        }
    }

    fn into_message(self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Removes `key` unless it is absent or an explicit null; a null stays behind
/// and ends up in `extra`
fn take_non_null(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    if map.get(key).map_or(true, Value::is_null) {
        return None;
    }
    map.remove(key)
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let mut parser = Parser::default();
        match parser.node(value, "") {
            Some(node) if parser.violations.is_empty() => Ok(node),
            _ => Err(de::Error::custom(parser.into_message())),
        }
    }
}

impl<'de> Deserialize<'de> for Mark {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let mut parser = Parser::default();
        match parser.mark(value, "") {
            Some(mark) if parser.violations.is_empty() => Ok(mark),
            _ => Err(de::Error::custom(parser.into_message())),
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Document::from_value(value).map_err(de::Error::custom)
    }
}

impl TryFrom<Value> for Document {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Document::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn editor_output() -> Value {
        json!({
            "type": "doc",
            "content": [
                {
                    "type": "heading",
                    "attrs": { "level": 2, "textAlign": "center" },
                    "content": [{ "type": "text", "text": "Plan" }]
                },
                {
                    "type": "paragraph",
                    "attrs": { "textAlign": null },
                    "content": [
                        { "type": "text", "text": "see " },
                        {
                            "type": "text",
                            "text": "docs",
                            "marks": [
                                { "type": "link", "attrs": { "href": "https://example.com", "target": "_blank", "rel": null, "class": null } },
                                { "type": "bold" }
                            ]
                        }
                    ]
                },
                {
                    "type": "orderedList",
                    "attrs": { "start": 3 },
                    "content": [
                        { "type": "listItem", "content": [{ "type": "paragraph" }] }
                    ]
                },
                { "type": "paragraph", "content": [] },
                {
                    "type": "taskList",
                    "content": [
                        { "type": "taskItem", "attrs": { "checked": true }, "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "done", "marks": [{ "type": "highlight", "attrs": { "color": "#ff0" } }] }] }] }
                    ]
                },
                { "type": "image", "attrs": { "src": "a.png" }, "id": "custom-key" }
            ]
        })
    }

    #[test]
    fn round_trip_is_lossless() {
        let input = editor_output();
        let doc = Document::from_value(input.clone()).unwrap();
        assert_eq!(doc.to_value(), input);
        assert_eq!(serde_json::to_value(&doc).unwrap(), input);
    }

    #[test]
    fn explicit_nulls_survive_a_round_trip() {
        for input in [
            json!({ "type": "doc", "content": null }),
            json!({ "type": "doc", "attrs": null, "content": [
                { "type": "paragraph", "attrs": null, "marks": null, "content": [
                    { "type": "text", "text": "hi", "marks": [{ "type": "bold", "attrs": null }] }
                ] },
                { "type": "hardBreak", "text": null, "content": null }
            ] }),
        ] {
            let doc = Document::from_value(input.clone()).unwrap();
            assert_eq!(doc.to_value(), input);
            assert_eq!(serde_json::to_value(&doc).unwrap(), input);
        }

        let doc = Document::from_value(json!({ "type": "doc", "content": null })).unwrap();
        assert_eq!(doc.root().content, None);
        assert_eq!(doc.blocks().len(), 0);
    }

    #[test]
    fn unknown_types_are_preserved() {
        let doc = Document::from_value(editor_output()).unwrap();
        let task_list = &doc.blocks()[4];
        assert_eq!(task_list.kind, NodeKind::Other("taskList".into()));
        let highlighted = &task_list.children()[0].children()[0].children()[0];
        assert_eq!(highlighted.marks()[0].kind, MarkKind::Other("highlight".into()));
        assert_eq!(doc.blocks()[5].extra.get("id"), Some(&json!("custom-key")));
    }

    #[test]
    fn typed_accessors() {
        let doc = Document::from_value(editor_output()).unwrap();
        let heading = &doc.blocks()[0];
        assert_eq!(heading.heading_level(), 2);
        assert_eq!(heading.text_align(), Some(TextAlign::Center));
        assert_eq!(doc.blocks()[1].text_align(), None);
        let link = &doc.blocks()[1].children()[1].marks()[0];
        assert_eq!(link.href(), Some("https://example.com"));
        assert_eq!(doc.blocks()[2].ordered_list_start(), 3);
    }

    #[test]
    fn empty_content_is_distinct_from_absent() {
        let doc = Document::from_value(editor_output()).unwrap();
        assert_eq!(doc.blocks()[3].content, Some(vec![]));
        let item = &doc.blocks()[2].children()[0];
        assert_eq!(item.children()[0].content, None);
    }

    #[test]
    fn array_form_is_wrapped_in_doc() {
        let doc = Document::from_value(json!([
            { "type": "paragraph", "content": [{ "type": "text", "text": "hi" }] }
        ]))
        .unwrap();
        assert_eq!(doc.root().kind, NodeKind::Doc);
        assert_eq!(
            doc.to_value(),
            json!({ "type": "doc", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "hi" }] }] })
        );
    }

    #[test]
    fn single_doc_in_array_is_unwrapped() {
        let inner = json!({ "type": "doc", "content": [{ "type": "paragraph" }] });
        let doc = Document::from_value(json!([inner.clone()])).unwrap();
        assert_eq!(doc.to_value(), inner);
    }

    #[test]
    fn rejects_non_doc_root_and_scalars() {
        let err = Document::from_value(json!({ "type": "paragraph" })).unwrap_err();
        assert_eq!(
            err.violations(),
            [Violation::new("", "document root must be 'doc', found 'paragraph'")]
        );
        assert!(matches!(
            Document::from_value(json!("text")),
            Err(DocumentError::UnexpectedShape("string"))
        ));
        let err = Document::from_value(json!({ "content": [] })).unwrap_err();
        assert_eq!(err.violations(), [Violation::new("", "node is missing its type")]);
    }

    #[test]
    fn malformed_children_are_reported_with_paths() {
        let err = Document::from_value(json!({
            "type": "doc",
            "content": [
                { "type": "text", "text": 5 },
                { "content": [] },
                { "type": "paragraph", "content": [
                    { "type": "text", "text": "ok", "marks": [{ "attrs": {} }, "bold"] }
                ] },
                { "type": "heading", "attrs": [1] }
            ]
        }))
        .unwrap_err();

        let found: Vec<(&str, &str)> = err
            .violations()
            .iter()
            .map(|v| (v.path.as_str(), v.message.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("/content/0", "text must be a string"),
                ("/content/1", "node is missing its type"),
                ("/content/2/content/0/marks/0", "mark is missing its type"),
                ("/content/2/content/0/marks/1", "mark must be an object"),
                ("/content/3", "attrs must be an object"),
            ]
        );
    }

    #[test]
    fn array_children_use_document_paths() {
        let err = Document::from_value(json!([{ "type": "paragraph" }, 7])).unwrap_err();
        assert_eq!(err.violations(), [Violation::new("/content/1", "node must be an object")]);
    }

    #[test]
    fn welcome_document_shape() {
        let doc = Document::welcome();
        assert_eq!(doc.blocks().len(), 8);
        assert_eq!(doc.blocks()[0].heading_level(), 1);
        assert_eq!(doc.blocks()[3].kind, NodeKind::CodeBlock);
        let reparsed = Document::from_value(doc.to_value()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn node_count_includes_root() {
        assert_eq!(Document::empty().node_count(), 2);
    }
}
