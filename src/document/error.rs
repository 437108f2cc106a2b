use serde::Serialize;
use thiserror::Error;

/// A single structural problem found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Location of the offending node, e.g. `/content/2/content/0`
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("expected a document object or an array of nodes, found {0}")]
    UnexpectedShape(&'static str),

    /// Shape problems found while parsing, or rule violations from `validate`
    #[error("document failed validation with {} violation(s)", .0.len())]
    Invalid(Vec<Violation>),
}

impl DocumentError {
    /// Violations carried by a validation failure, empty for non-document JSON
    pub fn violations(&self) -> &[Violation] {
        match self {
            DocumentError::Invalid(violations) => violations,
            _ => &[],
        }
    }
}
