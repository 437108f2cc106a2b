// Rich-text document model shared by the editor, the store and the renderers.
//
// The editor produces a JSON tree of `{type, attrs, content, marks, text}`
// nodes. `Document` is the typed view of that tree: known node and mark types
// get their own variants and accessors, everything else is carried through
// untouched so a save/load cycle never drops data.

pub mod error;
pub mod html;
pub mod markdown;
pub mod node;
pub mod text;
pub mod validate;

pub use error::{DocumentError, Violation};
pub use node::{Document, Mark, MarkKind, Node, NodeKind, TextAlign};
pub use validate::{validate, ValidationOptions};
