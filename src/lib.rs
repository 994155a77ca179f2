//! Validating JSON reader with a lazily materialized tree.
//!
//! [`parse`] validates the whole buffer once and returns a [`Document`].
//! Children of a node are discovered on first access and leaf values are
//! decoded on first read, so only the parts of a document that are actually
//! visited cost anything beyond validation. Nodes are addressed with
//! [`Node`] handles or with a small path language (see [`path`]).
//!
//! ```
//! let doc = lazy_json::parse(br#"{"details":{"prices":[1,2.5]}}"#).unwrap();
//! let price = doc.traverse("/details/prices[1]").unwrap();
//! assert_eq!(price.as_f64(), 2.5);
//! assert_eq!(price.as_i64(), 3);
//! ```

pub mod arena;
pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod num;
pub mod options;
pub mod path;
mod serde;
pub mod text;
pub mod tree;

pub use crate::arena::{ChildState, NodeId, NodeKind, Span};
pub use crate::encode::{to_outline, write_outline};
pub use crate::error::{Error, ErrorKind, Location};
pub use crate::options::ParseOptions;
pub use crate::tree::{Children, Document, Node};

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse(input: impl AsRef<[u8]>) -> Result<Document> {
    parse_with_options(input, &ParseOptions::default())
}

pub fn parse_with_options(input: impl AsRef<[u8]>, options: &ParseOptions) -> Result<Document> {
    decode::parse(input.as_ref(), options)
}

/// Free the whole tree. Only a root can be released, which the type system
/// already guarantees: descendants are borrowed handles, never owners.
pub fn release(document: Document) -> bool {
    document.release()
}

/// Resolve `path` from `node`; a missing starting node stays missing.
pub fn traverse<'doc>(node: Option<Node<'doc>>, path: &str) -> Option<Node<'doc>> {
    node.and_then(|node| node.traverse(path))
}

pub fn as_string<'doc>(node: Option<Node<'doc>>) -> Option<&'doc str> {
    node.and_then(|node| node.as_str())
}

pub fn as_double(node: Option<Node<'_>>) -> f64 {
    node.map_or(f64::NAN, |node| node.as_f64())
}

pub fn as_integer(node: Option<Node<'_>>) -> i64 {
    node.map_or(0, |node| node.as_i64())
}

pub fn child_count(node: Option<Node<'_>>) -> usize {
    node.map_or(0, |node| node.child_count())
}

pub fn child_at<'doc>(node: Option<Node<'doc>>, index: usize) -> Option<Node<'doc>> {
    node.and_then(|node| node.child(index))
}

/// Member name of `node`, or `""` for the root, array elements and misses.
pub fn key_of<'doc>(node: Option<Node<'doc>>) -> &'doc str {
    node.and_then(|node| node.key()).unwrap_or("")
}

pub fn raw_document<'doc>(node: Option<Node<'doc>>) -> &'doc str {
    node.map_or("", |node| node.document().raw())
}

pub fn kind_of(node: Option<Node<'_>>) -> NodeKind {
    node.map_or(NodeKind::Invalid, |node| node.kind())
}
