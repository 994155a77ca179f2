//! Read-only document tree with lazily discovered children.
//!
//! A [`Document`] owns the validated text and the node arena. Nodes are
//! reached through [`Node`] handles, which are `Copy` and borrow the document.
//! Children are scanned on first access and decoded leaf values are cached on
//! first read; both happen at most once per node.
//!
//! # Example
//!
//! ```
//! use lazy_json::{Document, NodeKind};
//!
//! let doc = Document::parse(br#"{"x":{"y":5}}"#).unwrap();
//! let y = doc.root().traverse("x/y").unwrap();
//! assert_eq!(y.kind(), NodeKind::Number);
//! assert_eq!(y.as_f64(), 5.0);
//! assert_eq!(y.parent().and_then(|x| x.key()), Some("x"));
//! ```

pub(crate) mod builder;

use std::fmt;

use crate::arena::{Arena, ChildRange, ChildState, NodeData, NodeId, NodeKind, Scalar, Span};
use crate::num::number::NumberValue;
use crate::{Error, ParseOptions, Result};

use self::builder::{decode_scalar, materialize};

/// A parsed JSON document: the root owner of the buffer and every node.
pub struct Document {
    data: Box<str>,
    arena: Arena,
    max_depth: usize,
}

impl Document {
    pub(crate) fn new(
        data: Box<str>,
        kind: NodeKind,
        value_count: usize,
        max_depth: usize,
    ) -> Result<Self> {
        let root = NodeData::new(kind, Span::new(0, data.len()), None, None);
        let arena = Arena::with_root(value_count, root)?;
        Ok(Self {
            data,
            arena,
            max_depth,
        })
    }

    /// Parse with default [`ParseOptions`].
    pub fn parse(input: &[u8]) -> Result<Self> {
        crate::decode::parse(input, &ParseOptions::default())
    }

    pub fn parse_with_options(input: &[u8], options: &ParseOptions) -> Result<Self> {
        crate::decode::parse(input, options)
    }

    pub fn root(&self) -> Node<'_> {
        Node {
            doc: self,
            id: NodeId::ROOT,
            data: self.arena.root(),
        }
    }

    /// Look up a node that has already been materialized.
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        let data = self.arena.get(id)?;
        Some(Node {
            doc: self,
            id,
            data,
        })
    }

    /// Resolve `path` starting at the root.
    pub fn traverse(&self, path: &str) -> Option<Node<'_>> {
        crate::path::resolve(self.root(), path)
    }

    /// The trimmed, validated document text.
    pub fn raw(&self) -> &str {
        &self.data
    }

    /// Values counted by whole-document validation.
    pub fn value_count(&self) -> usize {
        self.arena.capacity()
    }

    /// Nodes created so far, root included.
    pub fn materialized_count(&self) -> usize {
        self.arena.len()
    }

    /// Drop the whole tree. Always succeeds: a `Document` is a root.
    pub fn release(self) -> bool {
        tracing::debug!(
            materialized = self.materialized_count(),
            values = self.value_count(),
            "releasing document"
        );
        true
    }

    pub(crate) fn arena(&self) -> &Arena {
        &self.arena
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.data.len())
            .field("values", &self.value_count())
            .field("materialized", &self.materialized_count())
            .finish()
    }
}

/// Handle to one node of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'doc> {
    doc: &'doc Document,
    id: NodeId,
    data: &'doc NodeData,
}

impl<'doc> Node<'doc> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'doc Document {
        self.doc
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind
    }

    /// Member name; `None` for the root and for array elements.
    pub fn key(&self) -> Option<&'doc str> {
        self.data.key.as_deref()
    }

    pub fn parent(&self) -> Option<Node<'doc>> {
        self.data.parent.and_then(|id| self.doc.node(id))
    }

    pub fn root(&self) -> Node<'doc> {
        self.doc.root()
    }

    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    /// The exact source text of this value.
    pub fn raw(&self) -> &'doc str {
        self.data.span.slice(self.doc.raw()).unwrap_or("")
    }

    pub fn span(&self) -> Span {
        self.data.span
    }

    pub fn child_state(&self) -> ChildState {
        self.data.child_state()
    }

    pub fn try_child_count(&self) -> Result<usize> {
        self.scan().map(|range| range.len())
    }

    pub fn child_count(&self) -> usize {
        degrade(self.try_child_count(), 0)
    }

    pub fn try_child(&self, index: usize) -> Result<Option<Node<'doc>>> {
        let range = self.scan()?;
        Ok(range.get(index).and_then(|id| self.doc.node(id)))
    }

    /// Child at `index`, in document order. Works for objects and arrays.
    pub fn child(&self, index: usize) -> Option<Node<'doc>> {
        degrade(self.try_child(index), None)
    }

    pub fn try_children(&self) -> Result<Children<'doc>> {
        let range = self.scan()?;
        Ok(Children {
            doc: self.doc,
            ids: range,
            next: 0,
        })
    }

    pub fn children(&self) -> Children<'doc> {
        let fallback = Children {
            doc: self.doc,
            ids: ChildRange::empty(self.id),
            next: 0,
        };
        degrade(self.try_children(), fallback)
    }

    /// First member of an object named `key`.
    pub fn get(&self, key: &str) -> Option<Node<'doc>> {
        if self.kind() != NodeKind::Object {
            return None;
        }
        self.children().find(|child| child.key() == Some(key))
    }

    /// Element of an array by position.
    pub fn index(&self, index: usize) -> Option<Node<'doc>> {
        if self.kind() != NodeKind::Array {
            return None;
        }
        self.child(index)
    }

    /// Resolve a path relative to this node.
    pub fn traverse(&self, path: &str) -> Option<Node<'doc>> {
        crate::path::resolve(*self, path)
    }

    pub fn try_as_str(&self) -> Result<Option<&'doc str>> {
        if self.kind() != NodeKind::String {
            return Ok(None);
        }
        match self.scalar()? {
            Scalar::String(value) => Ok(Some(value.as_str())),
            Scalar::Number(_) => Err(Error::internal("string node cached a number")),
        }
    }

    /// Decoded string value; `None` unless this is a String node.
    pub fn as_str(&self) -> Option<&'doc str> {
        degrade(self.try_as_str(), None)
    }

    pub fn try_as_number(&self) -> Result<Option<NumberValue>> {
        if self.kind() != NodeKind::Number {
            return Ok(None);
        }
        match self.scalar()? {
            Scalar::Number(value) => Ok(Some(*value)),
            Scalar::String(_) => Err(Error::internal("number node cached a string")),
        }
    }

    /// Double value; NaN unless this is a Number node.
    pub fn as_f64(&self) -> f64 {
        match degrade(self.try_as_number(), None) {
            Some(value) => value.double,
            None => f64::NAN,
        }
    }

    /// Rounded integer for numbers, `1` for `true`, `0` otherwise.
    pub fn as_i64(&self) -> i64 {
        match self.kind() {
            NodeKind::True => 1,
            NodeKind::Number => degrade(self.try_as_number(), None)
                .map(|value| value.integer)
                .unwrap_or(0),
            _ => 0,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind() {
            NodeKind::True => Some(true),
            NodeKind::False => Some(false),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == NodeKind::Null
    }

    /// Materialize the whole subtree into a `serde_json::Value`.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|err| Error::internal(err.to_string()))
    }

    fn scan(&self) -> Result<ChildRange> {
        materialize(self.doc, self.id, self.data)
    }

    fn scalar(&self) -> Result<&'doc Scalar> {
        if let Some(value) = self.data.value.get() {
            return Ok(value);
        }
        let value = decode_scalar(self.doc, self.data)?;
        Ok(self.data.value.get_or_init(|| value))
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("key", &self.key())
            .finish()
    }
}

/// Iterator over the immediate children of a node.
pub struct Children<'doc> {
    doc: &'doc Document,
    ids: ChildRange,
    next: usize,
}

impl<'doc> Iterator for Children<'doc> {
    type Item = Node<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.get(self.next)?;
        self.next += 1;
        self.doc.node(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ids.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Collapse an internal error into the not-found value of an infallible
/// accessor. Debug builds treat the error as a bug and panic.
fn degrade<T>(result: Result<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(kind = ?err.kind, error = %err, "lazy access failed");
            debug_assert!(false, "lazy access failed: {err}");
            fallback
        }
    }
}
