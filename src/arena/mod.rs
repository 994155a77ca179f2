//! Node storage for a parsed document.
//!
//! Whole-document validation counts every value in the buffer, which bounds
//! the number of nodes lazy materialization can ever create. The arena is a
//! table of that many write-once slots, split into chunks that are only
//! allocated once a node id inside them is handed out. Slots never move, so
//! a `&NodeData` borrowed from the arena lives as long as the document.

use std::cell::{Cell, OnceCell};

use smol_str::SmolStr;

use crate::num::number::NumberValue;
use crate::{Error, Result};

const CHUNK_BITS: usize = 8;
const CHUNK_SIZE: usize = 1 << CHUNK_BITS;
const CHUNK_MASK: usize = CHUNK_SIZE - 1;

/// Index of a node inside its document's arena. The root is always `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Result<Self> {
        u32::try_from(index)
            .map(NodeId)
            .map_err(|_| Error::exhausted("node id space exhausted"))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object,
    Array,
    True,
    False,
    Null,
    Number,
    String,
    /// Kind reported for a missing node.
    Invalid,
}

impl NodeKind {
    /// Classify a value by its first byte or literal prefix.
    ///
    /// The caller guarantees that `bytes` starts with a grammar-valid value.
    pub fn classify(bytes: &[u8]) -> NodeKind {
        match bytes.first() {
            Some(b'{') => NodeKind::Object,
            Some(b'[') => NodeKind::Array,
            Some(b'"') => NodeKind::String,
            Some(_) if bytes.starts_with(b"true") => NodeKind::True,
            Some(_) if bytes.starts_with(b"false") => NodeKind::False,
            Some(_) if bytes.starts_with(b"null") => NodeKind::Null,
            Some(_) => NodeKind::Number,
            None => NodeKind::Invalid,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Array)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::True => "true",
            NodeKind::False => "false",
            NodeKind::Null => "null",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Invalid => "invalid",
        }
    }
}

/// Half-open byte range into the document buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end, "spans are never empty");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start..self.end)
    }
}

/// Contiguous block of child ids handed out by one materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildRange {
    pub first: NodeId,
    pub len: u32,
}

impl ChildRange {
    pub fn empty(at: NodeId) -> Self {
        Self { first: at, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        if index < self.len() {
            Some(NodeId(self.first.0 + index as u32))
        } else {
            None
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        let first = self.first.0;
        (first..first + self.len).map(NodeId)
    }
}

/// Materialization state of a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    Unscanned,
    Scanned(ChildRange),
}

#[derive(Debug)]
pub(crate) enum Scalar {
    String(String),
    Number(NumberValue),
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub span: Span,
    pub key: Option<SmolStr>,
    pub parent: Option<NodeId>,
    pub children: OnceCell<ChildRange>,
    pub value: OnceCell<Scalar>,
}

impl NodeData {
    pub fn new(kind: NodeKind, span: Span, key: Option<SmolStr>, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            span,
            key,
            parent,
            children: OnceCell::new(),
            value: OnceCell::new(),
        }
    }

    pub fn child_state(&self) -> ChildState {
        match self.children.get() {
            Some(range) => ChildState::Scanned(*range),
            None => ChildState::Unscanned,
        }
    }
}

type Chunk = Box<[OnceCell<NodeData>]>;

#[derive(Debug)]
pub(crate) struct Arena {
    root: NodeData,
    chunks: Box<[OnceCell<Chunk>]>,
    capacity: usize,
    next: Cell<usize>,
}

impl Arena {
    /// Build an arena able to hold `capacity` nodes. `root` is stored inline
    /// as id 0; slot 0 of the first chunk stays unused.
    pub fn with_root(capacity: usize, root: NodeData) -> Result<Self> {
        let capacity = capacity.max(1);
        let chunk_count = capacity.div_ceil(CHUNK_SIZE);
        let mut chunks = Vec::new();
        chunks
            .try_reserve_exact(chunk_count)
            .map_err(|err| Error::exhausted(format!("node table allocation failed: {err}")))?;
        chunks.resize_with(chunk_count, OnceCell::new);

        Ok(Self {
            root,
            chunks: chunks.into_boxed_slice(),
            capacity,
            next: Cell::new(1),
        })
    }

    pub fn root(&self) -> &NodeData {
        &self.root
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots handed out so far.
    pub fn len(&self) -> usize {
        self.next.get()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        if id == NodeId::ROOT {
            return Some(&self.root);
        }
        let index = id.index();
        self.chunks
            .get(index >> CHUNK_BITS)?
            .get()?
            .get(index & CHUNK_MASK)?
            .get()
    }

    /// Store `nodes` in consecutive fresh slots and return their range.
    pub fn alloc_block<I>(&self, nodes: I) -> Result<ChildRange>
    where
        I: IntoIterator<Item = NodeData>,
        I::IntoIter: ExactSizeIterator,
    {
        let nodes = nodes.into_iter();
        let first = self.next.get();
        let len = nodes.len();
        let end = first
            .checked_add(len)
            .filter(|end| *end <= self.capacity)
            .ok_or_else(|| {
                Error::exhausted(format!(
                    "node arena full: {} of {} slots used, {len} requested",
                    first, self.capacity
                ))
            })?;
        let range = ChildRange {
            first: NodeId::new(first)?,
            len: u32::try_from(len).map_err(|_| Error::exhausted("too many children"))?,
        };
        NodeId::new(end)?;

        for (index, node) in (first..end).zip(nodes) {
            let slot = self.slot(index)?;
            if slot.set(node).is_err() {
                return Err(Error::internal(format!("arena slot {index} written twice")));
            }
        }
        self.next.set(end);
        Ok(range)
    }

    fn slot(&self, index: usize) -> Result<&OnceCell<NodeData>> {
        let chunk = self
            .chunks
            .get(index >> CHUNK_BITS)
            .ok_or_else(|| Error::exhausted(format!("slot {index} outside node arena")))?
            .get_or_init(|| (0..CHUNK_SIZE).map(|_| OnceCell::new()).collect());
        chunk
            .get(index & CHUNK_MASK)
            .ok_or_else(|| Error::internal(format!("slot {index} outside its chunk")))
    }
}
