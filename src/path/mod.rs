//! Path queries over a document tree.
//!
//! A path is a `/`-separated list of segments:
//!
//! - `name` selects the first object member with that exact key,
//! - `[n]` selects an array element, and may follow a key directly (`items[2]`)
//!   or another index (`grid[1][0]`),
//! - `..` moves to the parent node,
//! - a leading `/` starts from the document root instead of the current node.
//!
//! Resolution never fails loudly: a malformed path or a missing node is
//! simply not found.

use smallvec::SmallVec;

use crate::tree::Node;
use crate::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'p> {
    Root,
    Parent,
    Key(&'p str),
    Index(usize),
}

pub type Segments<'p> = SmallVec<[Segment<'p>; 8]>;

/// Split `path` into segments, or `None` if it is malformed.
pub fn parse_path(path: &str) -> Option<Segments<'_>> {
    let mut segments = Segments::new();
    let mut rest = path;
    if let Some(stripped) = rest.strip_prefix('/') {
        segments.push(Segment::Root);
        rest = stripped;
    }

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("..") {
            if after.is_empty() || after.starts_with(['/', '[']) {
                segments.push(Segment::Parent);
                rest = after.strip_prefix('/').unwrap_or(after);
                continue;
            }
        }

        if let Some(after) = rest.strip_prefix('[') {
            let close = after.find(']')?;
            let digits = &after[..close];
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            segments.push(Segment::Index(digits.parse().ok()?));
            rest = &after[close + 1..];
            if !rest.is_empty() && !rest.starts_with(['/', '[']) {
                return None;
            }
        } else {
            let end = rest.find(['/', '[']).unwrap_or(rest.len());
            segments.push(Segment::Key(&rest[..end]));
            rest = &rest[end..];
        }
        rest = rest.strip_prefix('/').unwrap_or(rest);
    }
    Some(segments)
}

/// Resolve `path` against `node`, materializing nodes along the way.
pub fn resolve<'doc>(node: Node<'doc>, path: &str) -> Option<Node<'doc>> {
    let Some(segments) = parse_path(path) else {
        tracing::debug!(path, "malformed path");
        return None;
    };

    let mut current = node;
    for segment in segments {
        let next = match segment {
            Segment::Root => Some(current.root()),
            Segment::Parent => current.parent(),
            Segment::Key(key) if current.kind() == NodeKind::Object => current.get(key),
            Segment::Index(index) if current.kind() == NodeKind::Array => current.index(index),
            Segment::Key(_) | Segment::Index(_) => None,
        };
        match next {
            Some(node) => current = node,
            None => {
                tracing::debug!(
                    path,
                    segment = ?segment,
                    at = current.id().index(),
                    "path not found"
                );
                return None;
            }
        }
    }
    Some(current)
}
