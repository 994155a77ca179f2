//! Lazy materialization of a node's immediate children.

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::arena::{ChildRange, NodeData, NodeId, NodeKind, Scalar, Span};
use crate::decode::scanner::{byte_at, skip_whitespace};
use crate::decode::validation::Validator;
use crate::num::number::decode_number;
use crate::text::string::decode_escapes;
use crate::{Error, Result};

use super::Document;

type PendingChildren = SmallVec<[NodeData; 8]>;

/// Discover the children of `id`, at most once per node.
pub(crate) fn materialize(doc: &Document, id: NodeId, node: &NodeData) -> Result<ChildRange> {
    if let Some(range) = node.children.get() {
        return Ok(*range);
    }

    let range = if node.kind.is_container() {
        let pending = scan_children(doc, id, node)?;
        doc.arena().alloc_block(pending)?
    } else {
        ChildRange::empty(NodeId::new(doc.arena().len())?)
    };

    if node.children.set(range).is_err() {
        return Err(Error::internal(format!("node {} scanned twice", id.index())));
    }
    tracing::trace!(
        node = id.index(),
        kind = node.kind.as_str(),
        children = range.len(),
        "materialized node"
    );
    Ok(range)
}

/// Walk the node's own span and delimit each immediate child.
///
/// The span was validated when the document was parsed, so any failure here
/// is reported as an internal error rather than a parse error.
fn scan_children(doc: &Document, id: NodeId, node: &NodeData) -> Result<PendingChildren> {
    let text = doc.raw();
    let input = text.as_bytes();
    let keyed = node.kind == NodeKind::Object;
    let close = if keyed { b'}' } else { b']' };
    let mut validator = Validator::new(input, doc.max_depth());
    let mut pending = PendingChildren::new();

    let mut pos = skip_whitespace(input, node.span.start + 1);
    if byte_at(input, pos) == Some(close) {
        return Ok(pending);
    }

    while pos < node.span.end {
        let key = if keyed {
            let key_end = validator
                .validate_string(pos)
                .map_err(|err| rescan_failure(id, err))?;
            let raw_key = text
                .get(pos + 1..key_end - 1)
                .ok_or_else(|| Error::internal("object key is not on a char boundary"))?;
            let key = SmolStr::new(decode_escapes(raw_key)?);
            pos = skip_whitespace(input, key_end);
            if byte_at(input, pos) != Some(b':') {
                return Err(Error::internal(format!(
                    "missing ':' at offset {pos} while scanning node {}",
                    id.index()
                )));
            }
            pos = skip_whitespace(input, pos + 1);
            Some(key)
        } else {
            None
        };

        let kind = NodeKind::classify(&input[pos..]);
        let value_end = validator
            .validate_value(pos, 1)
            .map_err(|err| rescan_failure(id, err))?;
        pending.push(NodeData::new(kind, Span::new(pos, value_end), key, Some(id)));

        pos = skip_whitespace(input, value_end);
        match byte_at(input, pos) {
            Some(b',') => pos = skip_whitespace(input, pos + 1),
            Some(byte) if byte == close => return Ok(pending),
            _ => break,
        }
    }

    Err(Error::internal(format!(
        "container span of node {} ended without '{}'",
        id.index(),
        close as char
    )))
}

/// Decode the cached scalar of a String or Number node.
pub(crate) fn decode_scalar(doc: &Document, node: &NodeData) -> Result<Scalar> {
    let raw = node
        .span
        .slice(doc.raw())
        .ok_or_else(|| Error::internal("node span outside document"))?;
    match node.kind {
        NodeKind::String => {
            let body = raw
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .ok_or_else(|| Error::internal("string span is not quoted"))?;
            Ok(Scalar::String(decode_escapes(body)?))
        }
        NodeKind::Number => Ok(Scalar::Number(decode_number(raw)?)),
        other => Err(Error::internal(format!(
            "{} node has no scalar value",
            other.as_str()
        ))),
    }
}

fn rescan_failure(id: NodeId, err: Error) -> Error {
    Error::internal(format!(
        "validated span of node {} failed to re-scan: {}",
        id.index(),
        err.message
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ChildState;
    use crate::ParseOptions;

    fn doc(input: &str) -> Document {
        crate::decode::parse(input.as_bytes(), &ParseOptions::default()).unwrap()
    }

    fn node(doc: &Document, id: NodeId) -> &NodeData {
        doc.arena().get(id).unwrap()
    }

    #[rstest::rstest]
    fn test_object_children_keep_order_and_keys() {
        let doc = doc(r#"{ "b" : 1 , "a" : [2] , "c":{"d":null} }"#);
        let root = node(&doc, NodeId::ROOT);
        let range = materialize(&doc, NodeId::ROOT, root).unwrap();
        assert_eq!(range.len(), 3);

        let children: Vec<&NodeData> = range.ids().map(|id| node(&doc, id)).collect();
        let keys: Vec<&str> = children
            .iter()
            .map(|child| child.key.as_deref().unwrap())
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        let kinds: Vec<NodeKind> = children.iter().map(|child| child.kind).collect();
        assert_eq!(kinds, vec![NodeKind::Number, NodeKind::Array, NodeKind::Object]);
        assert_eq!(children[2].span.slice(doc.raw()), Some(r#"{"d":null}"#));
        assert!(children.iter().all(|child| child.parent == Some(NodeId::ROOT)));
    }

    #[rstest::rstest]
    fn test_grandchildren_stay_unscanned() {
        let doc = doc(r#"[[1,[2]],{"x":3}]"#);
        let root = node(&doc, NodeId::ROOT);
        let range = materialize(&doc, NodeId::ROOT, root).unwrap();
        assert_eq!(doc.materialized_count(), 3);
        for id in range.ids() {
            assert_eq!(node(&doc, id).child_state(), ChildState::Unscanned);
        }
    }

    #[rstest::rstest]
    fn test_materialize_runs_once() {
        let doc = doc("[1,2,3]");
        let root = node(&doc, NodeId::ROOT);
        let first = materialize(&doc, NodeId::ROOT, root).unwrap();
        let second = materialize(&doc, NodeId::ROOT, root).unwrap();
        assert_eq!(first, second);
        assert_eq!(doc.materialized_count(), 4);
    }

    #[rstest::rstest]
    fn test_empty_containers_and_leaves() {
        let doc = doc(r#"{"o":{},"a":[ ],"t":true}"#);
        let root = node(&doc, NodeId::ROOT);
        let range = materialize(&doc, NodeId::ROOT, root).unwrap();
        for id in range.ids() {
            let child = node(&doc, id);
            let scanned = materialize(&doc, id, child).unwrap();
            assert!(scanned.is_empty());
        }
        assert_eq!(doc.materialized_count(), 4);
    }

    #[rstest::rstest]
    fn test_escaped_keys_are_decoded() {
        let doc = doc(r#"{"a\"b":1,"tab\tkey":2}"#);
        let root = node(&doc, NodeId::ROOT);
        let range = materialize(&doc, NodeId::ROOT, root).unwrap();
        let keys: Vec<String> = range
            .ids()
            .map(|id| node(&doc, id).key.as_deref().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["a\"b".to_string(), "tab\tkey".to_string()]);
    }

    #[rstest::rstest]
    fn test_decode_scalar() {
        let doc = doc(r#"["x\ny", -2.5, true]"#);
        let root = node(&doc, NodeId::ROOT);
        let range = materialize(&doc, NodeId::ROOT, root).unwrap();
        let ids: Vec<NodeId> = range.ids().collect();

        match decode_scalar(&doc, node(&doc, ids[0])).unwrap() {
            Scalar::String(value) => assert_eq!(value, "x\ny"),
            other => panic!("unexpected scalar {other:?}"),
        }
        match decode_scalar(&doc, node(&doc, ids[1])).unwrap() {
            Scalar::Number(value) => {
                assert_eq!(value.double, -2.5);
                assert_eq!(value.integer, -3);
            }
            other => panic!("unexpected scalar {other:?}"),
        }
        assert!(decode_scalar(&doc, node(&doc, ids[2])).unwrap_err().is_internal());
    }
}
