//! Indented outline rendering of a tree.
//!
//! Each node prints its kind on one line; object members and array elements
//! are introduced by a `key:` or `index:` line one level deeper, with the
//! member itself two levels deeper:
//!
//! ```text
//! OBJECT:
//!   cost:
//!     OBJECT:
//!       quantity:
//!         NUMBER: 25
//! ```

pub(crate) mod writer;

use std::io::Write;

use crate::tree::Node;
use crate::{Error, NodeKind, Result};

use self::writer::Writer;

pub fn to_outline(node: Node<'_>) -> Result<String> {
    let mut writer = Writer::new();
    write_node(&mut writer, node, 0)?;
    Ok(writer.finish())
}

pub fn write_outline<W: Write>(mut out: W, node: Node<'_>) -> Result<()> {
    let text = to_outline(node)?;
    out.write_all(text.as_bytes())
        .map_err(|err| Error::io(format!("write failed: {err}")))
}

fn write_node(writer: &mut Writer, node: Node<'_>, level: usize) -> Result<()> {
    writer.write_indent(level);
    match node.kind() {
        NodeKind::Object => {
            writer.write_str("OBJECT:");
            writer.write_newline();
            for child in node.try_children()? {
                writer.write_label(level + 1, child.key().unwrap_or_default());
                write_node(writer, child, level + 2)?;
            }
        }
        NodeKind::Array => {
            writer.write_str("ARRAY:");
            writer.write_newline();
            for (index, child) in node.try_children()?.enumerate() {
                writer.write_index_label(level + 1, index);
                write_node(writer, child, level + 2)?;
            }
        }
        NodeKind::True => writer.write_str("TRUE\n"),
        NodeKind::False => writer.write_str("FALSE\n"),
        NodeKind::Null => writer.write_str("NULL\n"),
        NodeKind::Number => {
            let value = node
                .try_as_number()?
                .ok_or_else(|| Error::internal("number node without a value"))?;
            writer.write_str("NUMBER: ");
            writer.write_number(value.double);
            writer.write_newline();
        }
        NodeKind::String => {
            let value = node
                .try_as_str()?
                .ok_or_else(|| Error::internal("string node without a value"))?;
            writer.write_str("STRING: ");
            writer.write_str(value);
            writer.write_newline();
        }
        NodeKind::Invalid => writer.write_str("INVALID\n"),
    }
    Ok(())
}
