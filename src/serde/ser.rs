use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::tree::Node;
use crate::NodeKind;

/// Streams a subtree, materializing each container as it is visited.
///
/// Integral numerals that fit in `i64` serialize as integers; every other
/// number goes through its double value.
impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind() {
            NodeKind::Object => {
                let children = self.try_children().map_err(S::Error::custom)?;
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for child in children {
                    map.serialize_entry(child.key().unwrap_or_default(), &child)?;
                }
                map.end()
            }
            NodeKind::Array => {
                let children = self.try_children().map_err(S::Error::custom)?;
                let mut seq = serializer.serialize_seq(Some(children.len()))?;
                for child in children {
                    seq.serialize_element(&child)?;
                }
                seq.end()
            }
            NodeKind::True => serializer.serialize_bool(true),
            NodeKind::False => serializer.serialize_bool(false),
            NodeKind::Null | NodeKind::Invalid => serializer.serialize_unit(),
            NodeKind::Number => {
                let value = self
                    .try_as_number()
                    .map_err(S::Error::custom)?
                    .ok_or_else(|| S::Error::custom("number node without a value"))?;
                if is_integral_literal(self.raw(), value.double) {
                    serializer.serialize_i64(value.integer)
                } else {
                    serializer.serialize_f64(value.double)
                }
            }
            NodeKind::String => {
                let value = self
                    .try_as_str()
                    .map_err(S::Error::custom)?
                    .ok_or_else(|| S::Error::custom("string node without a value"))?;
                serializer.serialize_str(value)
            }
        }
    }
}

/// `-0` stays a float so the sign of zero survives.
fn is_integral_literal(raw: &str, double: f64) -> bool {
    let negative_zero = double == 0.0 && double.is_sign_negative();
    !negative_zero
        && double.abs() < 9.2e18
        && !raw.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
}
