use memchr::memchr;

use crate::{Error, Result};

/// Resolve JSON escape sequences in the body of a string literal.
///
/// `raw` is the text between the quotes. The output is written in a single
/// forward pass into a fresh buffer; `\uXXXX` escapes are limited to the
/// Basic Multilingual Plane and surrogate halves decode to U+FFFD.
///
/// Malformed escapes are reported as internal errors: the grammar validator
/// rejects them before a string ever reaches this function.
///
/// # Examples
/// ```
/// use lazy_json::text::string::decode_escapes;
///
/// assert_eq!(decode_escapes(r"line\nbreak").unwrap(), "line\nbreak");
/// assert_eq!(decode_escapes(r"\u0041").unwrap(), "A");
/// ```
pub fn decode_escapes(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    if memchr(b'\\', bytes).is_none() {
        return Ok(raw.to_owned());
    }

    let mut out = String::with_capacity(raw.len());
    let mut idx = 0;
    while idx < bytes.len() {
        let Some(offset) = memchr(b'\\', &bytes[idx..]) else {
            out.push_str(&raw[idx..]);
            break;
        };
        let pos = idx + offset;
        out.push_str(&raw[idx..pos]);
        let next = bytes
            .get(pos + 1)
            .ok_or_else(|| Error::internal("dangling escape in validated string"))?;
        match next {
            b'\\' => out.push('\\'),
            b'"' => out.push('"'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                out.push(decode_unicode_escape(raw, pos + 2)?);
                idx = pos + 6;
                continue;
            }
            other => {
                return Err(Error::internal(format!(
                    "unknown escape '\\{}' in validated string",
                    *other as char
                )))
            }
        }
        idx = pos + 2;
    }
    Ok(out)
}

fn decode_unicode_escape(raw: &str, start: usize) -> Result<char> {
    let hex = raw
        .get(start..start + 4)
        .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| Error::internal("malformed \\u escape in validated string"))?;
    let code = u32::from_str_radix(hex, 16)
        .map_err(|_| Error::internal("malformed \\u escape in validated string"))?;
    Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
}
