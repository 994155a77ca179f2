//! Recursive-descent grammar validator.
//!
//! Every routine takes a byte offset pointing at the start of a construct
//! and returns the offset just past it. Validation is a single forward pass
//! without backtracking; the first failure aborts with a positioned error.

use memchr::memchr2;

use crate::arena::NodeKind;
use crate::constants::is_simple_escape;
use crate::{Error, Result};

use super::scanner::{byte_at, skip_whitespace};

pub(crate) struct Validator<'a> {
    input: &'a [u8],
    max_depth: usize,
    values: usize,
}

impl<'a> Validator<'a> {
    pub fn new(input: &'a [u8], max_depth: usize) -> Self {
        Self {
            input,
            max_depth,
            values: 0,
        }
    }

    /// Number of values recognized so far, containers included.
    pub fn values(&self) -> usize {
        self.values
    }

    /// Validate a whole document: one container spanning all of `input`.
    pub fn validate_document(&mut self) -> Result<NodeKind> {
        let kind = match byte_at(self.input, 0) {
            Some(b'{') => NodeKind::Object,
            Some(b'[') => NodeKind::Array,
            _ => return Err(self.error(0, "document must start with '{' or '['")),
        };
        self.values += 1;
        let end = self.validate_container(0, kind, 1)?;
        if end != self.input.len() {
            return Err(self.error(end, "unexpected trailing content"));
        }
        Ok(kind)
    }

    /// Validate an object or array starting at `pos`.
    pub fn validate_container(&mut self, pos: usize, kind: NodeKind, depth: usize) -> Result<usize> {
        if depth > self.max_depth {
            return Err(self.error(
                pos,
                format!("nesting deeper than {} levels", self.max_depth),
            ));
        }
        let (open, close) = match kind {
            NodeKind::Object => (b'{', b'}'),
            NodeKind::Array => (b'[', b']'),
            other => {
                return Err(self.error(pos, format!("{} is not a container", other.as_str())))
            }
        };
        if byte_at(self.input, pos) != Some(open) {
            return Err(self.error(pos, format!("expected '{}'", open as char)));
        }

        let mut pos = self.skip_ws(pos + 1)?;
        if byte_at(self.input, pos) == Some(close) {
            return Ok(pos + 1);
        }

        loop {
            if kind == NodeKind::Object {
                pos = self.validate_member_key(pos)?;
            }
            pos = self.validate_value(pos, depth)?;
            pos = self.skip_ws(pos)?;
            match byte_at(self.input, pos) {
                Some(b',') => {
                    pos = self.skip_ws(pos + 1)?;
                    if byte_at(self.input, pos) == Some(close) {
                        return Err(self.error(pos, "trailing comma"));
                    }
                }
                Some(byte) if byte == close => return Ok(pos + 1),
                _ => {
                    return Err(self.error(
                        pos,
                        format!("expected ',' or '{}'", close as char),
                    ))
                }
            }
        }
    }

    /// Validate `"key" ws ':' ws` and return the offset of the member value.
    fn validate_member_key(&mut self, pos: usize) -> Result<usize> {
        if byte_at(self.input, pos) != Some(b'"') {
            return Err(self.error(pos, "expected object key"));
        }
        let pos = self.validate_string(pos)?;
        let pos = self.skip_ws(pos)?;
        if byte_at(self.input, pos) != Some(b':') {
            return Err(self.error(pos, "expected ':' after object key"));
        }
        self.skip_ws(pos + 1)
    }

    /// Validate any single value; `depth` is the nesting of its container.
    pub fn validate_value(&mut self, pos: usize, depth: usize) -> Result<usize> {
        self.values += 1;
        let rest = &self.input[pos.min(self.input.len())..];
        match rest.first() {
            Some(b'{') => self.validate_container(pos, NodeKind::Object, depth + 1),
            Some(b'[') => self.validate_container(pos, NodeKind::Array, depth + 1),
            Some(b'"') => self.validate_string(pos),
            Some(_) if rest.starts_with(b"true") || rest.starts_with(b"null") => Ok(pos + 4),
            Some(_) if rest.starts_with(b"false") => Ok(pos + 5),
            Some(_) => self.validate_number(pos),
            None => Err(self.error(pos, "expected value")),
        }
    }

    /// Validate a string literal, escapes included.
    ///
    /// Something must follow the closing quote: a string is never the last
    /// byte of a valid document.
    pub fn validate_string(&self, pos: usize) -> Result<usize> {
        if byte_at(self.input, pos) != Some(b'"') {
            return Err(self.error(pos, "expected '\"'"));
        }
        let mut idx = pos + 1;
        loop {
            let Some(offset) = memchr2(b'"', b'\\', &self.input[idx.min(self.input.len())..])
            else {
                return Err(self.error(pos, "unterminated string"));
            };
            idx += offset;
            if self.input[idx] == b'"' {
                break;
            }
            idx = self.validate_escape(idx)?;
        }

        let end = idx + 1;
        if end >= self.input.len() {
            return Err(self.error(end, "unexpected end of input after string"));
        }
        Ok(end)
    }

    /// Validate the escape sequence whose backslash sits at `pos`.
    fn validate_escape(&self, pos: usize) -> Result<usize> {
        match byte_at(self.input, pos + 1) {
            Some(byte) if is_simple_escape(byte) => Ok(pos + 2),
            Some(b'u') => {
                let hex = self
                    .input
                    .get(pos + 2..pos + 6)
                    .ok_or_else(|| self.error(pos, "truncated \\u escape"))?;
                if !hex.iter().all(u8::is_ascii_hexdigit) {
                    return Err(self.error(pos, "invalid hex digits in \\u escape"));
                }
                Ok(pos + 6)
            }
            Some(_) => Err(self.error(pos, "invalid escape sequence")),
            None => Err(self.error(pos, "unterminated string")),
        }
    }

    /// Validate a number literal.
    ///
    /// The numeral ends at the first byte that cannot continue it; the
    /// enclosing container decides whether that byte is acceptable.
    pub fn validate_number(&self, pos: usize) -> Result<usize> {
        let mut idx = pos;
        if byte_at(self.input, idx) == Some(b'-') {
            idx += 1;
        }
        match byte_at(self.input, idx) {
            Some(b'0') => {
                idx += 1;
                if byte_at(self.input, idx).is_some_and(|b| b.is_ascii_digit()) {
                    return Err(self.error(idx, "leading zero in number"));
                }
            }
            Some(b'1'..=b'9') => idx = self.skip_digits(idx),
            _ => return Err(self.error(idx, "expected value")),
        }

        if byte_at(self.input, idx) == Some(b'.') {
            idx = self.require_digits(idx + 1, "expected digit after decimal point")?;
        }

        if matches!(byte_at(self.input, idx), Some(b'e' | b'E')) {
            idx += 1;
            if matches!(byte_at(self.input, idx), Some(b'+' | b'-')) {
                idx += 1;
            }
            idx = self.require_digits(idx, "expected digit in exponent")?;
        }

        if idx >= self.input.len() {
            return Err(self.error(idx, "unexpected end of input after number"));
        }
        Ok(idx)
    }

    fn skip_digits(&self, mut idx: usize) -> usize {
        while byte_at(self.input, idx).is_some_and(|b| b.is_ascii_digit()) {
            idx += 1;
        }
        idx
    }

    fn require_digits(&self, idx: usize, message: &str) -> Result<usize> {
        let end = self.skip_digits(idx);
        if end == idx {
            return Err(self.error(idx, message));
        }
        Ok(end)
    }

    /// Skip whitespace, failing if the input runs out.
    fn skip_ws(&self, pos: usize) -> Result<usize> {
        let pos = skip_whitespace(self.input, pos);
        if pos >= self.input.len() {
            return Err(self.error(pos, "unexpected end of input"));
        }
        Ok(pos)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> Error {
        Error::parse_at(self.input, offset, message)
    }
}
