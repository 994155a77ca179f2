pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Sentinel terminator accepted at the end of C-style inputs.
pub const NUL: u8 = b'\0';

#[inline]
pub fn is_json_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

#[inline]
pub fn is_simple_escape(byte: u8) -> bool {
    matches!(byte, b'\\' | b'"' | b'/' | b'b' | b'f' | b'n' | b'r' | b't')
}
