use crate::constants::is_json_whitespace;

/// Advance `pos` past any run of JSON whitespace.
#[inline]
pub(crate) fn skip_whitespace(input: &[u8], mut pos: usize) -> usize {
    while let Some(&byte) = input.get(pos) {
        if !is_json_whitespace(byte) {
            break;
        }
        pos += 1;
    }
    pos
}

/// Strip JSON whitespace from both ends.
pub(crate) fn trim_whitespace(input: &[u8]) -> &[u8] {
    let start = skip_whitespace(input, 0);
    let mut end = input.len();
    while end > start && is_json_whitespace(input[end - 1]) {
        end -= 1;
    }
    &input[start..end]
}

#[inline]
pub(crate) fn byte_at(input: &[u8], pos: usize) -> Option<u8> {
    input.get(pos).copied()
}
