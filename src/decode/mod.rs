pub(crate) mod scanner;
pub(crate) mod validation;

use memchr::memchr;

use crate::constants::NUL;
use crate::tree::Document;
use crate::{Error, ParseOptions, Result};

use self::scanner::trim_whitespace;
use self::validation::Validator;

/// Validate `input` and wrap it in a lazily materialized document.
///
/// Error locations refer to the whitespace-trimmed buffer, which is the
/// buffer later returned by [`Document::raw`].
pub fn parse(input: &[u8], options: &ParseOptions) -> Result<Document> {
    if let Some(limit) = options.max_input_len {
        if input.len() > limit {
            return Err(Error::parse(format!(
                "input of {} bytes exceeds the {limit} byte limit",
                input.len()
            )));
        }
    }

    let mut body = input;
    if options.allow_trailing_nul {
        if let Some((&NUL, rest)) = body.split_last() {
            body = rest;
        }
    }
    if body.is_empty() {
        return Err(Error::parse("empty input"));
    }
    if let Some(offset) = memchr(NUL, body) {
        return Err(Error::parse_at(body, offset, "embedded NUL byte"));
    }

    let trimmed = trim_whitespace(body);
    if trimmed.is_empty() {
        return Err(Error::parse("input contains only whitespace"));
    }

    let text = std::str::from_utf8(trimmed)
        .map_err(|err| Error::parse_at(trimmed, err.valid_up_to(), "invalid UTF-8"))?;

    let mut validator = Validator::new(trimmed, options.max_depth);
    let kind = validator.validate_document()?;
    let value_count = validator.values();

    tracing::debug!(
        len = text.len(),
        values = value_count,
        kind = kind.as_str(),
        "parsed document"
    );

    let mut data = String::new();
    data.try_reserve_exact(text.len())
        .map_err(|err| Error::exhausted(format!("document buffer allocation failed: {err}")))?;
    data.push_str(text);
    Document::new(data.into_boxed_str(), kind, value_count, options.max_depth)
}
