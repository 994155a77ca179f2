use crate::{Error, Result};

/// Decoded numeral: the double value plus its rounded integer projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberValue {
    pub double: f64,
    pub integer: i64,
}

impl NumberValue {
    pub fn from_f64(double: f64) -> Self {
        // `as` saturates at the i64 bounds and maps NaN to zero.
        Self {
            double,
            integer: double.round() as i64,
        }
    }
}

/// Decode a grammar-valid JSON numeral.
pub fn decode_number(text: &str) -> Result<NumberValue> {
    let double = text
        .parse::<f64>()
        .map_err(|err| Error::internal(format!("number '{text}' did not decode: {err}")))?;
    Ok(NumberValue::from_f64(double))
}

/// Render a double for display, preferring a plain integer when exact.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value as i64).to_string();
    }
    let mut buffer = ryu::Buffer::new();
    let raw = buffer.format_finite(value);
    if raw.contains('e') || raw.contains('E') {
        return expand_exponent(raw);
    }
    trim_number(raw.to_string())
}

fn expand_exponent(raw: &str) -> String {
    let (mantissa, exponent) = match raw.find(['e', 'E']) {
        Some(idx) => (&raw[..idx], &raw[idx + 1..]),
        None => (raw, "0"),
    };
    let exp: i32 = exponent.parse().unwrap_or(0);
    let negative = mantissa.starts_with('-');
    let mantissa = mantissa.trim_start_matches('-');

    let dot_pos = mantissa.find('.').unwrap_or(mantissa.len()) as i32;
    let digits: String = mantissa.chars().filter(|ch| *ch != '.').collect();
    let new_pos = dot_pos + exp;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if new_pos <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-new_pos) as usize));
        out.push_str(&digits);
    } else if new_pos as usize >= digits.len() {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', new_pos as usize - digits.len()));
    } else {
        let pos = new_pos as usize;
        out.push_str(&digits[..pos]);
        out.push('.');
        out.push_str(&digits[pos..]);
    }
    trim_number(out)
}

fn trim_number(mut value: String) -> String {
    if let Some(dot) = value.find('.') {
        let mut end = value.len();
        while end > dot + 1 && value.as_bytes()[end - 1] == b'0' {
            end -= 1;
        }
        value.truncate(end);
        if value.ends_with('.') {
            value.pop();
        }
    }
    value
}
