//! `\ddd` escape notation used by IPPcode22 string literals.
//!
//! A backslash is always followed by exactly three decimal digits naming a
//! code point in `0..=255`. Everything else is taken verbatim.

use crate::error::{VmError, VmResult};

const ESCAPE_DIGITS: usize = 3;
const MAX_ESCAPE: u32 = 255;

/// Decodes every `\ddd` sequence in `raw`.
pub fn decode(raw: &str) -> VmResult<String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let mut code = 0u32;
        for _ in 0..ESCAPE_DIGITS {
            let digit = chars
                .next()
                .ok_or_else(|| VmError::string_op(format!("truncated escape sequence in '{raw}'")))?;
            let value = digit
                .to_digit(10)
                .ok_or_else(|| VmError::string_op(format!("escape must be three decimal digits in '{raw}'")))?;
            code = code * 10 + value;
        }

        if code > MAX_ESCAPE {
            return Err(VmError::string_op(format!("escape \\{code:03} is outside 0..=255")));
        }
        // 0..=255 is always a valid scalar value
        match char::from_u32(code) {
            Some(decoded) => out.push(decoded),
            None => return Err(VmError::internal(format!("escape \\{code:03} is not a scalar value"))),
        }
    }

    Ok(out)
}

/// Inverse of [`decode`] for diagnostics: control chars, whitespace, `#` and `\` are escaped.
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let code = ch as u32;
        if code <= 32 || ch == '#' || ch == '\\' {
            out.push('\\');
            out.push_str(&format!("{code:03}"));
        } else {
            out.push(ch);
        }
    }
    out
}
