//! String instructions. Indices and lengths count Unicode scalar values, not bytes.

use crate::error::{VmError, VmResult};
use crate::val::Val;

fn expect_str<'a>(op: &str, v: &'a Val) -> VmResult<&'a str> {
    v.as_str()
        .ok_or_else(|| VmError::operand_type(format!("{op} expects a string, got {}", v.type_name())))
}

fn expect_int(op: &str, v: &Val) -> VmResult<i64> {
    v.as_int()
        .ok_or_else(|| VmError::operand_type(format!("{op} expects an int, got {}", v.type_name())))
}

fn char_at(op: &str, s: &str, index: i64) -> VmResult<char> {
    usize::try_from(index)
        .ok()
        .and_then(|idx| s.chars().nth(idx))
        .ok_or_else(|| VmError::string_op(format!("{op}: index {index} outside string of length {}", s.chars().count())))
}

pub(crate) fn int2char(code: &Val) -> VmResult<Val> {
    let code = expect_int("INT2CHAR", code)?;
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map(|c| Val::from(c.to_string()))
        .ok_or_else(|| VmError::string_op(format!("INT2CHAR: {code} is not a valid code point")))
}

pub(crate) fn stri2int(s: &Val, index: &Val) -> VmResult<Val> {
    let s = expect_str("STRI2INT", s)?;
    let index = expect_int("STRI2INT", index)?;
    let ch = char_at("STRI2INT", s, index)?;
    Ok(Val::Int(ch as i64))
}

pub(crate) fn concat(l: &Val, r: &Val) -> VmResult<Val> {
    let l = expect_str("CONCAT", l)?;
    let r = expect_str("CONCAT", r)?;
    let mut out = String::with_capacity(l.len() + r.len());
    out.push_str(l);
    out.push_str(r);
    Ok(Val::from(out))
}

pub(crate) fn strlen(s: &Val) -> VmResult<Val> {
    let s = expect_str("STRLEN", s)?;
    Ok(Val::Int(s.chars().count() as i64))
}

pub(crate) fn getchar(s: &Val, index: &Val) -> VmResult<Val> {
    let s = expect_str("GETCHAR", s)?;
    let index = expect_int("GETCHAR", index)?;
    let ch = char_at("GETCHAR", s, index)?;
    Ok(Val::from(ch.to_string()))
}

/// Returns `target` with the code point at `index` replaced by the first code point of `source`.
pub(crate) fn setchar(target: &Val, index: &Val, source: &Val) -> VmResult<Val> {
    let target = expect_str("SETCHAR", target)?;
    let index = expect_int("SETCHAR", index)?;
    let source = expect_str("SETCHAR", source)?;

    char_at("SETCHAR", target, index)?;
    let replacement = source
        .chars()
        .next()
        .ok_or_else(|| VmError::string_op("SETCHAR: replacement string is empty"))?;

    let idx = index as usize;
    let out: String = target
        .chars()
        .enumerate()
        .map(|(i, c)| if i == idx { replacement } else { c })
        .collect();
    Ok(Val::from(out))
}
