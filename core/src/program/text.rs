//! Textual IPPcode22 front end.
//!
//! Turns source such as
//!
//! ```text
//! .IPPcode22
//! DEFVAR GF@x        # comment
//! MOVE GF@x int@5
//! WRITE GF@x
//! ```
//!
//! into raw instructions numbered in source order.

use crate::error::{ErrorKind, VmError, VmResult};

use super::instruction::{RawArg, RawInstruction};
use super::opcode::{ArgKind, Opcode};

pub const HEADER: &str = ".IPPcode22";

const IDENT_SPECIALS: &[char] = &['_', '-', '$', '&', '%', '*', '!', '?'];

pub fn parse_text(source: &str) -> VmResult<Vec<RawInstruction>> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, strip_comment(line).trim()))
        .filter(|(_, line)| !line.is_empty());

    match lines.next() {
        Some((_, header)) if header.eq_ignore_ascii_case(HEADER) => {}
        Some((line_no, other)) => {
            return Err(VmError::new(
                ErrorKind::Header,
                format!("line {line_no}: expected '{HEADER}' header, found '{other}'"),
            ));
        }
        None => return Err(VmError::new(ErrorKind::Header, format!("missing '{HEADER}' header"))),
    }

    let mut out = Vec::new();
    for (line_no, line) in lines {
        let order = out.len() as i64 + 1;
        out.push(parse_line(line_no, line, order)?);
    }
    Ok(out)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn syntax(line_no: usize, message: impl AsRef<str>) -> VmError {
    VmError::new(ErrorKind::Syntax, format!("line {line_no}: {}", message.as_ref()))
}

fn parse_line(line_no: usize, line: &str, order: i64) -> VmResult<RawInstruction> {
    let mut tokens = line.split_whitespace();
    let mnemonic = tokens.next().unwrap_or_default();
    let opcode = Opcode::parse(mnemonic).ok_or_else(|| {
        VmError::new(
            ErrorKind::UnknownOpcode,
            format!("line {line_no}: unknown opcode '{mnemonic}'"),
        )
    })?;

    let tokens: Vec<&str> = tokens.collect();
    if !opcode.accepts_arity(tokens.len()) {
        return Err(syntax(
            line_no,
            format!(
                "{opcode} expects {} operand(s), got {}",
                opcode.signature().len(),
                tokens.len()
            ),
        ));
    }

    let args = tokens
        .iter()
        .zip(opcode.signature())
        .map(|(token, kind)| parse_arg(line_no, token, *kind))
        .collect::<VmResult<Vec<_>>>()?;

    Ok(RawInstruction::new(order, opcode.name(), args))
}

fn parse_arg(line_no: usize, token: &str, kind: ArgKind) -> VmResult<RawArg> {
    match kind {
        ArgKind::Var => parse_var(line_no, token),
        ArgKind::Symb => parse_symb(line_no, token),
        ArgKind::Label => parse_label(line_no, token),
        ArgKind::SymbOrLabel if token.contains('@') => parse_symb(line_no, token),
        ArgKind::SymbOrLabel => parse_label(line_no, token),
        ArgKind::Type => match token {
            "int" | "bool" | "string" => Ok(RawArg::new("type", token)),
            _ => Err(syntax(line_no, format!("invalid type '{token}'"))),
        },
    }
}

fn is_ident(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || IDENT_SPECIALS.contains(&first) => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || IDENT_SPECIALS.contains(&c))
}

fn parse_var(line_no: usize, token: &str) -> VmResult<RawArg> {
    match token.split_once('@') {
        Some(("GF" | "LF" | "TF", name)) if is_ident(name) => Ok(RawArg::new("var", token)),
        _ => Err(syntax(line_no, format!("invalid variable '{token}'"))),
    }
}

fn parse_label(line_no: usize, token: &str) -> VmResult<RawArg> {
    if is_ident(token) {
        Ok(RawArg::new("label", token))
    } else {
        Err(syntax(line_no, format!("invalid label '{token}'")))
    }
}

fn parse_symb(line_no: usize, token: &str) -> VmResult<RawArg> {
    let Some((prefix, value)) = token.split_once('@') else {
        return Err(syntax(line_no, format!("invalid symbol '{token}'")));
    };
    let valid = match prefix {
        "GF" | "LF" | "TF" => return parse_var(line_no, token),
        "int" => is_int_literal(value),
        "bool" => matches!(value, "true" | "false"),
        "nil" => value == "nil",
        "string" => has_valid_escapes(value),
        _ => false,
    };
    if valid {
        Ok(RawArg::new(prefix, value))
    } else {
        Err(syntax(line_no, format!("invalid literal '{token}'")))
    }
}

fn is_int_literal(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn has_valid_escapes(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'\\' {
            let digits = bytes.get(idx + 1..idx + 4);
            match digits {
                Some(d) if d.iter().all(u8::is_ascii_digit) => idx += 4,
                _ => return false,
            }
        } else {
            idx += 1;
        }
    }
    true
}
