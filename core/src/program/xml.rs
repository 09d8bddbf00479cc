//! XML encoding of an IPPcode22 program, the form the IPPcode22 parser emits.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <program language="IPPcode22">
//!   <instruction order="1" opcode="DEFVAR">
//!     <arg1 type="var">GF@x</arg1>
//!   </instruction>
//! </program>
//! ```
//!
//! Argument elements are matched by their number, not their position, so
//! `<arg2>` may precede `<arg1>`. Text and comment nodes between elements
//! are ignored.

use roxmltree::{Document, Node};

use crate::error::{ErrorKind, VmError, VmResult};

use super::LANGUAGE;
use super::instruction::{RawArg, RawInstruction};

const MAX_ARGS: usize = 3;

/// Parses an XML program into raw instructions for [`crate::program::load`].
///
/// Malformed XML is error 31; a well-formed document with the wrong
/// structure is error 32.
pub fn parse_xml(text: &str) -> VmResult<Vec<RawInstruction>> {
    let doc = Document::parse(text).map_err(|err| {
        VmError::new(ErrorKind::MalformedSource, format!("malformed XML: {err}"))
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "program" {
        return Err(VmError::structure(format!(
            "root element must be <program>, found <{}>",
            root.tag_name().name()
        )));
    }
    match root.attribute("language") {
        Some(lang) if lang == LANGUAGE => {}
        Some(lang) => {
            return Err(VmError::structure(format!(
                "program language must be '{LANGUAGE}', found '{lang}'"
            )));
        }
        None => return Err(VmError::structure("<program> has no language attribute")),
    }

    root.children()
        .filter(Node::is_element)
        .map(parse_instruction)
        .collect()
}

fn parse_instruction(node: Node<'_, '_>) -> VmResult<RawInstruction> {
    let tag = node.tag_name().name();
    if tag != "instruction" {
        return Err(VmError::structure(format!("unexpected element <{tag}> in <program>")));
    }

    let order_text = required_attr(node, "order")?;
    let order = order_text
        .trim()
        .parse::<i64>()
        .map_err(|_| VmError::structure(format!("instruction order '{order_text}' is not a number")))?;
    let opcode = required_attr(node, "opcode")?.trim();

    let mut slots: [Option<RawArg>; MAX_ARGS] = Default::default();
    for child in node.children().filter(Node::is_element) {
        let idx = arg_index(child.tag_name().name()).ok_or_else(|| {
            VmError::structure(format!(
                "instruction {order}: unexpected element <{}>",
                child.tag_name().name()
            ))
        })?;
        if slots[idx].is_some() {
            return Err(VmError::structure(format!(
                "instruction {order}: duplicate <arg{}>",
                idx + 1
            )));
        }
        slots[idx] = Some(parse_arg(child, order)?);
    }

    let count = slots.iter().filter(|slot| slot.is_some()).count();
    if slots[..count].iter().any(Option::is_none) {
        return Err(VmError::structure(format!(
            "instruction {order}: arguments must be numbered from arg1 without gaps"
        )));
    }
    let args = slots.into_iter().flatten().collect();
    Ok(RawInstruction::new(order, opcode, args))
}

fn parse_arg(node: Node<'_, '_>, order: i64) -> VmResult<RawArg> {
    let kind = required_attr(node, "type")?.trim();
    if node.children().any(|child| child.is_element()) {
        return Err(VmError::structure(format!(
            "instruction {order}: <{}> must contain only text",
            node.tag_name().name()
        )));
    }
    let text = node.text().unwrap_or("");
    // String literals keep their whitespace; every other kind is a token.
    let text = if kind == "string" { text } else { text.trim() };
    Ok(RawArg::new(kind, text))
}

/// `arg1` to `arg3` map to slots 0 to 2.
fn arg_index(tag: &str) -> Option<usize> {
    let n: usize = tag.strip_prefix("arg")?.parse().ok()?;
    (1..=MAX_ARGS).contains(&n).then(|| n - 1)
}

fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> VmResult<&'a str> {
    node.attribute(name).ok_or_else(|| {
        VmError::structure(format!(
            "<{}> is missing the '{name}' attribute",
            node.tag_name().name()
        ))
    })
}
