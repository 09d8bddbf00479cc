//! JSON encoding of an IPPcode22 program.
//!
//! The document has the same shape as the XML form handled by
//! [`super::xml`]: a `language` header plus a list of instructions, each
//! with an `order`, an `opcode` and positional `args`.
//!
//! ```json
//! {
//!   "language": "IPPcode22",
//!   "instructions": [
//!     { "order": 1, "opcode": "DEFVAR", "args": [{ "type": "var", "value": "GF@x" }] }
//!   ]
//! }
//! ```

use serde::Deserialize;
use serde_json::error::Category;

use crate::error::{ErrorKind, VmError, VmResult};

use super::LANGUAGE;
use super::instruction::{RawArg, RawInstruction};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDocument {
    pub language: String,
    #[serde(default)]
    pub instructions: Vec<SourceInstruction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceInstruction {
    pub order: SourceOrder,
    pub opcode: String,
    #[serde(default)]
    pub args: Vec<SourceArg>,
}

/// XML carries orders as attribute text, so both numbers and numeric strings are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceOrder {
    Number(i64),
    Text(String),
}

impl SourceOrder {
    fn value(&self) -> VmResult<i64> {
        match self {
            SourceOrder::Number(n) => Ok(*n),
            SourceOrder::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| VmError::structure(format!("instruction order '{text}' is not a number"))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceArg {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
}

/// Parses a JSON program into raw instructions for [`crate::program::load`].
pub fn parse_json(text: &str) -> VmResult<Vec<RawInstruction>> {
    let doc: SourceDocument = serde_json::from_str(text).map_err(|err| {
        let kind = match err.classify() {
            Category::Syntax | Category::Eof => ErrorKind::MalformedSource,
            Category::Data => ErrorKind::Structure,
            Category::Io => ErrorKind::InputFile,
        };
        VmError::new(kind, format!("invalid program document: {err}"))
    })?;
    doc.into_raw()
}

impl SourceDocument {
    pub fn into_raw(self) -> VmResult<Vec<RawInstruction>> {
        if self.language != LANGUAGE {
            return Err(VmError::structure(format!(
                "program language must be '{LANGUAGE}', found '{}'",
                self.language
            )));
        }
        self.instructions
            .into_iter()
            .map(|ins| {
                let order = ins.order.value()?;
                let args = ins.args.into_iter().map(|arg| RawArg::new(arg.kind, arg.value)).collect();
                Ok(RawInstruction::new(order, ins.opcode, args))
            })
            .collect()
    }
}
