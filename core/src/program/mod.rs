//! Program representation and loading.
//!
//! Front ends (`xml`, `text`, `source`) produce [`RawInstruction`]s; [`load`] validates
//! them into an immutable [`Program`] with a resolved [`LabelTable`].

mod instruction;
mod loader;
mod opcode;
pub mod source;
pub mod text;
pub mod xml;

pub use instruction::{FrameTag, Instruction, Operand, RawArg, RawInstruction, VarRef};
pub use loader::{LabelTable, Program, load};
pub use opcode::{ArgKind, Opcode};

use crate::error::VmResult;

/// Value of the `language` header in structured program documents.
pub const LANGUAGE: &str = "IPPcode22";

/// Encoding of a program source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Xml,
    Text,
    Json,
}

impl SourceFormat {
    /// XML starts with `<` and JSON with `{`; anything else is textual IPPcode22.
    pub fn detect(source: &str) -> SourceFormat {
        match source.trim_start().chars().next() {
            Some('<') => SourceFormat::Xml,
            Some('{') => SourceFormat::Json,
            _ => SourceFormat::Text,
        }
    }
}

/// Parses `source` in the given format and loads it.
pub fn load_source(source: &str, format: SourceFormat) -> VmResult<Program> {
    let raw = match format {
        SourceFormat::Xml => xml::parse_xml(source)?,
        SourceFormat::Text => text::parse_text(source)?,
        SourceFormat::Json => source::parse_json(source)?,
    };
    load(raw)
}
