use std::fmt;
use std::sync::Arc;

use crate::error::{ErrorKind, VmError, VmResult};
use crate::val::{Val, ValueType};

use super::opcode::Opcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTag {
    Global,
    Local,
    Temporary,
}

impl FrameTag {
    pub fn parse(s: &str) -> Option<FrameTag> {
        match s {
            "GF" => Some(FrameTag::Global),
            "LF" => Some(FrameTag::Local),
            "TF" => Some(FrameTag::Temporary),
            _ => None,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            FrameTag::Global => "GF",
            FrameTag::Local => "LF",
            FrameTag::Temporary => "TF",
        }
    }
}

/// `FRAME@name` reference to a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarRef {
    pub frame: FrameTag,
    pub name: Arc<str>,
}

impl VarRef {
    /// Splits `GF@x` at the first `@`. An unknown frame prefix is a frame error.
    pub fn parse(text: &str) -> VmResult<VarRef> {
        let (prefix, name) = text
            .split_once('@')
            .ok_or_else(|| VmError::structure(format!("variable '{text}' is missing a frame prefix")))?;
        let frame = FrameTag::parse(prefix)
            .ok_or_else(|| VmError::new(ErrorKind::UndefinedFrame, format!("unknown frame '{prefix}' in '{text}'")))?;
        if name.is_empty() {
            return Err(VmError::structure(format!("variable '{text}' has an empty name")));
        }
        Ok(VarRef {
            frame,
            name: Arc::from(name),
        })
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.frame.prefix(), self.name)
    }
}

/// Materialized operand. Literals are already decoded values.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Var(VarRef),
    Literal(Val),
    Label(Arc<str>),
    Type(ValueType),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(var) => write!(f, "{var}"),
            Operand::Literal(val) => f.write_str(&val.debug_repr()),
            Operand::Label(name) => f.write_str(name),
            Operand::Type(ty) => write!(f, "{ty}"),
        }
    }
}

/// A loaded instruction; `order` is its final 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub order: usize,
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
}

/// Operand as delivered by a front end, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArg {
    /// `var`, `label`, `type`, `int`, `bool`, `string` or `nil`.
    pub kind: String,
    pub text: String,
}

impl RawArg {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }
}

/// Instruction as delivered by a front end: unordered, unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInstruction {
    pub order: i64,
    pub opcode: String,
    pub args: Vec<RawArg>,
}

impl RawInstruction {
    pub fn new(order: i64, opcode: impl Into<String>, args: Vec<RawArg>) -> Self {
        Self {
            order,
            opcode: opcode.into(),
            args,
        }
    }
}
