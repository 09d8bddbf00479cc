use std::fmt;

use crate::program::Opcode;

/// Failure classes of the interpreter. Each kind maps to one fixed process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArguments,
    InputFile,
    OutputFile,
    Header,
    UnknownOpcode,
    Syntax,
    MalformedSource,
    Structure,
    Semantic,
    OperandType,
    UndefinedVariable,
    UndefinedFrame,
    MissingValue,
    OperandValue,
    StringOperation,
    Internal,
}

impl ErrorKind {
    pub const fn exit_code(self) -> i32 {
        match self {
            ErrorKind::InvalidArguments => 10,
            ErrorKind::InputFile => 11,
            ErrorKind::OutputFile => 12,
            ErrorKind::Header => 21,
            ErrorKind::UnknownOpcode => 22,
            ErrorKind::Syntax => 23,
            ErrorKind::MalformedSource => 31,
            ErrorKind::Structure => 32,
            ErrorKind::Semantic => 52,
            ErrorKind::OperandType => 53,
            ErrorKind::UndefinedVariable => 54,
            ErrorKind::UndefinedFrame => 55,
            ErrorKind::MissingValue => 56,
            ErrorKind::OperandValue => 57,
            ErrorKind::StringOperation => 58,
            ErrorKind::Internal => 99,
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            ErrorKind::InvalidArguments => "invalid arguments",
            ErrorKind::InputFile => "input file error",
            ErrorKind::OutputFile => "output file error",
            ErrorKind::Header => "missing or wrong header",
            ErrorKind::UnknownOpcode => "unknown opcode",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::MalformedSource => "malformed source",
            ErrorKind::Structure => "unexpected structure",
            ErrorKind::Semantic => "semantic error",
            ErrorKind::OperandType => "wrong operand type",
            ErrorKind::UndefinedVariable => "non-existent variable",
            ErrorKind::UndefinedFrame => "non-existent frame",
            ErrorKind::MissingValue => "missing value",
            ErrorKind::OperandValue => "wrong operand value",
            ErrorKind::StringOperation => "string operation error",
            ErrorKind::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// The instruction an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrLocation {
    pub order: usize,
    pub opcode: Opcode,
}

impl fmt::Display for InstrLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instruction {} ({})", self.order, self.opcode)
    }
}

/// Interpreter error carrying its kind and, once execution started, the failing instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct VmError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<InstrLocation>,
}

pub type VmResult<T> = Result<T, VmError>;

impl VmError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: InstrLocation) -> Self {
        if self.location.is_none() {
            self.location = Some(location);
        }
        self
    }

    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    pub fn structure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structure, message)
    }

    pub fn semantic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Semantic, message)
    }

    pub fn operand_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OperandType, message)
    }

    pub fn missing_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingValue, message)
    }

    pub fn operand_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OperandValue, message)
    }

    pub fn string_op(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StringOperation, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}: {} at {}", self.kind, self.message, loc),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for VmError {}
