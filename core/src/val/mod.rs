use std::fmt;
use std::sync::Arc;

use crate::error::{VmError, VmResult};
use crate::util::escape;

/// Runtime value held by a variable or the operand stack.
///
/// `Uninit` is the state of a freshly defined variable and is never produced by
/// an instruction; it is distinct from `Nil`, which is an ordinary value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Val {
    #[default]
    Uninit,
    Int(i64),
    Bool(bool),
    Str(Arc<str>),
    Nil,
}

/// Declared type of a literal or of a READ target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Bool,
    String,
    Nil,
}

impl ValueType {
    pub fn parse(s: &str) -> Option<ValueType> {
        match s {
            "int" => Some(ValueType::Int),
            "bool" => Some(ValueType::Bool),
            "string" => Some(ValueType::String),
            "nil" => Some(ValueType::Nil),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Nil => "nil",
        }
    }

    /// Builds the value of a source literal. String payloads are escape-decoded here, once.
    pub fn parse_literal(self, raw: &str) -> VmResult<Val> {
        match self {
            ValueType::Int => parse_int(raw)
                .map(Val::Int)
                .ok_or_else(|| VmError::structure(format!("invalid int literal '{raw}'"))),
            ValueType::Bool => match raw {
                "true" => Ok(Val::Bool(true)),
                "false" => Ok(Val::Bool(false)),
                _ => Err(VmError::structure(format!("invalid bool literal '{raw}'"))),
            },
            ValueType::String => escape::decode(raw).map(Val::from),
            ValueType::Nil => match raw {
                "nil" => Ok(Val::Nil),
                _ => Err(VmError::structure(format!("invalid nil literal '{raw}'"))),
            },
        }
    }

    /// Converts one line of program input. An int line that does not parse
    /// is a structure error and `bool` is true only for exactly `true`.
    pub fn parse_input(self, line: &str) -> VmResult<Val> {
        match self {
            ValueType::Int => parse_int(line.trim())
                .map(Val::Int)
                .ok_or_else(|| VmError::structure(format!("input line '{line}' is not an int"))),
            ValueType::Bool => Ok(Val::Bool(line == "true")),
            ValueType::String => Ok(Val::from(line)),
            ValueType::Nil => Ok(Val::Nil),
        }
    }

    /// Lenient form of [`ValueType::parse_input`]: unparsable ints become `nil`.
    pub fn coerce_input(self, line: &str) -> Val {
        match self {
            ValueType::Int => parse_int(line.trim()).map(Val::Int).unwrap_or(Val::Nil),
            ValueType::Bool => Val::Bool(line.trim().eq_ignore_ascii_case("true")),
            ValueType::String => Val::from(line),
            ValueType::Nil => Val::Nil,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok()
}

impl Val {
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Val::Uninit)
    }

    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Val::Uninit => None,
            Val::Int(_) => Some(ValueType::Int),
            Val::Bool(_) => Some(ValueType::Bool),
            Val::Str(_) => Some(ValueType::String),
            Val::Nil => Some(ValueType::Nil),
        }
    }

    /// Name reported by TYPE; empty for an uninitialized value.
    pub fn type_name(&self) -> &'static str {
        self.value_type().map(ValueType::name).unwrap_or("")
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Val::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Val::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Val::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Source-like form used by BREAK dumps, e.g. `int@5` or `string@a\032b`.
    pub fn debug_repr(&self) -> String {
        match self {
            Val::Uninit => "<uninitialized>".to_string(),
            Val::Int(i) => format!("int@{i}"),
            Val::Bool(b) => format!("bool@{b}"),
            Val::Str(s) => format!("string@{}", escape::encode(s)),
            Val::Nil => "nil@nil".to_string(),
        }
    }
}

/// Output form used by WRITE and DPRINT.
impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Uninit | Val::Nil => Ok(()),
            Val::Int(i) => f.write_str(itoa::Buffer::new().format(*i)),
            Val::Bool(true) => f.write_str("true"),
            Val::Bool(false) => f.write_str("false"),
            Val::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Val {
    fn from(value: i64) -> Self {
        Val::Int(value)
    }
}

impl From<bool> for Val {
    fn from(value: bool) -> Self {
        Val::Bool(value)
    }
}

impl From<&str> for Val {
    fn from(value: &str) -> Self {
        Val::Str(Arc::from(value))
    }
}

impl From<String> for Val {
    fn from(value: String) -> Self {
        Val::Str(Arc::from(value))
    }
}
