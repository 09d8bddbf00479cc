use core::cmp::Ordering;
use std::fmt::Display;

use crate::error::{VmError, VmResult};
use crate::val::Val;

pub(crate) fn err_types<T: Display, R>(l: &Val, op: T, r: &Val) -> VmResult<R> {
    Err(VmError::operand_type(format!(
        "invalid operand types for {op}: {} and {}",
        type_label(l),
        type_label(r)
    )))
}

fn type_label(v: &Val) -> &'static str {
    match v {
        Val::Uninit => "uninitialized",
        other => other.type_name(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

impl UnaryOp {
    pub(crate) fn eval_val(&self, val: &Val) -> VmResult<Val> {
        match self {
            UnaryOp::Not => match val {
                Val::Bool(b) => Ok(Val::Bool(!b)),
                _ => Err(VmError::operand_type(format!(
                    "invalid operand type for NOT: {}",
                    type_label(val)
                ))),
            },
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "NOT"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    IDiv,
    Lt,
    Gt,
    Eq,
    And,
    Or,
}

impl BinOp {
    pub(crate) fn is_arith(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::IDiv)
    }

    pub(crate) fn is_cmp(&self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Gt | BinOp::Lt)
    }

    fn arith(&self, l: &Val, r: &Val) -> VmResult<Val> {
        let (Val::Int(x), Val::Int(y)) = (l, r) else {
            return err_types(l, self, r);
        };
        let (x, y) = (*x, *y);
        let out = match self {
            BinOp::Add => x.checked_add(y),
            BinOp::Sub => x.checked_sub(y),
            BinOp::Mul => x.checked_mul(y),
            BinOp::IDiv => {
                if y == 0 {
                    return Err(VmError::operand_value("division by zero"));
                }
                floor_div(x, y)
            }
            _ => return err_types(l, self, r),
        };
        out.map(Val::Int)
            .ok_or_else(|| VmError::operand_value(format!("integer overflow in {x} {self} {y}")))
    }

    /// Equality with the IPPcode22 nil rule: `nil` compares against any type.
    pub(crate) fn equals(l: &Val, r: &Val) -> VmResult<bool> {
        match (l, r) {
            (Val::Nil, _) | (_, Val::Nil) => Ok(matches!((l, r), (Val::Nil, Val::Nil))),
            (Val::Int(a), Val::Int(b)) => Ok(a == b),
            (Val::Bool(a), Val::Bool(b)) => Ok(a == b),
            (Val::Str(a), Val::Str(b)) => Ok(a == b),
            _ => err_types(l, BinOp::Eq, r),
        }
    }

    fn order(&self, l: &Val, r: &Val) -> VmResult<Ordering> {
        match (l, r) {
            (Val::Int(a), Val::Int(b)) => Ok(a.cmp(b)),
            (Val::Bool(a), Val::Bool(b)) => Ok(a.cmp(b)),
            // Rust string ordering is code point order
            (Val::Str(a), Val::Str(b)) => Ok(a.as_ref().cmp(b.as_ref())),
            _ => err_types(l, self, r),
        }
    }

    pub(crate) fn cmp(&self, l: &Val, r: &Val) -> VmResult<bool> {
        match self {
            BinOp::Eq => BinOp::equals(l, r),
            BinOp::Lt => Ok(self.order(l, r)? == Ordering::Less),
            BinOp::Gt => Ok(self.order(l, r)? == Ordering::Greater),
            _ => err_types(l, self, r),
        }
    }

    fn logic(&self, l: &Val, r: &Val) -> VmResult<Val> {
        match (self, l, r) {
            (BinOp::And, Val::Bool(a), Val::Bool(b)) => Ok(Val::Bool(*a && *b)),
            (BinOp::Or, Val::Bool(a), Val::Bool(b)) => Ok(Val::Bool(*a || *b)),
            _ => err_types(l, self, r),
        }
    }

    pub(crate) fn eval_vals(&self, l_val: &Val, r_val: &Val) -> VmResult<Val> {
        if self.is_arith() {
            self.arith(l_val, r_val)
        } else if self.is_cmp() {
            Ok(Val::Bool(self.cmp(l_val, r_val)?))
        } else {
            self.logic(l_val, r_val)
        }
    }
}

/// Integer division rounding toward negative infinity.
fn floor_div(x: i64, y: i64) -> Option<i64> {
    let q = x.checked_div(y)?;
    if x % y != 0 && ((x < 0) != (y < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "ADD"),
            BinOp::Sub => write!(f, "SUB"),
            BinOp::Mul => write!(f, "MUL"),
            BinOp::IDiv => write!(f, "IDIV"),
            BinOp::Lt => write!(f, "LT"),
            BinOp::Gt => write!(f, "GT"),
            BinOp::Eq => write!(f, "EQ"),
            BinOp::And => write!(f, "AND"),
            BinOp::Or => write!(f, "OR"),
        }
    }
}
