use std::sync::Arc;

use crate::error::{VmError, VmResult};
use crate::val::Val;

/// Entry of the operand stack. Labels only appear when PUSHS feeds a stack jump.
#[derive(Debug, Clone, PartialEq)]
pub enum StackSlot {
    Value(Val),
    Label(Arc<str>),
}

#[derive(Debug, Clone, Default)]
pub struct OperandStack {
    slots: Vec<StackSlot>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, val: Val) {
        self.slots.push(StackSlot::Value(val));
    }

    pub fn push_label(&mut self, name: Arc<str>) {
        self.slots.push(StackSlot::Label(name));
    }

    pub fn pop(&mut self) -> VmResult<Val> {
        let val = self.peek(0)?.clone();
        self.slots.pop();
        Ok(val)
    }

    fn slot(&self, depth: usize) -> VmResult<&StackSlot> {
        self.slots
            .len()
            .checked_sub(depth + 1)
            .and_then(|idx| self.slots.get(idx))
            .ok_or_else(|| VmError::missing_value("operand stack is too shallow"))
    }

    /// Value `depth` slots below the top, left in place.
    pub fn peek(&self, depth: usize) -> VmResult<&Val> {
        match self.slot(depth)? {
            StackSlot::Value(val) => Ok(val),
            StackSlot::Label(name) => Err(VmError::operand_type(format!(
                "expected a value on the operand stack, found label '{name}'"
            ))),
        }
    }

    pub fn peek_label(&self, depth: usize) -> VmResult<&Arc<str>> {
        match self.slot(depth)? {
            StackSlot::Label(name) => Ok(name),
            StackSlot::Value(val) => Err(VmError::operand_type(format!(
                "expected a label on the operand stack, found {}",
                val.debug_repr()
            ))),
        }
    }

    /// `(first, second)` where `second` is on top. Nothing is removed.
    pub fn peek_pair(&self) -> VmResult<(&Val, &Val)> {
        let second = self.peek(0)?;
        let first = self.peek(1)?;
        Ok((first, second))
    }

    /// Drops the top `count` slots.
    pub fn truncate_top(&mut self, count: usize) {
        let keep = self.slots.len().saturating_sub(count);
        self.slots.truncate(keep);
    }

    /// Replaces the top `count` slots with `val`.
    pub fn replace_top(&mut self, count: usize, val: Val) {
        self.truncate_top(count);
        self.push(val);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Return addresses pushed by CALL.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    returns: Vec<usize>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resume_pc: usize) {
        self.returns.push(resume_pc);
    }

    pub fn pop(&mut self) -> VmResult<usize> {
        self.returns
            .pop()
            .ok_or_else(|| VmError::missing_value("RETURN with an empty call stack"))
    }

    pub fn depth(&self) -> usize {
        self.returns.len()
    }
}
