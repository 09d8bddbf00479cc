//! Execution engine
//!
//! A [`Vm`] walks a loaded program one instruction at a time, owning the
//! frames, the operand stack and the call stack. All I/O goes through a
//! [`VmContext`] so runs can be driven from files, stdin or memory.

mod config;
mod context;
mod exec;
mod frame;
mod io;
mod stack;
#[allow(clippy::module_inception)]
mod vm;

pub use config::{EofPolicy, ReadCoercion, VmConfig};
pub use context::VmContext;
pub use frame::{Frame, FrameStack, Variable};
pub use io::{InputSource, LineInput, VecInput};
pub use stack::{CallStack, OperandStack, StackSlot};
pub use vm::{ExecState, Vm};
