use tracing::trace;

use crate::error::{ErrorKind, InstrLocation, VmError, VmResult};
use crate::program::Program;

use super::config::VmConfig;
use super::context::VmContext;
use super::frame::FrameStack;
use super::stack::{CallStack, OperandStack};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// Next instruction to execute, by 1-based order.
    Running(usize),
    Halted(i32),
    Failed(ErrorKind),
}

/// Outcome of one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    Next,
    Jump(usize),
    Halt(i32),
}

/// Executes a loaded [`Program`]. The program is shared and never mutated;
/// all run state lives here.
pub struct Vm<'p> {
    pub(super) program: &'p Program,
    pub(super) config: VmConfig,
    pub(super) frames: FrameStack,
    pub(super) stack: OperandStack,
    pub(super) calls: CallStack,
    state: ExecState,
    executed: u64,
}

impl<'p> Vm<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self::with_config(program, VmConfig::default())
    }

    pub fn with_config(program: &'p Program, config: VmConfig) -> Self {
        let state = if program.is_empty() {
            ExecState::Halted(0)
        } else {
            ExecState::Running(1)
        };
        Self {
            program,
            config,
            frames: FrameStack::new(),
            stack: OperandStack::new(),
            calls: CallStack::new(),
            state,
            executed: 0,
        }
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    /// Number of instructions that completed successfully.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    pub fn frames(&self) -> &FrameStack {
        &self.frames
    }

    pub fn operand_stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn call_depth(&self) -> usize {
        self.calls.depth()
    }

    /// Runs to completion and returns the exit code. Output is flushed on
    /// every path out, including failures.
    pub fn run(&mut self, ctx: &mut VmContext<'_>) -> VmResult<i32> {
        let outcome = self.run_inner(ctx);
        let flushed = ctx.flush();
        let code = outcome?;
        flushed?;
        Ok(code)
    }

    fn run_inner(&mut self, ctx: &mut VmContext<'_>) -> VmResult<i32> {
        loop {
            match self.step(ctx)? {
                ExecState::Running(_) => continue,
                ExecState::Halted(code) => return Ok(code),
                ExecState::Failed(kind) => {
                    return Err(VmError::new(kind, "execution already failed"));
                }
            }
        }
    }

    /// Executes a single instruction and returns the new state.
    pub fn step(&mut self, ctx: &mut VmContext<'_>) -> VmResult<ExecState> {
        let pc = match self.state {
            ExecState::Running(pc) => pc,
            other => return Ok(other),
        };

        let program = self.program;
        let Some(instr) = program.get(pc) else {
            self.state = ExecState::Halted(0);
            return Ok(self.state);
        };

        trace!(
            target: "ipp::vm::dispatch",
            pc,
            opcode = %instr.opcode,
            stack = self.stack.len(),
            "dispatch"
        );

        match self.execute(instr, pc, ctx) {
            Ok(flow) => {
                self.executed += 1;
                self.state = match flow {
                    Flow::Next => ExecState::Running(pc + 1),
                    Flow::Jump(target) => ExecState::Running(target),
                    Flow::Halt(code) => ExecState::Halted(code),
                };
                Ok(self.state)
            }
            Err(err) => {
                self.state = ExecState::Failed(err.kind);
                Err(err.at(InstrLocation {
                    order: instr.order,
                    opcode: instr.opcode,
                }))
            }
        }
    }
}
