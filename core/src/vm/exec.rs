//! Instruction handlers. Every handler reads and validates all of its
//! operands before it mutates anything.

use crate::error::{ErrorKind, VmError, VmResult};
use crate::op::string::{concat, getchar, int2char, setchar, stri2int, strlen};
use crate::op::{BinOp, UnaryOp};
use crate::program::{Instruction, Opcode, Operand, VarRef};
use crate::val::{Val, ValueType};

use super::config::{EofPolicy, ReadCoercion};
use super::context::VmContext;
use super::vm::{Flow, Vm};

fn operand(instr: &Instruction, idx: usize) -> VmResult<&Operand> {
    instr.operands.get(idx).ok_or_else(|| {
        VmError::internal(format!("{} is missing operand {}", instr.opcode, idx + 1))
    })
}

impl Vm<'_> {
    /// Value of a symbol operand. Uninitialized variables are a missing value.
    fn read(&self, op: &Operand) -> VmResult<Val> {
        let val = self.read_any(op)?;
        if !val.is_initialized() {
            return Err(VmError::missing_value(format!("read of uninitialized variable {op}")));
        }
        Ok(val)
    }

    /// Like [`Vm::read`] but lets uninitialized values through (TYPE only).
    fn read_any(&self, op: &Operand) -> VmResult<Val> {
        match op {
            Operand::Var(var) => Ok(self.frames.lookup(var)?.value.clone()),
            Operand::Literal(val) => Ok(val.clone()),
            other => Err(VmError::internal(format!("operand '{other}' is not a symbol"))),
        }
    }

    /// Checks that a destination variable exists; its value may be uninitialized.
    fn dest<'i>(&self, op: &'i Operand) -> VmResult<&'i VarRef> {
        let var = var_ref(op)?;
        self.frames.lookup(var)?;
        Ok(var)
    }

    fn assign(&mut self, var: &VarRef, val: Val) -> VmResult<()> {
        self.frames.lookup_mut(var)?.value = val;
        Ok(())
    }

    fn label_target(&self, op: &Operand) -> VmResult<usize> {
        match op {
            Operand::Label(name) => self.program.labels().resolve(name),
            other => Err(VmError::internal(format!("operand '{other}' is not a label"))),
        }
    }

    pub(super) fn execute(
        &mut self,
        instr: &Instruction,
        pc: usize,
        ctx: &mut VmContext<'_>,
    ) -> VmResult<Flow> {
        let arg = |idx: usize| operand(instr, idx);

        match instr.opcode {
            // frames and variables
            Opcode::Move => {
                let dst = self.dest(arg(0)?)?;
                let val = self.read(arg(1)?)?;
                self.assign(dst, val)?;
            }
            Opcode::CreateFrame => self.frames.create_temporary(),
            Opcode::PushFrame => self.frames.push_temporary()?,
            Opcode::PopFrame => self.frames.pop_local()?,
            Opcode::DefVar => {
                let var = var_ref(arg(0)?)?;
                self.frames.define(var)?;
            }

            // calls
            Opcode::Call => {
                let target = self.label_target(arg(0)?)?;
                self.calls.push(pc + 1);
                return Ok(Flow::Jump(target));
            }
            Opcode::Return => return Ok(Flow::Jump(self.calls.pop()?)),

            // operand stack
            Opcode::PushS => match arg(0)? {
                Operand::Label(name) => {
                    self.program.labels().resolve(name)?;
                    self.stack.push_label(name.clone());
                }
                other => {
                    let val = self.read(other)?;
                    self.stack.push(val);
                }
            },
            Opcode::PopS => {
                let dst = self.dest(arg(0)?)?;
                let val = self.stack.pop()?;
                self.assign(dst, val)?;
            }
            Opcode::ClearS => self.stack.clear(),

            // arithmetic, relational, logic
            Opcode::Add => self.binary(instr, BinOp::Add)?,
            Opcode::Sub => self.binary(instr, BinOp::Sub)?,
            Opcode::Mul => self.binary(instr, BinOp::Mul)?,
            Opcode::IDiv => self.binary(instr, BinOp::IDiv)?,
            Opcode::Lt => self.binary(instr, BinOp::Lt)?,
            Opcode::Gt => self.binary(instr, BinOp::Gt)?,
            Opcode::Eq => self.binary(instr, BinOp::Eq)?,
            Opcode::And => self.binary(instr, BinOp::And)?,
            Opcode::Or => self.binary(instr, BinOp::Or)?,
            Opcode::AddS => self.binary_stack(BinOp::Add)?,
            Opcode::SubS => self.binary_stack(BinOp::Sub)?,
            Opcode::MulS => self.binary_stack(BinOp::Mul)?,
            Opcode::IDivS => self.binary_stack(BinOp::IDiv)?,
            Opcode::LtS => self.binary_stack(BinOp::Lt)?,
            Opcode::GtS => self.binary_stack(BinOp::Gt)?,
            Opcode::EqS => self.binary_stack(BinOp::Eq)?,
            Opcode::AndS => self.binary_stack(BinOp::And)?,
            Opcode::OrS => self.binary_stack(BinOp::Or)?,
            Opcode::Not => {
                let dst = self.dest(arg(0)?)?;
                let val = UnaryOp::Not.eval_val(&self.read(arg(1)?)?)?;
                self.assign(dst, val)?;
            }
            Opcode::NotS => {
                let val = UnaryOp::Not.eval_val(self.stack.peek(0)?)?;
                self.stack.replace_top(1, val);
            }

            // strings
            Opcode::Int2Char => {
                let dst = self.dest(arg(0)?)?;
                let val = int2char(&self.read(arg(1)?)?)?;
                self.assign(dst, val)?;
            }
            Opcode::Int2CharS => {
                let val = int2char(self.stack.peek(0)?)?;
                self.stack.replace_top(1, val);
            }
            Opcode::Stri2Int => {
                let dst = self.dest(arg(0)?)?;
                let val = stri2int(&self.read(arg(1)?)?, &self.read(arg(2)?)?)?;
                self.assign(dst, val)?;
            }
            Opcode::Stri2IntS => {
                let (s, index) = self.stack.peek_pair()?;
                let val = stri2int(s, index)?;
                self.stack.replace_top(2, val);
            }
            Opcode::Concat => {
                let dst = self.dest(arg(0)?)?;
                let val = concat(&self.read(arg(1)?)?, &self.read(arg(2)?)?)?;
                self.assign(dst, val)?;
            }
            Opcode::StrLen => {
                let dst = self.dest(arg(0)?)?;
                let val = strlen(&self.read(arg(1)?)?)?;
                self.assign(dst, val)?;
            }
            Opcode::GetChar => {
                let dst = self.dest(arg(0)?)?;
                let val = getchar(&self.read(arg(1)?)?, &self.read(arg(2)?)?)?;
                self.assign(dst, val)?;
            }
            Opcode::SetChar => {
                let target = arg(0)?;
                let dst = self.dest(target)?;
                let current = self.read(target)?;
                let val = setchar(&current, &self.read(arg(1)?)?, &self.read(arg(2)?)?)?;
                self.assign(dst, val)?;
            }
            Opcode::Type => {
                let dst = self.dest(arg(0)?)?;
                let val = self.read_any(arg(1)?)?;
                self.assign(dst, Val::from(val.type_name()))?;
            }

            // I/O
            Opcode::Read => {
                let dst = self.dest(arg(0)?)?;
                let ty = type_operand(arg(1)?)?;
                let val = self.read_input(ty, ctx)?;
                self.assign(dst, val)?;
            }
            Opcode::Write => {
                let val = self.read(arg(0)?)?;
                ctx.write_value(&val)?;
            }
            Opcode::DPrint => {
                let val = self.read(arg(0)?)?;
                ctx.write_diag(format_args!("{val}\n"))?;
            }
            Opcode::Break => {
                let frames = &self.frames;
                let executed = self.executed();
                ctx.with_stderr(|out| {
                    writeln!(out, "BREAK at instruction {pc}, {executed} instruction(s) executed")?;
                    frames.dump(out)
                })?;
            }

            // control flow
            Opcode::Label => {}
            Opcode::Jump => return Ok(Flow::Jump(self.label_target(arg(0)?)?)),
            Opcode::JumpIfEq | Opcode::JumpIfNeq => {
                let target = self.label_target(arg(0)?)?;
                let equal = BinOp::equals(&self.read(arg(1)?)?, &self.read(arg(2)?)?)?;
                if equal == (instr.opcode == Opcode::JumpIfEq) {
                    return Ok(Flow::Jump(target));
                }
            }
            Opcode::JumpIfEqS | Opcode::JumpIfNeqS => {
                let (l, r) = self.stack.peek_pair()?;
                let equal = BinOp::equals(l, r)?;
                let (target, consumed) = match instr.operands.first() {
                    Some(op) => (self.label_target(op)?, 2),
                    None => (self.program.labels().resolve(self.stack.peek_label(2)?)?, 3),
                };
                self.stack.truncate_top(consumed);
                if equal == (instr.opcode == Opcode::JumpIfEqS) {
                    return Ok(Flow::Jump(target));
                }
            }
            Opcode::Exit => {
                let code = match self.read(arg(0)?)? {
                    Val::Int(code @ 0..=49) => code as i32,
                    Val::Int(code) => {
                        return Err(VmError::operand_value(format!("exit code {code} is outside 0..=49")));
                    }
                    other => {
                        return Err(VmError::operand_type(format!(
                            "EXIT expects an int, got {}",
                            other.type_name()
                        )));
                    }
                };
                return Ok(Flow::Halt(code));
            }
        }

        Ok(Flow::Next)
    }

    fn binary(&mut self, instr: &Instruction, op: BinOp) -> VmResult<()> {
        let dst = self.dest(operand(instr, 0)?)?;
        let l = self.read(operand(instr, 1)?)?;
        let r = self.read(operand(instr, 2)?)?;
        let val = op.eval_vals(&l, &r)?;
        self.assign(dst, val)
    }

    fn binary_stack(&mut self, op: BinOp) -> VmResult<()> {
        let (l, r) = self.stack.peek_pair()?;
        let val = op.eval_vals(l, r)?;
        self.stack.replace_top(2, val);
        Ok(())
    }

    fn read_input(&self, ty: ValueType, ctx: &mut VmContext<'_>) -> VmResult<Val> {
        match ctx.read_line()? {
            Some(line) => match self.config.read_coercion {
                ReadCoercion::Strict => ty.parse_input(&line),
                ReadCoercion::Lenient => Ok(ty.coerce_input(&line)),
            },
            None => match self.config.eof_policy {
                EofPolicy::Nil => Ok(Val::Nil),
                EofPolicy::Error => Err(VmError::new(
                    ErrorKind::InputFile,
                    "READ past the end of input",
                )),
            },
        }
    }
}

fn var_ref(op: &Operand) -> VmResult<&VarRef> {
    match op {
        Operand::Var(var) => Ok(var),
        other => Err(VmError::internal(format!("operand '{other}' is not a variable"))),
    }
}

fn type_operand(op: &Operand) -> VmResult<ValueType> {
    match op {
        Operand::Type(ty) => Ok(*ty),
        other => Err(VmError::internal(format!("operand '{other}' is not a type"))),
    }
}
