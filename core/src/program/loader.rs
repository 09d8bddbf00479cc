use std::sync::Arc;

use tracing::debug;

use crate::error::{VmError, VmResult};
use crate::util::fast_map::{NameMap, fast_hash_set_with_capacity};
use crate::val::ValueType;

use super::instruction::{Instruction, Operand, RawArg, RawInstruction, VarRef};
use super::opcode::{ArgKind, Opcode};

/// Label name to the order of its LABEL instruction.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    targets: NameMap<usize>,
}

impl LabelTable {
    fn insert(&mut self, name: Arc<str>, order: usize) -> VmResult<()> {
        if self.targets.contains_key(&name) {
            return Err(VmError::semantic(format!("label '{name}' is defined more than once")));
        }
        self.targets.insert(name, order);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.targets.get(name).copied()
    }

    /// Like [`LabelTable::get`], but an unknown label is a semantic error.
    pub fn resolve(&self, name: &str) -> VmResult<usize> {
        self.get(name)
            .ok_or_else(|| VmError::semantic(format!("undefined label '{name}'")))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A loaded program: instructions numbered `1..=N` plus resolved labels. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
    labels: LabelTable,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Instruction by its 1-based order.
    pub fn get(&self, order: usize) -> Option<&Instruction> {
        order.checked_sub(1).and_then(|idx| self.instructions.get(idx))
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }
}

/// Validates, sorts and renumbers raw instructions, then resolves labels.
///
/// Jump targets always refer to the renumbered order, never to the order the
/// front end supplied.
pub fn load(raw: Vec<RawInstruction>) -> VmResult<Program> {
    let mut staged: Vec<(i64, Opcode, Vec<RawArg>)> = Vec::with_capacity(raw.len());
    let mut seen_orders = fast_hash_set_with_capacity::<i64>(raw.len());

    for ins in raw {
        let opcode = Opcode::parse(&ins.opcode)
            .ok_or_else(|| VmError::structure(format!("unknown opcode '{}'", ins.opcode)))?;
        if ins.order < 1 {
            return Err(VmError::structure(format!("invalid instruction order {}", ins.order)));
        }
        if !seen_orders.insert(ins.order) {
            return Err(VmError::structure(format!("duplicate instruction order {}", ins.order)));
        }
        staged.push((ins.order, opcode, ins.args));
    }

    staged.sort_by_key(|(order, _, _)| *order);

    let mut instructions = Vec::with_capacity(staged.len());
    for (idx, (_, opcode, args)) in staged.into_iter().enumerate() {
        let order = idx + 1;
        if !opcode.accepts_arity(args.len()) {
            return Err(VmError::structure(format!(
                "{opcode} expects {} operand(s), got {}",
                opcode.signature().len(),
                args.len()
            )));
        }
        let operands = args
            .iter()
            .zip(opcode.signature())
            .map(|(arg, kind)| materialize(opcode, arg, *kind))
            .collect::<VmResult<Vec<_>>>()?;
        instructions.push(Instruction {
            order,
            opcode,
            operands,
        });
    }

    let mut labels = LabelTable::default();
    for ins in &instructions {
        if ins.opcode == Opcode::Label
            && let Some(Operand::Label(name)) = ins.operands.first()
        {
            labels.insert(name.clone(), ins.order)?;
        }
    }

    debug!(
        target: "ipp::load",
        instructions = instructions.len(),
        labels = labels.len(),
        "program loaded"
    );

    Ok(Program { instructions, labels })
}

fn materialize(opcode: Opcode, arg: &RawArg, expected: ArgKind) -> VmResult<Operand> {
    let operand = match arg.kind.as_str() {
        "var" => Operand::Var(VarRef::parse(&arg.text)?),
        "label" => {
            if arg.text.is_empty() {
                return Err(VmError::structure(format!("{opcode}: empty label name")));
            }
            Operand::Label(Arc::from(arg.text.as_str()))
        }
        "type" => match ValueType::parse(&arg.text) {
            Some(ValueType::Nil) | None => {
                return Err(VmError::structure(format!("{opcode}: invalid type operand '{}'", arg.text)));
            }
            Some(ty) => Operand::Type(ty),
        },
        other => {
            let ty = ValueType::parse(other)
                .ok_or_else(|| VmError::structure(format!("{opcode}: unknown argument type '{other}'")))?;
            Operand::Literal(ty.parse_literal(&arg.text)?)
        }
    };

    let fits = matches!(
        (expected, &operand),
        (ArgKind::Var, Operand::Var(_))
            | (ArgKind::Symb, Operand::Var(_) | Operand::Literal(_))
            | (ArgKind::SymbOrLabel, Operand::Var(_) | Operand::Literal(_) | Operand::Label(_))
            | (ArgKind::Label, Operand::Label(_))
            | (ArgKind::Type, Operand::Type(_))
    );
    if !fits {
        return Err(VmError::structure(format!(
            "{opcode}: operand '{operand}' does not fit {expected:?}"
        )));
    }
    Ok(operand)
}
