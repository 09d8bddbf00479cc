use std::fmt;

/// Operand shape expected at one position of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Variable reference, e.g. `GF@x`.
    Var,
    /// Variable or literal.
    Symb,
    /// Variable, literal, or label (PUSHS feeding the stack jumps).
    SymbOrLabel,
    Label,
    /// Type name operand of READ.
    Type,
}

macro_rules! opcodes {
    ($($variant:ident => $name:literal [$($arg:ident),*]),* $(,)?) => {
        /// The fixed IPPcode22 instruction catalog, including the stack extension.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $($variant,)*
        }

        impl Opcode {
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $name,)*
                }
            }

            /// Case-insensitive lookup by mnemonic.
            pub fn parse(mnemonic: &str) -> Option<Opcode> {
                let upper = mnemonic.to_ascii_uppercase();
                match upper.as_str() {
                    $($name => Some(Opcode::$variant),)*
                    _ => None,
                }
            }

            pub fn signature(self) -> &'static [ArgKind] {
                match self {
                    $(Opcode::$variant => &[$(ArgKind::$arg),*],)*
                }
            }
        }
    };
}

opcodes! {
    Move => "MOVE" [Var, Symb],
    CreateFrame => "CREATEFRAME" [],
    PushFrame => "PUSHFRAME" [],
    PopFrame => "POPFRAME" [],
    DefVar => "DEFVAR" [Var],
    Call => "CALL" [Label],
    Return => "RETURN" [],
    PushS => "PUSHS" [SymbOrLabel],
    PopS => "POPS" [Var],
    ClearS => "CLEARS" [],
    Add => "ADD" [Var, Symb, Symb],
    Sub => "SUB" [Var, Symb, Symb],
    Mul => "MUL" [Var, Symb, Symb],
    IDiv => "IDIV" [Var, Symb, Symb],
    AddS => "ADDS" [],
    SubS => "SUBS" [],
    MulS => "MULS" [],
    IDivS => "IDIVS" [],
    Lt => "LT" [Var, Symb, Symb],
    Gt => "GT" [Var, Symb, Symb],
    Eq => "EQ" [Var, Symb, Symb],
    LtS => "LTS" [],
    GtS => "GTS" [],
    EqS => "EQS" [],
    And => "AND" [Var, Symb, Symb],
    Or => "OR" [Var, Symb, Symb],
    Not => "NOT" [Var, Symb],
    AndS => "ANDS" [],
    OrS => "ORS" [],
    NotS => "NOTS" [],
    Int2Char => "INT2CHAR" [Var, Symb],
    Stri2Int => "STRI2INT" [Var, Symb, Symb],
    Int2CharS => "INT2CHARS" [],
    Stri2IntS => "STRI2INTS" [],
    Read => "READ" [Var, Type],
    Write => "WRITE" [Symb],
    Concat => "CONCAT" [Var, Symb, Symb],
    StrLen => "STRLEN" [Var, Symb],
    GetChar => "GETCHAR" [Var, Symb, Symb],
    SetChar => "SETCHAR" [Var, Symb, Symb],
    Type => "TYPE" [Var, Symb],
    Label => "LABEL" [Label],
    Jump => "JUMP" [Label],
    JumpIfEq => "JUMPIFEQ" [Label, Symb, Symb],
    JumpIfNeq => "JUMPIFNEQ" [Label, Symb, Symb],
    JumpIfEqS => "JUMPIFEQS" [Label],
    JumpIfNeqS => "JUMPIFNEQS" [Label],
    Exit => "EXIT" [Symb],
    DPrint => "DPRINT" [Symb],
    Break => "BREAK" [],
}

impl Opcode {
    /// Whether an instruction with `count` operands is well formed.
    /// The stack jumps may omit their label and pop it from the operand stack instead.
    pub fn accepts_arity(self, count: usize) -> bool {
        count == self.signature().len() || (self.is_stack_jump() && count == 0)
    }

    pub fn is_stack_jump(self) -> bool {
        matches!(self, Opcode::JumpIfEqS | Opcode::JumpIfNeqS)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
