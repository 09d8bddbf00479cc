/// What READ does once the input is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Store `nil` into the destination.
    #[default]
    Nil,
    /// Fail with an input file error.
    Error,
}

/// How READ converts an input line into the requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadCoercion {
    /// A line that is not an int fails with 32; `bool` is true only for exactly `true`.
    #[default]
    Strict,
    /// A line that is not an int reads as `nil`; `bool` ignores case and surrounding blanks.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VmConfig {
    pub eof_policy: EofPolicy,
    pub read_coercion: ReadCoercion,
}

impl VmConfig {
    pub fn with_eof_policy(mut self, eof_policy: EofPolicy) -> Self {
        self.eof_policy = eof_policy;
        self
    }

    pub fn with_read_coercion(mut self, read_coercion: ReadCoercion) -> Self {
        self.read_coercion = read_coercion;
        self
    }
}
