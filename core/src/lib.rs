pub mod error;
mod op;
pub mod program;
pub mod util;
pub mod val;

// Execution engine over a loaded program
pub mod vm;

pub use error::{ErrorKind, VmError, VmResult};
pub use program::{Program, SourceFormat, load_source};
pub use vm::{EofPolicy, ReadCoercion, Vm, VmConfig, VmContext};
