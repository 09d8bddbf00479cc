mod ops;
pub(crate) mod string;

pub use ops::{BinOp, UnaryOp};
