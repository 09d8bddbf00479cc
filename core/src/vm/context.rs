use std::fmt;
use std::io::{self, Write};

use crate::error::{ErrorKind, VmError, VmResult};
use crate::val::Val;

use super::io::InputSource;

/// I/O endpoints of one run: where READ pulls lines from and where WRITE,
/// DPRINT and BREAK go.
pub struct VmContext<'io> {
    input: &'io mut dyn InputSource,
    stdout: &'io mut dyn Write,
    stderr: &'io mut dyn Write,
}

fn output_error(err: io::Error) -> VmError {
    VmError::new(ErrorKind::OutputFile, format!("cannot write output: {err}"))
}

impl<'io> VmContext<'io> {
    pub fn new(
        input: &'io mut dyn InputSource,
        stdout: &'io mut dyn Write,
        stderr: &'io mut dyn Write,
    ) -> Self {
        Self {
            input,
            stdout,
            stderr,
        }
    }

    #[inline]
    pub(crate) fn read_line(&mut self) -> VmResult<Option<String>> {
        self.input.next_line()
    }

    /// WRITE rendering of `val` to stdout, without a trailing newline.
    pub(crate) fn write_value(&mut self, val: &Val) -> VmResult<()> {
        write!(self.stdout, "{val}").map_err(output_error)
    }

    pub(crate) fn write_diag(&mut self, args: fmt::Arguments<'_>) -> VmResult<()> {
        self.stderr.write_fmt(args).map_err(output_error)
    }

    /// Runs `f` against stderr; used for multi-line dumps.
    pub(crate) fn with_stderr<F>(&mut self, f: F) -> VmResult<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        f(&mut *self.stderr).map_err(output_error)
    }

    pub fn flush(&mut self) -> VmResult<()> {
        self.stdout.flush().map_err(output_error)?;
        self.stderr.flush().map_err(output_error)
    }
}
