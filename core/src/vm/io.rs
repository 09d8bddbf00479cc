//! Line sources for READ.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::error::{ErrorKind, VmError, VmResult};

/// Supplies program input one line at a time. `None` means the input is exhausted.
pub trait InputSource {
    fn next_line(&mut self) -> VmResult<Option<String>>;
}

/// Reads lines from any buffered reader, dropping the `\n` or `\r\n` terminator.
pub struct LineInput<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn next_line(&mut self) -> VmResult<Option<String>> {
        self.buf.clear();
        let read = self
            .reader
            .read_line(&mut self.buf)
            .map_err(|err| VmError::new(ErrorKind::InputFile, format!("cannot read input: {err}")))?;
        if read == 0 {
            return Ok(None);
        }
        let line = self.buf.strip_suffix('\n').unwrap_or(&self.buf);
        let line = line.strip_suffix('\r').unwrap_or(line);
        Ok(Some(line.to_string()))
    }
}

/// In-memory input, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct VecInput {
    lines: VecDeque<String>,
}

impl VecInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for VecInput {
    fn next_line(&mut self) -> VmResult<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
