use std::io::{self, Write};
use std::sync::Arc;

use tracing::debug;

use crate::error::{ErrorKind, VmError, VmResult};
use crate::program::{FrameTag, VarRef};
use crate::util::fast_map::{NameMap, name_map_new};
use crate::val::Val;

/// Named slot inside exactly one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: Arc<str>,
    pub value: Val,
}

impl Variable {
    pub fn new(name: Arc<str>) -> Self {
        Self {
            name,
            value: Val::Uninit,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.value.is_initialized()
    }
}

/// Unordered set of uniquely named variables.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    vars: NameMap<Variable>,
}

impl Frame {
    pub fn new() -> Self {
        Self { vars: name_map_new() }
    }

    /// Adds an uninitialized variable; redefinition is a semantic error.
    pub fn define(&mut self, name: Arc<str>) -> VmResult<()> {
        if self.vars.contains_key(&name) {
            return Err(VmError::semantic(format!("variable '{name}' is already defined")));
        }
        self.vars.insert(name.clone(), Variable::new(name));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.vars.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables sorted by name, for stable dumps.
    pub fn sorted(&self) -> Vec<&Variable> {
        let mut vars: Vec<&Variable> = self.vars.values().collect();
        vars.sort_by(|a, b| a.name.cmp(&b.name));
        vars
    }

    fn dump(&self, out: &mut dyn Write) -> io::Result<()> {
        for var in self.sorted() {
            writeln!(out, "\t{} = {}", var.name, var.value.debug_repr())?;
        }
        Ok(())
    }
}

/// The global frame, the local frame stack and the optional temporary frame.
#[derive(Debug, Clone, Default)]
pub struct FrameStack {
    global: Frame,
    locals: Vec<Frame>,
    temporary: Option<Frame>,
}

fn no_frame(message: impl Into<String>) -> VmError {
    VmError::new(ErrorKind::UndefinedFrame, message)
}

impl FrameStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self, tag: FrameTag) -> VmResult<&Frame> {
        match tag {
            FrameTag::Global => Ok(&self.global),
            FrameTag::Local => self
                .locals
                .last()
                .ok_or_else(|| no_frame("local frame stack is empty")),
            FrameTag::Temporary => self
                .temporary
                .as_ref()
                .ok_or_else(|| no_frame("temporary frame is not defined")),
        }
    }

    pub fn frame_mut(&mut self, tag: FrameTag) -> VmResult<&mut Frame> {
        match tag {
            FrameTag::Global => Ok(&mut self.global),
            FrameTag::Local => self
                .locals
                .last_mut()
                .ok_or_else(|| no_frame("local frame stack is empty")),
            FrameTag::Temporary => self
                .temporary
                .as_mut()
                .ok_or_else(|| no_frame("temporary frame is not defined")),
        }
    }

    pub fn lookup(&self, var: &VarRef) -> VmResult<&Variable> {
        self.frame(var.frame)?
            .get(&var.name)
            .ok_or_else(|| undefined_variable(var))
    }

    pub fn lookup_mut(&mut self, var: &VarRef) -> VmResult<&mut Variable> {
        self.frame_mut(var.frame)?
            .get_mut(&var.name)
            .ok_or_else(|| undefined_variable(var))
    }

    pub fn define(&mut self, var: &VarRef) -> VmResult<()> {
        self.frame_mut(var.frame)?.define(var.name.clone())
    }

    /// CREATEFRAME: a fresh temporary frame replaces any previous one.
    pub fn create_temporary(&mut self) {
        if self.temporary.is_some() {
            debug!(target: "ipp::vm::frames", "discarding previous temporary frame");
        }
        self.temporary = Some(Frame::new());
    }

    /// PUSHFRAME: the temporary frame becomes the current local frame.
    pub fn push_temporary(&mut self) -> VmResult<()> {
        let frame = self
            .temporary
            .take()
            .ok_or_else(|| no_frame("PUSHFRAME without a temporary frame"))?;
        self.locals.push(frame);
        debug!(target: "ipp::vm::frames", depth = self.locals.len(), "pushed local frame");
        Ok(())
    }

    /// POPFRAME: the current local frame becomes the temporary frame.
    pub fn pop_local(&mut self) -> VmResult<()> {
        let frame = self
            .locals
            .pop()
            .ok_or_else(|| no_frame("POPFRAME with an empty local frame stack"))?;
        self.temporary = Some(frame);
        debug!(target: "ipp::vm::frames", depth = self.locals.len(), "popped local frame");
        Ok(())
    }

    pub fn global(&self) -> &Frame {
        &self.global
    }

    pub fn local_depth(&self) -> usize {
        self.locals.len()
    }

    pub fn has_temporary(&self) -> bool {
        self.temporary.is_some()
    }

    /// Writes all three frame tiers, as printed by BREAK.
    pub fn dump(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Global frame ({} variables):", self.global.len())?;
        self.global.dump(out)?;

        match self.locals.last() {
            Some(top) => {
                writeln!(
                    out,
                    "Local frame ({} variables, depth {}):",
                    top.len(),
                    self.locals.len()
                )?;
                top.dump(out)?;
            }
            None => writeln!(out, "Local frame: undefined")?,
        }

        match &self.temporary {
            Some(tf) => {
                writeln!(out, "Temporary frame ({} variables):", tf.len())?;
                tf.dump(out)?;
            }
            None => writeln!(out, "Temporary frame: undefined")?,
        }
        Ok(())
    }
}

fn undefined_variable(var: &VarRef) -> VmError {
    VmError::new(ErrorKind::UndefinedVariable, format!("variable {var} does not exist"))
}
