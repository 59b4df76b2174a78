// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use strand_runtime::context::{CallFrame, Executor};
use strand_runtime::format::Reader;
use strand_runtime::{ScriptError, Value, access, coerce};

use crate::asm::{BIN_OPS, op};

/// A minimal stack-machine executor over the opcodes in [`op`].
#[derive(Debug, Default)]
pub struct MiniLoop {
    stack: Vec<Value>,
    steps: u64,
}

fn truncated(_: strand_runtime::format::LoadError) -> ScriptError {
    ScriptError::native("truncated code")
}

impl MiniLoop {
    /// Creates an executor with an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opcodes executed so far, across calls.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn pop(&mut self) -> Result<Value, ScriptError> {
        self.stack
            .pop()
            .ok_or_else(|| ScriptError::native("stack underflow"))
    }

    fn slot(r: &mut Reader<'_>, len: usize) -> Result<usize, ScriptError> {
        let slot = r.uleb().map_err(truncated)?;
        usize::try_from(slot)
            .ok()
            .filter(|s| *s < len)
            .ok_or(ScriptError::IndexOutOfRange {
                index: i64::try_from(slot).unwrap_or(i64::MAX),
                len,
            })
    }

    fn text<'a>(r: &mut Reader<'a>) -> Result<&'a str, ScriptError> {
        let len = usize::try_from(r.uleb().map_err(truncated)?)
            .map_err(|_| ScriptError::native("truncated code"))?;
        let bytes = r.take(len).map_err(truncated)?;
        core::str::from_utf8(bytes).map_err(|_| ScriptError::native("string is not utf-8"))
    }
}

impl Executor for MiniLoop {
    fn execute(&mut self, mut frame: CallFrame<'_>) -> Result<Value, ScriptError> {
        let base = self.stack.len();
        let result = self.run(&mut frame);
        self.stack.truncate(base);
        result
    }
}

impl MiniLoop {
    fn run(&mut self, frame: &mut CallFrame<'_>) -> Result<Value, ScriptError> {
        let mut r = Reader::new(frame.code);
        loop {
            let opcode = r.u8().map_err(truncated)?;
            self.steps += 1;
            match opcode {
                op::RET => return Ok(self.stack.pop().unwrap_or_default()),
                op::NULL => self.stack.push(Value::Null),
                op::ARG => {
                    let i = usize::from(r.u8().map_err(truncated)?);
                    self.stack.push(frame.args.get(i).cloned().unwrap_or_default());
                }
                op::INT => {
                    let v = r.sleb().map_err(truncated)?;
                    self.stack.push(Value::Int(frame.width.wrap(v)));
                }
                op::STR => {
                    let s = Self::text(&mut r)?;
                    self.stack.push(Value::from(s));
                }
                op::GLOAD => {
                    let slot = Self::slot(&mut r, frame.globals.len())?;
                    self.stack.push(frame.globals[slot].clone());
                }
                op::GSTORE => {
                    let slot = Self::slot(&mut r, frame.globals.len())?;
                    frame.globals[slot] = self.pop()?;
                }
                op::GADD => {
                    let slot = Self::slot(&mut r, frame.globals.len())?;
                    let rhs = self.pop()?;
                    coerce::add_assign(&mut frame.globals[slot], &rhs, frame.width)?;
                }
                op::BIN => {
                    let index = usize::from(r.u8().map_err(truncated)?);
                    let bin = *BIN_OPS
                        .get(index)
                        .ok_or_else(|| ScriptError::native("unknown operator"))?;
                    let rhs = self.pop()?;
                    let lhs = self.pop()?;
                    self.stack
                        .push(coerce::binary(bin, &lhs, &rhs, frame.width)?);
                }
                op::EQ => {
                    let rhs = self.pop()?;
                    let lhs = self.pop()?;
                    let eq = coerce::equals(&lhs, &rhs)?;
                    self.stack.push(Value::Int(i64::from(eq)));
                }
                op::NATIVE => {
                    let argc = usize::from(r.u8().map_err(truncated)?);
                    let name = Self::text(&mut r)?;
                    let at = self
                        .stack
                        .len()
                        .checked_sub(argc)
                        .ok_or_else(|| ScriptError::native("stack underflow"))?;
                    let args = self.stack.split_off(at);
                    let out = frame.call_native(name, &args)?;
                    self.stack.push(out);
                }
                op::POP => {
                    self.pop()?;
                }
                op::INDEX_GET => {
                    let key = self.pop()?;
                    let target = self.pop()?;
                    self.stack.push(access::index_get(&target, &key)?);
                }
                op::INDEX_SET => {
                    let value = self.pop()?;
                    let key = self.pop()?;
                    let mut target = self.pop()?;
                    access::index_set(&mut target, &key, value)?;
                    self.stack.push(target);
                }
                other => {
                    return Err(ScriptError::native(format!(
                        "invalid opcode {other:#04x}"
                    )));
                }
            }
        }
    }
}
