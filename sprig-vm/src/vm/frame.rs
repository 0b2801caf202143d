// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Activation record and interpreter loop.

use sprig_core::{Error, Result, Value};

use crate::chunk::CodeChunk;
use crate::func::{Closure, Func};
use crate::opcode::OpCode;

use super::CallDepthGuard;
use super::stack::ValueStack;

/// One invocation of a chunk against fixed arguments and captured values.
pub struct Frame<'a> {
    chunk: &'a CodeChunk,
    args: &'a [Value],
    captured: &'a [Value],
    pc: usize,
    stack: ValueStack,
}

/// Convert an operand used as an index or count.
fn slot(operand: i32, what: &str) -> Result<usize> {
    usize::try_from(operand).map_err(|_| Error::bytecode(format!("negative {} {}", what, operand)))
}

impl<'a> Frame<'a> {
    pub fn new(chunk: &'a CodeChunk, args: &'a [Value], captured: &'a [Value]) -> Self {
        Frame {
            chunk,
            args,
            captured,
            pc: 0,
            stack: ValueStack::new(),
        }
    }

    /// Execute until `RET`, yielding its value.
    pub fn run(mut self) -> Result<Value> {
        let _guard = CallDepthGuard::enter()?;

        loop {
            let at = self.pc;
            let (op, operand) = self.fetch(at)?;
            self.pc = at + op.width();

            match op {
                OpCode::Ldc => {
                    let idx = slot(operand, "constant index")?;
                    let value = self
                        .chunk
                        .pool()
                        .get(idx)
                        .ok_or_else(|| Error::bytecode(format!("no constant {}", idx)))?;
                    self.stack.push(value);
                }
                OpCode::Lda => {
                    let idx = slot(operand, "argument index")?;
                    let value = self.args.get(idx).cloned().ok_or_else(|| {
                        Error::bytecode(format!("no argument {} of {}", idx, self.args.len()))
                    })?;
                    self.stack.push(value);
                }
                OpCode::Ldk => {
                    let idx = slot(operand, "capture index")?;
                    let value = self.captured.get(idx).cloned().ok_or_else(|| {
                        Error::bytecode(format!("no captured slot {} of {}", idx, self.captured.len()))
                    })?;
                    self.stack.push(value);
                }
                OpCode::Ldv => match self.stack.pop()? {
                    Value::Var(var) => self.stack.push(var.deref()),
                    other => return Err(Error::type_error_in("LDV", "var", other.type_name())),
                },
                OpCode::Stv => {
                    let value = self.stack.pop()?;
                    match self.stack.pop()? {
                        Value::Var(var) => var.set_root(value.clone()),
                        other => return Err(Error::type_error_in("STV", "var", other.type_name())),
                    }
                    self.stack.push(value);
                }
                OpCode::Inv => {
                    let argc = slot(operand, "argument count")?;
                    let args = self.stack.pop_n(argc)?;
                    let callee = self.stack.pop()?;
                    let result = callee.invoke(&args)?;
                    self.stack.push(result);
                }
                OpCode::Mkc => {
                    let count = slot(operand, "capture count")?;
                    let captured = self.stack.pop_n(count)?;
                    let func = match self.stack.pop()? {
                        Value::Fn(f) => f.as_any().downcast_ref::<Func>().cloned(),
                        _ => None,
                    }
                    .ok_or_else(|| Error::bytecode("MKC needs a compiled function"))?;
                    self.stack.push(Value::func(Closure::new(func, captured)));
                }
                OpCode::Brf => {
                    if !self.stack.pop()?.is_truthy() {
                        self.jump(at, operand)?;
                    }
                }
                OpCode::Jmp => self.jump(at, operand)?,
                OpCode::Pop => {
                    self.stack.pop()?;
                }
                OpCode::Ret => return self.stack.pop(),
            }
        }
    }

    /// Decode the instruction at `at`. Operand-less instructions report 0.
    fn fetch(&self, at: usize) -> Result<(OpCode, i32)> {
        let code = self.chunk.code();
        let byte = *code
            .get(at)
            .ok_or_else(|| Error::bytecode(format!("ran past end of chunk at {}", at)))?;
        let op = OpCode::from_byte(byte)
            .ok_or_else(|| Error::bytecode(format!("bad opcode {:#04x} at {}", byte, at)))?;
        if !op.has_operand() {
            return Ok((op, 0));
        }
        let operand = self
            .chunk
            .read_operand(at + 1)
            .ok_or_else(|| Error::bytecode(format!("truncated {} at {}", op.mnemonic(), at)))?;
        Ok((op, operand))
    }

    fn jump(&mut self, from: usize, displacement: i32) -> Result<()> {
        let target = from as i64 + i64::from(displacement);
        match usize::try_from(target) {
            Ok(pc) if pc <= self.chunk.len() => {
                self.pc = pc;
                Ok(())
            }
            _ => Err(Error::bytecode(format!(
                "jump from {} to {} leaves the chunk",
                from, target
            ))),
        }
    }
}
