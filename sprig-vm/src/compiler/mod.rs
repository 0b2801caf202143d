// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Bytecode compiler: lowers read forms to [`CodeChunk`]s.
//!
//! A [`Compiler`] is one session. It compiles against a single namespace
//! and owns the constant pool every chunk it produces indexes into. In a
//! multi-form session each top-level form is compiled and run before the
//! next is read, so later forms see the Vars and macros earlier ones define.

mod context;
pub mod error;
mod forms;
mod patch;

use std::io::Read;

use log::debug;
use sprig_core::{Namespace, Value};
use sprig_reader::Reader;

use crate::chunk::{CodeChunk, ConstPool};
use crate::error::{Error, Result, SessionError};
use crate::opcode::OpCode;
use crate::vm::Frame;

use context::Context;
pub use error::CompileError;

const DEFAULT_SOURCE: &str = "<default>";

/// A compilation session bound to one namespace and one constant pool.
#[derive(Debug)]
pub struct Compiler {
    ns: Namespace,
    pool: ConstPool,
    source: String,
}

impl Compiler {
    /// A session compiling into `ns`, with a fresh constant pool.
    pub fn new(ns: Namespace) -> Self {
        Compiler {
            ns,
            pool: ConstPool::new(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }

    /// Name reported as the input in reader errors.
    #[must_use]
    pub fn with_source(mut self, name: &str) -> Self {
        self.source = name.to_string();
        self
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    pub fn pool(&self) -> &ConstPool {
        &self.pool
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn reader<'s>(&self, source: &'s str) -> Reader<'s> {
        Reader::new(source)
            .with_input_name(&self.source)
            .with_namespace(self.ns.name())
    }

    /// Read the first form of `source` and compile it.
    pub fn compile(&self, source: &str) -> Result<CodeChunk> {
        match self.reader(source).next() {
            Some(form) => Ok(self.compile_form(&form?)?),
            None => Err(CompileError::new("no form to compile").into()),
        }
    }

    /// Compile an already-read form into a chunk ending in `RET`.
    pub fn compile_form(&self, form: &Value) -> std::result::Result<CodeChunk, CompileError> {
        let mut cx = Context::new(self);
        cx.compile_form(form)?;
        Ok(cx.finish())
    }

    /// Compile and run every form of `source` in order.
    ///
    /// Returns the concatenation of the compiled forms, separated by `POP`
    /// and ending in `RET`, together with the last form's value.
    pub fn compile_multiple(
        &self,
        source: &str,
    ) -> std::result::Result<(CodeChunk, Value), SessionError> {
        let mut session = Session::new(self.pool.clone());
        for form in self.reader(source) {
            let form = match form {
                Ok(form) => form,
                Err(err) => return Err(session.fail(err.into())),
            };
            if let Err(err) = self.compile_and_run(&mut session, &form) {
                return Err(session.fail(err));
            }
        }
        Ok(session.finish())
    }

    /// [`compile_multiple`](Self::compile_multiple) over a byte stream.
    pub fn compile_reader(
        &self,
        mut input: impl Read,
    ) -> std::result::Result<(CodeChunk, Value), SessionError> {
        let mut source = String::new();
        if let Err(err) = input.read_to_string(&mut source) {
            return Err(Session::new(self.pool.clone()).fail(Error::Io(err)));
        }
        self.compile_multiple(&source)
    }

    fn compile_and_run(&self, session: &mut Session, form: &Value) -> Result<()> {
        let mut cx = Context::new(self);
        cx.compile_form(form)?;
        let body = cx.into_chunk();

        let mut runnable = body.clone();
        runnable.emit(OpCode::Ret);
        debug!("{}: running {} ({} bytes)", self.source, form, runnable.len());
        let value = Frame::new(&runnable, &[], &[]).run()?;

        session.push(&body, value);
        Ok(())
    }
}

/// The combined chunk and last value of a multi-form session.
struct Session {
    chunk: CodeChunk,
    value: Value,
    forms: usize,
}

impl Session {
    fn new(pool: ConstPool) -> Self {
        Session {
            chunk: CodeChunk::new(pool),
            value: Value::Nil,
            forms: 0,
        }
    }

    fn push(&mut self, body: &CodeChunk, value: Value) {
        if self.forms > 0 {
            self.chunk.emit(OpCode::Pop);
        }
        self.chunk.append_chunk(body);
        self.value = value;
        self.forms += 1;
    }

    fn finish(mut self) -> (CodeChunk, Value) {
        if self.forms == 0 {
            let nil = self.chunk.pool().intern(Value::Nil);
            if let Some(idx) = nil.and_then(|idx| i32::try_from(idx).ok()) {
                self.chunk.emit_with_operand(OpCode::Ldc, idx);
            }
        }
        self.chunk.emit(OpCode::Ret);
        (self.chunk, self.value)
    }

    fn fail(self, error: Error) -> SessionError {
        let (chunk, value) = self.finish();
        SessionError {
            chunk,
            value,
            error,
        }
    }
}
