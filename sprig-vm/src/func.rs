// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Compiled functions and closures.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use log::trace;
use sprig_core::{Error, Invoke, Result, Symbol, Value};

use crate::chunk::CodeChunk;
use crate::vm::Frame;

/// An immutable compiled function.
///
/// A variadic function's last formal collects the trailing arguments into a
/// list, so it needs at least `arity - 1` arguments.
#[derive(Clone)]
pub struct Func {
    arity: usize,
    variadic: bool,
    chunk: Rc<CodeChunk>,
    /// Enclosing bindings this function reads through `LDK`, by slot.
    captures: Rc<[Symbol]>,
}

impl Func {
    pub fn new(arity: usize, variadic: bool, chunk: CodeChunk, captures: Vec<Symbol>) -> Self {
        Func {
            arity,
            variadic,
            chunk: Rc::new(chunk),
            captures: captures.into(),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn chunk(&self) -> &CodeChunk {
        &self.chunk
    }

    pub fn captures(&self) -> &[Symbol] {
        &self.captures
    }

    /// Run the body with `captured` visible through `LDK`.
    pub(crate) fn call(&self, args: &[Value], captured: &[Value]) -> Result<Value> {
        let args = self.bind_args(args)?;
        Frame::new(&self.chunk, &args, captured).run()
    }

    fn bind_args<'a>(&self, args: &'a [Value]) -> Result<Cow<'a, [Value]>> {
        if !self.variadic {
            if args.len() != self.arity {
                return Err(Error::arity(self.arity, args.len()));
            }
            return Ok(Cow::Borrowed(args));
        }

        let fixed = self.arity.saturating_sub(1);
        if args.len() < fixed {
            return Err(Error::arity_at_least(fixed, args.len()));
        }
        let mut bound = args[..fixed].to_vec();
        bound.push(Value::list(args[fixed..].to_vec()));
        Ok(Cow::Owned(bound))
    }
}

impl Invoke for Func {
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        self.call(args, &[])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func")
            .field("arity", &self.arity)
            .field("variadic", &self.variadic)
            .field("captures", &self.captures)
            .finish()
    }
}

/// A [`Func`] paired with the values it captured when it was created.
#[derive(Clone)]
pub struct Closure {
    func: Func,
    captured: Rc<[Value]>,
}

impl Closure {
    pub fn new(func: Func, captured: Vec<Value>) -> Self {
        trace!(
            "closing over {} value(s) for fn/{}",
            captured.len(),
            func.arity
        );
        Closure {
            func,
            captured: captured.into(),
        }
    }

    pub fn func(&self) -> &Func {
        &self.func
    }

    pub fn captured(&self) -> &[Value] {
        &self.captured
    }
}

impl Invoke for Closure {
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        self.func.call(args, &self.captured)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("func", &self.func)
            .field("captured", &self.captured)
            .finish()
    }
}
