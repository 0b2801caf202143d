// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Per-function compilation state and form dispatch.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, trace};
use sprig_core::{Namespace, OrdMap, Symbol, Value, Var, Vector};

use crate::chunk::CodeChunk;
use crate::opcode::OpCode;

use super::Compiler;
use super::error::{CompileError, Result};
use super::forms;

/// Where a locally bound symbol lives at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Local {
    Arg(usize),
    Captured(usize),
}

/// Compiles forms into one chunk. Each `fn` body gets its own context that
/// sees its own formals directly and reaches enclosing bindings through
/// capture slots, allocated the first time the body refers to them.
pub(crate) struct Context<'c> {
    compiler: &'c Compiler,
    chunk: CodeChunk,
    formals: HashMap<Symbol, usize>,
    /// Captured enclosing bindings, in slot order.
    captures: RefCell<Vec<Symbol>>,
    enclosing: Option<&'c Context<'c>>,
}

impl<'c> Context<'c> {
    /// A top-level context with no local bindings.
    pub(crate) fn new(compiler: &'c Compiler) -> Self {
        Context {
            compiler,
            chunk: CodeChunk::new(compiler.pool().clone()),
            formals: HashMap::new(),
            captures: RefCell::new(Vec::new()),
            enclosing: None,
        }
    }

    /// A context for a function body nested in this one.
    pub(crate) fn nested<'p>(&'p self, formals: &[Symbol]) -> Context<'p> {
        Context {
            compiler: self.compiler,
            chunk: CodeChunk::new(self.compiler.pool().clone()),
            formals: forms::slots(formals),
            captures: RefCell::new(Vec::new()),
            enclosing: Some(self),
        }
    }

    /// The enclosing bindings this body captured, in slot order.
    pub(crate) fn captured_symbols(&self) -> Vec<Symbol> {
        self.captures.borrow().clone()
    }

    pub(crate) fn namespace(&self) -> &'c Namespace {
        self.compiler.namespace()
    }

    pub(crate) fn chunk_mut(&mut self) -> &mut CodeChunk {
        &mut self.chunk
    }

    /// The chunk compiled so far, without a trailing `RET`.
    pub(crate) fn into_chunk(self) -> CodeChunk {
        self.chunk
    }

    /// Terminate the chunk with `RET` and hand it over.
    pub(crate) fn finish(mut self) -> CodeChunk {
        self.chunk.emit(OpCode::Ret);
        self.chunk
    }

    /// Encode a count or index as an instruction operand.
    pub(crate) fn operand(n: usize) -> Result<i32> {
        i32::try_from(n).map_err(|_| CompileError::new(format!("operand {} out of range", n)))
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    pub(crate) fn compile_form(&mut self, form: &Value) -> Result<()> {
        match form {
            Value::Symbol(sym) => self.compile_symbol(sym),
            Value::List(items) => self.compile_list(items),
            Value::Vector(items) => self.compile_vector(items),
            Value::Map(entries) => self.compile_map(entries),
            other => self.emit_constant(other.clone()),
        }
    }

    fn compile_list(&mut self, list: &Vector<Value>) -> Result<()> {
        if list.is_empty() {
            return self.emit_constant(Value::List(list.clone()));
        }
        let items: Vec<Value> = list.iter().cloned().collect();
        let (head, args) = (&items[0], &items[1..]);

        if let Value::Symbol(sym) = head {
            if let Some(special) = forms::lookup(sym) {
                return special(self, args);
            }
            if !self.is_local(sym) {
                if let Some(var) = self.namespace().lookup(sym) {
                    if var.is_macro() {
                        return self.expand_macro(sym, &var, args);
                    }
                }
            }
        }

        self.compile_form(head)?;
        self.compile_invoke(args)
    }

    /// Compile each argument, then invoke whatever sits below them.
    fn compile_invoke(&mut self, args: &[Value]) -> Result<()> {
        for arg in args {
            self.compile_form(arg)?;
        }
        let argc = Self::operand(args.len())?;
        self.chunk.emit_with_operand(OpCode::Inv, argc);
        Ok(())
    }

    /// Run a macro on the unevaluated argument forms and compile its result
    /// in place of the call.
    fn expand_macro(&mut self, name: &Symbol, var: &Var, args: &[Value]) -> Result<()> {
        debug!("expanding macro {}", var.qualified_name());
        let expansion = var.deref().invoke(args).map_err(|err| {
            CompileError::new(format!("macro expansion of {} failed", name)).with_cause(err)
        })?;
        debug!("{} expanded to {}", name, expansion);
        self.compile_form(&expansion)
    }

    // ========================================================================
    // Collections
    // ========================================================================

    fn compile_vector(&mut self, items: &Vector<Value>) -> Result<()> {
        if items.is_empty() {
            return self.emit_constant(Value::Vector(items.clone()));
        }
        self.compile_global(&Symbol::new("vector"))?;
        let items: Vec<Value> = items.iter().cloned().collect();
        self.compile_invoke(&items)
    }

    fn compile_map(&mut self, entries: &OrdMap<Value, Value>) -> Result<()> {
        if entries.is_empty() {
            return self.emit_constant(Value::Map(entries.clone()));
        }
        self.compile_global(&Symbol::new("hash-map"))?;
        let kvs: Vec<Value> = entries
            .iter()
            .flat_map(|(k, v)| [k.clone(), v.clone()])
            .collect();
        self.compile_invoke(&kvs)
    }

    // ========================================================================
    // Symbols
    // ========================================================================

    /// Resolve `sym` as a formal, an existing capture, or a binding of an
    /// enclosing context. The last case allocates a capture slot here, and
    /// in every context between here and the binding.
    fn local(&self, sym: &Symbol) -> Option<Local> {
        if let Some(&idx) = self.formals.get(sym) {
            return Some(Local::Arg(idx));
        }
        if let Some(idx) = self.captures.borrow().iter().position(|s| s == sym) {
            return Some(Local::Captured(idx));
        }
        if !self.enclosing?.is_local(sym) {
            return None;
        }
        let mut captures = self.captures.borrow_mut();
        trace!("capturing {} in slot {}", sym, captures.len());
        captures.push(sym.clone());
        Some(Local::Captured(captures.len() - 1))
    }

    /// Whether `sym` is a formal or captured binding of this context.
    pub(crate) fn is_local(&self, sym: &Symbol) -> bool {
        self.local(sym).is_some()
    }

    fn compile_symbol(&mut self, sym: &Symbol) -> Result<()> {
        if self.is_local(sym) {
            return self.compile_local(sym);
        }
        self.compile_global(sym)
    }

    /// Push the value of a formal or captured binding.
    pub(crate) fn compile_local(&mut self, sym: &Symbol) -> Result<()> {
        let (op, idx) = match self.local(sym) {
            Some(Local::Arg(idx)) => (OpCode::Lda, idx),
            Some(Local::Captured(idx)) => (OpCode::Ldk, idx),
            None => return Err(CompileError::new(format!("{} is not a local binding", sym))),
        };
        let operand = Self::operand(idx)?;
        self.chunk.emit_with_operand(op, operand);
        Ok(())
    }

    /// Push the Var for `sym`, then dereference it at run time.
    fn compile_global(&mut self, sym: &Symbol) -> Result<()> {
        let var = self.resolve_var(sym)?;
        self.emit_constant(Value::Var(var))?;
        self.chunk.emit(OpCode::Ldv);
        Ok(())
    }

    /// Resolve `sym` in the namespace, creating the Var when it may live
    /// there.
    pub(crate) fn resolve_var(&self, sym: &Symbol) -> Result<Var> {
        self.namespace()
            .lookup_or_intern(sym)
            .ok_or_else(|| CompileError::new(format!("unable to resolve symbol: {}", sym)))
    }

    /// Push `value` through the session constant pool.
    pub(crate) fn emit_constant(&mut self, value: Value) -> Result<()> {
        let idx = self
            .chunk
            .pool()
            .intern(value)
            .ok_or_else(|| CompileError::new("too many constants"))?;
        let operand = Self::operand(idx)?;
        self.chunk.emit_with_operand(OpCode::Ldc, operand);
        Ok(())
    }
}
