// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Special forms: `if`, `do`, `def`, `fn`, `quote` and `var`.

use std::collections::HashMap;

use log::trace;
use sprig_core::{Symbol, Value};

use crate::func::Func;
use crate::opcode::OpCode;

use super::context::Context;
use super::error::{CompileError, Result};
use super::patch::Patch;

/// Compiles the operand forms of one special form.
pub(crate) type SpecialForm = fn(&mut Context<'_>, &[Value]) -> Result<()>;

const SPECIAL_FORMS: &[(&str, SpecialForm)] = &[
    ("if", compile_if),
    ("do", compile_do),
    ("def", compile_def),
    ("fn", compile_fn),
    ("quote", compile_quote),
    ("var", compile_var),
];

/// The compiler for `sym` if it names a special form. Qualified symbols
/// never do.
pub(crate) fn lookup(sym: &Symbol) -> Option<SpecialForm> {
    if sym.has_namespace() {
        return None;
    }
    SPECIAL_FORMS
        .iter()
        .find(|(name, _)| *name == sym.name())
        .map(|(_, form)| *form)
}

/// The `&` separating fixed formals from the rest formal.
pub(crate) fn is_rest_marker(sym: &Symbol) -> bool {
    !sym.has_namespace() && sym.name() == "&"
}

// ============================================================================
// Control flow
// ============================================================================

/// `(if test then else?)`
fn compile_if(cx: &mut Context<'_>, args: &[Value]) -> Result<()> {
    if !(2..=3).contains(&args.len()) {
        return Err(CompileError::wrong_forms("if", args.len(), "2 or 3"));
    }

    cx.compile_form(&args[0])?;
    let to_else = Patch::emit(cx.chunk_mut(), OpCode::Brf);
    cx.compile_form(&args[1])?;
    let to_end = Patch::emit(cx.chunk_mut(), OpCode::Jmp);

    to_else.resolve(cx.chunk_mut())?;
    match args.get(2) {
        Some(otherwise) => cx.compile_form(otherwise)?,
        None => cx.emit_constant(Value::Nil)?,
    }
    to_end.resolve(cx.chunk_mut())
}

/// `(do forms...)`
fn compile_do(cx: &mut Context<'_>, args: &[Value]) -> Result<()> {
    compile_body(cx, args)
}

/// Compile forms in sequence, keeping only the last value. Empty is nil.
pub(crate) fn compile_body(cx: &mut Context<'_>, forms: &[Value]) -> Result<()> {
    let Some((last, init)) = forms.split_last() else {
        return cx.emit_constant(Value::Nil);
    };
    for form in init {
        cx.compile_form(form)?;
        cx.chunk_mut().emit(OpCode::Pop);
    }
    cx.compile_form(last)
}

// ============================================================================
// Definitions
// ============================================================================

/// `(def name value)`
fn compile_def(cx: &mut Context<'_>, args: &[Value]) -> Result<()> {
    if args.len() != 2 {
        return Err(CompileError::wrong_forms("def", args.len(), "2"));
    }
    let Some(sym) = args[0].as_symbol() else {
        return Err(CompileError::new(format!(
            "def: first argument must be a symbol, got {}",
            args[0].type_name()
        )));
    };

    let ns = cx.namespace();
    if let Some(qualifier) = sym.namespace() {
        if qualifier != ns.name() {
            return Err(CompileError::new(format!(
                "def: cannot define {} outside its namespace",
                sym
            )));
        }
    }
    let var = ns.intern(sym);

    cx.emit_constant(Value::Var(var))?;
    cx.compile_form(&args[1])?;
    cx.chunk_mut().emit(OpCode::Stv);
    Ok(())
}

/// `(fn [formals...] body...)`
///
/// Enclosing bindings the body refers to, including ones introduced by
/// macro expansion, are captured by value when the function value is
/// created.
fn compile_fn(cx: &mut Context<'_>, args: &[Value]) -> Result<()> {
    let Some(Value::Vector(formals)) = args.first() else {
        return Err(CompileError::new("fn: formal arguments must be a vector"));
    };
    let (formals, variadic) = parse_formals(formals.iter())?;
    let (chunk, captures) = {
        let mut inner = cx.nested(&formals);
        compile_body(&mut inner, &args[1..])?;
        let captures = inner.captured_symbols();
        (inner.finish(), captures)
    };
    let func = Func::new(formals.len(), variadic, chunk, captures.clone());
    cx.emit_constant(Value::func(func))?;
    if captures.is_empty() {
        return Ok(());
    }
    trace!("fn/{} captures {:?}", formals.len(), captures);
    for sym in &captures {
        cx.compile_local(sym)?;
    }
    let count = Context::operand(captures.len())?;
    cx.chunk_mut().emit_with_operand(OpCode::Mkc, count);
    Ok(())
}

/// Split a formal vector into its symbols and whether the last one is a
/// rest formal introduced by `&`.
fn parse_formals<'v>(formals: impl Iterator<Item = &'v Value>) -> Result<(Vec<Symbol>, bool)> {
    let symbols = formals
        .map(|formal| {
            formal
                .as_symbol()
                .cloned()
                .ok_or_else(|| CompileError::new("all fn formal arguments must be symbols"))
        })
        .collect::<Result<Vec<_>>>()?;

    match symbols.iter().position(is_rest_marker) {
        None => Ok((symbols, false)),
        Some(at) if at + 2 == symbols.len() && !is_rest_marker(&symbols[at + 1]) => {
            let mut symbols = symbols;
            symbols.remove(at);
            Ok((symbols, true))
        }
        Some(_) => Err(CompileError::new(
            "fn: & must be followed by exactly one symbol",
        )),
    }
}

// ============================================================================
// Quoting
// ============================================================================

/// `(quote form)`
fn compile_quote(cx: &mut Context<'_>, args: &[Value]) -> Result<()> {
    match args {
        [form] => cx.emit_constant(form.clone()),
        _ => Err(CompileError::wrong_forms("quote", args.len(), "1")),
    }
}

/// `(var sym)`
fn compile_var(cx: &mut Context<'_>, args: &[Value]) -> Result<()> {
    let [Value::Symbol(sym)] = args else {
        return Err(CompileError::new("var: argument must be a symbol"));
    };
    let var = cx.resolve_var(sym)?;
    cx.emit_constant(Value::Var(var))
}

/// Slot numbers for a function's formals. A repeated name binds the later
/// position.
pub(crate) fn slots(symbols: &[Symbol]) -> HashMap<Symbol, usize> {
    symbols
        .iter()
        .enumerate()
        .map(|(idx, sym)| (sym.clone(), idx))
        .collect()
}
