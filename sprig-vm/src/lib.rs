// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Bytecode compiler and stack-based virtual machine for Sprig.
//!
//! Forms read by `sprig-reader` are compiled into [`CodeChunk`]s by a
//! [`Compiler`] session and executed by a [`Frame`]. Compiled functions are
//! [`Func`] values (or [`Closure`]s when they capture enclosing bindings) and
//! are invoked through the same [`sprig_core::Invoke`] capability as host
//! functions.
//!
//! ```ignore
//! let ns = Namespace::new("user");
//! let compiler = Compiler::new(ns);
//! let (_chunk, value) = compiler.compile_multiple("(def x 40) x")?;
//! ```

pub mod chunk;
pub mod compiler;
pub mod error;
pub mod func;
pub mod opcode;
pub mod vm;

pub use chunk::{CodeChunk, ConstPool};
pub use compiler::{CompileError, Compiler};
pub use error::{Error, Result, SessionError};
pub use func::{Closure, Func};
pub use opcode::OpCode;
pub use vm::{Frame, call_depth, max_call_depth, set_max_call_depth};
