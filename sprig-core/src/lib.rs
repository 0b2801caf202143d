// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # sprig-core
//!
//! The value model shared by the Sprig reader, compiler and virtual machine:
//! the tagged [`Value`] type, interned [`Symbol`]s and [`Keyword`]s,
//! namespace-owned [`Var`]s, the [`Invoke`] capability and the runtime
//! [`Error`] type.

pub mod convert;
pub mod error;
pub mod function;
mod intern;
pub mod keyword;
pub mod namespace;
pub mod symbol;
pub mod value;
pub mod var;

pub use convert::{FromValue, IntoValue, from_value, to_value};
pub use error::{AritySpec, Error, Result};
pub use function::{Invoke, NativeFn};
pub use im::{OrdMap, Vector};
pub use keyword::Keyword;
pub use namespace::Namespace;
pub use symbol::Symbol;
pub use value::{TypeTag, Value};
pub use var::Var;
