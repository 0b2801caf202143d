// sprig-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for sprig-core integration tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code, unused_imports)]

pub use sprig_core::{
    AritySpec, Error, FromValue, IntoValue, Invoke, Keyword, NativeFn, Namespace, Symbol,
    TypeTag, Value, Var, from_value, to_value,
};

/// Install the test logger once; repeated calls are harmless.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `sym` parsed from `name` or `ns/name`.
pub fn sym(s: &str) -> Symbol {
    Symbol::parse(s)
}

/// A native that returns its arguments as a list.
pub fn list_fn() -> Value {
    Value::func(NativeFn::new("list", |args| Ok(Value::list(args.to_vec()))))
}

/// A two-argument native adding ints.
pub fn add_fn() -> Value {
    Value::func(NativeFn::with_arity("add", 2, |args| {
        let a = i64::from_value(&args[0])?;
        let b = i64::from_value(&args[1])?;
        Ok(Value::Int(a + b))
    }))
}
