// sprig-vm - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers for Sprig VM integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! #[macro_use]
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`core_namespace`] - A `core` namespace with a handful of host natives
//! - [`new_compiler`] - A compiler over a `user` namespace referring `core`
//! - [`run`] - Compile and run source in a fresh session
//! - [`run_with`] - Compile and run source in an existing session
//! - [`run_err`] - Compile and run source, expecting an error message
//!
//! # Macros
//!
//! - [`assert_eval!`] - Assert that source evaluates to an expected value
//! - [`assert_eval_err!`] - Assert that source fails with a message fragment

#![allow(dead_code, unused_imports, unused_macros)]

pub use sprig_core::{Error as RuntimeError, Namespace, NativeFn, Symbol, Value};
pub use sprig_vm::{CodeChunk, Compiler, Frame};

/// Install a test logger once; later calls are no-ops.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ints(name: &str, args: &[Value]) -> Result<Vec<i64>, RuntimeError> {
    args.iter()
        .map(|arg| match arg {
            Value::Int(n) => Ok(*n),
            other => Err(RuntimeError::type_error_in(name, "int", other.type_name())),
        })
        .collect()
}

fn checked(name: &str, result: Option<i64>) -> Result<Value, RuntimeError> {
    result
        .map(Value::Int)
        .ok_or_else(|| RuntimeError::Message(format!("{}: integer overflow", name)))
}

/// A `core` namespace holding `+ - * = vector hash-map list set-macro!`.
pub fn core_namespace() -> Namespace {
    let core = Namespace::new("core");

    core.def(
        "+",
        Value::func(NativeFn::new("+", |args| {
            let sum = ints("+", args)?
                .into_iter()
                .try_fold(0i64, |acc, n| acc.checked_add(n));
            checked("+", sum)
        })),
    );
    core.def(
        "*",
        Value::func(NativeFn::new("*", |args| {
            let product = ints("*", args)?
                .into_iter()
                .try_fold(1i64, |acc, n| acc.checked_mul(n));
            checked("*", product)
        })),
    );
    core.def(
        "-",
        Value::func(NativeFn::new("-", |args| {
            let nums = ints("-", args)?;
            match nums.split_first() {
                None => Err(RuntimeError::arity_at_least(1, 0).named("-")),
                Some((n, [])) => checked("-", n.checked_neg()),
                Some((first, rest)) => {
                    let diff = rest.iter().try_fold(*first, |acc, n| acc.checked_sub(*n));
                    checked("-", diff)
                }
            }
        })),
    );
    core.def(
        "=",
        Value::func(NativeFn::new("=", |args| {
            Ok(Value::Bool(args.windows(2).all(|w| w[0] == w[1])))
        })),
    );
    core.def(
        "vector",
        Value::func(NativeFn::new("vector", |args| Ok(Value::vector(args.to_vec())))),
    );
    core.def(
        "list",
        Value::func(NativeFn::new("list", |args| Ok(Value::list(args.to_vec())))),
    );
    core.def(
        "hash-map",
        Value::func(NativeFn::new("hash-map", |args| {
            if args.len() % 2 != 0 {
                return Err(RuntimeError::Message(
                    "hash-map: odd number of arguments".to_string(),
                ));
            }
            Ok(Value::map(
                args.chunks(2)
                    .map(|kv| (kv[0].clone(), kv[1].clone()))
                    .collect(),
            ))
        })),
    );
    core.def(
        "set-macro!",
        Value::func(NativeFn::with_arity("set-macro!", 1, |args| match &args[0] {
            Value::Var(var) => {
                var.set_macro(true);
                Ok(args[0].clone())
            }
            other => Err(RuntimeError::type_error_in("set-macro!", "var", other.type_name())),
        })),
    );

    core
}

/// A `user` namespace that refers every Var of a fresh `core`.
pub fn new_namespace() -> Namespace {
    let user = Namespace::new("user");
    user.refer(&core_namespace(), None, true);
    user
}

pub fn new_compiler() -> Compiler {
    init_logger();
    Compiler::new(new_namespace())
}

/// Compile and run every form of `src` in a fresh session.
pub fn run(src: &str) -> Result<Value, String> {
    run_with(&new_compiler(), src)
}

/// Compile and run every form of `src` in `compiler`'s session.
pub fn run_with(compiler: &Compiler, src: &str) -> Result<Value, String> {
    compiler
        .compile_multiple(src)
        .map(|(_, value)| value)
        .map_err(|e| e.to_string())
}

/// Run `src`, expecting failure, and return the error message.
pub fn run_err(src: &str) -> String {
    match run(src) {
        Ok(value) => panic!("expected '{}' to fail, got {}", src, value),
        Err(message) => message,
    }
}

/// Read a single form.
pub fn read(src: &str) -> Value {
    let mut forms = sprig_reader::read_all(src).expect("source should read");
    assert_eq!(forms.len(), 1, "expected exactly one form in '{}'", src);
    forms.remove(0)
}

pub fn int(n: i64) -> Value {
    Value::Int(n)
}

/// Assert that running `src` produces the expected value.
macro_rules! assert_eval {
    ($src:expr, $expected:expr) => {
        match $crate::common::run($src) {
            Ok(value) => assert_eq!(
                value, $expected,
                "evaluation of '{}' did not match expected",
                $src
            ),
            Err(e) => panic!("failed to evaluate '{}': {}", $src, e),
        }
    };
}

/// Assert that running `src` fails with a message containing `fragment`.
macro_rules! assert_eval_err {
    ($src:expr, $fragment:expr) => {
        let message = $crate::common::run_err($src);
        assert!(
            message.contains($fragment),
            "error for '{}' was '{}', expected it to contain '{}'",
            $src,
            message,
            $fragment
        );
    };
}
