// sprig-core - Value model, symbols, vars and namespaces for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Runtime fault type shared by native functions and the VM.

use std::fmt;

use thiserror::Error;

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised while invoking functions or executing bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Wrong number of arguments to a function
    #[error("{}", arity_message(.name, .expected, .got))]
    Arity {
        expected: AritySpec,
        got: usize,
        name: Option<String>,
    },

    /// Attempted to invoke something that isn't invocable
    #[error("cannot invoke value of type {0}")]
    NotCallable(&'static str),

    /// Wrong type for an operation
    #[error("{}", type_message(.context, .expected, .got))]
    Type {
        expected: &'static str,
        got: &'static str,
        context: Option<String>,
    },

    /// Invocation nested deeper than the configured maximum
    #[error("maximum call depth ({0}) exceeded")]
    CallDepthExceeded(usize),

    /// Bytecode that no compiler would produce
    #[error("malformed bytecode: {0}")]
    Bytecode(String),

    /// General runtime error
    #[error("{0}")]
    Message(String),
}

/// Expected arity of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AritySpec {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl fmt::Display for AritySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AritySpec::Exact(n) => write!(f, "{}", n),
            AritySpec::AtLeast(n) => write!(f, "at least {}", n),
            AritySpec::Range(min, max) => write!(f, "{} to {}", min, max),
        }
    }
}

fn arity_message(name: &Option<String>, expected: &AritySpec, got: &usize) -> String {
    match name {
        Some(name) => format!(
            "wrong number of arguments to '{}': expected {}, got {}",
            name, expected, got
        ),
        None => format!(
            "wrong number of arguments: expected {}, got {}",
            expected, got
        ),
    }
}

fn type_message(context: &Option<String>, expected: &str, got: &str) -> String {
    match context {
        Some(ctx) => format!("{}: expected {}, got {}", ctx, expected, got),
        None => format!("type error: expected {}, got {}", expected, got),
    }
}

impl Error {
    /// Create an arity error for exact arity.
    pub fn arity(expected: usize, got: usize) -> Self {
        Error::Arity {
            expected: AritySpec::Exact(expected),
            got,
            name: None,
        }
    }

    /// Create an arity error for minimum arity.
    pub fn arity_at_least(expected: usize, got: usize) -> Self {
        Error::Arity {
            expected: AritySpec::AtLeast(expected),
            got,
            name: None,
        }
    }

    /// Create an arity error for a bounded range.
    pub fn arity_range(min: usize, max: usize, got: usize) -> Self {
        Error::Arity {
            expected: AritySpec::Range(min, max),
            got,
            name: None,
        }
    }

    /// Attach a function name to an arity error. Other errors pass through.
    pub fn named(self, fn_name: impl Into<String>) -> Self {
        match self {
            Error::Arity { expected, got, .. } => Error::Arity {
                expected,
                got,
                name: Some(fn_name.into()),
            },
            other => other,
        }
    }

    /// Create a type error.
    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        Error::Type {
            expected,
            got,
            context: None,
        }
    }

    /// Create a type error with context.
    pub fn type_error_in(
        context: impl Into<String>,
        expected: &'static str,
        got: &'static str,
    ) -> Self {
        Error::Type {
            expected,
            got,
            context: Some(context.into()),
        }
    }

    /// Create a malformed-bytecode error.
    pub fn bytecode(message: impl Into<String>) -> Self {
        Error::Bytecode(message.into())
    }
}
