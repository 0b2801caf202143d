// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Compile-time errors.

use thiserror::Error;

/// Boxed underlying cause, e.g. the runtime fault of a failed macro.
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// A form that could not be compiled.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    #[source]
    pub cause: Option<Cause>,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        CompileError {
            message: message.into(),
            cause: None,
        }
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// The fixed wording used by every special form for operand-count errors.
    pub(crate) fn wrong_forms(form: &str, got: usize, need: &str) -> Self {
        CompileError::new(format!(
            "{}: wrong number of forms ({}), need {}",
            form, got, need
        ))
    }
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;
