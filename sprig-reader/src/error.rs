// sprig-reader - S-expression reader for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Reader error with source position.

use thiserror::Error;

/// Boxed underlying cause, e.g. the integer parse failure behind a bad number.
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// A syntax error found while reading.
#[derive(Debug, Error)]
#[error("{input_name}:{line}:{column}: {message}")]
pub struct ReaderError {
    pub input_name: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    #[source]
    pub cause: Option<Cause>,
}

impl ReaderError {
    pub fn new(input_name: &str, line: usize, column: usize, message: impl Into<String>) -> Self {
        ReaderError {
            input_name: input_name.to_string(),
            line,
            column,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the error that triggered this one.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}
