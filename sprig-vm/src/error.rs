// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Errors surfaced by the read-compile-run pipeline.

use std::io;

use sprig_core::Value;
use sprig_reader::ReaderError;
use thiserror::Error;

use crate::chunk::CodeChunk;
use crate::compiler::CompileError;

/// Any failure while reading, compiling or running source.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Reader(#[from] ReaderError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] sprig_core::Error),

    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),
}

/// Result type for the pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// A multi-form session that stopped early.
///
/// `chunk` holds the forms that ran successfully, terminated so it can be
/// run on its own; `value` is the result of the last of them (nil if none).
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SessionError {
    pub chunk: CodeChunk,
    pub value: Value,
    #[source]
    pub error: Error,
}
