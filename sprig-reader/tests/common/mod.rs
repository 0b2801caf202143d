// sprig-reader - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for reader integration tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code, unused_imports)]

pub use sprig_core::{Keyword, Symbol, Value};
pub use sprig_reader::{Reader, ReaderError, read_all};

/// Install the test logger once; repeated calls are harmless.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Read exactly one form from `src`, panicking on errors or empty input.
pub fn read_one(src: &str) -> Value {
    init_logger();
    match Reader::new(src).read() {
        Ok(Some(form)) => form,
        Ok(None) => panic!("no form in {:?}", src),
        Err(e) => panic!("failed to read {:?}: {}", src, e),
    }
}

/// Read from `src` expecting an error.
pub fn read_err(src: &str) -> ReaderError {
    init_logger();
    let mut reader = Reader::new(src).with_input_name("test.sp");
    loop {
        match reader.read() {
            Ok(Some(_)) => continue,
            Ok(None) => panic!("expected a read error for {:?}", src),
            Err(e) => return e,
        }
    }
}

/// Just the message of the error reading `src`.
pub fn read_err_message(src: &str) -> String {
    read_err(src).message
}

/// Print `value` and read it back.
pub fn reprint(value: &Value) -> Value {
    read_one(&value.to_string())
}
