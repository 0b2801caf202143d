// sprig-reader - S-expression reader for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # sprig-reader
//!
//! Turns s-expression text into [`sprig_core::Value`] forms, one per call to
//! [`Reader::read`].

pub mod error;
pub mod reader;

pub use error::ReaderError;
pub use reader::{Reader, Result, read_all};
