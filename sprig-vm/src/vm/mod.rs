// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Stack-based execution of Sprig bytecode.
//!
//! Each invocation of a compiled function runs in its own [`Frame`]. Nested
//! calls recurse through the host stack, so the nesting depth is bounded by
//! a per-thread limit that turns runaway recursion into an ordinary error.

pub mod frame;
pub mod stack;

use std::cell::Cell;

use sprig_core::{Error, Result};

pub use frame::Frame;
pub use stack::ValueStack;

/// Maximum frame nesting. Can be configured via `set_max_call_depth`.
const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

thread_local! {
    static CALL_DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_CALL_DEPTH: Cell<usize> = const { Cell::new(DEFAULT_MAX_CALL_DEPTH) };
}

/// Set the maximum frame nesting depth for this thread. Returns the
/// previous value.
pub fn set_max_call_depth(depth: usize) -> usize {
    MAX_CALL_DEPTH.with(|d| d.replace(depth))
}

/// Get the maximum frame nesting depth for this thread.
#[inline]
#[must_use]
pub fn max_call_depth() -> usize {
    MAX_CALL_DEPTH.with(|d| d.get())
}

/// Get the number of frames currently running on this thread.
#[inline]
#[must_use]
pub fn call_depth() -> usize {
    CALL_DEPTH.with(|d| d.get())
}

/// RAII guard around one running frame.
pub(crate) struct CallDepthGuard;

impl CallDepthGuard {
    pub(crate) fn enter() -> Result<Self> {
        let (current, max) = CALL_DEPTH.with(|d| {
            let current = d.get() + 1;
            d.set(current);
            (current, max_call_depth())
        });
        if current > max {
            CALL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
            Err(Error::CallDepthExceeded(max))
        } else {
            Ok(CallDepthGuard)
        }
    }
}

impl Drop for CallDepthGuard {
    fn drop(&mut self) {
        CALL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
