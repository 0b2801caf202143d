// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Forward-branch placeholders.

use crate::chunk::CodeChunk;
use crate::opcode::OpCode;

use super::error::{CompileError, Result};

/// A jump emitted before its target is known.
///
/// [`Patch::resolve`] points it at the current end of the chunk, rewriting
/// only the operand bytes.
#[derive(Debug)]
#[must_use = "an unresolved jump falls through to its own next instruction"]
pub(crate) struct Patch {
    at: usize,
}

impl Patch {
    /// Emit `op` with a zero displacement and remember where it starts.
    pub(crate) fn emit(chunk: &mut CodeChunk, op: OpCode) -> Patch {
        debug_assert!(op.is_jump());
        let at = chunk.len();
        chunk.emit_with_operand(op, 0);
        Patch { at }
    }

    /// Target the next instruction to be emitted.
    pub(crate) fn resolve(self, chunk: &mut CodeChunk) -> Result<()> {
        let displacement = i32::try_from(chunk.len() - self.at)
            .map_err(|_| CompileError::new("branch displacement out of range"))?;
        chunk
            .update_operand(self.at, displacement)
            .ok_or_else(|| CompileError::new(format!("no jump to patch at {}", self.at)))
    }
}
