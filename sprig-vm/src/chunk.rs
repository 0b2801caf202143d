// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Bytecode chunks and the session constant pool.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sprig_core::Value;

use crate::opcode::{OPERAND_SIZE, OpCode};

/// An append-only table of constants shared by every chunk compiled in one
/// session. Indices are stable once assigned because bytecode embeds them.
#[derive(Clone, Default)]
pub struct ConstPool {
    values: Rc<RefCell<Vec<Value>>>,
}

impl ConstPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of a constant equal to `value`, appending it if absent.
    ///
    /// Returns `None` once the pool no longer fits a 4-byte operand.
    pub fn intern(&self, value: Value) -> Option<usize> {
        let mut values = self.values.borrow_mut();
        if let Some(idx) = values.iter().position(|existing| *existing == value) {
            return Some(idx);
        }
        let idx = values.len();
        if i32::try_from(idx).is_err() {
            return None;
        }
        values.push(value);
        Some(idx)
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.values.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Whether two handles refer to the same pool.
    pub fn same_pool(&self, other: &ConstPool) -> bool {
        Rc::ptr_eq(&self.values, &other.values)
    }
}

impl fmt::Debug for ConstPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.borrow().iter()).finish()
    }
}

/// A unit of bytecode plus the constant pool its `LDC` operands index.
#[derive(Clone)]
pub struct CodeChunk {
    code: Vec<u8>,
    pool: ConstPool,
}

impl CodeChunk {
    pub fn new(pool: ConstPool) -> Self {
        Self {
            code: Vec::new(),
            pool,
        }
    }

    /// Emit an instruction that takes no operand.
    pub fn emit(&mut self, op: OpCode) {
        debug_assert!(!op.has_operand(), "{} needs an operand", op.mnemonic());
        self.code.push(op.as_byte());
    }

    /// Emit an instruction with its 4-byte operand.
    pub fn emit_with_operand(&mut self, op: OpCode, operand: i32) {
        debug_assert!(op.has_operand(), "{} takes no operand", op.mnemonic());
        self.code.push(op.as_byte());
        self.code.extend_from_slice(&operand.to_le_bytes());
    }

    /// Overwrite the operand of the instruction starting at `at`.
    ///
    /// Returns `None` if no operand-carrying instruction starts there.
    pub fn update_operand(&mut self, at: usize, operand: i32) -> Option<()> {
        let op = OpCode::from_byte(*self.code.get(at)?)?;
        if !op.has_operand() {
            return None;
        }
        let slot = self.code.get_mut(at + 1..at + 1 + OPERAND_SIZE)?;
        slot.copy_from_slice(&operand.to_le_bytes());
        Some(())
    }

    /// Decode the operand bytes starting at `at`.
    #[inline]
    pub fn read_operand(&self, at: usize) -> Option<i32> {
        let bytes = self.code.get(at..at + OPERAND_SIZE)?;
        Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Append another chunk's bytecode. Both must share one pool, since the
    /// copied `LDC` operands are not renumbered.
    pub fn append_chunk(&mut self, other: &CodeChunk) {
        debug_assert!(self.pool.same_pool(&other.pool));
        self.code.extend_from_slice(&other.code);
    }

    /// Address the next emitted instruction will occupy.
    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    #[inline]
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    #[inline]
    pub fn pool(&self) -> &ConstPool {
        &self.pool
    }

    /// Decoded instructions as `(address, opcode, operand)`. Stops at the
    /// first byte that is not a valid instruction.
    pub fn instructions(&self) -> Vec<(usize, OpCode, Option<i32>)> {
        let mut out = Vec::new();
        let mut at = 0;
        while let Some(op) = self.code.get(at).copied().and_then(OpCode::from_byte) {
            let operand = if op.has_operand() {
                match self.read_operand(at + 1) {
                    Some(n) => Some(n),
                    None => break,
                }
            } else {
                None
            };
            out.push((at, op, operand));
            at += op.width();
        }
        out
    }
}

impl fmt::Debug for CodeChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeChunk")
            .field("len", &self.code.len())
            .field("constants", &self.pool.len())
            .finish()
    }
}

/// Disassembly listing, one instruction per line.
impl fmt::Display for CodeChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (at, op, operand) in self.instructions() {
            write!(f, "{:04} {}", at, op.mnemonic())?;
            if let Some(n) = operand {
                write!(f, " {}", n)?;
                match op {
                    OpCode::Ldc => {
                        if let Some(value) = usize::try_from(n).ok().and_then(|i| self.pool.get(i))
                        {
                            write!(f, "\t; {}", value)?;
                        }
                    }
                    OpCode::Brf | OpCode::Jmp => {
                        write!(f, "\t; -> {:04}", at as i64 + i64::from(n))?;
                    }
                    _ => {}
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_idempotent() {
        let pool = ConstPool::new();
        let a = pool.intern(Value::Int(42));
        let b = pool.intern(Value::string("x"));
        assert_eq!(pool.intern(Value::Int(42)), a);
        assert_eq!(pool.intern(Value::string("x")), b);
        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_intern_distinguishes_kinds() {
        let pool = ConstPool::new();
        let list = pool.intern(Value::list(vec![]));
        let vector = pool.intern(Value::vector(vec![]));
        assert_ne!(list, vector);
    }

    #[test]
    fn test_emit_encoding() {
        let mut chunk = CodeChunk::new(ConstPool::new());
        chunk.emit_with_operand(OpCode::Ldc, 258);
        chunk.emit(OpCode::Ret);
        assert_eq!(chunk.code(), &[0, 2, 1, 0, 0, 10]);
        assert_eq!(chunk.read_operand(1), Some(258));
    }

    #[test]
    fn test_update_operand() {
        let mut chunk = CodeChunk::new(ConstPool::new());
        chunk.emit(OpCode::Pop);
        chunk.emit_with_operand(OpCode::Jmp, 0);
        assert_eq!(chunk.update_operand(1, -7), Some(()));
        assert_eq!(chunk.read_operand(2), Some(-7));
        assert_eq!(chunk.code()[1], OpCode::Jmp.as_byte());
        // POP has no operand to patch
        assert_eq!(chunk.update_operand(0, 1), None);
        assert_eq!(chunk.update_operand(99, 1), None);
    }

    #[test]
    fn test_append_chunk_shares_pool() {
        let pool = ConstPool::new();
        let mut a = CodeChunk::new(pool.clone());
        let mut b = CodeChunk::new(pool.clone());
        a.emit(OpCode::Pop);
        b.emit_with_operand(OpCode::Lda, 0);
        a.append_chunk(&b);
        assert_eq!(a.len(), 6);
        assert!(a.pool().same_pool(&pool));
    }

    #[test]
    fn test_disassembly() {
        let pool = ConstPool::new();
        let mut chunk = CodeChunk::new(pool.clone());
        let idx = pool.intern(Value::Int(7)).unwrap() as i32;
        chunk.emit_with_operand(OpCode::Ldc, idx);
        chunk.emit_with_operand(OpCode::Brf, 6);
        chunk.emit(OpCode::Ret);
        let listing = chunk.to_string();
        assert_eq!(listing, "0000 LDC 0\t; 7\n0005 BRF 6\t; -> 0011\n0010 RET\n");
    }
}
