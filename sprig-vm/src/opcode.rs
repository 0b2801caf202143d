// sprig-vm - Bytecode compiler and virtual machine for the Sprig language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Bytecode instruction definitions.
//!
//! An instruction is one opcode byte, optionally followed by a 4-byte signed
//! little-endian operand. Jump displacements are measured from the first byte
//! of the jump instruction.

/// Size in bytes of an instruction operand.
pub const OPERAND_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Loads
    // =========================================================================
    /// `LDC n`: push constant `n`.
    Ldc = 0,

    /// `LDA n`: push formal argument `n`.
    Lda = 1,

    /// `LDK n`: push captured slot `n` of the running closure.
    Ldk = 2,

    // =========================================================================
    // Vars
    // =========================================================================
    /// `LDV`: pop a Var, push its root value.
    Ldv = 3,

    /// `STV`: pop a value, pop a Var, set the Var's root, push the value.
    Stv = 4,

    // =========================================================================
    // Calls & Closures
    // =========================================================================
    /// `INV n`: pop `n` arguments and the function below them, push the
    /// result of invoking it.
    Inv = 5,

    /// `MKC n`: pop `n` captured values and the `Func` below them, push a
    /// closure over those values.
    Mkc = 6,

    // =========================================================================
    // Control Flow
    // =========================================================================
    /// `BRF d`: pop; if falsy, jump by `d` from the start of this instruction.
    Brf = 7,

    /// `JMP d`: jump by `d` from the start of this instruction.
    Jmp = 8,

    /// `POP`: discard the top of stack.
    Pop = 9,

    /// `RET`: end the frame with the top of stack as its result.
    Ret = 10,
}

impl OpCode {
    /// Decode an opcode byte.
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        Some(match byte {
            0 => OpCode::Ldc,
            1 => OpCode::Lda,
            2 => OpCode::Ldk,
            3 => OpCode::Ldv,
            4 => OpCode::Stv,
            5 => OpCode::Inv,
            6 => OpCode::Mkc,
            7 => OpCode::Brf,
            8 => OpCode::Jmp,
            9 => OpCode::Pop,
            10 => OpCode::Ret,
            _ => return None,
        })
    }

    #[inline]
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Whether a 4-byte operand follows the opcode.
    #[inline]
    pub fn has_operand(self) -> bool {
        matches!(
            self,
            OpCode::Ldc
                | OpCode::Lda
                | OpCode::Ldk
                | OpCode::Inv
                | OpCode::Mkc
                | OpCode::Brf
                | OpCode::Jmp
        )
    }

    /// Total encoded length of the instruction.
    #[inline]
    pub fn width(self) -> usize {
        if self.has_operand() {
            1 + OPERAND_SIZE
        } else {
            1
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, OpCode::Brf | OpCode::Jmp)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Ldc => "LDC",
            OpCode::Lda => "LDA",
            OpCode::Ldk => "LDK",
            OpCode::Ldv => "LDV",
            OpCode::Stv => "STV",
            OpCode::Inv => "INV",
            OpCode::Mkc => "MKC",
            OpCode::Brf => "BRF",
            OpCode::Jmp => "JMP",
            OpCode::Pop => "POP",
            OpCode::Ret => "RET",
        }
    }
}
