//! TISC operation codes.
//!
//! The enumeration is closed and append-only: a value's numeric code is
//! part of the binary format, so new opcodes go at the end and existing
//! codes never move.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// TISC operation codes.
///
/// The machine is register-based. Operand roles per opcode are listed on
/// each variant as `a`, `b`, `c` (register indices) and `imm` (the 64-bit
/// immediate field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // System
    // =========================================================================
    /// No operation.
    Nop = 0,
    /// Stop the machine.
    Halt,

    // =========================================================================
    // Data Movement
    // =========================================================================
    /// `a = imm`
    LoadImm,
    /// `a = memory[imm]`
    Load,
    /// `memory[imm] = a`
    Store,

    // =========================================================================
    // Arithmetic
    // =========================================================================
    /// `a = b + c`
    Add,
    /// `a = b - c`
    Sub,
    /// `a = b * c`
    Mul,
    /// `a = b / c`, truncating.
    Div,
    /// `a = b % c`, sign follows the dividend.
    Mod,
    /// `a = -b`
    Neg,
    /// `a = a + 1`
    Inc,
    /// `a = a - 1`
    Dec,
    /// `a = b`
    Mov,
    /// Set flags from `a - b` without writing a register.
    Cmp,

    // =========================================================================
    // Stack
    // =========================================================================
    /// Push register `a`.
    Push,
    /// Pop into register `a`.
    Pop,

    // =========================================================================
    // Control Flow
    // =========================================================================
    /// `pc = imm`
    Jump,
    /// `pc = imm` if register `a` is zero.
    JumpIfZero,
    /// `pc = imm` if register `a` is non-zero.
    JumpIfNotZero,
    /// `pc = imm` if the negative flag is set.
    JumpIfNegative,
    /// Push the return address and jump to the offset held in register `a`.
    Call,
    /// Pop a return address and jump to it.
    Ret,
    /// Raise a trap fault unconditionally.
    Trap,

    // =========================================================================
    // Axion (privileged)
    // =========================================================================
    /// Read Axion slot `imm` into register `a`.
    AxRead,
    /// Publish register `a` to Axion slot `imm`.
    AxSet,
    /// Ask Axion to verify the current state; result code into register `a`.
    AxVerify,
}

impl OpCode {
    /// The highest valid opcode value.
    pub const LAST: OpCode = OpCode::AxVerify;

    /// Convert from u8, returning None for values outside the enumeration.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Number of leading operands (`a`, then `b`, then `c`) that name registers.
    ///
    /// Operands past this count are unused and must be zero.
    pub fn register_operands(self) -> usize {
        match self {
            OpCode::Nop
            | OpCode::Halt
            | OpCode::Jump
            | OpCode::JumpIfNegative
            | OpCode::Ret
            | OpCode::Trap => 0,

            OpCode::LoadImm
            | OpCode::Load
            | OpCode::Store
            | OpCode::Inc
            | OpCode::Dec
            | OpCode::Push
            | OpCode::Pop
            | OpCode::JumpIfZero
            | OpCode::JumpIfNotZero
            | OpCode::Call
            | OpCode::AxRead
            | OpCode::AxSet
            | OpCode::AxVerify => 1,

            OpCode::Neg | OpCode::Mov | OpCode::Cmp => 2,

            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Mod => 3,
        }
    }

    /// Whether the immediate field carries a value for this opcode.
    pub fn uses_immediate(self) -> bool {
        matches!(
            self,
            OpCode::LoadImm
                | OpCode::Load
                | OpCode::Store
                | OpCode::Jump
                | OpCode::JumpIfZero
                | OpCode::JumpIfNotZero
                | OpCode::JumpIfNegative
                | OpCode::AxRead
                | OpCode::AxSet
        )
    }

    /// Whether the immediate is an instruction offset.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            OpCode::Jump | OpCode::JumpIfZero | OpCode::JumpIfNotZero | OpCode::JumpIfNegative
        )
    }

    /// Whether execution must be cleared by the authorization hook first.
    pub fn is_privileged(self) -> bool {
        matches!(self, OpCode::AxRead | OpCode::AxSet | OpCode::AxVerify)
    }

    /// Get the mnemonic used by the disassembler.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Nop => "NOP",
            OpCode::Halt => "HALT",
            OpCode::LoadImm => "LOADI",
            OpCode::Load => "LOAD",
            OpCode::Store => "STORE",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Mod => "MOD",
            OpCode::Neg => "NEG",
            OpCode::Inc => "INC",
            OpCode::Dec => "DEC",
            OpCode::Mov => "MOV",
            OpCode::Cmp => "CMP",
            OpCode::Push => "PUSH",
            OpCode::Pop => "POP",
            OpCode::Jump => "JMP",
            OpCode::JumpIfZero => "JZ",
            OpCode::JumpIfNotZero => "JNZ",
            OpCode::JumpIfNegative => "JN",
            OpCode::Call => "CALL",
            OpCode::Ret => "RET",
            OpCode::Trap => "TRAP",
            OpCode::AxRead => "AXREAD",
            OpCode::AxSet => "AXSET",
            OpCode::AxVerify => "AXVERIFY",
        }
    }
}
