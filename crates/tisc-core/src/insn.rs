//! The fixed-shape instruction record.

use std::fmt;

use bitflags::bitflags;

use crate::OpCode;

/// Number of general registers (`R0..R26`).
pub const REGISTER_COUNT: usize = 27;

/// Register receiving function results.
pub const RETURN_REGISTER: u32 = 0;

/// Upper-bound register; valid for the machine, never allocated by codegen.
pub const RESERVED_REGISTER: u32 = 26;

bitflags! {
    /// Annotation bits on an instruction.
    ///
    /// The interpreter ignores them. Bits without a named constant are kept
    /// as-is so that any 32-bit value survives an encode/decode round trip.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InsnFlags: u32 {
        /// First instruction of a compiled function.
        const FUNCTION_ENTRY = 1 << 0;
        /// Immediate is a branch target filled in by backpatching.
        const PATCHED_BRANCH = 1 << 1;
        /// Immediate is a call target filled in by the link pass.
        const LINKED_CALL = 1 << 2;
    }
}

impl Default for InsnFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One instruction.
///
/// Operands the opcode does not use are zero; the constructors below are
/// the supported way to build instructions and uphold that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Insn {
    /// Operation.
    pub opcode: OpCode,
    /// First general operand.
    pub a: u32,
    /// Second general operand.
    pub b: u32,
    /// Third general operand.
    pub c: u32,
    /// Immediate value, memory address, or branch target.
    pub imm: i64,
    /// Annotation bits.
    pub flags: InsnFlags,
}

impl Insn {
    /// An instruction with every operand zeroed.
    pub const fn new(opcode: OpCode) -> Self {
        Self {
            opcode,
            a: 0,
            b: 0,
            c: 0,
            imm: 0,
            flags: InsnFlags::empty(),
        }
    }

    pub const fn nop() -> Self {
        Self::new(OpCode::Nop)
    }

    pub const fn halt() -> Self {
        Self::new(OpCode::Halt)
    }

    pub const fn ret() -> Self {
        Self::new(OpCode::Ret)
    }

    pub const fn trap() -> Self {
        Self::new(OpCode::Trap)
    }

    pub const fn load_imm(dst: u32, value: i64) -> Self {
        Self {
            a: dst,
            imm: value,
            ..Self::new(OpCode::LoadImm)
        }
    }

    pub const fn load(dst: u32, address: i64) -> Self {
        Self {
            a: dst,
            imm: address,
            ..Self::new(OpCode::Load)
        }
    }

    pub const fn store(src: u32, address: i64) -> Self {
        Self {
            a: src,
            imm: address,
            ..Self::new(OpCode::Store)
        }
    }

    /// A three-register arithmetic instruction: `dst = lhs <op> rhs`.
    pub const fn binary(opcode: OpCode, dst: u32, lhs: u32, rhs: u32) -> Self {
        Self {
            a: dst,
            b: lhs,
            c: rhs,
            ..Self::new(opcode)
        }
    }

    pub const fn neg(dst: u32, src: u32) -> Self {
        Self {
            a: dst,
            b: src,
            ..Self::new(OpCode::Neg)
        }
    }

    pub const fn inc(reg: u32) -> Self {
        Self {
            a: reg,
            ..Self::new(OpCode::Inc)
        }
    }

    pub const fn dec(reg: u32) -> Self {
        Self {
            a: reg,
            ..Self::new(OpCode::Dec)
        }
    }

    pub const fn mov(dst: u32, src: u32) -> Self {
        Self {
            a: dst,
            b: src,
            ..Self::new(OpCode::Mov)
        }
    }

    pub const fn cmp(lhs: u32, rhs: u32) -> Self {
        Self {
            a: lhs,
            b: rhs,
            ..Self::new(OpCode::Cmp)
        }
    }

    pub const fn push(src: u32) -> Self {
        Self {
            a: src,
            ..Self::new(OpCode::Push)
        }
    }

    pub const fn pop(dst: u32) -> Self {
        Self {
            a: dst,
            ..Self::new(OpCode::Pop)
        }
    }

    pub const fn jump(target: i64) -> Self {
        Self {
            imm: target,
            ..Self::new(OpCode::Jump)
        }
    }

    pub const fn jump_if_zero(cond: u32, target: i64) -> Self {
        Self {
            a: cond,
            imm: target,
            ..Self::new(OpCode::JumpIfZero)
        }
    }

    pub const fn jump_if_not_zero(cond: u32, target: i64) -> Self {
        Self {
            a: cond,
            imm: target,
            ..Self::new(OpCode::JumpIfNotZero)
        }
    }

    pub const fn jump_if_negative(target: i64) -> Self {
        Self {
            imm: target,
            ..Self::new(OpCode::JumpIfNegative)
        }
    }

    /// Call the function whose entry offset is held in `target`.
    pub const fn call(target: u32) -> Self {
        Self {
            a: target,
            ..Self::new(OpCode::Call)
        }
    }

    pub const fn ax_read(dst: u32, tag: i64) -> Self {
        Self {
            a: dst,
            imm: tag,
            ..Self::new(OpCode::AxRead)
        }
    }

    pub const fn ax_set(src: u32, tag: i64) -> Self {
        Self {
            a: src,
            imm: tag,
            ..Self::new(OpCode::AxSet)
        }
    }

    pub const fn ax_verify(dst: u32) -> Self {
        Self {
            a: dst,
            ..Self::new(OpCode::AxVerify)
        }
    }

    /// Return a copy with the given annotation bits added.
    pub const fn with_flags(mut self, flags: InsnFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    /// The register operands this instruction names, in `a, b, c` order.
    pub fn registers(&self) -> impl Iterator<Item = u32> + '_ {
        [self.a, self.b, self.c]
            .into_iter()
            .take(self.opcode.register_operands())
    }

    /// Whether every operand the opcode does not use is zero.
    pub fn is_canonical(&self) -> bool {
        let used = self.opcode.register_operands();
        let operands = [self.a, self.b, self.c];
        operands[used..].iter().all(|&v| v == 0) && (self.opcode.uses_immediate() || self.imm == 0)
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode.name())?;

        let mut sep = " ";
        for reg in self.registers() {
            write!(f, "{sep}r{reg}")?;
            sep = ", ";
        }

        if self.opcode.uses_immediate() {
            if self.opcode.is_branch() {
                write!(f, "{sep}@{}", self.imm)?;
            } else {
                write!(f, "{sep}{}", self.imm)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_zero_unused_fields() {
        let insns = [
            Insn::halt(),
            Insn::load_imm(3, -7),
            Insn::binary(OpCode::Sub, 1, 2, 3),
            Insn::mov(4, 5),
            Insn::push(9),
            Insn::jump(12),
            Insn::jump_if_zero(2, 40),
            Insn::call(6),
            Insn::ax_read(5, 42),
            Insn::ax_verify(1),
        ];
        for insn in insns {
            assert!(insn.is_canonical(), "{insn:?} is not canonical");
        }
    }

    #[test]
    fn stray_operand_is_not_canonical() {
        let mut insn = Insn::push(1);
        insn.c = 4;
        assert!(!insn.is_canonical());

        let mut insn = Insn::ret();
        insn.imm = 3;
        assert!(!insn.is_canonical());
    }

    #[test]
    fn registers_follow_opcode_shape() {
        let insn = Insn::binary(OpCode::Add, 1, 2, 3);
        assert_eq!(insn.registers().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(Insn::jump(5).registers().count(), 0);
    }

    #[test]
    fn with_flags_accumulates() {
        let insn = Insn::jump(0)
            .with_flags(InsnFlags::PATCHED_BRANCH)
            .with_flags(InsnFlags::FUNCTION_ENTRY);
        assert!(insn.flags.contains(InsnFlags::PATCHED_BRANCH | InsnFlags::FUNCTION_ENTRY));
    }

    #[test]
    fn display() {
        assert_eq!(Insn::load_imm(1, 5).to_string(), "LOADI r1, 5");
        assert_eq!(Insn::binary(OpCode::Mul, 3, 1, 2).to_string(), "MUL r3, r1, r2");
        assert_eq!(Insn::jump_if_zero(4, 9).to_string(), "JZ r4, @9");
        assert_eq!(Insn::jump(2).to_string(), "JMP @2");
        assert_eq!(Insn::halt().to_string(), "HALT");
    }
}
