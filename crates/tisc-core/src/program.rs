//! An ordered, immutable instruction sequence.

use std::fmt::Write as _;

use crate::encoding;
use crate::{EncodingError, Insn};

/// A compiled program: instructions addressed by their offset.
///
/// A `Program` has no header and no symbol table; execution starts at
/// offset 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    insns: Vec<Insn>,
}

impl Program {
    /// Wrap an instruction sequence.
    pub fn new(insns: Vec<Insn>) -> Self {
        Self { insns }
    }

    /// Get the instruction at an offset.
    #[inline]
    pub fn get(&self, offset: usize) -> Option<&Insn> {
        self.insns.get(offset)
    }

    /// All instructions in order.
    pub fn insns(&self) -> &[Insn] {
        &self.insns
    }

    /// Number of instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    /// Whether `target` names an instruction of this program.
    #[inline]
    pub fn contains_offset(&self, target: i64) -> bool {
        usize::try_from(target).is_ok_and(|t| t < self.insns.len())
    }

    /// Serialize as a flat sequence of fixed-width records.
    pub fn to_bytes(&self) -> Vec<u8> {
        encoding::encode_program(&self.insns)
    }

    /// Deserialize from a flat sequence of fixed-width records.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        encoding::decode_program(bytes).map(Self::new)
    }

    /// Render one instruction per line, prefixed by its offset.
    pub fn disassemble(&self) -> String {
        let width = self.insns.len().saturating_sub(1).to_string().len();
        let mut out = String::new();
        for (offset, insn) in self.insns.iter().enumerate() {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{offset:>width$}: {insn}");
        }
        out
    }
}

impl From<Vec<Insn>> for Program {
    fn from(insns: Vec<Insn>) -> Self {
        Self::new(insns)
    }
}

impl FromIterator<Insn> for Program {
    fn from_iter<I: IntoIterator<Item = Insn>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpCode;

    fn sample() -> Program {
        Program::new(vec![
            Insn::load_imm(1, 10),
            Insn::load_imm(2, 3),
            Insn::binary(OpCode::Div, 0, 1, 2),
            Insn::halt(),
        ])
    }

    #[test]
    fn offsets() {
        let program = sample();
        assert_eq!(program.len(), 4);
        assert!(program.contains_offset(0));
        assert!(program.contains_offset(3));
        assert!(!program.contains_offset(4));
        assert!(!program.contains_offset(-1));
        assert_eq!(program.get(3), Some(&Insn::halt()));
    }

    #[test]
    fn bytes_round_trip() {
        let program = sample();
        let decoded = Program::from_bytes(&program.to_bytes()).unwrap();
        assert_eq!(decoded, program);
    }

    #[test]
    fn disassemble_lists_every_offset() {
        let text = sample().disassemble();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "0: LOADI r1, 10");
        assert_eq!(lines[2], "2: DIV r0, r1, r2");
        assert_eq!(lines[3], "3: HALT");
    }
}
