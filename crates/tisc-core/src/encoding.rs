//! Bit-exact binary encoding of instructions.
//!
//! Each instruction is one fixed-width little-endian record:
//!
//! ```text
//! offset  size  field
//!      0     1  opcode
//!      1     3  reserved (zero)
//!      4     4  a
//!      8     4  b
//!     12     4  c
//!     16     8  imm
//!     24     4  flags
//!     28     4  reserved (zero)
//! ```
//!
//! A program is a flat concatenation of records with no header or separator.
//! Reserved bytes are written as zero and ignored when reading.

use crate::{EncodingError, Insn, InsnFlags, OpCode};

/// Width of one encoded instruction in bytes.
pub const INSN_SIZE: usize = 32;

const A: usize = 4;
const B: usize = 8;
const C: usize = 12;
const IMM: usize = 16;
const FLAGS: usize = 24;

/// Encode one instruction.
pub fn encode(insn: &Insn) -> [u8; INSN_SIZE] {
    let mut record = [0u8; INSN_SIZE];
    record[0] = insn.opcode.into();
    record[A..A + 4].copy_from_slice(&insn.a.to_le_bytes());
    record[B..B + 4].copy_from_slice(&insn.b.to_le_bytes());
    record[C..C + 4].copy_from_slice(&insn.c.to_le_bytes());
    record[IMM..IMM + 8].copy_from_slice(&insn.imm.to_le_bytes());
    record[FLAGS..FLAGS + 4].copy_from_slice(&insn.flags.bits().to_le_bytes());
    record
}

/// Decode one record.
///
/// The slice must be exactly [`INSN_SIZE`] bytes long.
pub fn decode(record: &[u8]) -> Result<Insn, EncodingError> {
    if record.len() != INSN_SIZE {
        return Err(EncodingError::Truncated { len: record.len() });
    }

    let opcode = OpCode::from_u8(record[0]).ok_or(EncodingError::InvalidOpcode {
        value: record[0],
    })?;

    Ok(Insn {
        opcode,
        a: read_u32(record, A),
        b: read_u32(record, B),
        c: read_u32(record, C),
        imm: read_i64(record, IMM),
        flags: InsnFlags::from_bits_retain(read_u32(record, FLAGS)),
    })
}

/// Encode a sequence of instructions by concatenation.
pub fn encode_program(insns: &[Insn]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(insns.len() * INSN_SIZE);
    for insn in insns {
        bytes.extend_from_slice(&encode(insn));
    }
    bytes
}

/// Decode a concatenation of records.
///
/// Fails with [`EncodingError::Truncated`] if the length is not a multiple of
/// [`INSN_SIZE`], and with [`EncodingError::InvalidOpcode`] on the first record
/// whose opcode byte is out of range.
pub fn decode_program(bytes: &[u8]) -> Result<Vec<Insn>, EncodingError> {
    if bytes.len() % INSN_SIZE != 0 {
        return Err(EncodingError::Truncated { len: bytes.len() });
    }
    bytes.chunks_exact(INSN_SIZE).map(decode).collect()
}

fn read_u32(record: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
}

fn read_i64(record: &[u8], at: usize) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&record[at..at + 8]);
    i64::from_le_bytes(bytes)
}
