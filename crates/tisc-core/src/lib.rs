//! TISC core types.
//!
//! Shared by the compiler and the interpreter:
//!
//! - [`OpCode`], [`Insn`] and [`InsnFlags`] - the instruction set
//! - [`Program`] - an ordered instruction sequence
//! - [`encoding`] - the fixed-width binary record format
//! - [`error`] - compile-time, encoding and run-time error taxonomies
//! - [`Span`] - source locations for diagnostics

pub mod encoding;
pub mod error;
mod insn;
mod opcode;
mod program;
mod span;

pub use encoding::INSN_SIZE;
pub use error::{CompilationError, EncodingError, Fault, TiscError};
pub use insn::{Insn, InsnFlags, REGISTER_COUNT, RESERVED_REGISTER, RETURN_REGISTER};
pub use opcode::OpCode;
pub use program::Program;
pub use span::Span;
