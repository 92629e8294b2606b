//! Instruction emitter for the TISC compiler.
//!
//! The [`ProgramEmitter`] appends instructions to a single program shared by
//! every function in the module. It owns the two kinds of deferred operand:
//!
//! - Forward branches, emitted with a placeholder target and patched once
//!   the destination offset is known ([`ProgramEmitter::emit_jump`] /
//!   [`ProgramEmitter::patch_jump`])
//! - Call targets, recorded per callee and resolved by
//!   [`ProgramEmitter::link`] after all functions are placed
//!
//! # Example
//!
//! ```ignore
//! let mut emitter = ProgramEmitter::new();
//!
//! let skip = emitter.emit_jump(Insn::jump_if_zero(1, PLACEHOLDER));
//! emitter.emit(Insn::load_imm(2, 7));
//! emitter.patch_jump(skip);
//!
//! let program = emitter.link(&entries)?;
//! ```

mod patches;

use rustc_hash::FxHashMap;
use tisc_core::{CompilationError, Insn, InsnFlags, Program, Span};
use tracing::trace;

pub use patches::{CallPatches, PendingCall};

/// Immediate carried by a branch or call target until it is patched.
pub const PLACEHOLDER: i64 = -1;

/// A forward branch awaiting its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpLabel(pub usize);

/// Builds the module's instruction stream.
#[derive(Debug, Default)]
pub struct ProgramEmitter {
    insns: Vec<Insn>,
    calls: CallPatches,
}

impl ProgramEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Append an instruction, returning its offset.
    pub fn emit(&mut self, insn: Insn) -> usize {
        let offset = self.insns.len();
        self.insns.push(insn);
        offset
    }

    /// Offset the next instruction will occupy.
    pub fn current_offset(&self) -> usize {
        self.insns.len()
    }

    /// Instructions emitted so far.
    pub fn insns(&self) -> &[Insn] {
        &self.insns
    }

    /// Flag the instruction at `offset` as a function's first.
    pub fn mark_function_entry(&mut self, offset: usize) {
        if let Some(insn) = self.insns.get_mut(offset) {
            insn.flags |= InsnFlags::FUNCTION_ENTRY;
        }
    }

    // ==========================================================================
    // Jumps
    // ==========================================================================

    /// Emit a forward branch whose target is not known yet.
    ///
    /// `insn` should carry [`PLACEHOLDER`] as its target.
    pub fn emit_jump(&mut self, insn: Insn) -> JumpLabel {
        JumpLabel(self.emit(insn))
    }

    /// Point a forward branch at the current offset.
    pub fn patch_jump(&mut self, label: JumpLabel) {
        let target = self.current_offset() as i64;
        if let Some(insn) = self.insns.get_mut(label.0) {
            insn.imm = target;
            insn.flags |= InsnFlags::PATCHED_BRANCH;
            trace!(at = label.0, target, "patched branch");
        }
    }

    /// Emit an unconditional backward branch to `target`.
    pub fn emit_loop(&mut self, target: usize) {
        self.emit(Insn::jump(target as i64));
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    /// Load `callee`'s entry offset into `reg`, to be filled in at link time.
    pub fn emit_call_target(&mut self, reg: u32, callee: &str, span: Span) -> usize {
        let offset = self.emit(Insn::load_imm(reg, PLACEHOLDER));
        self.calls.add(offset, callee, span);
        offset
    }

    /// Number of call targets not yet linked.
    pub fn pending_calls(&self) -> usize {
        self.calls.len()
    }

    /// Resolve every pending call target and produce the program.
    ///
    /// Fails with `UnknownFunction` for a callee missing from `entries`.
    pub fn link(mut self, entries: &FxHashMap<String, usize>) -> Result<Program, CompilationError> {
        for call in self.calls.take() {
            let Some(&entry) = entries.get(&call.callee) else {
                return Err(CompilationError::UnknownFunction {
                    name: call.callee,
                    span: call.span,
                });
            };
            if let Some(insn) = self.insns.get_mut(call.offset) {
                insn.imm = entry as i64;
                insn.flags |= InsnFlags::LINKED_CALL;
            }
            trace!(at = call.offset, callee = %call.callee, entry, "linked call");
        }
        Ok(Program::new(self.insns))
    }
}
