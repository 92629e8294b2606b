//! Machine state.
//!
//! A [`VmState`] is created fresh for each run and only ever mutated by the
//! interpreter's `step`. The trace and authorization log are append-only.

use bitflags::bitflags;
use tisc_core::{Fault, Insn, OpCode, REGISTER_COUNT, RETURN_REGISTER};

use crate::VmConfig;
use crate::auth::Verdict;

bitflags! {
    /// Condition flags derived from the last value written.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConditionFlags: u8 {
        const ZERO = 1 << 0;
        const NEGATIVE = 1 << 1;
    }
}

impl Default for ConditionFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConditionFlags {
    /// Flags describing a signed value.
    pub fn from_value(value: i64) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::ZERO, value == 0);
        flags.set(Self::NEGATIVE, value < 0);
        flags
    }
}

/// Lifecycle of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineStatus {
    /// Constructed, nothing executed yet.
    #[default]
    Ready,
    /// At least one instruction executed.
    Running,
    /// Stopped by `Halt` or by running off the end of the program.
    Halted,
    /// Stopped by a fault. Terminal.
    Faulted(Fault),
}

/// One fetched instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    pub pc: usize,
    pub insn: Insn,
    /// Set when this instruction faulted.
    pub fault: Option<Fault>,
}

/// One privileged instruction submitted to the authorization hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRecord {
    pub pc: usize,
    pub opcode: OpCode,
    pub tag: i64,
    pub value: i64,
    pub verdict: Verdict,
}

/// Registers, stack, memory, and the run's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmState {
    pub(crate) registers: [i64; REGISTER_COUNT],
    pub(crate) stack: Vec<i64>,
    pub(crate) memory: Vec<i64>,
    pub(crate) pc: usize,
    pub(crate) flags: ConditionFlags,
    pub(crate) status: MachineStatus,
    pub(crate) trace: Vec<TraceEntry>,
    pub(crate) auth_log: Vec<AuthorizationRecord>,
}

impl VmState {
    /// A zeroed machine sized by `config`.
    pub fn new(config: &VmConfig) -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            stack: Vec::new(),
            memory: vec![0; config.memory_size],
            pc: 0,
            flags: ConditionFlags::empty(),
            status: MachineStatus::Ready,
            trace: Vec::new(),
            auth_log: Vec::new(),
        }
    }

    pub fn registers(&self) -> &[i64; REGISTER_COUNT] {
        &self.registers
    }

    /// Value of register `reg`, if it exists.
    pub fn register(&self, reg: u32) -> Option<i64> {
        self.registers.get(reg as usize).copied()
    }

    /// Value of `r0`.
    pub fn return_value(&self) -> i64 {
        self.registers[RETURN_REGISTER as usize]
    }

    /// Stack contents, bottom first.
    pub fn stack(&self) -> &[i64] {
        &self.stack
    }

    pub fn memory(&self) -> &[i64] {
        &self.memory
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn flags(&self) -> ConditionFlags {
        self.flags
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    pub fn is_halted(&self) -> bool {
        self.status == MachineStatus::Halted
    }

    /// The fault that stopped the machine, if any.
    pub fn fault(&self) -> Option<Fault> {
        match self.status {
            MachineStatus::Faulted(fault) => Some(fault),
            _ => None,
        }
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn auth_log(&self) -> &[AuthorizationRecord] {
        &self.auth_log
    }

    /// Write a register and derive the flags from the value.
    pub(crate) fn write(&mut self, reg: usize, value: i64) {
        self.registers[reg] = value;
        self.flags = ConditionFlags::from_value(value);
    }
}

impl Default for VmState {
    fn default() -> Self {
        Self::new(&VmConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_zeroed() {
        let state = VmState::new(&VmConfig::default().with_memory_size(4));
        assert_eq!(state.status(), MachineStatus::Ready);
        assert_eq!(state.pc(), 0);
        assert!(state.registers().iter().all(|&r| r == 0));
        assert_eq!(state.memory(), &[0, 0, 0, 0]);
        assert!(state.stack().is_empty());
        assert!(state.trace().is_empty());
        assert!(state.auth_log().is_empty());
        assert_eq!(state.flags(), ConditionFlags::empty());
    }

    #[test]
    fn flags_from_value() {
        assert_eq!(ConditionFlags::from_value(0), ConditionFlags::ZERO);
        assert_eq!(ConditionFlags::from_value(-4), ConditionFlags::NEGATIVE);
        assert_eq!(ConditionFlags::from_value(9), ConditionFlags::empty());
    }

    #[test]
    fn write_updates_flags() {
        let mut state = VmState::default();
        state.write(3, -1);
        assert_eq!(state.register(3), Some(-1));
        assert!(state.flags().contains(ConditionFlags::NEGATIVE));
        state.write(3, 0);
        assert!(state.flags().contains(ConditionFlags::ZERO));
        assert_eq!(state.register(27), None);
    }

    #[test]
    fn fault_accessor() {
        let mut state = VmState::default();
        assert_eq!(state.fault(), None);
        state.status = MachineStatus::Faulted(Fault::TrapInstruction);
        assert_eq!(state.fault(), Some(Fault::TrapInstruction));
    }
}
