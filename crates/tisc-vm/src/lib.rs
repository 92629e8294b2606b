//! TISC virtual machine.
//!
//! A register machine with 27 registers, a bounded value stack, word-addressed
//! data memory and condition flags. Privileged instructions pass through an
//! injected [`AuthorizationHook`] before they take effect.
//!
//! ```ignore
//! let mut vm = Interpreter::new(program).with_hook(PrivilegeBudget::new(4));
//! vm.run_to_halt()?;
//! println!("r0 = {}", vm.state().return_value());
//! ```

pub mod auth;
mod config;
mod interpreter;
pub mod state;

pub use auth::{
    AllowAll, AuthContext, AuthorizationHook, DenyAll, PrivilegeBudget, Verdict, VerdictKind,
};
pub use config::VmConfig;
pub use interpreter::{Interpreter, RunOutcome, StepOutcome};
pub use state::{AuthorizationRecord, ConditionFlags, MachineStatus, TraceEntry, VmState};

pub use tisc_core::Fault;
