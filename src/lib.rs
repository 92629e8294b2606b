//! TISC toolchain.
//!
//! Compiles a validated AST into a TISC program and runs it on the register
//! machine. The member crates do the work:
//!
//! - [`tisc_core`]: instruction set, binary encoding, error taxonomies
//! - [`tisc_compiler`]: AST lowering, register allocation, call linking
//! - [`tisc_vm`]: the interpreter and its authorization hook
//!
//! [`run_module`] chains the two phases for callers who only want the
//! final machine state.

pub use tisc_compiler::{
    self as compiler, CompiledFunction, CompiledModule, Compiler, CompilerOptions, ast,
};
pub use tisc_core::{
    CompilationError, EncodingError, Fault, INSN_SIZE, Insn, InsnFlags, OpCode, Program, Span,
    TiscError, encoding,
};
pub use tisc_vm::{
    self as vm, AllowAll, AuthContext, AuthorizationHook, DenyAll, Interpreter, MachineStatus,
    PrivilegeBudget, RunOutcome, StepOutcome, Verdict, VerdictKind, VmConfig, VmState,
};

use tracing::{debug, instrument};

use ast::Module;

/// Compile `module` with default options and run it to halt under the
/// allow-all policy.
pub fn run_module(module: &Module<'_>) -> Result<VmState, TiscError> {
    run_module_with(module, &Compiler::default(), VmConfig::default(), AllowAll)
}

/// Compile `module` and run it to halt on a fresh machine.
///
/// A fault discards the machine; use [`Interpreter`] directly to inspect a
/// faulted state.
#[cfg_attr(feature = "profiling", profiling::function)]
#[instrument(skip_all, fields(functions = module.functions.len()))]
pub fn run_module_with(
    module: &Module<'_>,
    compiler: &Compiler,
    config: VmConfig,
    hook: impl AuthorizationHook + 'static,
) -> Result<VmState, TiscError> {
    let compiled = compiler.compile(module)?;
    let mut vm = Interpreter::new(compiled.program)
        .with_config(config)
        .with_hook(hook);
    vm.run_to_halt()?;

    let state = vm.into_state();
    debug!(
        steps = state.trace().len(),
        result = state.return_value(),
        "module ran to halt"
    );
    Ok(state)
}
