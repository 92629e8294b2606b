//! TISC Compiler
//!
//! Lowers a validated AST [`Module`](ast::Module) into one TISC
//! [`Program`].
//!
//! ## Architecture
//!
//! - **Pass 1 (Registration)**: Collect every function signature, so calls
//!   may name functions declared later
//! - **Pass 2 (Lowering)**: Emit each function, entry function first, with
//!   call targets left as placeholders
//! - **Link**: Fill every call target with its callee's entry offset
//!
//! ## Modules
//!
//! - [`ast`]: The AST boundary and an arena builder for it
//! - [`context`]: Signature table and per-function compilation state
//! - [`emit`]: Instruction emitter with jump and call patching
//! - [`expr`]: Expression lowering into registers
//! - [`scope`]: Name-to-register scopes and register allocation
//! - [`stmt`]: Statement lowering and control flow

pub mod ast;
pub mod context;
pub mod emit;
pub mod expr;
mod function_compiler;
mod return_checker;
pub mod scope;
pub mod stmt;

pub use context::{CompilationContext, FunctionSignature, FunctionTable};
pub use emit::{JumpLabel, ProgramEmitter};
pub use expr::ExprCompiler;
pub use function_compiler::FunctionCompiler;
pub use return_checker::ReturnChecker;
pub use scope::{LocalScope, RegisterAllocator};
pub use stmt::StmtCompiler;

// Re-export CompilationError from core for convenience
pub use tisc_core::CompilationError;

use rustc_hash::FxHashMap;
use tisc_core::{Program, RESERVED_REGISTER};
use tracing::{debug, instrument};

use ast::Module;

type Result<T> = std::result::Result<T, CompilationError>;

/// Highest register codegen may hand out.
pub const MAX_ALLOCATABLE_REGISTER: u32 = RESERVED_REGISTER - 1;

// ============================================================================
// Options
// ============================================================================

/// Knobs for a compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Name of the function scheduled first. When no function has this name
    /// the first declared one is used.
    pub entry_name: String,
    /// Highest register codegen may allocate.
    max_register: u32,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            entry_name: "main".to_string(),
            max_register: MAX_ALLOCATABLE_REGISTER,
        }
    }
}

impl CompilerOptions {
    pub fn with_entry_name(mut self, name: impl Into<String>) -> Self {
        self.entry_name = name.into();
        self
    }

    /// Lower the register ceiling. Values at or above the reserved register
    /// are clamped below it.
    pub fn with_max_register(mut self, reg: u32) -> Self {
        self.max_register = reg.min(MAX_ALLOCATABLE_REGISTER);
        self
    }

    pub fn max_register(&self) -> u32 {
        self.max_register
    }
}

// ============================================================================
// Output
// ============================================================================

/// A compiled module: the linked program and where each function landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    /// Linked instructions. Execution starts at offset 0, the entry function.
    pub program: Program,
    /// Compiled functions in program order, entry function first.
    pub functions: Vec<CompiledFunction>,
}

impl CompiledModule {
    /// Look up a compiled function by name.
    pub fn function(&self, name: &str) -> Option<&CompiledFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// The function placed at offset 0.
    pub fn entry(&self) -> Option<&CompiledFunction> {
        self.functions.first()
    }

    pub fn into_program(self) -> Program {
        self.program
    }
}

/// Placement of one compiled function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFunction {
    /// Function name.
    pub name: String,
    /// Offset of the first instruction.
    pub entry: usize,
    /// Number of instructions.
    pub len: usize,
}

// ============================================================================
// Compiler
// ============================================================================

/// The main compiler entry point.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a module. The first error aborts the compile.
    #[cfg_attr(feature = "profiling", profiling::function)]
    #[instrument(skip_all, fields(functions = module.functions.len()))]
    pub fn compile(&self, module: &Module<'_>) -> Result<CompiledModule> {
        if module.functions.is_empty() {
            return Err(CompilationError::EmptyModule);
        }

        let table = FunctionTable::from_module(module)?;
        let entry_index = table
            .get(&self.options.entry_name)
            .map_or(0, |signature| signature.index);
        let order = std::iter::once(entry_index)
            .chain((0..module.functions.len()).filter(|&i| i != entry_index));

        let mut emitter = ProgramEmitter::new();
        let mut entries = FxHashMap::default();
        let mut functions = Vec::with_capacity(module.functions.len());

        for index in order {
            let compiled = FunctionCompiler::new(
                &table,
                &mut emitter,
                index == entry_index,
                self.options.max_register,
            )
            .compile(&module.functions[index])?;

            entries.insert(compiled.name.clone(), compiled.entry);
            functions.push(compiled);
        }

        debug!(pending = emitter.pending_calls(), "linking");
        let program = emitter.link(&entries)?;
        debug!(insns = program.len(), "module compiled");

        Ok(CompiledModule { program, functions })
    }
}

/// Compile a module with default options.
pub fn compile(module: &Module<'_>) -> Result<CompiledModule> {
    Compiler::default().compile(module)
}
