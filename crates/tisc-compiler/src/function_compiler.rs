//! Function compiler.
//!
//! [`FunctionCompiler`] lowers a single function into the shared program:
//!
//! - Checks the signature uses only the integer type
//! - Binds parameters to `r1..rN` in order
//! - Verifies every path returns before emitting anything
//! - Lowers the body and flags its first instruction
//!
//! # Example
//!
//! ```ignore
//! let compiled = FunctionCompiler::new(&table, &mut emitter, is_entry, 25)
//!     .compile(&func)?;
//! ```

use tisc_core::{CompilationError, Span};
use tracing::debug;

use crate::CompiledFunction;
use crate::ast::{Function, TypeTag};
use crate::context::{CompilationContext, FunctionTable};
use crate::emit::ProgramEmitter;
use crate::return_checker::ReturnChecker;
use crate::stmt::StmtCompiler;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles one function body.
pub struct FunctionCompiler<'a, 'ctx> {
    functions: &'ctx FunctionTable,
    emitter: &'a mut ProgramEmitter,
    is_entry: bool,
    register_limit: u32,
}

impl<'a, 'ctx> FunctionCompiler<'a, 'ctx> {
    pub fn new(
        functions: &'ctx FunctionTable,
        emitter: &'a mut ProgramEmitter,
        is_entry: bool,
        register_limit: u32,
    ) -> Self {
        Self {
            functions,
            emitter,
            is_entry,
            register_limit,
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(self, func: &Function<'_>) -> Result<CompiledFunction> {
        require_int(func.return_type, func.span)?;

        let mut ctx =
            CompilationContext::new(self.functions, func.name, self.is_entry, self.register_limit);
        for param in func.params {
            require_int(param.ty, param.span)?;
            let reg = ctx.allocate(param.span)?;
            ctx.scope.declare(param.name, reg);
        }

        if !ReturnChecker::new().all_paths_return(func.body) {
            return Err(CompilationError::MissingReturn {
                function: func.name.to_string(),
                span: func.span,
            });
        }

        let entry = self.emitter.current_offset();
        StmtCompiler::new(&mut ctx, self.emitter).compile_body(func.body)?;
        self.emitter.mark_function_entry(entry);
        let len = self.emitter.current_offset() - entry;

        debug!(
            function = func.name,
            entry,
            len,
            is_entry = self.is_entry,
            "compiled function"
        );

        Ok(CompiledFunction {
            name: func.name.to_string(),
            entry,
            len,
        })
    }
}

fn require_int(ty: TypeTag, span: Span) -> Result<()> {
    if ty == TypeTag::Int {
        Ok(())
    } else {
        Err(CompilationError::UnsupportedType {
            type_name: ty.name().to_string(),
            span,
        })
    }
}
