//! Expression compiler.
//!
//! [`ExprCompiler`] lowers one expression to register code and reports the
//! register holding the result. The caller may request a destination; when
//! it does not, the expression picks one itself:
//!
//! - Literals land in a fresh register
//! - Identifiers resolve to their own register with no code emitted
//! - Binary operations and calls land in a fresh register
//!
//! # Example
//!
//! ```ignore
//! let mut compiler = ExprCompiler::new(&mut ctx, &mut emitter);
//!
//! // Lower into whatever register suits the expression
//! let reg = compiler.compile(&expr, None)?;
//!
//! // Lower into the return register
//! compiler.compile(&expr, Some(RETURN_REGISTER))?;
//! ```

mod binary;
mod calls;
mod identifiers;
mod literals;

use tisc_core::{CompilationError, Span};

use crate::ast::Expr;
use crate::context::CompilationContext;
use crate::emit::ProgramEmitter;

type Result<T> = std::result::Result<T, CompilationError>;

/// Lowers expressions into registers.
pub struct ExprCompiler<'a, 'ctx> {
    ctx: &'a mut CompilationContext<'ctx>,
    emitter: &'a mut ProgramEmitter,
}

impl<'a, 'ctx> ExprCompiler<'a, 'ctx> {
    pub fn new(ctx: &'a mut CompilationContext<'ctx>, emitter: &'a mut ProgramEmitter) -> Self {
        Self { ctx, emitter }
    }

    /// Lower `expr`, leaving its value in `target` if given.
    ///
    /// Returns the register holding the value.
    pub fn compile(&mut self, expr: &Expr<'_>, target: Option<u32>) -> Result<u32> {
        match expr {
            Expr::Literal(lit) => literals::compile_literal(self, lit, target),
            Expr::Ident(ident) => identifiers::compile_ident(self, ident, target),
            Expr::Binary(bin) => binary::compile_binary(self, bin, target),
            Expr::Call(call) => calls::compile_call(self, call, target),
        }
    }

    /// `target`, or a fresh register when none was requested.
    fn destination(&mut self, target: Option<u32>, span: Span) -> Result<u32> {
        match target {
            Some(reg) => Ok(reg),
            None => self.ctx.allocate(span),
        }
    }
}
