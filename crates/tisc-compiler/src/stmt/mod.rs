//! Statement compiler.
//!
//! The [`StmtCompiler`] lowers statements in order, handling:
//! - Variable declarations and assignments
//! - Return statements (`Halt` in the entry function, `Ret` elsewhere)
//! - If/else control flow with backpatched forward branches
//! - Unconditional loops closed by a backward branch
//!
//! Each if branch and loop body gets its own block scope.
//!
//! # Example
//!
//! ```ignore
//! let mut compiler = StmtCompiler::new(&mut ctx, &mut emitter);
//! compiler.compile_body(func.body)?;
//! ```

mod if_stmt;
mod loop_stmt;
mod return_stmt;
mod var_decl;

use tisc_core::CompilationError;

use crate::ast::{ExprStmt, Stmt};
use crate::context::CompilationContext;
use crate::emit::ProgramEmitter;
use crate::expr::ExprCompiler;

type Result<T> = std::result::Result<T, CompilationError>;

/// Lowers statements for one function.
pub struct StmtCompiler<'a, 'ctx> {
    ctx: &'a mut CompilationContext<'ctx>,
    emitter: &'a mut ProgramEmitter,
}

impl<'a, 'ctx> StmtCompiler<'a, 'ctx> {
    pub fn new(ctx: &'a mut CompilationContext<'ctx>, emitter: &'a mut ProgramEmitter) -> Self {
        Self { ctx, emitter }
    }

    /// Compile a statement.
    pub fn compile(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match stmt {
            Stmt::Return(ret) => self.compile_return(ret),
            Stmt::Let(let_stmt) => self.compile_let(let_stmt),
            Stmt::Assign(assign) => self.compile_assign(assign),
            Stmt::If(if_stmt) => self.compile_if(if_stmt),
            Stmt::Loop(loop_stmt) => self.compile_loop(loop_stmt),
            Stmt::Expr(expr_stmt) => self.compile_expr_stmt(expr_stmt),
        }
    }

    /// Compile statements in the current scope.
    pub fn compile_body(&mut self, body: &[Stmt<'_>]) -> Result<()> {
        for stmt in body {
            self.compile(stmt)?;
        }
        Ok(())
    }

    /// Compile statements in a fresh block scope.
    fn compile_block(&mut self, body: &[Stmt<'_>]) -> Result<()> {
        self.ctx.scope.push_scope();
        let result = self.compile_body(body);
        self.ctx.scope.pop_scope();
        result
    }

    /// Evaluate an expression for its side effects.
    fn compile_expr_stmt(&mut self, expr_stmt: &ExprStmt<'_>) -> Result<()> {
        self.expr_compiler().compile(&expr_stmt.expr, None)?;
        Ok(())
    }

    fn expr_compiler(&mut self) -> ExprCompiler<'_, 'ctx> {
        ExprCompiler::new(self.ctx, self.emitter)
    }
}
