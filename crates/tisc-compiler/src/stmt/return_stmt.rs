//! Return statement compilation.

use tisc_core::{Insn, RETURN_REGISTER};

use crate::ast::ReturnStmt;

use super::{Result, StmtCompiler};

impl<'a, 'ctx> StmtCompiler<'a, 'ctx> {
    /// Compile a return statement.
    ///
    /// The value goes into `r0`. The entry function has no caller to return
    /// to, so its returns stop the machine instead.
    pub fn compile_return(&mut self, ret: &ReturnStmt<'_>) -> Result<()> {
        self.expr_compiler()
            .compile(&ret.value, Some(RETURN_REGISTER))?;

        if self.ctx.is_entry() {
            self.emitter.emit(Insn::halt());
        } else {
            self.emitter.emit(Insn::ret());
        }
        Ok(())
    }
}
