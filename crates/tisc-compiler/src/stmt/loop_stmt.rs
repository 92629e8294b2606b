//! Loop compilation.

use crate::ast::LoopStmt;

use super::{Result, StmtCompiler};

impl<'a, 'ctx> StmtCompiler<'a, 'ctx> {
    /// Compile an unconditional loop: the body followed by a jump back to
    /// its first instruction. Only a `return` inside leaves it.
    pub fn compile_loop(&mut self, loop_stmt: &LoopStmt<'_>) -> Result<()> {
        let start = self.emitter.current_offset();
        self.compile_block(loop_stmt.body)?;
        self.emitter.emit_loop(start);
        Ok(())
    }
}
