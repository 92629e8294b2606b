//! If/else statement compilation.

use tisc_core::Insn;

use crate::ast::IfStmt;
use crate::emit::PLACEHOLDER;

use super::{Result, StmtCompiler};

impl<'a, 'ctx> StmtCompiler<'a, 'ctx> {
    /// Compile an if statement. A zero condition selects the else branch.
    ///
    /// Layout:
    /// ```text
    /// [condition -> rC]
    /// JZ rC -> else
    /// [then branch]
    /// JMP -> end
    /// else:
    /// [else branch]
    /// end:
    /// ```
    ///
    /// The skip jump is emitted even when the else branch is empty.
    pub fn compile_if(&mut self, if_stmt: &IfStmt<'_>) -> Result<()> {
        let cond = self.expr_compiler().compile(&if_stmt.condition, None)?;

        let else_jump = self
            .emitter
            .emit_jump(Insn::jump_if_zero(cond, PLACEHOLDER));
        self.compile_block(if_stmt.then_body)?;
        let end_jump = self.emitter.emit_jump(Insn::jump(PLACEHOLDER));

        self.emitter.patch_jump(else_jump);
        self.compile_block(if_stmt.else_body)?;
        self.emitter.patch_jump(end_jump);

        Ok(())
    }
}
