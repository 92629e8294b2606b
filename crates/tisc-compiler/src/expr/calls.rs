//! Call lowering.
//!
//! Calling convention:
//!
//! ```text
//! PUSH r1 .. rN            ; every register allocated so far
//! [arg i -> fresh tmp_i]   ; all arguments evaluated first
//! MOV r1, tmp_1 ..         ; then copied into the parameter registers
//! LOADI rT, <entry>        ; placeholder, resolved at link time
//! CALL rT
//! MOV rR, r0               ; result out of the return register
//! POP rN .. r1             ; restore in reverse
//! ```
//!
//! Staging arguments in temporaries keeps an argument that reads a caller
//! register which is also an earlier parameter slot from seeing a value
//! already overwritten by the copy.

use tisc_core::{CompilationError, Insn, RETURN_REGISTER};
use tracing::trace;

use crate::ast::CallExpr;

use super::{ExprCompiler, Result};

pub(super) fn compile_call(
    compiler: &mut ExprCompiler<'_, '_>,
    call: &CallExpr<'_>,
    target: Option<u32>,
) -> Result<u32> {
    let Some(signature) = compiler.ctx.functions.get(call.callee) else {
        return Err(CompilationError::UnknownFunction {
            name: call.callee.to_string(),
            span: call.span,
        });
    };
    if call.args.len() != signature.arity {
        return Err(CompilationError::InvalidCall {
            name: call.callee.to_string(),
            expected: signature.arity,
            got: call.args.len(),
            span: call.span,
        });
    }

    let saved: Vec<u32> = compiler.ctx.scope.registers().live().collect();
    for &reg in &saved {
        compiler.emitter.emit(Insn::push(reg));
    }

    let mut staged = Vec::with_capacity(call.args.len());
    for arg in call.args {
        let tmp = compiler.ctx.allocate(arg.span())?;
        compiler.compile(arg, Some(tmp))?;
        staged.push(tmp);
    }
    for (param, tmp) in (1..).zip(staged) {
        if param != tmp {
            compiler.emitter.emit(Insn::mov(param, tmp));
        }
    }

    let target_reg = compiler.ctx.allocate(call.span)?;
    compiler
        .emitter
        .emit_call_target(target_reg, call.callee, call.span);
    compiler.emitter.emit(Insn::call(target_reg));

    let result = compiler.ctx.allocate(call.span)?;
    compiler.emitter.emit(Insn::mov(result, RETURN_REGISTER));

    for &reg in saved.iter().rev() {
        compiler.emitter.emit(Insn::pop(reg));
    }

    trace!(callee = call.callee, saved = saved.len(), "lowered call");

    match target {
        Some(dst) if dst != result => {
            compiler.emitter.emit(Insn::mov(dst, result));
            Ok(dst)
        }
        _ => Ok(result),
    }
}
