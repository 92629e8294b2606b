//! Binary arithmetic lowering.

use tisc_core::{Insn, OpCode};

use crate::ast::{BinaryExpr, BinaryOp};

use super::{ExprCompiler, Result};

/// Lower both operands, left first, then combine them with one instruction.
pub(super) fn compile_binary(
    compiler: &mut ExprCompiler<'_, '_>,
    bin: &BinaryExpr<'_>,
    target: Option<u32>,
) -> Result<u32> {
    let lhs = compiler.compile(&bin.lhs, None)?;
    let rhs = compiler.compile(&bin.rhs, None)?;
    let dst = compiler.destination(target, bin.span)?;

    compiler
        .emitter
        .emit(Insn::binary(opcode_for(bin.op), dst, lhs, rhs));
    Ok(dst)
}

fn opcode_for(op: BinaryOp) -> OpCode {
    match op {
        BinaryOp::Add => OpCode::Add,
        BinaryOp::Sub => OpCode::Sub,
        BinaryOp::Mul => OpCode::Mul,
    }
}
