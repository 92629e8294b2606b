//! Literal lowering. Only integer literals have a register representation.

use tisc_core::{CompilationError, Insn};

use crate::ast::{LiteralExpr, LiteralKind};

use super::{ExprCompiler, Result};

pub(super) fn compile_literal(
    compiler: &mut ExprCompiler<'_, '_>,
    lit: &LiteralExpr<'_>,
    target: Option<u32>,
) -> Result<u32> {
    let LiteralKind::Int(value) = lit.kind else {
        return Err(CompilationError::UnsupportedLiteral {
            kind: lit.kind.type_tag().name(),
            span: lit.span,
        });
    };

    let dst = compiler.destination(target, lit.span)?;
    compiler.emitter.emit(Insn::load_imm(dst, value));
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::super::tests::lower;
    use crate::ast::{AstBuilder, LiteralKind};
    use bumpalo::Bump;
    use tisc_core::{CompilationError, Insn};

    #[test]
    fn int_literal_into_fresh_register() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let (insns, reg) = lower(ast.int(42), &[], None).unwrap();
        assert_eq!(reg, 1);
        assert_eq!(insns, vec![Insn::load_imm(1, 42)]);
    }

    #[test]
    fn int_literal_into_target() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let (insns, reg) = lower(ast.int(-3), &[], Some(0)).unwrap();
        assert_eq!(reg, 0);
        assert_eq!(insns, vec![Insn::load_imm(0, -3)]);
    }

    #[test]
    fn non_int_literals_rejected() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        for (expr, kind) in [
            (ast.float("1.5"), "float"),
            (ast.literal(LiteralKind::Bool(true)), "bool"),
            (ast.literal(LiteralKind::Symbol("sym")), "symbol"),
            (ast.literal(LiteralKind::Fraction("1/3")), "fraction"),
        ] {
            let err = lower(expr, &[], None).unwrap_err();
            assert!(
                matches!(err, CompilationError::UnsupportedLiteral { kind: k, .. } if k == kind),
                "{err:?}"
            );
        }
    }
}
