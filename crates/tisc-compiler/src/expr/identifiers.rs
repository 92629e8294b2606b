//! Identifier lowering.

use tisc_core::Insn;

use crate::ast::IdentExpr;

use super::{ExprCompiler, Result};

/// Resolve a name to its register, copying it out only when a target is
/// requested.
pub(super) fn compile_ident(
    compiler: &mut ExprCompiler<'_, '_>,
    ident: &IdentExpr<'_>,
    target: Option<u32>,
) -> Result<u32> {
    let reg = compiler.ctx.lookup(ident.name, ident.span)?;
    match target {
        Some(dst) if dst != reg => {
            compiler.emitter.emit(Insn::mov(dst, reg));
            Ok(dst)
        }
        _ => Ok(reg),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::lower;
    use crate::ast::AstBuilder;
    use bumpalo::Bump;
    use tisc_core::{CompilationError, Insn, Span};

    #[test]
    fn ident_without_target_emits_nothing() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let (insns, reg) = lower(ast.ident("b"), &["a", "b"], None).unwrap();
        assert_eq!(reg, 2);
        assert!(insns.is_empty());
    }

    #[test]
    fn ident_moves_into_target() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let (insns, reg) = lower(ast.ident("a"), &["a"], Some(0)).unwrap();
        assert_eq!(reg, 0);
        assert_eq!(insns, vec![Insn::mov(0, 1)]);
    }

    #[test]
    fn undeclared_ident_rejected() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena).at(Span::new(3, 12, 1));
        let err = lower(ast.ident("z"), &["a"], None).unwrap_err();
        assert_eq!(
            err,
            CompilationError::UndeclaredIdentifier {
                name: "z".into(),
                span: Span::new(3, 12, 1),
            }
        );
    }
}
