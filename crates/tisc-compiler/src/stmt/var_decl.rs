//! Variable declaration and assignment.

use tisc_core::CompilationError;

use crate::ast::{AssignStmt, Expr, LetStmt, TypeTag};

use super::{Result, StmtCompiler};

impl<'a, 'ctx> StmtCompiler<'a, 'ctx> {
    /// Compile `let name[: ty] = init;`.
    ///
    /// Without a declared type the initializer must be a literal, whose kind
    /// gives the type. The variable always gets a register of its own, and
    /// the name is bound only after the initializer is lowered, so `init`
    /// still sees any outer binding of the same name.
    pub fn compile_let(&mut self, let_stmt: &LetStmt<'_>) -> Result<()> {
        let ty = match (let_stmt.ty, &let_stmt.init) {
            (Some(ty), _) => ty,
            (None, Expr::Literal(lit)) => lit.kind.type_tag(),
            (None, _) => {
                return Err(CompilationError::MissingType {
                    name: let_stmt.name.to_string(),
                    span: let_stmt.span,
                });
            }
        };
        if ty != TypeTag::Int {
            return Err(CompilationError::UnsupportedType {
                type_name: ty.name().to_string(),
                span: let_stmt.span,
            });
        }

        let reg = self.ctx.allocate(let_stmt.span)?;
        self.expr_compiler().compile(&let_stmt.init, Some(reg))?;
        self.ctx.scope.declare(let_stmt.name, reg);
        Ok(())
    }

    /// Compile `name = value;` by lowering straight into the variable's
    /// register.
    pub fn compile_assign(&mut self, assign: &AssignStmt<'_>) -> Result<()> {
        let reg = self.ctx.lookup(assign.name, assign.span)?;
        self.expr_compiler().compile(&assign.value, Some(reg))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::lower_body;
    use crate::ast::{AstBuilder, TypeTag};
    use crate::context::FunctionTable;
    use bumpalo::Bump;
    use tisc_core::{CompilationError, Insn, OpCode, Span};

    #[test]
    fn let_gets_its_own_register() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [
            ast.let_int("y", ast.ident("x")),
            ast.assign("y", ast.int(9)),
        ];
        let insns = lower_body(&FunctionTable::default(), &body, &["x"], false).unwrap();
        assert_eq!(insns, vec![Insn::mov(2, 1), Insn::load_imm(2, 9)]);
    }

    #[test]
    fn let_infers_from_int_literal() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [ast.let_("n", None, ast.int(4))];
        let insns = lower_body(&FunctionTable::default(), &body, &[], false).unwrap();
        assert_eq!(insns, vec![Insn::load_imm(1, 4)]);
    }

    #[test]
    fn let_without_type_or_literal_rejected() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena).at(Span::new(2, 5, 3));
        let body = [ast.let_("n", None, ast.ident("x"))];
        let err = lower_body(&FunctionTable::default(), &body, &["x"], false).unwrap_err();
        assert_eq!(
            err,
            CompilationError::MissingType {
                name: "n".into(),
                span: Span::new(2, 5, 3),
            }
        );
    }

    #[test]
    fn non_int_let_rejected() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let declared = [ast.let_("f", Some(TypeTag::Float), ast.int(1))];
        let inferred = [ast.let_("f", None, ast.float("2.5"))];
        for body in [&declared[..], &inferred[..]] {
            let err = lower_body(&FunctionTable::default(), body, &[], false).unwrap_err();
            assert!(
                matches!(&err, CompilationError::UnsupportedType { type_name, .. } if type_name == "float"),
                "{err:?}"
            );
        }
    }

    #[test]
    fn initializer_sees_outer_binding() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [ast.let_int("x", ast.add(ast.ident("x"), ast.int(1)))];
        let insns = lower_body(&FunctionTable::default(), &body, &["x"], false).unwrap();
        assert_eq!(
            insns,
            vec![Insn::load_imm(3, 1), Insn::binary(OpCode::Add, 2, 1, 3)]
        );
    }

    #[test]
    fn assign_to_undeclared_rejected() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [ast.assign("ghost", ast.int(1))];
        let err = lower_body(&FunctionTable::default(), &body, &[], false).unwrap_err();
        assert!(matches!(err, CompilationError::UndeclaredIdentifier { .. }));
    }
}
