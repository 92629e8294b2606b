//! Return path verification.
//!
//! [`ReturnChecker`] decides structurally, on the AST, whether every path
//! through a function body ends in a `return`:
//!
//! - A `return` statement returns on all paths
//! - An `if` does when both branches do
//! - A `loop` does when its body does
//!
//! A block returns on all paths when any of its statements does, since the
//! statements after it are unreachable.

use crate::ast::Stmt;

/// Verifies all code paths return a value.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnChecker;

impl ReturnChecker {
    pub fn new() -> Self {
        Self
    }

    /// Check if every path through `body` returns.
    pub fn all_paths_return(&self, body: &[Stmt<'_>]) -> bool {
        body.iter().any(|stmt| self.stmt_returns(stmt))
    }

    fn stmt_returns(&self, stmt: &Stmt<'_>) -> bool {
        match stmt {
            Stmt::Return(_) => true,
            Stmt::If(if_stmt) => {
                self.all_paths_return(if_stmt.then_body) && self.all_paths_return(if_stmt.else_body)
            }
            Stmt::Loop(loop_stmt) => self.all_paths_return(loop_stmt.body),
            Stmt::Let(_) | Stmt::Assign(_) | Stmt::Expr(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstBuilder;
    use bumpalo::Bump;

    #[test]
    fn empty_body_does_not_return() {
        assert!(!ReturnChecker::new().all_paths_return(&[]));
    }

    #[test]
    fn direct_return() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [ast.let_int("x", ast.int(1)), ast.ret(ast.ident("x"))];
        assert!(ReturnChecker::new().all_paths_return(&body));
    }

    #[test]
    fn if_without_else_does_not_return() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [ast.if_(ast.ident("c"), [ast.ret(ast.int(1))], [])];
        assert!(!ReturnChecker::new().all_paths_return(&body));
    }

    #[test]
    fn if_with_both_branches_returning() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [ast.if_(
            ast.ident("c"),
            [ast.ret(ast.int(1))],
            [ast.ret(ast.int(2))],
        )];
        assert!(ReturnChecker::new().all_paths_return(&body));
    }

    #[test]
    fn if_then_trailing_return() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [
            ast.if_(ast.ident("c"), [ast.ret(ast.int(1))], []),
            ast.ret(ast.int(0)),
        ];
        assert!(ReturnChecker::new().all_paths_return(&body));
    }

    #[test]
    fn loop_follows_its_body() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let returning = [ast.loop_([ast.ret(ast.int(1))])];
        let spinning = [ast.loop_([ast.assign("x", ast.int(1))])];
        assert!(ReturnChecker::new().all_paths_return(&returning));
        assert!(!ReturnChecker::new().all_paths_return(&spinning));
    }
}
