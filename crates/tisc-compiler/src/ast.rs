//! The validated AST handed over by the front end.
//!
//! Nodes are arena-allocated and borrowed for `'ast`; the compiler only
//! reads them. Every statement and expression kind is a closed enum variant
//! so the lowering passes match exhaustively.
//!
//! [`AstBuilder`] allocates nodes into a [`Bump`] arena. Front ends and tests
//! use it instead of spelling out node structs by hand.

use bumpalo::Bump;
use tisc_core::Span;

// ============================================================================
// Types
// ============================================================================

/// A type written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Integer. The only type codegen accepts.
    Int,
    /// Floating point.
    Float,
    /// Exact fraction.
    Fraction,
    /// Interned symbol.
    Symbol,
    /// Boolean.
    Bool,
}

impl TypeTag {
    /// The type's source name.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Fraction => "fraction",
            TypeTag::Symbol => "symbol",
            TypeTag::Bool => "bool",
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A compile unit: an ordered set of uniquely named functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Module<'ast> {
    pub functions: &'ast [Function<'ast>],
}

/// A function declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Function<'ast> {
    pub name: &'ast str,
    pub params: &'ast [Param<'ast>],
    pub return_type: TypeTag,
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// A function parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub name: &'ast str,
    pub ty: TypeTag,
    pub span: Span,
}

// ============================================================================
// Statements
// ============================================================================

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `return expr;`
    Return(ReturnStmt<'ast>),
    /// `let name[: ty] = expr;`
    Let(LetStmt<'ast>),
    /// `name = expr;`
    Assign(AssignStmt<'ast>),
    /// `if cond { .. } else { .. }`
    If(&'ast IfStmt<'ast>),
    /// `loop { .. }`
    Loop(LoopStmt<'ast>),
    /// `expr;`
    Expr(ExprStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Return(s) => s.span,
            Self::Let(s) => s.span,
            Self::Assign(s) => s.span,
            Self::If(s) => s.span,
            Self::Loop(s) => s.span,
            Self::Expr(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub value: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetStmt<'ast> {
    pub name: &'ast str,
    /// Declared type, if written.
    pub ty: Option<TypeTag>,
    pub init: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    pub name: &'ast str,
    pub value: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: Expr<'ast>,
    pub then_body: &'ast [Stmt<'ast>],
    /// Empty when the source has no `else`.
    pub else_body: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// An unconditional loop; only a `return` inside leaves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopStmt<'ast> {
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    pub expr: Expr<'ast>,
    pub span: Span,
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Variable or parameter reference
    Ident(IdentExpr<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
    /// Binary arithmetic
    Binary(&'ast BinaryExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Call(e) => e.span,
            Self::Binary(e) => e.span,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    pub span: Span,
}

/// The kind of literal. Non-integer literals keep their source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    Int(i64),
    Float(&'ast str),
    Fraction(&'ast str),
    Symbol(&'ast str),
    Bool(bool),
}

impl LiteralKind<'_> {
    /// The type a literal of this kind has.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            LiteralKind::Int(_) => TypeTag::Int,
            LiteralKind::Float(_) => TypeTag::Float,
            LiteralKind::Fraction(_) => TypeTag::Fraction,
            LiteralKind::Symbol(_) => TypeTag::Symbol,
            LiteralKind::Bool(_) => TypeTag::Bool,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub callee: &'ast str,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub op: BinaryOp,
    pub lhs: Expr<'ast>,
    pub rhs: Expr<'ast>,
    pub span: Span,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
}

// ============================================================================
// Builder
// ============================================================================

/// Allocates AST nodes into an arena.
///
/// Nodes get `Span::default()`; use [`AstBuilder::at`] to stamp a location on
/// the nodes built afterwards.
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    span: Span,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            span: Span::default(),
        }
    }

    /// A builder that stamps `span` on every node it creates.
    pub fn at(self, span: Span) -> Self {
        Self { span, ..self }
    }

    pub fn module(&self, functions: impl IntoIterator<Item = Function<'ast>>) -> Module<'ast> {
        Module {
            functions: self.slice(functions),
        }
    }

    /// A function over integer parameters.
    pub fn function(
        &self,
        name: &str,
        params: &[&str],
        return_type: TypeTag,
        body: impl IntoIterator<Item = Stmt<'ast>>,
    ) -> Function<'ast> {
        let params = params.iter().map(|p| (*p, TypeTag::Int));
        self.typed_function(name, params, return_type, body)
    }

    pub fn typed_function<'p>(
        &self,
        name: &str,
        params: impl IntoIterator<Item = (&'p str, TypeTag)>,
        return_type: TypeTag,
        body: impl IntoIterator<Item = Stmt<'ast>>,
    ) -> Function<'ast> {
        let params = params.into_iter().map(|(name, ty)| Param {
            name: self.arena.alloc_str(name),
            ty,
            span: self.span,
        });
        Function {
            name: self.arena.alloc_str(name),
            params: self.slice(params),
            return_type,
            body: self.slice(body),
            span: self.span,
        }
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    pub fn ret(&self, value: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            value,
            span: self.span,
        })
    }

    pub fn let_(&self, name: &str, ty: Option<TypeTag>, init: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Let(LetStmt {
            name: self.arena.alloc_str(name),
            ty,
            init,
            span: self.span,
        })
    }

    /// `let name: int = init;`
    pub fn let_int(&self, name: &str, init: Expr<'ast>) -> Stmt<'ast> {
        self.let_(name, Some(TypeTag::Int), init)
    }

    pub fn assign(&self, name: &str, value: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Assign(AssignStmt {
            name: self.arena.alloc_str(name),
            value,
            span: self.span,
        })
    }

    pub fn if_(
        &self,
        condition: Expr<'ast>,
        then_body: impl IntoIterator<Item = Stmt<'ast>>,
        else_body: impl IntoIterator<Item = Stmt<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::If(self.arena.alloc(IfStmt {
            condition,
            then_body: self.slice(then_body),
            else_body: self.slice(else_body),
            span: self.span,
        }))
    }

    pub fn loop_(&self, body: impl IntoIterator<Item = Stmt<'ast>>) -> Stmt<'ast> {
        Stmt::Loop(LoopStmt {
            body: self.slice(body),
            span: self.span,
        })
    }

    pub fn expr_stmt(&self, expr: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr,
            span: self.span,
        })
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub fn literal(&self, kind: LiteralKind<'ast>) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            kind,
            span: self.span,
        })
    }

    pub fn int(&self, value: i64) -> Expr<'ast> {
        self.literal(LiteralKind::Int(value))
    }

    pub fn float(&self, text: &str) -> Expr<'ast> {
        self.literal(LiteralKind::Float(self.arena.alloc_str(text)))
    }

    pub fn ident(&self, name: &str) -> Expr<'ast> {
        Expr::Ident(IdentExpr {
            name: self.arena.alloc_str(name),
            span: self.span,
        })
    }

    pub fn call(&self, callee: &str, args: impl IntoIterator<Item = Expr<'ast>>) -> Expr<'ast> {
        Expr::Call(self.arena.alloc(CallExpr {
            callee: self.arena.alloc_str(callee),
            args: self.slice(args),
            span: self.span,
        }))
    }

    pub fn binary(&self, op: BinaryOp, lhs: Expr<'ast>, rhs: Expr<'ast>) -> Expr<'ast> {
        Expr::Binary(self.arena.alloc(BinaryExpr {
            op,
            lhs,
            rhs,
            span: self.span,
        }))
    }

    pub fn add(&self, lhs: Expr<'ast>, rhs: Expr<'ast>) -> Expr<'ast> {
        self.binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn sub(&self, lhs: Expr<'ast>, rhs: Expr<'ast>) -> Expr<'ast> {
        self.binary(BinaryOp::Sub, lhs, rhs)
    }

    pub fn mul(&self, lhs: Expr<'ast>, rhs: Expr<'ast>) -> Expr<'ast> {
        self.binary(BinaryOp::Mul, lhs, rhs)
    }

    fn slice<T: Copy>(&self, items: impl IntoIterator<Item = T>) -> &'ast [T] {
        let items: Vec<T> = items.into_iter().collect();
        self.arena.alloc_slice_copy(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_allocates_nested_nodes() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);

        let body = [ast.ret(ast.add(ast.ident("a"), ast.call("f", [ast.int(2)])))];
        let func = ast.function("g", &["a"], TypeTag::Int, body);

        assert_eq!(func.name, "g");
        assert_eq!(func.params.len(), 1);
        assert_eq!(func.params[0].ty, TypeTag::Int);

        let Stmt::Return(ret) = func.body[0] else {
            panic!("expected return");
        };
        let Expr::Binary(bin) = ret.value else {
            panic!("expected binary");
        };
        assert_eq!(bin.op, BinaryOp::Add);
        let Expr::Call(call) = bin.rhs else {
            panic!("expected call");
        };
        assert_eq!(call.callee, "f");
        assert_eq!(call.args.len(), 1);
    }

    #[test]
    fn builder_stamps_span() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena).at(Span::new(7, 3, 4));
        assert_eq!(ast.int(1).span(), Span::new(7, 3, 4));
        assert_eq!(ast.ret(ast.int(1)).span(), Span::new(7, 3, 4));
    }

    #[test]
    fn literal_type_tags() {
        assert_eq!(LiteralKind::Int(3).type_tag(), TypeTag::Int);
        assert_eq!(LiteralKind::Float("1.5").type_tag(), TypeTag::Float);
        assert_eq!(LiteralKind::Bool(true).type_tag(), TypeTag::Bool);
        assert_eq!(TypeTag::Fraction.name(), "fraction");
    }
}
