//! Compilation context.
//!
//! [`FunctionTable`] is the module-wide signature table built before any
//! body is lowered, which is what lets a call name a function declared later
//! in the module. [`CompilationContext`] is the per-function state the
//! expression and statement compilers share: the local scope, the function
//! being compiled, and a view of the table.

use rustc_hash::FxHashMap;
use tisc_core::{CompilationError, Span};

use crate::ast::Module;
use crate::scope::LocalScope;

type Result<T> = std::result::Result<T, CompilationError>;

// ============================================================================
// Function table
// ============================================================================

/// What a caller needs to know about a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    /// Declared parameter count.
    pub arity: usize,
    /// Position in the module.
    pub index: usize,
    pub span: Span,
}

/// Signatures of every function in a module, by name.
#[derive(Debug, Default)]
pub struct FunctionTable {
    signatures: Vec<FunctionSignature>,
    by_name: FxHashMap<String, usize>,
}

impl FunctionTable {
    /// Register every function of `module`.
    ///
    /// Fails with `DuplicateFunction` on the second declaration of a name.
    pub fn from_module(module: &Module<'_>) -> Result<Self> {
        let mut table = Self::default();
        for (index, func) in module.functions.iter().enumerate() {
            if table.by_name.contains_key(func.name) {
                return Err(CompilationError::DuplicateFunction {
                    name: func.name.to_string(),
                    span: func.span,
                });
            }
            table.by_name.insert(func.name.to_string(), index);
            table.signatures.push(FunctionSignature {
                name: func.name.to_string(),
                arity: func.params.len(),
                index,
                span: func.span,
            });
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.by_name.get(name).map(|&i| &self.signatures[i])
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

// ============================================================================
// Per-function context
// ============================================================================

/// State shared while lowering one function body.
pub struct CompilationContext<'ctx> {
    /// Module-wide signatures.
    pub functions: &'ctx FunctionTable,
    /// Names and registers of the function being compiled.
    pub scope: LocalScope,
    /// Name of the function being compiled.
    function: String,
    /// Whether this is the module's entry function.
    is_entry: bool,
}

impl<'ctx> CompilationContext<'ctx> {
    pub fn new(
        functions: &'ctx FunctionTable,
        function: &str,
        is_entry: bool,
        register_limit: u32,
    ) -> Self {
        Self {
            functions,
            scope: LocalScope::new(register_limit),
            function: function.to_string(),
            is_entry,
        }
    }

    pub fn is_entry(&self) -> bool {
        self.is_entry
    }

    /// Claim a fresh register for the node at `span`.
    pub fn allocate(&mut self, span: Span) -> Result<u32> {
        self.scope
            .allocate()
            .ok_or_else(|| self.register_overflow(span))
    }

    /// Resolve a variable or parameter.
    pub fn lookup(&self, name: &str, span: Span) -> Result<u32> {
        self.scope
            .lookup(name)
            .ok_or_else(|| CompilationError::UndeclaredIdentifier {
                name: name.to_string(),
                span,
            })
    }

    pub fn register_overflow(&self, span: Span) -> CompilationError {
        CompilationError::RegisterOverflow {
            function: self.function.clone(),
            limit: self.scope.registers().limit(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, TypeTag};
    use bumpalo::Bump;

    #[test]
    fn table_registers_in_order() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let module = ast.module([
            ast.function("main", &[], TypeTag::Int, [ast.ret(ast.int(0))]),
            ast.function("add", &["a", "b"], TypeTag::Int, [ast.ret(ast.int(0))]),
        ]);

        let table = FunctionTable::from_module(&module).unwrap();
        assert_eq!(table.len(), 2);
        let add = table.get("add").unwrap();
        assert_eq!(add.arity, 2);
        assert_eq!(add.index, 1);
        assert!(table.get("missing").is_none());
    }

    #[test]
    fn duplicate_function_rejected() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let module = ast.module([
            ast.function("f", &[], TypeTag::Int, [ast.ret(ast.int(0))]),
            ast.at(Span::new(5, 1, 1))
                .function("f", &[], TypeTag::Int, [ast.ret(ast.int(1))]),
        ]);

        let err = FunctionTable::from_module(&module).unwrap_err();
        assert_eq!(
            err,
            CompilationError::DuplicateFunction {
                name: "f".into(),
                span: Span::new(5, 1, 1),
            }
        );
    }

    #[test]
    fn allocate_reports_overflow() {
        let table = FunctionTable::default();
        let mut ctx = CompilationContext::new(&table, "f", false, 1);
        assert_eq!(ctx.allocate(Span::default()), Ok(1));
        assert!(matches!(
            ctx.allocate(Span::new(2, 4, 1)),
            Err(CompilationError::RegisterOverflow { limit: 1, .. })
        ));
    }

    #[test]
    fn lookup_reports_undeclared() {
        let table = FunctionTable::default();
        let ctx = CompilationContext::new(&table, "f", false, 25);
        assert!(matches!(
            ctx.lookup("nope", Span::default()),
            Err(CompilationError::UndeclaredIdentifier { .. })
        ));
    }
}
