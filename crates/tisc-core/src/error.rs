//! Error types for every phase of the toolchain.
//!
//! ## Error Hierarchy
//!
//! ```text
//! TiscError (top-level wrapper)
//! ├── CompilationError - AST lowering errors
//! ├── EncodingError    - binary record decoding errors
//! └── Fault            - interpreter faults
//! ```
//!
//! Every variant is fatal to the operation that produced it. None are
//! retried and none unwind: they travel as ordinary `Result` values.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors raised while lowering a module. The first one aborts the compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    /// The module declares no functions.
    #[error("module contains no functions")]
    EmptyModule,

    /// A type other than the integer type reached codegen.
    #[error("at {span}: unsupported type '{type_name}'")]
    UnsupportedType {
        /// Name of the rejected type.
        type_name: String,
        /// Where the type was written.
        span: Span,
    },

    /// Some control path falls off the end of the function.
    #[error("at {span}: not all code paths in '{function}' return a value")]
    MissingReturn {
        /// The offending function.
        function: String,
        /// The function's location.
        span: Span,
    },

    /// A `let` has neither a declared type nor a literal initializer.
    #[error("at {span}: cannot infer a type for '{name}'")]
    MissingType {
        /// The variable being declared.
        name: String,
        /// The declaration's location.
        span: Span,
    },

    /// A name that is not in scope.
    #[error("at {span}: undeclared identifier '{name}'")]
    UndeclaredIdentifier {
        /// The unresolved name.
        name: String,
        /// Where it was referenced.
        span: Span,
    },

    /// A call to a function the module does not define.
    #[error("at {span}: unknown function '{name}'")]
    UnknownFunction {
        /// The callee name.
        name: String,
        /// Where the call was made.
        span: Span,
    },

    /// A call whose argument count does not match the callee.
    #[error("at {span}: {name} expects {expected} argument(s), got {got}")]
    InvalidCall {
        /// The callee name.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
        /// Where the call was made.
        span: Span,
    },

    /// The function needs more registers than the machine provides.
    #[error("at {span}: '{function}' needs more than {limit} registers")]
    RegisterOverflow {
        /// The function being compiled.
        function: String,
        /// Highest allocatable register.
        limit: u32,
        /// The expression that needed one more register.
        span: Span,
    },

    /// A literal that codegen cannot materialize.
    #[error("at {span}: unsupported {kind} literal")]
    UnsupportedLiteral {
        /// The literal's kind.
        kind: &'static str,
        /// Where the literal was written.
        span: Span,
    },

    /// Two functions share a name.
    #[error("at {span}: duplicate function '{name}'")]
    DuplicateFunction {
        /// The repeated name.
        name: String,
        /// The second declaration.
        span: Span,
    },
}

impl CompilationError {
    /// Get the span where this error occurred, if it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompilationError::EmptyModule => None,
            CompilationError::UnsupportedType { span, .. }
            | CompilationError::MissingReturn { span, .. }
            | CompilationError::MissingType { span, .. }
            | CompilationError::UndeclaredIdentifier { span, .. }
            | CompilationError::UnknownFunction { span, .. }
            | CompilationError::InvalidCall { span, .. }
            | CompilationError::RegisterOverflow { span, .. }
            | CompilationError::UnsupportedLiteral { span, .. }
            | CompilationError::DuplicateFunction { span, .. } => Some(*span),
        }
    }
}

// ============================================================================
// Encoding Errors
// ============================================================================

/// Errors raised while decoding binary instruction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The byte count is not a whole number of records.
    #[error("truncated instruction stream: {len} bytes is not a whole number of records")]
    Truncated {
        /// Length of the rejected input.
        len: usize,
    },

    /// A record's opcode byte is outside the enumeration.
    #[error("invalid opcode {value:#04x}")]
    InvalidOpcode {
        /// The rejected byte.
        value: u8,
    },
}

// ============================================================================
// Runtime Faults
// ============================================================================

/// Faults that stop the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Fault {
    /// `Div` or `Mod` with a zero divisor.
    #[error("division by zero")]
    DivideByZero,

    /// Popping or returning on an empty stack, or pushing past its limit.
    #[error("stack bounds fault")]
    BoundsFault,

    /// A register operand or branch target that does not exist.
    #[error("illegal instruction")]
    IllegalInstruction,

    /// A `Load` or `Store` outside data memory.
    #[error("invalid memory access")]
    InvalidMemory,

    /// The authorization hook denied a privileged instruction.
    #[error("security fault")]
    SecurityFault,

    /// A `Trap` instruction was executed.
    #[error("trap instruction")]
    TrapInstruction,
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Any error the toolchain can produce.
///
/// Each variant uses `#[from]` so phase errors convert with `?`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiscError {
    /// A compilation error.
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// An encoding error.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A runtime fault.
    #[error(transparent)]
    Fault(#[from] Fault),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compilation_error_display() {
        let err = CompilationError::InvalidCall {
            name: "add".into(),
            expected: 2,
            got: 1,
            span: Span::new(4, 9, 6),
        };
        assert_eq!(err.to_string(), "at 4:9: add expects 2 argument(s), got 1");
        assert_eq!(err.span(), Some(Span::new(4, 9, 6)));
    }

    #[test]
    fn empty_module_has_no_span() {
        assert_eq!(CompilationError::EmptyModule.span(), None);
    }

    #[test]
    fn encoding_error_display() {
        assert_eq!(
            EncodingError::InvalidOpcode { value: 0xFF }.to_string(),
            "invalid opcode 0xff"
        );
    }

    #[test]
    fn unified_error_is_transparent() {
        let err: TiscError = Fault::DivideByZero.into();
        assert_eq!(err.to_string(), "division by zero");
        assert!(matches!(err, TiscError::Fault(Fault::DivideByZero)));

        let err: TiscError = CompilationError::EmptyModule.into();
        assert_eq!(err.to_string(), "module contains no functions");
    }
}
