//! Pending call targets.
//!
//! A call is emitted before its callee's entry offset may be known, so the
//! `LoadImm` that materializes the target is recorded here and resolved by
//! the link pass once every function has been placed.

use tisc_core::Span;

/// A `LoadImm` whose immediate is still a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    /// Offset of the `LoadImm` to rewrite.
    pub offset: usize,
    /// Function whose entry offset goes into the immediate.
    pub callee: String,
    /// The call expression, for diagnostics.
    pub span: Span,
}

/// Unresolved call targets, in emission order.
#[derive(Debug, Default)]
pub struct CallPatches {
    pending: Vec<PendingCall>,
}

impl CallPatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, offset: usize, callee: &str, span: Span) {
        self.pending.push(PendingCall {
            offset,
            callee: callee.to_string(),
            span,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending call, leaving the table empty.
    pub fn take(&mut self) -> Vec<PendingCall> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_empty() {
        let patches = CallPatches::new();
        assert!(patches.is_empty());
        assert_eq!(patches.len(), 0);
    }

    #[test]
    fn take_drains_in_order() {
        let mut patches = CallPatches::new();
        patches.add(4, "f", Span::new(1, 1, 1));
        patches.add(9, "g", Span::new(2, 1, 1));

        let pending = patches.take();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].offset, 4);
        assert_eq!(pending[1].callee, "g");
        assert!(patches.is_empty());
    }
}
