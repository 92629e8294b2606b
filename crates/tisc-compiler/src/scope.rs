//! Local scope management for function compilation.
//!
//! [`LocalScope`] tracks two things while one function body is lowered:
//! - A stack of block scopes mapping names to registers, innermost last
//! - A monotonic register counter starting at `R1`
//!
//! Registers are never released. A name declared in an inner block shadows
//! outer bindings until the block's scope is popped, but the register it was
//! given stays claimed for the rest of the function.

use rustc_hash::FxHashMap;

use crate::MAX_ALLOCATABLE_REGISTER;

// ============================================================================
// Register allocation
// ============================================================================

/// Hands out registers `R1..=limit` in increasing order.
#[derive(Debug, Clone)]
pub struct RegisterAllocator {
    next: u32,
    limit: u32,
}

impl RegisterAllocator {
    /// Create an allocator whose highest register is `limit`, never above
    /// [`MAX_ALLOCATABLE_REGISTER`].
    pub fn new(limit: u32) -> Self {
        Self {
            next: 1,
            limit: limit.min(MAX_ALLOCATABLE_REGISTER),
        }
    }

    /// Claim the next register, or `None` once `limit` is passed.
    pub fn allocate(&mut self) -> Option<u32> {
        if self.next > self.limit {
            return None;
        }
        let reg = self.next;
        self.next += 1;
        Some(reg)
    }

    /// Every register handed out so far, lowest first.
    pub fn live(&self) -> std::ops::Range<u32> {
        1..self.next
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

// ============================================================================
// LocalScope
// ============================================================================

/// Name and register bookkeeping for one function being compiled.
#[derive(Debug, Clone)]
pub struct LocalScope {
    /// Block scopes, function scope first.
    scopes: Vec<FxHashMap<String, u32>>,
    registers: RegisterAllocator,
}

impl LocalScope {
    /// Create a scope holding only the (empty) function-level block.
    pub fn new(register_limit: u32) -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
            registers: RegisterAllocator::new(register_limit),
        }
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Enter a block (if branch, loop body).
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Leave the innermost block, dropping its bindings.
    ///
    /// The function-level block is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Current nesting depth; 0 is the function scope.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    // ==========================================================================
    // Bindings
    // ==========================================================================

    /// Bind `name` to `reg` in the innermost block.
    pub fn declare(&mut self, name: &str, reg: u32) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), reg);
        }
    }

    /// Resolve `name`, innermost block first.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    // ==========================================================================
    // Registers
    // ==========================================================================

    pub fn allocate(&mut self) -> Option<u32> {
        self.registers.allocate()
    }

    pub fn registers(&self) -> &RegisterAllocator {
        &self.registers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_monotonic() {
        let mut regs = RegisterAllocator::new(25);
        assert_eq!(regs.live(), 1..1);
        assert_eq!(regs.allocate(), Some(1));
        assert_eq!(regs.allocate(), Some(2));
        assert_eq!(regs.live(), 1..3);
    }

    #[test]
    fn allocation_stops_at_limit() {
        let mut regs = RegisterAllocator::new(3);
        assert_eq!(regs.allocate(), Some(1));
        assert_eq!(regs.allocate(), Some(2));
        assert_eq!(regs.allocate(), Some(3));
        assert_eq!(regs.allocate(), None);
        assert_eq!(regs.allocate(), None);
    }

    #[test]
    fn limit_stays_below_reserved_register() {
        let mut regs = RegisterAllocator::new(40);
        assert_eq!(regs.limit(), MAX_ALLOCATABLE_REGISTER);
        let last = std::iter::from_fn(|| regs.allocate()).last();
        assert_eq!(last, Some(MAX_ALLOCATABLE_REGISTER));
    }

    #[test]
    fn shadowing_restored_on_pop() {
        let mut scope = LocalScope::new(25);
        scope.declare("x", 1);
        scope.push_scope();
        scope.declare("x", 2);
        assert_eq!(scope.lookup("x"), Some(2));
        assert_eq!(scope.depth(), 1);
        scope.pop_scope();
        assert_eq!(scope.lookup("x"), Some(1));
        assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn inner_bindings_vanish_on_pop() {
        let mut scope = LocalScope::new(25);
        scope.push_scope();
        scope.declare("tmp", 4);
        scope.pop_scope();
        assert_eq!(scope.lookup("tmp"), None);
    }

    #[test]
    fn function_scope_is_never_popped() {
        let mut scope = LocalScope::new(25);
        scope.declare("a", 1);
        scope.pop_scope();
        scope.pop_scope();
        assert_eq!(scope.lookup("a"), Some(1));
    }

    #[test]
    fn registers_survive_scope_exit() {
        let mut scope = LocalScope::new(25);
        scope.push_scope();
        let reg = scope.allocate();
        scope.pop_scope();
        assert_eq!(reg, Some(1));
        assert_eq!(scope.allocate(), Some(2));
    }
}
