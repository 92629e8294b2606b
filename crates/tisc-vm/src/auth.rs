//! Authorization hook for privileged instructions.
//!
//! Before `AxRead`, `AxSet` or `AxVerify` takes effect the interpreter builds
//! an [`AuthContext`] and asks its [`AuthorizationHook`] for a [`Verdict`].
//! A deny stops the machine with `SecurityFault`; either way the attempt is
//! recorded in the authorization log.
//!
//! Hooks take `&mut self` and may keep state between calls, as
//! [`PrivilegeBudget`] does. Any `FnMut(&AuthContext) -> Verdict` closure is
//! also a hook.

use tisc_core::OpCode;

/// What a privileged instruction is about to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// Offset of the instruction.
    pub pc: usize,
    pub opcode: OpCode,
    /// The instruction's register operand.
    pub operand: u32,
    /// The instruction's immediate tag.
    pub tag: i64,
    /// Value read from or written to the operand register.
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictKind {
    Allow,
    Deny,
}

/// A hook's decision. The reason is only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub reason: Option<String>,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            kind: VerdictKind::Allow,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            kind: VerdictKind::Deny,
            reason: Some(reason.into()),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_allowed(&self) -> bool {
        self.kind == VerdictKind::Allow
    }
}

/// Decides whether a privileged instruction may run.
pub trait AuthorizationHook {
    fn evaluate(&mut self, context: &AuthContext) -> Verdict;
}

impl<F> AuthorizationHook for F
where
    F: FnMut(&AuthContext) -> Verdict,
{
    fn evaluate(&mut self, context: &AuthContext) -> Verdict {
        self(context)
    }
}

// ============================================================================
// Policies
// ============================================================================

/// Allows everything. The default policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl AuthorizationHook for AllowAll {
    fn evaluate(&mut self, _context: &AuthContext) -> Verdict {
        Verdict::allow()
    }
}

/// Denies everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl AuthorizationHook for DenyAll {
    fn evaluate(&mut self, context: &AuthContext) -> Verdict {
        Verdict::deny(format!("{} denied by policy", context.opcode.name()))
    }
}

/// Allows the first `limit` privileged instructions, then denies.
#[derive(Debug, Clone, Copy)]
pub struct PrivilegeBudget {
    remaining: usize,
}

impl PrivilegeBudget {
    pub fn new(limit: usize) -> Self {
        Self { remaining: limit }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl AuthorizationHook for PrivilegeBudget {
    fn evaluate(&mut self, _context: &AuthContext) -> Verdict {
        if self.remaining == 0 {
            return Verdict::deny("privilege budget exhausted");
        }
        self.remaining -= 1;
        Verdict::allow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(opcode: OpCode) -> AuthContext {
        AuthContext {
            pc: 0,
            opcode,
            operand: 1,
            tag: 42,
            value: 0,
        }
    }

    #[test]
    fn fixed_policies() {
        let ctx = context(OpCode::AxRead);
        assert!(AllowAll.evaluate(&ctx).is_allowed());

        let verdict = DenyAll.evaluate(&ctx);
        assert_eq!(verdict.kind, VerdictKind::Deny);
        assert_eq!(verdict.reason.as_deref(), Some("AXREAD denied by policy"));
    }

    #[test]
    fn budget_runs_out() {
        let mut budget = PrivilegeBudget::new(2);
        let ctx = context(OpCode::AxSet);
        assert!(budget.evaluate(&ctx).is_allowed());
        assert!(budget.evaluate(&ctx).is_allowed());
        assert_eq!(budget.remaining(), 0);
        assert!(!budget.evaluate(&ctx).is_allowed());
    }

    #[test]
    fn closures_are_hooks() {
        let mut only_reads = |ctx: &AuthContext| {
            if ctx.opcode == OpCode::AxRead {
                Verdict::allow()
            } else {
                Verdict::deny("reads only")
            }
        };
        assert!(only_reads.evaluate(&context(OpCode::AxRead)).is_allowed());
        assert!(!only_reads.evaluate(&context(OpCode::AxVerify)).is_allowed());
    }
}
