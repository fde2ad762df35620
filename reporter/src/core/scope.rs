//! Nesting discipline for Describe, Context and It blocks.
//!
//! Result attribution and report indentation depend on the exact active
//! blocks, so any out-of-order transition is rejected with a
//! [`Violation`] instead of being tolerated.
//!
//! Rules:
//! - One Describe at a time.
//! - A Context only inside a Describe, never inside another Context or an It.
//! - An It inside a Describe, with or without a Context.
//! - Leaving a Describe requires no active Context; leaving a Context
//!   requires no active It.

use tracing::debug;

use crate::core::types::{Block, Scope};
use crate::error::{Result, Violation};

/// Currently active blocks. The default value is the idle state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeStateMachine {
    describe: Option<Block>,
    context: Option<Block>,
    test: Option<String>,
}

impl ScopeStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_describe(&mut self, block: Block) -> Result<()> {
        if self.describe.is_some() {
            return Err(Violation::DescribeAlreadyActive.into());
        }
        debug!(describe = %block.name, "enter describe");
        self.describe = Some(block);
        Ok(())
    }

    pub fn leave_describe(&mut self) -> Result<()> {
        if self.context.is_some() {
            return Err(Violation::LeaveDescribeInsideContext.into());
        }
        debug!(describe = ?self.describe_name(), "leave describe");
        self.describe = None;
        Ok(())
    }

    pub fn enter_context(&mut self, block: Block) -> Result<()> {
        if self.describe.is_none() {
            return Err(Violation::ContextWithoutDescribe.into());
        }
        if self.context.is_some() {
            return Err(Violation::ContextAlreadyActive.into());
        }
        if self.test.is_some() {
            return Err(Violation::ContextInsideTest.into());
        }
        debug!(context = %block.name, "enter context");
        self.context = Some(block);
        Ok(())
    }

    pub fn leave_context(&mut self) -> Result<()> {
        if self.test.is_some() {
            return Err(Violation::LeaveContextInsideTest.into());
        }
        debug!(context = ?self.context_name(), "leave context");
        self.context = None;
        Ok(())
    }

    /// A Context is optional: a top-level It directly under a Describe is legal.
    pub fn enter_test(&mut self, name: impl Into<String>) -> Result<()> {
        if self.describe.is_none() {
            return Err(Violation::TestWithoutDescribe.into());
        }
        if self.test.is_some() {
            return Err(Violation::TestAlreadyActive.into());
        }
        let name = name.into();
        debug!(test = %name, "enter test");
        self.test = Some(name);
        Ok(())
    }

    pub fn leave_test(&mut self) {
        self.test = None;
    }

    pub fn describe(&self) -> Option<&Block> {
        self.describe.as_ref()
    }

    pub fn context(&self) -> Option<&Block> {
        self.context.as_ref()
    }

    pub fn describe_name(&self) -> Option<&str> {
        self.describe.as_ref().map(|block| block.name.as_str())
    }

    pub fn context_name(&self) -> Option<&str> {
        self.context.as_ref().map(|block| block.name.as_str())
    }

    pub fn test_name(&self) -> Option<&str> {
        self.test.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        self.describe.is_none() && self.context.is_none() && self.test.is_none()
    }

    /// Innermost active block.
    pub fn scope(&self) -> Option<Scope> {
        if self.test.is_some() {
            Some(Scope::It)
        } else if self.context.is_some() {
            Some(Scope::Context)
        } else if self.describe.is_some() {
            Some(Scope::Describe)
        } else {
            None
        }
    }

    /// Block enclosing [`scope`](Self::scope).
    pub fn parent_scope(&self) -> Option<Scope> {
        match self.scope()? {
            Scope::It if self.context.is_some() => Some(Scope::Context),
            Scope::It | Scope::Context => Some(Scope::Describe),
            Scope::Describe => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn violation(err: Error) -> Violation {
        match err {
            Error::ProtocolViolation(violation) => violation,
            other => panic!("expected protocol violation, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle_without_scope() {
        let machine = ScopeStateMachine::new();
        assert!(machine.is_idle());
        assert_eq!(machine.scope(), None);
        assert_eq!(machine.parent_scope(), None);
    }

    #[test]
    fn describe_cannot_nest() {
        let mut machine = ScopeStateMachine::new();
        machine.enter_describe("A".into()).expect("describe");
        let err = machine.enter_describe("B".into()).expect_err("nested describe");
        assert_eq!(violation(err), Violation::DescribeAlreadyActive);
        assert_eq!(machine.describe_name(), Some("A"));
    }

    #[test]
    fn context_requires_describe() {
        let mut machine = ScopeStateMachine::new();
        let err = machine.enter_context("B".into()).expect_err("orphan context");
        assert_eq!(violation(err), Violation::ContextWithoutDescribe);
        assert!(machine.is_idle());
    }

    #[test]
    fn second_context_fails() {
        let mut machine = ScopeStateMachine::new();
        machine.enter_describe("A".into()).expect("describe");
        machine.enter_context("B".into()).expect("context");
        let err = machine.enter_context("C".into()).expect_err("second context");
        assert_eq!(violation(err), Violation::ContextAlreadyActive);
        assert_eq!(machine.context_name(), Some("B"));
    }

    #[test]
    fn context_cannot_open_inside_test() {
        let mut machine = ScopeStateMachine::new();
        machine.enter_describe("A".into()).expect("describe");
        machine.enter_test("t").expect("test");
        let err = machine.enter_context("B".into()).expect_err("context in test");
        assert_eq!(violation(err), Violation::ContextInsideTest);
    }

    #[test]
    fn leave_describe_requires_closed_context() {
        let mut machine = ScopeStateMachine::new();
        machine.enter_describe("A".into()).expect("describe");
        machine.enter_context("B".into()).expect("context");
        let err = machine.leave_describe().expect_err("leave with context");
        assert_eq!(violation(err), Violation::LeaveDescribeInsideContext);
        machine.leave_context().expect("leave context");
        machine.leave_describe().expect("leave describe");
        assert!(machine.is_idle());
    }

    #[test]
    fn leave_context_requires_closed_test() {
        let mut machine = ScopeStateMachine::new();
        machine.enter_describe("A".into()).expect("describe");
        machine.enter_context("B".into()).expect("context");
        machine.enter_test("t").expect("test");
        let err = machine.leave_context().expect_err("leave with test");
        assert_eq!(violation(err), Violation::LeaveContextInsideTest);
    }

    #[test]
    fn test_requires_describe_and_cannot_nest() {
        let mut machine = ScopeStateMachine::new();
        let err = machine.enter_test("t").expect_err("orphan test");
        assert_eq!(violation(err), Violation::TestWithoutDescribe);

        machine.enter_describe("A".into()).expect("describe");
        machine.enter_test("t").expect("test");
        let err = machine.enter_test("u").expect_err("nested test");
        assert_eq!(violation(err), Violation::TestAlreadyActive);
    }

    /// A top-level It directly under a Describe is a legitimate pattern.
    #[test]
    fn test_without_context_is_allowed() {
        let mut machine = ScopeStateMachine::new();
        machine.enter_describe("A".into()).expect("describe");
        machine.enter_test("t").expect("test");
        assert_eq!(machine.scope(), Some(Scope::It));
        assert_eq!(machine.parent_scope(), Some(Scope::Describe));
    }

    #[test]
    fn scope_queries_follow_nesting() {
        let mut machine = ScopeStateMachine::new();
        machine.enter_describe("A".into()).expect("describe");
        assert_eq!(machine.scope(), Some(Scope::Describe));
        assert_eq!(machine.parent_scope(), None);

        machine.enter_context("B".into()).expect("context");
        machine.enter_test("t").expect("test");
        assert_eq!(machine.scope(), Some(Scope::It));
        assert_eq!(machine.parent_scope(), Some(Scope::Context));

        machine.leave_test();
        assert_eq!(machine.scope(), Some(Scope::Context));
        assert_eq!(machine.parent_scope(), Some(Scope::Describe));
    }

    #[test]
    fn leave_test_always_succeeds() {
        let mut machine = ScopeStateMachine::new();
        machine.leave_test();
        assert!(machine.is_idle());
    }
}
