//! Per-run state: active scopes plus the ordered sequence of test outcomes.
//!
//! A [`RunState`] is created once when the run starts, handed to every scope
//! transition and [`RunState::add_result`] call, and rendered once at the
//! end. Aggregates are computed from the stored outcomes on demand, so they
//! never diverge from what was recorded.

use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::{Clock, MonotonicClock};
use crate::core::scope::ScopeStateMachine;
use crate::core::types::{Block, Parameters, ResultKind, Scope, TestOutcome};
use crate::error::Result;

/// Run metadata shown in the start banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Test target the run was started for.
    pub path: String,
    /// Test name filters; empty means no filter.
    pub name_filter: Vec<String>,
    /// Tag filters; empty means no filter.
    pub tag_filter: Vec<String>,
    /// Demote Skipped and Pending results to Failed.
    pub strict: bool,
}

/// Input to [`RunState::add_result`].
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub name: String,
    pub result: ResultKind,
    /// Explicit duration; derived from the run clock when `None`.
    pub duration: Option<Duration>,
    pub failure_message: Option<String>,
    pub stack_trace: Option<String>,
    pub parameterized_suite_name: Option<String>,
    pub parameters: Option<Parameters>,
}

impl TestResult {
    pub fn new(name: impl Into<String>, result: ResultKind) -> Self {
        Self {
            name: name.into(),
            result,
            duration: None,
            failure_message: None,
            stack_trace: None,
            parameterized_suite_name: None,
            parameters: None,
        }
    }

    /// Build from a textual result kind, rejecting anything unrecognized.
    pub fn parse(name: impl Into<String>, result: &str) -> Result<Self> {
        Ok(Self::new(name, result.parse()?))
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_failure(mut self, message: impl Into<String>, stack_trace: Option<String>) -> Self {
        self.failure_message = Some(message.into());
        self.stack_trace = stack_trace;
        self
    }

    pub fn with_parameters(
        mut self,
        suite_name: impl Into<String>,
        parameters: Parameters,
    ) -> Self {
        self.parameterized_suite_name = Some(suite_name.into());
        self.parameters = Some(parameters);
        self
    }
}

/// A Describe or Context header, positioned by the number of outcomes
/// recorded before it was entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntry {
    pub scope: Scope,
    pub block: Block,
    pub first_outcome: usize,
}

/// Context pass/fail totals for the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextCounts {
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct RunState {
    options: RunOptions,
    clock: Box<dyn Clock>,
    last_sampled: Duration,
    scope: ScopeStateMachine,
    outcomes: Vec<TestOutcome>,
    blocks: Vec<BlockEntry>,
    /// A result was recorded since the active test was entered.
    test_reported: bool,
}

impl RunState {
    /// Start a run timed by the wall clock.
    pub fn new(options: RunOptions) -> Self {
        Self::with_clock(options, Box::new(MonotonicClock::start()))
    }

    pub fn with_clock(options: RunOptions, clock: Box<dyn Clock>) -> Self {
        debug!(path = %options.path, strict = options.strict, "run started");
        let last_sampled = clock.elapsed();
        Self {
            options,
            clock,
            last_sampled,
            scope: ScopeStateMachine::new(),
            outcomes: Vec::new(),
            blocks: Vec::new(),
            test_reported: false,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn is_strict(&self) -> bool {
        self.options.strict
    }

    pub fn enter_describe(&mut self, block: impl Into<Block>) -> Result<()> {
        let block = block.into();
        self.scope.enter_describe(block.clone())?;
        self.push_block(Scope::Describe, block);
        Ok(())
    }

    pub fn leave_describe(&mut self) -> Result<()> {
        self.scope.leave_describe()
    }

    pub fn enter_context(&mut self, block: impl Into<Block>) -> Result<()> {
        let block = block.into();
        self.scope.enter_context(block.clone())?;
        self.push_block(Scope::Context, block);
        Ok(())
    }

    pub fn leave_context(&mut self) -> Result<()> {
        self.scope.leave_context()
    }

    pub fn enter_test(&mut self, name: impl Into<String>) -> Result<()> {
        self.scope.enter_test(name)?;
        self.test_reported = false;
        Ok(())
    }

    pub fn leave_test(&mut self) {
        self.scope.leave_test();
        self.test_reported = false;
    }

    /// Name of a test that was entered but has not produced a result yet.
    pub fn incomplete_test(&self) -> Option<&str> {
        if self.test_reported {
            return None;
        }
        self.scope.test_name()
    }

    /// Finalize and append one test outcome.
    ///
    /// The outcome is attributed to the currently active Describe and
    /// Context. In strict mode Skipped and Pending are stored as Failed.
    pub fn add_result(&mut self, input: TestResult) -> &TestOutcome {
        let duration = match input.duration {
            Some(duration) => duration,
            None => {
                let now = self.clock.elapsed();
                let delta = now.saturating_sub(self.last_sampled);
                self.last_sampled = now;
                delta
            }
        };

        let mut result = input.result;
        let mut failure_message = input.failure_message;
        if self.options.strict && matches!(result, ResultKind::Skipped | ResultKind::Pending) {
            warn!(test = %input.name, original = %result, "strict mode demoted result to Failed");
            failure_message = Some(strict_failure_message(result));
            result = ResultKind::Failed;
        }

        let passed = match result {
            ResultKind::Passed => true,
            ResultKind::Failed => false,
            ResultKind::Skipped | ResultKind::Pending => !self.options.strict,
        };

        let outcome = TestOutcome {
            name: input.name,
            describe: self.scope.describe_name().map(str::to_string),
            context: self.scope.context_name().map(str::to_string),
            result,
            passed,
            duration,
            failure_message,
            stack_trace: input.stack_trace,
            parameterized_suite_name: input.parameterized_suite_name,
            parameters: input.parameters,
        };
        debug!(
            test = %outcome.name,
            result = %outcome.result,
            duration = ?outcome.duration,
            "result recorded"
        );
        self.test_reported = true;
        self.outcomes.push(outcome);
        self.outcomes.last().expect("outcome just pushed")
    }

    /// Outcomes in execution order.
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// Entered Describe and Context blocks in execution order.
    pub fn blocks(&self) -> &[BlockEntry] {
        &self.blocks
    }

    pub fn scopes(&self) -> &ScopeStateMachine {
        &self.scope
    }

    pub fn scope(&self) -> Option<Scope> {
        self.scope.scope()
    }

    pub fn parent_scope(&self) -> Option<Scope> {
        self.scope.parent_scope()
    }

    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn count(&self, kind: ResultKind) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result == kind)
            .count()
    }

    pub fn passed_count(&self) -> usize {
        self.count(ResultKind::Passed)
    }

    pub fn failed_count(&self) -> usize {
        self.count(ResultKind::Failed)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(ResultKind::Skipped)
    }

    pub fn pending_count(&self) -> usize {
        self.count(ResultKind::Pending)
    }

    /// Sum of all outcome durations.
    pub fn total_duration(&self) -> Duration {
        self.outcomes.iter().map(|outcome| outcome.duration).sum()
    }

    /// A context passes when every outcome recorded inside it passed.
    pub fn context_counts(&self) -> ContextCounts {
        let mut counts = ContextCounts::default();
        for (index, entry) in self.blocks.iter().enumerate() {
            if entry.scope != Scope::Context {
                continue;
            }
            let end = self
                .blocks
                .get(index + 1)
                .map_or(self.outcomes.len(), |next| next.first_outcome);
            let passed = self.outcomes[entry.first_outcome..end]
                .iter()
                .filter(|outcome| outcome.context.as_deref() == Some(entry.block.name.as_str()))
                .all(|outcome| outcome.passed);
            if passed {
                counts.passed += 1;
            } else {
                counts.failed += 1;
            }
        }
        counts
    }

    fn push_block(&mut self, scope: Scope, block: Block) {
        self.blocks.push(BlockEntry {
            scope,
            block,
            first_outcome: self.outcomes.len(),
        });
    }
}

fn strict_failure_message(original: ResultKind) -> String {
    format!(
        "The test failed because the test was executed in Strict mode and the result '{original}' was translated to Failed."
    )
}
