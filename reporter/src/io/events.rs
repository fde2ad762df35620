//! Replay of runner event logs (JSON Lines).
//!
//! Each line is one call the runner made against the run state, e.g.
//!
//! ```text
//! {"event":"enter_describe","name":"Calculator"}
//! {"event":"enter_test","name":"adds"}
//! {"event":"result","name":"adds","result":"Passed","duration_ms":3}
//! {"event":"leave_test"}
//! {"event":"leave_describe"}
//! ```
//!
//! Replay stops at the first malformed line or illegal transition.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::types::{Block, Parameters};
use crate::run_state::{RunState, TestResult};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    EnterDescribe {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
    LeaveDescribe,
    EnterContext {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
    LeaveContext,
    EnterTest {
        name: String,
    },
    LeaveTest,
    Result(ResultEvent),
}

/// Payload of a `result` event. `result` stays textual until applied so an
/// unknown kind is reported as such rather than as a JSON error.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResultEvent {
    pub name: String,
    pub result: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub failure_message: Option<String>,
    #[serde(default)]
    pub stack_trace: Option<String>,
    #[serde(default)]
    pub parameterized_suite_name: Option<String>,
    #[serde(default)]
    pub parameters: Option<Parameters>,
}

impl ResultEvent {
    fn into_test_result(self) -> crate::Result<TestResult> {
        let mut input = TestResult::parse(self.name, &self.result)?;
        input.duration = self.duration_ms.map(Duration::from_millis);
        input.failure_message = self.failure_message;
        input.stack_trace = self.stack_trace;
        input.parameterized_suite_name = self.parameterized_suite_name;
        input.parameters = self.parameters;
        Ok(input)
    }
}

/// Apply one event to the run state.
pub fn apply_event(state: &mut RunState, event: Event) -> crate::Result<()> {
    match event {
        Event::EnterDescribe { name, description } => {
            state.enter_describe(block(name, description))
        }
        Event::LeaveDescribe => state.leave_describe(),
        Event::EnterContext { name, description } => state.enter_context(block(name, description)),
        Event::LeaveContext => state.leave_context(),
        Event::EnterTest { name } => state.enter_test(name),
        Event::LeaveTest => {
            state.leave_test();
            Ok(())
        }
        Event::Result(result) => {
            state.add_result(result.into_test_result()?);
            Ok(())
        }
    }
}

/// Replay every non-blank line of `contents`, returning the number of events applied.
#[instrument(skip_all)]
pub fn replay_events(state: &mut RunState, contents: &str) -> Result<usize> {
    let mut applied = 0;
    for (index, line) in contents.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event =
            serde_json::from_str(line).with_context(|| format!("parse event on line {line_no}"))?;
        apply_event(state, event).with_context(|| format!("apply event on line {line_no}"))?;
        applied += 1;
    }
    debug!(applied, outcomes = state.total_count(), "events replayed");
    Ok(applied)
}

/// Replay an event log file.
pub fn replay_file(state: &mut RunState, path: &Path) -> Result<usize> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    replay_events(state, &contents).with_context(|| format!("replay {}", path.display()))
}

fn block(name: String, description: Option<String>) -> Block {
    match description {
        Some(description) => Block::new(name).with_description(description),
        None => Block::new(name),
    }
}
