//! Shared types for scope tracking and reporting.
//!
//! These types define stable contracts between the recorder, the renderer and
//! the coverage summary. They carry no clock or I/O state.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Outcome of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Passed,
    Failed,
    Skipped,
    Pending,
}

impl ResultKind {
    pub const ALL: [ResultKind; 4] = [
        ResultKind::Passed,
        ResultKind::Failed,
        ResultKind::Skipped,
        ResultKind::Pending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::Passed => "Passed",
            ResultKind::Failed => "Failed",
            ResultKind::Skipped => "Skipped",
            ResultKind::Pending => "Pending",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultKind {
    type Err = Error;

    /// Case-insensitive; anything else is an [`Error::UnknownResultKind`].
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ResultKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| Error::UnknownResultKind(raw.to_string()))
    }
}

/// Kind of block currently innermost in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Describe,
    Context,
    It,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Describe => "Describe",
            Scope::Context => "Context",
            Scope::It => "It",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named Describe or Context block, with an optional long description.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub name: String,
    pub description: Option<String>,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }
}

impl From<&str> for Block {
    fn from(name: &str) -> Self {
        Block::new(name)
    }
}

impl From<String> for Block {
    fn from(name: String) -> Self {
        Block::new(name)
    }
}

/// Parameter values of a data-driven test case.
pub type Parameters = BTreeMap<String, serde_json::Value>;

/// A finalized, stored test result.
///
/// Outcomes are immutable once appended to the run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub name: String,
    /// Describe active when the result was recorded.
    pub describe: Option<String>,
    /// Context active when the result was recorded.
    pub context: Option<String>,
    pub result: ResultKind,
    /// Derived from `result` and the strict flag at recording time.
    pub passed: bool,
    pub duration: Duration,
    pub failure_message: Option<String>,
    pub stack_trace: Option<String>,
    pub parameterized_suite_name: Option<String>,
    pub parameters: Option<Parameters>,
}

/// 16-color console palette used by report themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    DarkMagenta,
    DarkYellow,
    Gray,
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}
