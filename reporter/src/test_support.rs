//! Test-only helpers: a hand-driven clock, run builders and scratch files.

use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::clock::Clock;
use crate::core::types::ResultKind;
use crate::run_state::{RunOptions, RunState, TestResult};

/// Clock whose elapsed time only moves when a test sets it.
///
/// Clones share the same reading, so a test can keep one handle while the
/// run state owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn set(&self, elapsed: Duration) {
        self.now.set(elapsed);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

/// Run state driven by `clock`.
pub fn manual_state(options: RunOptions, clock: &ManualClock) -> RunState {
    RunState::with_clock(options, Box::new(clock.clone()))
}

/// Run state with a fixed path and no filters.
pub fn state_for(path: &str) -> RunState {
    let options = RunOptions {
        path: path.to_string(),
        ..RunOptions::default()
    };
    manual_state(options, &ManualClock::default())
}

/// Result with an explicit duration in milliseconds.
pub fn timed(name: &str, kind: ResultKind, millis: u64) -> TestResult {
    TestResult::new(name, kind).with_duration(Duration::from_millis(millis))
}

/// Temporary directory for event logs, coverage files and configs.
#[derive(Debug)]
pub struct Scratch {
    dir: tempfile::TempDir,
}

impl Scratch {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create scratch dir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the scratch dir.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
