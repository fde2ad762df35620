//! Scope tracking and console reporting for a behavior-driven test runner.
//!
//! The external runner drives a [`RunState`] through every Describe, Context
//! and It block it executes and records one outcome per finished test. At
//! the end of the run the recorded outcomes are rendered into styled report
//! lines, optionally followed by a code-coverage summary.
//!
//! - **[`core`]**: Pure, deterministic logic (scope nesting, duration and
//!   template formatting, path shortening). No I/O.
//! - **[`io`]**: Side-effecting edges (config files, event logs, the console
//!   sink).
//!
//! [`run_state`], [`render`] and [`coverage`] combine the two into the
//! recording and reporting pipeline used by the `reporter` binary.

pub mod clock;
pub mod core;
pub mod coverage;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod render;
pub mod run_state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{Error, Result, Violation};
pub use run_state::{RunOptions, RunState, TestResult};
