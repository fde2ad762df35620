//! Deterministic, pure logic shared by the reporter.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod humanize;
pub mod path;
pub mod scope;
pub mod template;
pub mod types;
