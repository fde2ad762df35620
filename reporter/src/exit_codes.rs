//! Stable exit codes for reporter CLI commands.

/// Command succeeded and no recorded test failed.
pub const OK: i32 = 0;
/// Command failed due to invalid config, a malformed event log, or a protocol violation.
pub const INVALID: i32 = 1;
/// `reporter render` completed but at least one test failed.
pub const TESTS_FAILED: i32 = 2;
