//! Error types for scope tracking and result recording.

use thiserror::Error;

/// Result type alias for recorder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the run state.
///
/// Both variants indicate a defect in the driving runner. A failing test is
/// recorded as data and never surfaces here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A scope transition arrived out of order.
    #[error("protocol violation: {0}")]
    ProtocolViolation(Violation),

    /// A result value outside Passed, Failed, Skipped and Pending.
    #[error("unknown result kind '{0}': expected Passed, Failed, Skipped or Pending")]
    UnknownResultKind(String),
}

/// The specific out-of-order transition behind a protocol violation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    #[error("you already are in Describe, you cannot enter Describe twice")]
    DescribeAlreadyActive,
    #[error("cannot leave Describe before leaving Context")]
    LeaveDescribeInsideContext,
    #[error("cannot enter Context before entering Describe")]
    ContextWithoutDescribe,
    #[error("you already are in Context, you cannot enter Context twice")]
    ContextAlreadyActive,
    #[error("you already are in It, you cannot enter Context inside It")]
    ContextInsideTest,
    #[error("cannot leave Context before leaving It")]
    LeaveContextInsideTest,
    #[error("cannot enter It before entering Describe")]
    TestWithoutDescribe,
    #[error("you already are in It, you cannot enter It twice")]
    TestAlreadyActive,
}

impl From<Violation> for Error {
    fn from(violation: Violation) -> Self {
        Error::ProtocolViolation(violation)
    }
}
