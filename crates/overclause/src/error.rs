//! Error types for overclause

use crate::window::FrameKind;
use thiserror::Error;

/// The result type for overclause operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while specifying a window frame.
///
/// Every variant indicates a caller error detected up front by
/// [`WindowExpression::frame`](crate::window::WindowExpression::frame) before
/// any state is mutated; there is no error path in rendering or traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An integer frame offset was negative
    #[error("Frame offset must be non-negative, got {offset}")]
    NegativeOffset { offset: i64 },

    /// An interval-literal offset was used with a frame kind that only
    /// accepts row/group counts
    #[error("{kind} frames only allow integer or unbounded offsets")]
    IntervalOffset { kind: FrameKind },
}

impl Error {
    /// Create a negative-offset error
    pub fn negative_offset(offset: i64) -> Self {
        Error::NegativeOffset { offset }
    }

    /// Create an interval-offset error for the given frame kind
    pub fn interval_offset(kind: FrameKind) -> Self {
        Error::IntervalOffset { kind }
    }
}
