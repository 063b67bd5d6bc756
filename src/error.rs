//! Errors raised by parameter generation.

/// Inputs that violate the requirements of [`generate`](crate::mlpg::generate).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreconditionError {
    /// The stream has no frames.
    #[error("Parameter stream has no frames")]
    EmptyStream,
    /// Mean or inverse variance was left unset.
    #[error("Mean or inverse variance of frame {frame}, vector index {index} is not populated")]
    NotPopulated { frame: usize, index: usize },
    /// No window was given.
    #[error("Window set is empty")]
    NoWindows,
    /// The first window must be the static window `[1.0]`.
    #[error("First window is not the static window")]
    FirstWindowNotStatic,
    /// The stream was created for a different number of windows.
    #[error("Stream expects {expected} windows, got {actual}")]
    WindowCountMismatch { expected: usize, actual: usize },
    /// A parameter vector does not have `static size * windows` entries.
    #[error("Parameter vector {index} has {actual} entries; expected {expected}")]
    VectorSizeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    /// The number of durations does not match the number of states.
    #[error("Got {actual} durations for {expected} states")]
    DurationCountMismatch { expected: usize, actual: usize },
    /// The GV model covers fewer dimensions than the stream.
    #[error("GV model covers {actual} dimensions; stream has {expected}")]
    GvDimensionMismatch { expected: usize, actual: usize },
    /// GV switch does not have one entry per frame.
    #[error("GV switch has {actual} entries for {expected} frames")]
    GvSwitchLength { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("Precondition violated: {0}")]
    Precondition(#[from] PreconditionError),
    /// `W^T U^{-1} W` was not positive definite.
    #[error("Banded system of dimension {dimension} is singular at frame {frame}")]
    SingularSystem { dimension: usize, frame: usize },
}
