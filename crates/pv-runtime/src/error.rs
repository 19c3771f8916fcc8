//! Error types for dialogue playback.

use pv_core::GraphError;
use thiserror::Error;

/// Result type for runner operations.
pub type RunResult<T> = Result<T, RunError>;

/// Errors reported by the runner. A failed call leaves the runner unchanged.
#[derive(Debug, Error)]
pub enum RunError {
    /// The graph has no nodes, so playback cannot start.
    #[error("cannot start: dialogue graph has no nodes")]
    EmptyGraph,

    /// The host chose an answer outside the surfaced range.
    #[error("invalid choice {index}: only {active} answers are active")]
    InvalidChoice {
        /// The index the host reported.
        index: usize,
        /// Number of answers currently offered.
        active: usize,
    },

    /// A choice was reported while the runner is not at an answer node.
    #[error("not waiting for a choice")]
    NotWaitingForChoice,

    /// The runner has not been started or has already finished.
    #[error("dialogue is not running")]
    NotRunning,

    /// The graph referenced a node that does not exist.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
