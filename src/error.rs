//! Error type shared by the routing optimizer.

use thiserror::Error;

/// Failures that stop a route calculation before or outside the search.
///
/// Running out of budget or finding no feasible assignment are not errors;
/// they are reported through [`crate::solution::SolveStatus`].
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("distance matrix mismatch: {0}")]
    MatrixMismatch(String),

    #[error("cost matrix provider failed: {0}")]
    Provider(String),

    #[error("solution extracted before the search reached a terminal state")]
    EmptyResult,

    #[error("route worker exited without reporting a result")]
    WorkerDisconnected,
}

impl RoutingError {
    /// True for errors the caller fixes by changing its input.
    pub fn is_input_error(&self) -> bool {
        matches!(self, RoutingError::InvalidInput(_) | RoutingError::MatrixMismatch(_))
    }
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        RoutingError::Provider(err.to_string())
    }
}
