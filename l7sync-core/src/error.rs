//! Convergence error types.

use thiserror::Error;

use l7sync_sdk::ApiError;

/// Errors surfaced by a convergence pass.
#[derive(Debug, Error)]
pub enum ConvergeError {
    /// The declared configuration cannot be applied as written. Detected
    /// before any remote call, so the remote side is untouched.
    #[error("invalid desired configuration: {0}")]
    InvalidSpec(String),

    /// A delete call went through but the server confirmed with something
    /// other than the literal success marker.
    #[error("remote rejected delete: {0}")]
    DeleteRejected(String),

    /// A remote call failed; see [`ApiError`] for the kind.
    #[error(transparent)]
    Api(#[from] ApiError),
}
