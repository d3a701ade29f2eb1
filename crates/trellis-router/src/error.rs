//! Errors raised while building a router.

use thiserror::Error;
use trellis_core::EngineError;
use trellis_docs::DocsError;

/// Failure of [`Router::build`](crate::Router::build).
///
/// Routes processed before the failing one stay documented and bound.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The document rejected a route under [`FailurePolicy::Abort`](trellis_core::FailurePolicy::Abort).
    #[error("failed to document {operation}: {source}")]
    Document {
        /// `METHOD path` of the rejected route.
        operation: String,
        /// Underlying error.
        #[source]
        source: DocsError,
    },

    /// The engine refused a registration.
    #[error("failed to register {operation}: {source}")]
    Engine {
        /// `METHOD path` of the rejected route.
        operation: String,
        /// Underlying error.
        #[source]
        source: EngineError,
    },
}

impl BuildError {
    /// `METHOD path` of the route that failed.
    #[must_use]
    pub fn operation(&self) -> &str {
        match self {
            Self::Document { operation, .. } | Self::Engine { operation, .. } => operation,
        }
    }
}

/// Result type for router builds.
pub type BuildResult<T> = Result<T, BuildError>;
