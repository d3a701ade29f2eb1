//! Engine registration errors.
//!
//! Template parsing is total and shape emission errors belong to the
//! document crate, so the only failures defined here are the ones an HTTP
//! engine raises when it rejects a `(method, path)` registration.

use thiserror::Error;

/// Result type alias using [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;

/// An HTTP engine refused a registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The `(method, path)` pair is already bound.
    #[error("route conflict: {method} {path} is already registered")]
    Conflict {
        /// HTTP method.
        method: String,
        /// Path as handed to the engine.
        path: String,
    },

    /// Two templates bind different names at the same wildcard position.
    #[error("parameter conflict in {path}: `{new}` would shadow `{existing}`")]
    ParamConflict {
        /// Path being registered.
        path: String,
        /// Name already bound at that position.
        existing: String,
        /// Name the new registration tried to bind.
        new: String,
    },

    /// The template cannot be inserted at all.
    #[error("invalid route template {path}: {reason}")]
    InvalidTemplate {
        /// Offending path.
        path: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl EngineError {
    /// Creates a conflict error.
    pub fn conflict(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Conflict {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Creates a parameter conflict error.
    pub fn param_conflict(
        path: impl Into<String>,
        existing: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self::ParamConflict {
            path: path.into(),
            existing: existing.into(),
            new: new.into(),
        }
    }

    /// Creates an invalid template error.
    pub fn invalid_template(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::Conflict { path, .. }
            | Self::ParamConflict { path, .. }
            | Self::InvalidTemplate { path, .. } => path,
        }
    }
}
