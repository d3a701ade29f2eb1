//! Error types for document emission and rendering.

use thiserror::Error;

/// Errors raised while building or rendering the document.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Rendering the document as JSON failed.
    #[error("Failed to serialize document as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering the document as YAML failed.
    #[error("Failed to serialize document as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A shape cannot be turned into a schema.
    #[error("Failed to convert schema: {reason}")]
    SchemaConversion {
        /// Why the conversion failed.
        reason: String,
    },

    /// A component name is already bound to a different schema.
    #[error("Schema component '{name}' is already registered with a different shape")]
    SchemaConflict {
        /// Component name.
        name: String,
    },

    /// The operation cannot be added to the document.
    #[error("Invalid operation '{operation}': {reason}")]
    InvalidOperation {
        /// `METHOD path` of the operation.
        operation: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl DocsError {
    /// Creates a schema conversion error.
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::SchemaConversion {
            reason: reason.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for document operations.
pub type DocsResult<T> = Result<T, DocsError>;
