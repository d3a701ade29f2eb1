//! Application bootstrap errors.

use thiserror::Error;
use trellis_config::ConfigError;
use trellis_core::EngineError;
use trellis_router::BuildError;
use trellis_telemetry::TelemetryError;

/// Errors raised while bootstrapping an [`App`](crate::App).
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// A router failed to build.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A direct engine registration failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for application bootstrap.
pub type AppResult<T> = Result<T, AppError>;
