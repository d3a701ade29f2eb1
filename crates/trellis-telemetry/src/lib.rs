//! Logging for Trellis services.
//!
//! Registration reports through `tracing`: a debug event per registered
//! route, warnings for skipped or overwritten operations, an error when a
//! document cannot be rendered, and the start-up banner at info. This crate
//! installs the subscriber that turns those events into output.
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> Result<(), trellis_telemetry::TelemetryError> {
//!     init_logging(&LogConfig::production())?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/trellis-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
