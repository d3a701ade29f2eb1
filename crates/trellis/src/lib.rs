//! # Trellis
//!
//! **Declarative route registration with a generated OpenAPI document**
//!
//! Routes are declared once with their body shapes. Building a router binds
//! every route to the HTTP engine and writes its operation into one shared
//! OpenAPI document, served at `/spec/spec.json` and `/spec/spec.yaml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trellis::prelude::*;
//!
//! async fn show(request: Request) -> Response {
//!     let id = Params::of(&request).get("id").unwrap_or_default().to_string();
//!     Response::new(id.into())
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::autoload()?;
//!     trellis::init_logging(&config)?;
//!
//!     let item = Shape::object().field("id", Shape::Integer).optional("name", Shape::String);
//!
//!     let service = App::new(config)?
//!         .register(
//!             Router::new()
//!                 .prefix("/api/v1")
//!                 .group("items")
//!                 .register([
//!                     Route::get(module_path!(), "/items/:id", item.clone(), HandlerChain::new(show))
//!                         .summary("Fetch an item")
//!                         .query("expand"),
//!                     Route::post(module_path!(), "/items", item.clone(), item, HandlerChain::new(show)),
//!                 ]),
//!         )?
//!         .finish()?;
//!
//!     service.announce();
//!     Ok(())
//! }
//! ```
//!
//! ## Crates
//!
//! - [`core`] - route descriptors, path templates, shapes, handler chains, the engine trait
//! - [`docs`] - the OpenAPI model, document builder and registration context
//! - [`router`] - routers and the built-in dispatch engine
//! - [`config`] - layered configuration
//! - [`telemetry`] - logging setup

#![doc(html_root_url = "https://docs.rs/trellis/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod error;

pub use trellis_config as config;
pub use trellis_core as core;
pub use trellis_docs as docs;
pub use trellis_router as router;
pub use trellis_telemetry as telemetry;

pub use app::{document_config, init_logging, log_config, App, Endpoint, Service};
pub use error::{AppError, AppResult};

/// Prelude module for convenient imports.
///
/// ```rust
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{App, AppError, AppResult, Service};

    pub use trellis_config::{ConfigLoader, TrellisConfig};
    pub use trellis_core::{
        Engine, ErrorBody, FailurePolicy, HandlerChain, Middleware, Next, Params, Request,
        Response, Route, Shape,
    };
    pub use trellis_docs::{DocumentBuilder, DocumentConfig, RegistrationContext};
    pub use trellis_router::{BuildReport, DispatchEngine, Router};
}
