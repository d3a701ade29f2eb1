//! # Trellis Router
//!
//! Route registration and the built-in dispatch engine.
//!
//! - [`Router`] - prefixed, grouped collections of routes, documented and
//!   bound in one [`Router::build`] call
//! - [`DispatchEngine`] - radix-tree [`Engine`](trellis_core::Engine)
//!   serving the registered handler chains
//!
//! # Example
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use trellis_core::{FailurePolicy, HandlerChain, Params, Request, Response, Route, Shape};
//! use trellis_docs::{DocumentBuilder, DocumentConfig};
//! use trellis_router::{DispatchEngine, Router};
//!
//! async fn show(request: Request) -> Response {
//!     let id = Params::of(&request).get("id").unwrap_or_default().to_string();
//!     Response::new(id.into())
//! }
//!
//! let builder = DocumentBuilder::new(DocumentConfig::default());
//! let mut engine = DispatchEngine::new();
//!
//! Router::new()
//!     .prefix("/api/v1")
//!     .route(Route::get("shop::users", "/users/:id", Shape::String, HandlerChain::new(show)))
//!     .build(&builder, &mut engine, FailurePolicy::Abort)
//!     .unwrap();
//!
//! let request = http::Request::get("/api/v1/users/7").body(Default::default()).unwrap();
//! let response = tokio_test::block_on(engine.dispatch(request));
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body().as_ref(), b"7");
//! ```
//!
//! # Matching
//!
//! The engine keeps one tree node per path segment:
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!            "users"        "files"
//!              │               │
//!        ┌─────┴─────┐      "*path"
//!        │           │
//!     [GET,POST]   ":id"
//!                    │
//!               [GET,DELETE]
//! ```
//!
//! Static segments beat parameters, parameters beat catch-alls, and a
//! dead-ended branch falls back to the next kind.

#![doc(html_root_url = "https://docs.rs/trellis-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod method_router;
mod node;
mod router;

pub use engine::{DispatchEngine, RouteMatch};
pub use error::{BuildError, BuildResult};
pub use method_router::MethodRouter;
pub use node::{Node, SegmentKind};
pub use router::{BuildReport, Router, SkippedRoute};
