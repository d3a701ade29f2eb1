//! # Trellis Docs
//!
//! Builds the OpenAPI document while routes are registered, and serves it.
//!
//! - [`DocumentBuilder`] - owns one document; turns each route into an operation
//! - [`RegistrationContext`] - shares one builder across everything that registers routes
//! - [`DocumentBuilder::mount`] - serves `/spec/spec.json` and `/spec/spec.yaml`
//!
//! ## Quick Start
//!
//! ```
//! use trellis_core::{HandlerChain, Request, Response, Route, RouteMethod, Shape};
//! use trellis_docs::{DocumentConfig, RegistrationContext};
//!
//! async fn list(_request: Request) -> Response {
//!     Response::default()
//! }
//!
//! let ctx = RegistrationContext::new();
//! let builder = ctx.builder(|| DocumentConfig::new("Shop", "1.0.0").port(3000));
//!
//! let route = Route::get("shop::users", "/users", Shape::array(Shape::String), HandlerChain::new(list));
//! builder.materialize(&route, route.template()).unwrap();
//!
//! assert!(builder.operation("/users", RouteMethod::Get).is_some());
//! assert!(builder.to_yaml().unwrap().contains("/users"));
//! ```

#![doc(html_root_url = "https://docs.rs/trellis-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod context;
mod error;
mod openapi;
mod schema;
mod serve;

pub use builder::{local_addresses, DocumentBuilder, DocumentConfig, SECURITY_SCHEME};
pub use context::RegistrationContext;
pub use error::{DocsError, DocsResult};
pub use openapi::{
    Components, Info, MediaType, OAuthFlow, OAuthFlows, OpenApi, Operation, Parameter,
    ParameterIn, PathItem, RequestBody, Response, Schema, SchemaType, SecurityScheme, Server,
    Tag, OPENAPI_VERSION,
};
pub use serve::{Format, JSON_CONTENT_TYPE, JSON_PATH, YAML_CONTENT_TYPE, YAML_PATH};
pub use trellis_core::FailurePolicy;
