//! # Trellis Core
//!
//! Engine-agnostic building blocks for declaring HTTP routes that are
//! documented as they are registered.
//!
//! - [`Route`] - one endpoint with its documentation metadata
//! - [`Template`] / [`parse_template`] - native `:param` templates and their
//!   brace-syntax document form
//! - [`Shape`] - structural body descriptors, including the fixed error schema
//! - [`HandlerChain`] - ordered middleware plus a terminal handler
//! - [`Engine`] - the capability an HTTP engine must provide

#![doc(html_root_url = "https://docs.rs/trellis-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod handler;
mod params;
mod policy;
pub mod route;
mod shape;
pub mod template;

pub use engine::{Engine, Scope};
pub use error::{EngineError, EngineResult};
pub use handler::{BoxFuture, Handler, HandlerChain, Middleware, Next, Request, Response};
pub use params::Params;
pub use policy::FailurePolicy;
pub use route::{Metadata, ParamLocation, ParamSpec, Route, RouteMethod};
pub use shape::{ErrorBody, Field, Shape, ERROR_SCHEMA};
pub use template::{normalize_path, parse_template, ParamStyle, ParsedTemplate, PathParam, Template};
