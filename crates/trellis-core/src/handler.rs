//! Handler chains.
//!
//! A route is served by an ordered list of [`Middleware`] followed by one
//! terminal [`Handler`]. Each middleware receives a [`Next`] continuation and
//! may run it or answer on its own.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use trellis_core::{BoxFuture, HandlerChain, Middleware, Next, Request, Response};
//!
//! struct Stamp;
//!
//! impl Middleware for Stamp {
//!     fn name(&self) -> &'static str {
//!         "stamp"
//!     }
//!
//!     fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let mut response = next.run(request).await;
//!             response
//!                 .headers_mut()
//!                 .insert("x-stamp", http::HeaderValue::from_static("1"));
//!             response
//!         })
//!     }
//! }
//!
//! async fn hello(_request: Request) -> Response {
//!     Response::new(Bytes::from_static(b"hello"))
//! }
//!
//! let chain = HandlerChain::new(hello).layer(Stamp);
//! assert_eq!(chain.middleware_names(), vec!["stamp"]);
//! ```

use bytes::Bytes;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Incoming request with a fully buffered body.
pub type Request = http::Request<Bytes>;

/// Outgoing response with a fully buffered body.
pub type Response = http::Response<Bytes>;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Terminal request handler.
///
/// Implemented for every `Fn(Request) -> impl Future<Output = Response>`,
/// so plain async functions can be used directly.
pub trait Handler: Send + Sync + 'static {
    /// Handles a request.
    fn call(&self, request: Request) -> BoxFuture<'static, Response>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        Box::pin(self(request))
    }
}

/// A stage that runs before the handler.
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request, usually by awaiting `next.run(request)`.
    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response>;
}

/// Continuation into the rest of a chain.
pub struct Next<'a> {
    middleware: &'a [Arc<dyn Middleware>],
    handler: &'a dyn Handler,
}

impl<'a> Next<'a> {
    /// Runs the remaining middleware and then the handler.
    pub fn run(self, request: Request) -> BoxFuture<'a, Response> {
        if let Some((first, rest)) = self.middleware.split_first() {
            let next = Next {
                middleware: rest,
                handler: self.handler,
            };
            return first.process(request, next);
        }
        self.handler.call(request)
    }
}

/// Ordered middleware plus a terminal handler.
///
/// Clones share the same stages.
#[derive(Clone)]
pub struct HandlerChain {
    middleware: Vec<Arc<dyn Middleware>>,
    handler: Arc<dyn Handler>,
}

impl HandlerChain {
    /// Creates a chain with no middleware.
    pub fn new(handler: impl Handler) -> Self {
        Self {
            middleware: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Appends a middleware. Stages run in the order they are added.
    #[must_use]
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared middleware.
    #[must_use]
    pub fn layer_shared(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Runs the request through every stage.
    pub fn run(&self, request: Request) -> BoxFuture<'_, Response> {
        let next = Next {
            middleware: &self.middleware,
            handler: self.handler.as_ref(),
        };
        next.run(request)
    }

    /// Middleware names in execution order.
    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }

    /// Number of middleware stages.
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// True when the chain is just the handler.
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("middleware", &self.middleware_names())
            .finish_non_exhaustive()
    }
}
