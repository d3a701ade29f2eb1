//! The built-in dispatch engine.
//!
//! [`DispatchEngine`] is a small radix-tree [`Engine`]: it stores handler
//! chains per `(method, path)` and dispatches buffered requests to them.
//! Served routes are first-registered-wins; a second registration of the
//! same pair is rejected.

use http::{header, HeaderValue, Method, StatusCode};
use tracing::debug;
use trellis_core::{Engine, EngineResult, ErrorBody, HandlerChain, Params, Request, Response};

use crate::method_router::MethodRouter;
use crate::node::Node;

/// Result of looking up a request.
#[derive(Debug)]
pub enum RouteMatch<'a> {
    /// A chain serves the request.
    Found {
        /// The chain to run.
        chain: &'a HandlerChain,
        /// Captured path parameters.
        params: Params,
    },
    /// The path exists but not for this method.
    MethodNotAllowed {
        /// Methods bound at the path.
        allowed: &'a MethodRouter<HandlerChain>,
    },
    /// Nothing is bound at the path.
    NotFound,
}

/// Radix-tree engine dispatching to handler chains.
///
/// # Example
///
/// ```rust
/// use http::{Method, StatusCode};
/// use trellis_core::{Engine, HandlerChain, Params, Request, Response};
/// use trellis_router::DispatchEngine;
///
/// async fn show(request: Request) -> Response {
///     let id = Params::of(&request).get("id").unwrap_or_default().to_string();
///     Response::new(id.into())
/// }
///
/// let mut engine = DispatchEngine::new();
/// engine.register(&Method::GET, "/users/:id", HandlerChain::new(show)).unwrap();
///
/// let request = http::Request::get("/users/42").body(Default::default()).unwrap();
/// let response = tokio_test::block_on(engine.dispatch(request));
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.body().as_ref(), b"42");
/// ```
#[derive(Debug)]
pub struct DispatchEngine {
    root: Node<HandlerChain>,
    routes: Vec<(Method, String)>,
}

impl Default for DispatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            routes: Vec::new(),
        }
    }

    /// Looks up `(method, path)`.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let Some((methods, params)) = self.root.match_path(path) else {
            return RouteMatch::NotFound;
        };
        match methods.get(method) {
            Some(chain) => RouteMatch::Found { chain, params },
            None => RouteMatch::MethodNotAllowed { allowed: methods },
        }
    }

    /// Dispatches a request.
    ///
    /// Unknown paths get 404 and unbound methods 405 with an `Allow`
    /// header, both with an error body. Otherwise the matched chain runs
    /// with the captured [`Params`] in the request extensions.
    pub async fn dispatch(&self, mut request: Request) -> Response {
        let path = request.uri().path().to_string();
        match self.match_route(request.method(), &path) {
            RouteMatch::Found { chain, params } => {
                request.extensions_mut().insert(params);
                chain.run(request).await
            }
            RouteMatch::MethodNotAllowed { allowed } => {
                let mut response = ErrorBody::new("method_not_allowed")
                    .message(format!("{} is not allowed on {path}", request.method()))
                    .into_response(StatusCode::METHOD_NOT_ALLOWED);
                if let Ok(value) = HeaderValue::from_str(&allowed.allow_header()) {
                    response.headers_mut().insert(header::ALLOW, value);
                }
                response
            }
            RouteMatch::NotFound => ErrorBody::new("not_found")
                .message(format!("no route for {path}"))
                .into_response(StatusCode::NOT_FOUND),
        }
    }

    /// Registered `(method, path)` pairs in registration order.
    pub fn routes(&self) -> &[(Method, String)] {
        &self.routes
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Engine for DispatchEngine {
    fn register(&mut self, method: &Method, path: &str, chain: HandlerChain) -> EngineResult<()> {
        self.root.insert(path, method.clone(), chain)?;
        debug!(method = %method, path = path, middleware = ?self.last_chain_names(method, path), "route bound");
        self.routes.push((method.clone(), path.to_string()));
        Ok(())
    }
}

impl DispatchEngine {
    fn last_chain_names(&self, method: &Method, path: &str) -> Vec<&'static str> {
        match self.match_route(method, path) {
            RouteMatch::Found { chain, .. } => chain.middleware_names(),
            _ => Vec::new(),
        }
    }
}
