//! HTTP engine capability.
//!
//! Routers and the document crate never talk to a concrete server. They
//! need exactly two things from one: bind a handler chain to a
//! `(method, path)` pair, and open a sub-scope under a prefix.

use crate::error::EngineResult;
use crate::handler::HandlerChain;
use crate::template::{normalize_path, ParamStyle};
use http::Method;

/// Something handler chains can be registered with.
pub trait Engine {
    /// Binds `chain` at `(method, path)`.
    ///
    /// `path` is already rendered in [`Engine::param_style`] syntax.
    fn register(&mut self, method: &Method, path: &str, chain: HandlerChain) -> EngineResult<()>;

    /// Placeholder syntax this engine dispatches on.
    fn param_style(&self) -> ParamStyle {
        ParamStyle::Colon
    }

    /// Opens a scope whose registrations land under `prefix`.
    fn scope(&mut self, prefix: &str) -> Scope<'_>
    where
        Self: Sized,
    {
        Scope::new(self, prefix)
    }
}

/// Registrations under a fixed prefix. Scopes nest.
///
/// ```
/// use http::Method;
/// use trellis_core::{Engine, EngineResult, HandlerChain, Request, Response};
///
/// #[derive(Default)]
/// struct Paths(Vec<String>);
///
/// impl Engine for Paths {
///     fn register(&mut self, _: &Method, path: &str, _: HandlerChain) -> EngineResult<()> {
///         self.0.push(path.to_string());
///         Ok(())
///     }
/// }
///
/// async fn ok(_: Request) -> Response {
///     Response::default()
/// }
///
/// let mut engine = Paths::default();
/// let mut api = engine.scope("/api/");
/// let mut v1 = api.scope("v1");
/// v1.register(&Method::GET, "/users", HandlerChain::new(ok)).unwrap();
///
/// assert_eq!(engine.0, vec!["/api/v1/users"]);
/// ```
pub struct Scope<'a> {
    engine: &'a mut dyn Engine,
    prefix: String,
}

impl<'a> Scope<'a> {
    /// Wraps an engine. The prefix is normalized.
    pub fn new(engine: &'a mut dyn Engine, prefix: &str) -> Self {
        Self {
            engine,
            prefix: normalize_path(prefix),
        }
    }

    /// The normalized prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Engine for Scope<'_> {
    fn register(&mut self, method: &Method, path: &str, chain: HandlerChain) -> EngineResult<()> {
        let full = normalize_path(&format!("{}/{}", self.prefix, path));
        self.engine.register(method, &full, chain)
    }

    fn param_style(&self) -> ParamStyle {
        self.engine.param_style()
    }
}
