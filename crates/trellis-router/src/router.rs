//! Route registration.
//!
//! A [`Router`] is a prefixed, optionally grouped collection of routes that
//! are documented and bound to an engine together by [`Router::build`].

use tracing::{debug, warn};
use trellis_core::{Engine, FailurePolicy, Route, Scope, Template};
use trellis_docs::DocumentBuilder;

use crate::error::{BuildError, BuildResult};

/// A route left out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRoute {
    /// `METHOD path` of the route, path in document form.
    pub operation: String,
    /// Why documenting it failed.
    pub reason: String,
}

/// Outcome of a successful [`Router::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Routes bound to the engine.
    pub registered: usize,
    /// Routes present in the document.
    pub documented: usize,
    /// Routes bound but not documented.
    pub skipped: Vec<SkippedRoute>,
}

impl BuildReport {
    /// Whether the document and the engine agree on every route.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.registered += other.registered;
        self.documented += other.documented;
        self.skipped.extend(other.skipped);
    }
}

/// A collection of routes built together.
///
/// # Example
///
/// ```rust
/// use trellis_core::{FailurePolicy, HandlerChain, Request, Response, Route, Shape};
/// use trellis_docs::{DocumentBuilder, DocumentConfig};
/// use trellis_router::{DispatchEngine, Router};
///
/// async fn show(_request: Request) -> Response {
///     Response::default()
/// }
///
/// let builder = DocumentBuilder::new(DocumentConfig::new("Shop", "1.0.0"));
/// let mut engine = DispatchEngine::new();
///
/// let report = Router::new()
///     .prefix("/api/v1")
///     .group("users")
///     .route(Route::get(module_path!(), "/users/:id", Shape::String, HandlerChain::new(show)))
///     .build(&builder, &mut engine, FailurePolicy::Abort)
///     .unwrap();
///
/// assert_eq!(report.registered, 1);
/// assert_eq!(engine.routes()[0].1, "/api/v1/users/:id");
/// assert!(builder.document().paths.contains_key("/api/v1/users/{id}"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    prefix: Option<String>,
    group: Option<String>,
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends routes, keeping their order.
    #[must_use]
    pub fn register(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Appends one route.
    #[must_use]
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Sets the path prefix. The last call wins.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the group. When set, it replaces the tags of every route.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// The configured prefix.
    pub fn prefix_path(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The configured group.
    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the router holds no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Documents every route in `builder` and binds it to `engine`.
    ///
    /// Routes are processed in registration order. A document failure
    /// aborts under [`FailurePolicy::Abort`]; under
    /// [`FailurePolicy::Degrade`] it is logged, recorded in the report and
    /// the route is still bound. Engine failures always abort.
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] encountered.
    pub fn build(
        self,
        builder: &DocumentBuilder,
        engine: &mut dyn Engine,
        policy: FailurePolicy,
    ) -> BuildResult<BuildReport> {
        let Self {
            prefix,
            group,
            routes,
        } = self;
        let prefix = prefix.map(Template::new);
        let style = engine.param_style();
        let mut report = BuildReport::default();

        let mut scope;
        let target: &mut dyn Engine = match &prefix {
            Some(prefix) => {
                scope = Scope::new(engine, &prefix.engine_path(style));
                &mut scope
            }
            None => engine,
        };

        for route in routes {
            let path = match &prefix {
                Some(prefix) => Template::join(prefix, route.template()),
                None => route.template().normalized(),
            };
            let route = match &group {
                Some(group) => route.replace_tags(vec![group.clone()]),
                None => route,
            };
            let method = route.method();
            let operation = format!("{method} {}", path.document());

            match builder.materialize(&route, &path) {
                Ok(()) => report.documented += 1,
                Err(source) => match policy {
                    FailurePolicy::Abort => {
                        return Err(BuildError::Document { operation, source });
                    }
                    FailurePolicy::Degrade => {
                        warn!(operation = %operation, error = %source, "route left out of the document");
                        report.skipped.push(SkippedRoute {
                            operation: operation.clone(),
                            reason: source.to_string(),
                        });
                    }
                },
            }

            let engine_path = match &prefix {
                Some(_) => route.template().engine_path(style),
                None => path.engine_path(style),
            };
            target
                .register(&method.to_method(), &engine_path, route.into_chain())
                .map_err(|source| BuildError::Engine {
                    operation: operation.clone(),
                    source,
                })?;
            debug!(operation = %operation, path = %path.native(), "route registered");
            report.registered += 1;
        }

        Ok(report)
    }
}
