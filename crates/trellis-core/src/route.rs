//! Route descriptors.
//!
//! A [`Route`] is one endpoint as declared by application code: method,
//! template, handler chain, plus everything the document needs to describe
//! it. Default responses are attached at construction.
//!
//! ```
//! use trellis_core::{HandlerChain, Request, Response, Route, Shape};
//!
//! async fn show(_request: Request) -> Response {
//!     Response::default()
//! }
//!
//! let route = Route::get("shop::users", "/users/:id", Shape::String, HandlerChain::new(show))
//!     .summary("Show a user")
//!     .query("fields");
//!
//! assert_eq!(route.metadata().tags, ["Users"]);
//! assert_eq!(route.template().document(), "/users/{id}");
//! assert_eq!(route.response_codes(), vec![200, 404, 500]);
//! ```

use crate::handler::HandlerChain;
use crate::shape::Shape;
use crate::template::Template;
use http::{Method, StatusCode};
use indexmap::IndexMap;
use std::fmt;
use tracing::warn;

/// The five methods a route can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    /// GET
    Get,
    /// DELETE
    Delete,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
}

impl RouteMethod {
    /// Uppercase method name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Delete => "DELETE",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
        }
    }

    /// Whether requests carry a body described by a request shape.
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// The equivalent [`http::Method`].
    pub fn to_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Delete => Method::DELETE,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a declared parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// Path segment. Never declared; discovered from the template.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
}

/// A declared query or header parameter. Always string-typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Name.
    pub name: String,
    /// Location.
    pub location: ParamLocation,
    /// Whether the parameter must be present.
    pub required: bool,
}

/// Descriptive metadata accumulated by the chained setters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Tags, in the order they were added.
    pub tags: Vec<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Explicit operation id.
    pub operation_id: Option<String>,
    /// Declared query and header parameters.
    pub params: Vec<ParamSpec>,
}

/// One endpoint before it is built.
#[derive(Debug, Clone)]
pub struct Route {
    method: RouteMethod,
    template: Template,
    request: Option<Shape>,
    responses: IndexMap<StatusCode, Shape>,
    success: StatusCode,
    meta: Metadata,
    chain: HandlerChain,
}

impl Route {
    fn build(
        method: RouteMethod,
        namespace: &str,
        template: &str,
        response: Shape,
        request: Option<Shape>,
        chain: HandlerChain,
    ) -> Self {
        let mut responses = IndexMap::new();
        responses.insert(StatusCode::OK, response);
        if method.has_body() {
            responses.insert(StatusCode::BAD_REQUEST, Shape::error());
        }
        responses.insert(StatusCode::NOT_FOUND, Shape::error());
        responses.insert(StatusCode::INTERNAL_SERVER_ERROR, Shape::error());

        Self {
            method,
            template: Template::new(template),
            request,
            responses,
            success: StatusCode::OK,
            meta: Metadata {
                tags: default_tag(namespace).into_iter().collect(),
                ..Metadata::default()
            },
            chain,
        }
    }

    /// Declares a GET route.
    ///
    /// `namespace` names the declaring module (`module_path!()` works) and
    /// yields the default tag.
    pub fn get(namespace: &str, template: &str, response: Shape, chain: HandlerChain) -> Self {
        Self::build(RouteMethod::Get, namespace, template, response, None, chain)
    }

    /// Declares a DELETE route.
    pub fn delete(namespace: &str, template: &str, response: Shape, chain: HandlerChain) -> Self {
        Self::build(RouteMethod::Delete, namespace, template, response, None, chain)
    }

    /// Declares a POST route with a request body.
    pub fn post(
        namespace: &str,
        template: &str,
        response: Shape,
        request: Shape,
        chain: HandlerChain,
    ) -> Self {
        Self::build(RouteMethod::Post, namespace, template, response, Some(request), chain)
    }

    /// Declares a PUT route with a request body.
    pub fn put(
        namespace: &str,
        template: &str,
        response: Shape,
        request: Shape,
        chain: HandlerChain,
    ) -> Self {
        Self::build(RouteMethod::Put, namespace, template, response, Some(request), chain)
    }

    /// Declares a PATCH route with a request body.
    pub fn patch(
        namespace: &str,
        template: &str,
        response: Shape,
        request: Shape,
        chain: HandlerChain,
    ) -> Self {
        Self::build(RouteMethod::Patch, namespace, template, response, Some(request), chain)
    }

    /// Sets the summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.meta.summary = Some(summary.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    /// Appends tags, skipping ones already present.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.meta.tags.contains(&tag) {
                self.meta.tags.push(tag);
            }
        }
        self
    }

    /// Replaces the tag list wholesale.
    #[must_use]
    pub fn replace_tags(mut self, tags: Vec<String>) -> Self {
        self.meta.tags = tags;
        self
    }

    /// Declares an optional query parameter.
    #[must_use]
    pub fn query(self, name: impl Into<String>) -> Self {
        self.param(name.into(), ParamLocation::Query, false)
    }

    /// Declares a required query parameter.
    #[must_use]
    pub fn required_query(self, name: impl Into<String>) -> Self {
        self.param(name.into(), ParamLocation::Query, true)
    }

    /// Declares an optional header parameter.
    #[must_use]
    pub fn header(self, name: impl Into<String>) -> Self {
        self.param(name.into(), ParamLocation::Header, false)
    }

    /// Declares a required header parameter.
    #[must_use]
    pub fn required_header(self, name: impl Into<String>) -> Self {
        self.param(name.into(), ParamLocation::Header, true)
    }

    fn param(mut self, name: String, location: ParamLocation, required: bool) -> Self {
        match self
            .meta
            .params
            .iter_mut()
            .find(|p| p.name == name && p.location == location)
        {
            Some(existing) => existing.required = required,
            None => self.meta.params.push(ParamSpec {
                name,
                location,
                required,
            }),
        }
        self
    }

    /// Sets the operation id.
    #[must_use]
    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.meta.operation_id = Some(id.into());
        self
    }

    /// Sets the body shape for a status code. The last write per code wins.
    ///
    /// The error responses attached at construction are fixed; a shape for
    /// one of their codes is ignored.
    #[must_use]
    pub fn response(mut self, status: StatusCode, shape: Shape) -> Self {
        if self.is_error_status(status) {
            warn!(status = status.as_u16(), "error response is fixed, ignoring shape");
            return self;
        }
        self.responses.insert(status, shape);
        self
    }

    /// Moves the success response to another status code.
    ///
    /// Codes of the fixed error responses are ignored.
    #[must_use]
    pub fn success(mut self, status: StatusCode) -> Self {
        if status == self.success {
            return self;
        }
        if self.is_error_status(status) {
            warn!(status = status.as_u16(), "error response is fixed, keeping success status");
            return self;
        }
        if let Some(shape) = self.responses.shift_remove(&self.success) {
            self.responses.insert(status, shape);
        }
        self.success = status;
        self
    }

    /// Method.
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    /// Parsed template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Tags, summary, description, operation id and declared parameters.
    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    /// Request body shape, present only for body methods.
    pub fn request(&self) -> Option<&Shape> {
        self.request.as_ref()
    }

    /// Responses keyed by status code, in ascending order.
    pub fn responses(&self) -> Vec<(StatusCode, &Shape)> {
        let mut responses: Vec<_> = self.responses.iter().map(|(s, shape)| (*s, shape)).collect();
        responses.sort_by_key(|(status, _)| status.as_u16());
        responses
    }

    /// Status codes with a response, ascending.
    pub fn response_codes(&self) -> Vec<u16> {
        self.responses().into_iter().map(|(s, _)| s.as_u16()).collect()
    }

    /// Success status code.
    pub fn success_status(&self) -> StatusCode {
        self.success
    }

    /// Whether `status` carries one of the fixed error responses.
    pub fn is_error_status(&self, status: StatusCode) -> bool {
        status == StatusCode::NOT_FOUND
            || status == StatusCode::INTERNAL_SERVER_ERROR
            || (status == StatusCode::BAD_REQUEST && self.method.has_body())
    }

    /// Handler chain.
    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }

    /// Consumes the route, returning its handler chain.
    pub fn into_chain(self) -> HandlerChain {
        self.chain
    }
}

/// Default tag for a namespace: its last segment, title-cased.
///
/// ```
/// use trellis_core::route::default_tag;
///
/// assert_eq!(default_tag("shop::users").as_deref(), Some("Users"));
/// assert_eq!(default_tag("github.com/acme/ORDERS").as_deref(), Some("Orders"));
/// assert_eq!(default_tag(""), None);
/// ```
pub fn default_tag(namespace: &str) -> Option<String> {
    let segment = namespace
        .rsplit("::")
        .next()
        .and_then(|s| s.rsplit('/').next())
        .and_then(|s| s.rsplit('.').next())
        .unwrap_or_default()
        .trim();

    let mut chars = segment.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect())
}
