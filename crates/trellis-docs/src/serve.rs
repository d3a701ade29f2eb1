//! The two document endpoints.
//!
//! Both render the shared document on every request, so they always
//! reflect the latest build.

use std::sync::Arc;

use bytes::Bytes;
use http::{header, HeaderValue, Method, StatusCode};
use parking_lot::RwLock;
use tracing::error;
use trellis_core::{Engine, EngineResult, ErrorBody, HandlerChain, Request, Response};

use crate::builder::DocumentBuilder;
use crate::error::DocsResult;
use crate::openapi::OpenApi;

/// Path of the JSON rendering.
pub const JSON_PATH: &str = "/spec/spec.json";

/// Path of the YAML rendering.
pub const YAML_PATH: &str = "/spec/spec.yaml";

/// Content type of the JSON rendering.
pub const JSON_CONTENT_TYPE: &str = "application/openapi+json";

/// Content type of the YAML rendering.
pub const YAML_CONTENT_TYPE: &str = "application/openapi+yaml";

/// Output format of a document endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl Format {
    /// Path the format is served at.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Json => JSON_PATH,
            Self::Yaml => YAML_PATH,
        }
    }

    /// Content type of the response.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => JSON_CONTENT_TYPE,
            Self::Yaml => YAML_CONTENT_TYPE,
        }
    }

    fn render(self, document: &OpenApi) -> DocsResult<Vec<u8>> {
        Ok(match self {
            Self::Json => serde_json::to_vec_pretty(document)?,
            Self::Yaml => serde_yaml::to_string(document)?.into_bytes(),
        })
    }
}

impl DocumentBuilder {
    /// Registers `GET /spec/spec.json` and `GET /spec/spec.yaml`.
    pub fn mount(&self, engine: &mut dyn Engine) -> EngineResult<()> {
        for format in [Format::Json, Format::Yaml] {
            engine.register(&Method::GET, format.path(), self.endpoint(format))?;
        }
        Ok(())
    }

    /// The handler chain serving one format.
    pub fn endpoint(&self, format: Format) -> HandlerChain {
        let document = Arc::clone(&self.document);
        HandlerChain::new(move |_request: Request| {
            let document = Arc::clone(&document);
            async move { respond(&document, format) }
        })
    }
}

fn respond(document: &RwLock<OpenApi>, format: Format) -> Response {
    let rendered = format.render(&document.read());
    match rendered {
        Ok(body) => {
            let mut response = Response::new(Bytes::from(body));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(format.content_type()),
            );
            response
        }
        Err(err) => {
            error!(path = format.path(), error = %err, "failed to render document");
            ErrorBody::new("document_render_failed")
                .message(err.to_string())
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentConfig;
    use trellis_core::{EngineError, Route, Shape};

    #[derive(Default)]
    struct Collect {
        routes: Vec<(Method, String, HandlerChain)>,
    }

    impl Engine for Collect {
        fn register(&mut self, method: &Method, path: &str, chain: HandlerChain) -> EngineResult<()> {
            if self.routes.iter().any(|(m, p, _)| m == method && p == path) {
                return Err(EngineError::conflict(method.as_str(), path));
            }
            self.routes.push((method.clone(), path.to_string(), chain));
            Ok(())
        }
    }

    async fn noop(_request: Request) -> Response {
        Response::default()
    }

    #[tokio::test]
    async fn test_mount_serves_both_formats() {
        let builder = DocumentBuilder::new(DocumentConfig::new("Svc", "1.0.0"));
        let mut engine = Collect::default();
        builder.mount(&mut engine).unwrap();

        let paths: Vec<_> = engine.routes.iter().map(|(_, p, _)| p.as_str()).collect();
        assert_eq!(paths, vec![JSON_PATH, YAML_PATH]);

        let json = engine.routes[0].2.run(Request::default()).await;
        assert_eq!(json.status(), StatusCode::OK);
        assert_eq!(json.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        let doc: serde_json::Value = serde_json::from_slice(json.body()).unwrap();
        assert_eq!(doc["info"]["title"], "Svc");

        let yaml = engine.routes[1].2.run(Request::default()).await;
        assert_eq!(yaml.headers()[header::CONTENT_TYPE], YAML_CONTENT_TYPE);
        let doc: serde_json::Value = serde_yaml::from_slice(yaml.body()).unwrap();
        assert_eq!(doc["info"]["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_endpoint_reflects_later_builds() {
        let builder = DocumentBuilder::new(DocumentConfig::default());
        let endpoint = builder.endpoint(Format::Json);

        let route = Route::get("main", "/late", Shape::String, HandlerChain::new(noop));
        builder.materialize(&route, route.template()).unwrap();

        let response = endpoint.run(Request::default()).await;
        let doc: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert!(doc["paths"]["/late"]["get"].is_object());
    }

    #[test]
    fn test_mount_twice_conflicts() {
        let builder = DocumentBuilder::new(DocumentConfig::default());
        let mut engine = Collect::default();
        builder.mount(&mut engine).unwrap();
        assert!(matches!(
            builder.mount(&mut engine),
            Err(EngineError::Conflict { .. })
        ));
    }
}
