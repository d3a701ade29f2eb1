//! Application bootstrap.
//!
//! [`App`] wires configuration, the shared document builder and the
//! dispatch engine together. Routers are registered one by one, then
//! [`App::finish`] mounts the document endpoints and hands back a
//! [`Service`] ready to answer requests.

use std::sync::Arc;

use tracing::info;
use trellis_config::{LogFormat, LoggingConfig, TrellisConfig};
use trellis_core::{EngineResult, Request, Response};
use trellis_docs::{DocumentBuilder, DocumentConfig, OpenApi, RegistrationContext, JSON_PATH, YAML_PATH};
use trellis_router::{BuildReport, DispatchEngine, Router};
use trellis_telemetry::LogConfig;

use crate::error::AppResult;

/// Document seed derived from the configuration.
///
/// Servers are `http://0.0.0.0:<port>`, one URL per local IPv4 address,
/// then the advertised hosts.
pub fn document_config(config: &TrellisConfig) -> DocumentConfig {
    let mut document = DocumentConfig::new(&config.document.title, &config.document.version)
        .port(config.server.port)
        .issuer_url(&config.oauth.issuer_url)
        .discover_servers();
    if !config.document.description.is_empty() {
        document = document.description(&config.document.description);
    }
    config
        .server
        .advertised_hosts
        .iter()
        .fold(document, |document, host| document.server(host))
}

/// Logging setup derived from the logging section.
pub fn log_config(logging: &LoggingConfig) -> LogConfig {
    LogConfig {
        enabled: logging.enabled,
        level: logging.level.clone(),
        json_format: logging.format == LogFormat::Json,
        ansi: logging.ansi,
        file_line_info: logging.format == LogFormat::Pretty,
        include_target: true,
    }
}

/// Installs the global log subscriber described by `config`.
///
/// # Errors
///
/// Returns `AppError::Telemetry` for a bad level or when a subscriber is
/// already installed.
pub fn init_logging(config: &TrellisConfig) -> AppResult<()> {
    trellis_telemetry::init_logging(&log_config(&config.logging))?;
    Ok(())
}

/// An application being assembled.
///
/// # Example
///
/// ```
/// use trellis::prelude::*;
///
/// async fn health(_request: Request) -> Response {
///     Response::new(r#"{"status":true}"#.into())
/// }
///
/// let service = App::new(TrellisConfig::default())
///     .unwrap()
///     .register(
///         Router::new()
///             .prefix("/api/v1")
///             .route(Route::get(module_path!(), "/health", Shape::Boolean, HandlerChain::new(health))),
///     )
///     .unwrap()
///     .finish()
///     .unwrap();
///
/// assert!(service.document().paths.contains_key("/api/v1/health"));
/// ```
#[derive(Debug)]
pub struct App {
    config: TrellisConfig,
    context: RegistrationContext,
    builder: Arc<DocumentBuilder>,
    engine: DispatchEngine,
    report: BuildReport,
}

impl App {
    /// Validates `config` and starts an application with its own context.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if validation fails.
    pub fn new(config: TrellisConfig) -> AppResult<Self> {
        Self::with_context(config, RegistrationContext::new())
    }

    /// Starts an application on a shared registration context.
    ///
    /// When the context already holds a builder, that builder is used and
    /// the document section of `config` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if validation fails.
    pub fn with_context(config: TrellisConfig, context: RegistrationContext) -> AppResult<Self> {
        config.validate()?;
        let builder = context.builder(|| document_config(&config));
        Ok(Self {
            config,
            context,
            builder,
            engine: DispatchEngine::new(),
            report: BuildReport::default(),
        })
    }

    /// Documents and binds every route of `router`.
    ///
    /// Uses the configured failure policy.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Build` when the build fails.
    pub fn register(mut self, router: Router) -> AppResult<Self> {
        let policy = self.config.registration.failure_policy;
        let report = router.build(&self.builder, &mut self.engine, policy)?;
        self.report.merge(report);
        Ok(self)
    }

    /// Registers directly with the engine, outside the document.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Engine` when `configure` fails.
    pub fn configure(
        mut self,
        configure: impl FnOnce(&mut DispatchEngine) -> EngineResult<()>,
    ) -> AppResult<Self> {
        configure(&mut self.engine)?;
        Ok(self)
    }

    /// The validated configuration.
    pub fn config(&self) -> &TrellisConfig {
        &self.config
    }

    /// The registration context.
    pub fn context(&self) -> &RegistrationContext {
        &self.context
    }

    /// The document builder.
    pub fn builder(&self) -> &Arc<DocumentBuilder> {
        &self.builder
    }

    /// Accumulated build reports.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Mounts the document endpoints and returns the service.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Engine` if a document path is already taken.
    pub fn finish(mut self) -> AppResult<Service> {
        self.builder.mount(&mut self.engine)?;
        Ok(Service {
            id: self.config.id,
            builder: self.builder,
            engine: self.engine,
            report: self.report,
        })
    }
}

/// A server URL and where its document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Server base URL.
    pub url: String,
    /// JSON document URL.
    pub json: String,
    /// YAML document URL.
    pub yaml: String,
}

/// A finished application.
#[derive(Debug)]
pub struct Service {
    id: Option<String>,
    builder: Arc<DocumentBuilder>,
    engine: DispatchEngine,
    report: BuildReport,
}

impl Service {
    /// Dispatches one request.
    pub async fn handle(&self, request: Request) -> Response {
        self.engine.dispatch(request).await
    }

    /// A snapshot of the document.
    pub fn document(&self) -> OpenApi {
        self.builder.document()
    }

    /// The document builder.
    pub fn builder(&self) -> &Arc<DocumentBuilder> {
        &self.builder
    }

    /// The engine.
    pub fn engine(&self) -> &DispatchEngine {
        &self.engine
    }

    /// What the builds did.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Server URLs with their document URLs.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.builder
            .servers()
            .into_iter()
            .map(|url| Endpoint {
                json: format!("{url}{JSON_PATH}"),
                yaml: format!("{url}{YAML_PATH}"),
                url,
            })
            .collect()
    }

    /// Logs the start-up banner.
    pub fn announce(&self) {
        for endpoint in self.endpoints() {
            info!(url = %endpoint.url, document = %endpoint.json, "serving");
        }
        info!(
            id = self.id.as_deref().unwrap_or("trellis"),
            routes = self.engine.len(),
            operations = self.builder.operation_count(),
            skipped = self.report.skipped.len(),
            "service started"
        );
    }
}
