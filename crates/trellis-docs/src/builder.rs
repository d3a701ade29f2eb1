//! The document builder.
//!
//! One [`DocumentBuilder`] owns one OpenAPI document. Routers hand it each
//! route with its final path during build; every route becomes one
//! operation. Each operation is converted first and only then written,
//! under one write lock, so a failing route never leaves partial state.

use std::collections::HashSet;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};
use std::sync::Arc;

use http::StatusCode;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, warn};
use trellis_core::{ParamLocation, Route, RouteMethod, Template, ERROR_SCHEMA};

use crate::error::{DocsError, DocsResult};
use crate::openapi::{
    Info, MediaType, OpenApi, Operation, Parameter, ParameterIn, RequestBody, Response,
    SecurityScheme, Server, Tag,
};
use crate::schema::{error_schema, SchemaEmitter};

/// Name of the security scheme registered at seed time.
pub const SECURITY_SCHEME: &str = "bearer";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Everything needed to seed a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    pub description: Option<String>,
    /// Port the service listens on.
    pub port: u16,
    /// OAuth2 authorization endpoint of the bearer scheme.
    pub issuer_url: String,
    /// Server URLs, in order, duplicates removed at seed time.
    pub servers: Vec<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            version: "0.1.0".to_string(),
            description: None,
            port: 8080,
            issuer_url: String::new(),
            servers: Vec::new(),
        }
    }
}

impl DocumentConfig {
    /// Creates a config with a title and version.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the port used by discovered server URLs.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the OAuth2 authorization URL.
    #[must_use]
    pub fn issuer_url(mut self, url: impl Into<String>) -> Self {
        self.issuer_url = url.into();
        self
    }

    /// Adds a server URL.
    #[must_use]
    pub fn server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(url.into());
        self
    }

    /// Adds `http://0.0.0.0:<port>` and one URL per local IPv4 address.
    #[must_use]
    pub fn discover_servers(mut self) -> Self {
        let port = self.port;
        self.servers.push(format!("http://{}:{port}", Ipv4Addr::UNSPECIFIED));
        self.servers.extend(
            local_addresses()
                .into_iter()
                .map(|addr| format!("http://{addr}:{port}")),
        );
        self
    }
}

/// IPv4 addresses the host name resolves to, deduplicated.
pub fn local_addresses() -> Vec<Ipv4Addr> {
    let Some(host) = hostname() else {
        debug!("host name unknown, no local addresses discovered");
        return Vec::new();
    };

    let resolved = match (host.as_str(), 0).to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(err) => {
            debug!(host = %host, error = %err, "host name did not resolve");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    resolved
        .filter_map(|addr| match addr.ip() {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
        .filter(|ip| seen.insert(*ip))
        .collect()
}

fn hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| fs::read_to_string("/etc/hostname").ok())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

/// Owns and incrementally writes one OpenAPI document.
#[derive(Debug)]
pub struct DocumentBuilder {
    pub(crate) document: Arc<RwLock<OpenApi>>,
}

impl DocumentBuilder {
    /// Seeds a document: info, servers, the bearer scheme and the error
    /// component.
    pub fn new(config: DocumentConfig) -> Self {
        let mut document = OpenApi::new(Info {
            title: config.title,
            version: config.version,
            description: config.description,
        });

        let mut seen = HashSet::new();
        document.servers = config
            .servers
            .into_iter()
            .filter(|url| seen.insert(url.clone()))
            .map(Server::new)
            .collect();

        document.components.security_schemes.insert(
            SECURITY_SCHEME.to_string(),
            SecurityScheme::oauth2_implicit(config.issuer_url),
        );

        document
            .components
            .schemas
            .insert(ERROR_SCHEMA.to_string(), error_schema());

        Self {
            document: Arc::new(RwLock::new(document)),
        }
    }

    /// Emits the operation for `route` at `path`.
    ///
    /// `path` is the final template, prefix included. An existing operation
    /// at the same (path, method) is replaced.
    pub fn materialize(&self, route: &Route, path: &Template) -> DocsResult<()> {
        let method = route.method();
        let doc_path = path.document().to_string();
        let label = format!("{method} {doc_path}");
        let meta = route.metadata();

        let mut parameters: Vec<Parameter> = Vec::new();
        for name in path.param_names() {
            if parameters.iter().any(|p| p.name == name) {
                warn!(operation = %label, param = name, "path parameter repeated, keeping the first");
                continue;
            }
            parameters.push(Parameter::string(name, ParameterIn::Path, true));
        }
        for param in &meta.params {
            let location = match param.location {
                ParamLocation::Path => ParameterIn::Path,
                ParamLocation::Query => ParameterIn::Query,
                ParamLocation::Header => ParameterIn::Header,
            };
            parameters.push(Parameter::string(&param.name, location, param.required));
        }

        let mut guard = self.document.write();
        let document = &mut *guard;

        if let Some(id) = &meta.operation_id {
            let taken = document.paths.iter().any(|(p, item)| {
                item.operations().any(|(m, op)| {
                    op.operation_id.as_ref() == Some(id) && !(p == &doc_path && m == method)
                })
            });
            if taken {
                return Err(DocsError::invalid_operation(
                    label,
                    format!("operationId '{id}' is already used"),
                ));
            }
        }

        let mut emitter = SchemaEmitter::new(&document.components.schemas);
        let request_body = match route.request() {
            Some(shape) => Some(RequestBody {
                required: true,
                content: json_content(emitter.emit(shape)?),
            }),
            None => None,
        };
        let mut responses = IndexMap::new();
        for (status, shape) in route.responses() {
            responses.insert(
                status.as_str().to_string(),
                Response {
                    description: reason(status),
                    content: json_content(emitter.emit(shape)?),
                },
            );
        }
        let staged = emitter.into_staged();

        let operation = Operation {
            tags: meta.tags.clone(),
            summary: meta.summary.clone(),
            description: meta.description.clone(),
            operation_id: meta.operation_id.clone(),
            parameters,
            request_body,
            responses,
        };

        document.components.schemas.extend(staged);
        for tag in &meta.tags {
            if !document.tags.iter().any(|t| &t.name == tag) {
                document.tags.push(Tag {
                    name: tag.clone(),
                    description: None,
                });
            }
        }

        let replaced = document
            .paths
            .entry(doc_path)
            .or_default()
            .set(method, operation);
        if let Some(old) = replaced {
            warn!(operation = %label, "operation already documented, replacing it");
            if old.tags.iter().any(|tag| !meta.tags.contains(tag)) {
                let paths = &document.paths;
                document.tags.retain(|tag| {
                    paths
                        .values()
                        .flat_map(|item| item.operations())
                        .any(|(_, op)| op.tags.contains(&tag.name))
                });
            }
        } else {
            debug!(operation = %label, "operation documented");
        }
        Ok(())
    }

    /// A snapshot of the document.
    pub fn document(&self) -> OpenApi {
        self.document.read().clone()
    }

    /// Renders the document as pretty JSON.
    pub fn to_json(&self) -> DocsResult<String> {
        Ok(serde_json::to_string_pretty(&*self.document.read())?)
    }

    /// Renders the document as YAML.
    pub fn to_yaml(&self) -> DocsResult<String> {
        Ok(serde_yaml::to_string(&*self.document.read())?)
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.document.read().operation_count()
    }

    /// A copy of one operation.
    pub fn operation(&self, path: &str, method: RouteMethod) -> Option<Operation> {
        self.document.read().operation(path, method).cloned()
    }

    /// Server URLs in the document.
    pub fn servers(&self) -> Vec<String> {
        self.document
            .read()
            .servers
            .iter()
            .map(|s| s.url.clone())
            .collect()
    }
}

fn json_content(schema: crate::openapi::Schema) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert(JSON_MEDIA_TYPE.to_string(), MediaType { schema });
    content
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Response")
        .to_string()
}
