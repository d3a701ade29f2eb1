//! OpenAPI 3.0 document model.
//!
//! Only the parts of OpenAPI the builder emits are modelled.
//! Maps use [`IndexMap`] so serialized output keeps insertion order.
//!
//! <https://spec.openapis.org/oas/v3.0.3>

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use trellis_core::RouteMethod;

/// OpenAPI version emitted by the builder.
pub const OPENAPI_VERSION: &str = "3.0.3";

/// Document root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApi {
    /// OpenAPI version.
    pub openapi: String,
    /// API metadata.
    pub info: Info,
    /// Base URLs the API is reachable at.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// Operations by document path.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable schemas and security schemes.
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,
    /// Tags in first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl OpenApi {
    /// An empty document with the given metadata.
    pub fn new(info: Info) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info,
            servers: Vec::new(),
            paths: IndexMap::new(),
            components: Components::default(),
            tags: Vec::new(),
        }
    }

    /// Looks up an operation.
    pub fn operation(&self, path: &str, method: RouteMethod) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.operation(method))
    }

    /// Total number of operations across all paths.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(PathItem::len).sum()
    }
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Title.
    pub title: String,
    /// API version.
    pub version: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// URL.
    pub url: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    /// A server without description.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }
}

/// Operations bound to one path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// PUT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// POST operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// DELETE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// PATCH operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

impl PathItem {
    fn slot(&mut self, method: RouteMethod) -> &mut Option<Operation> {
        match method {
            RouteMethod::Get => &mut self.get,
            RouteMethod::Put => &mut self.put,
            RouteMethod::Post => &mut self.post,
            RouteMethod::Delete => &mut self.delete,
            RouteMethod::Patch => &mut self.patch,
        }
    }

    /// Operation bound to a method.
    pub fn operation(&self, method: RouteMethod) -> Option<&Operation> {
        match method {
            RouteMethod::Get => self.get.as_ref(),
            RouteMethod::Put => self.put.as_ref(),
            RouteMethod::Post => self.post.as_ref(),
            RouteMethod::Delete => self.delete.as_ref(),
            RouteMethod::Patch => self.patch.as_ref(),
        }
    }

    /// Binds an operation, returning the one it replaced.
    pub fn set(&mut self, method: RouteMethod, operation: Operation) -> Option<Operation> {
        self.slot(method).replace(operation)
    }

    /// Bound operations with their methods.
    pub fn operations(&self) -> impl Iterator<Item = (RouteMethod, &Operation)> {
        [
            (RouteMethod::Get, &self.get),
            (RouteMethod::Put, &self.put),
            (RouteMethod::Post, &self.post),
            (RouteMethod::Delete, &self.delete),
            (RouteMethod::Patch, &self.patch),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }

    /// Number of bound operations.
    pub fn len(&self) -> usize {
        [&self.get, &self.put, &self.post, &self.delete, &self.patch]
            .iter()
            .filter(|op| op.is_some())
            .count()
    }

    /// True when no method is bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Tags for grouping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Full description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    /// Path, query and header parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code.
    pub responses: IndexMap<String, Response>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    /// Path segment.
    Path,
    /// Query string.
    Query,
    /// Header.
    Header,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Value schema.
    pub schema: Schema,
}

impl Parameter {
    /// A string-typed parameter.
    pub fn string(name: impl Into<String>, location: ParameterIn, required: bool) -> Self {
        Self {
            name: name.into(),
            location,
            required,
            schema: Schema::of(SchemaType::String),
        }
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Content by media type.
    pub content: IndexMap<String, MediaType>,
}

/// Body content for one media type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Body schema.
    pub schema: Schema,
}

/// One response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Description (required by OpenAPI).
    pub description: String,
    /// Content by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// Reusable components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Named schemas.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
    /// Security schemes.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[serde(rename = "securitySchemes")]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

impl Components {
    /// True when there is nothing to emit.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.security_schemes.is_empty()
    }
}

/// Security scheme. Only OAuth2 is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityScheme {
    /// Scheme type, `oauth2`.
    #[serde(rename = "type")]
    pub scheme_type: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// OAuth2 flows.
    pub flows: OAuthFlows,
}

impl SecurityScheme {
    /// An OAuth2 scheme with only the implicit flow.
    pub fn oauth2_implicit(authorization_url: impl Into<String>) -> Self {
        Self {
            scheme_type: "oauth2".to_string(),
            description: None,
            flows: OAuthFlows {
                implicit: Some(OAuthFlow {
                    authorization_url: Some(authorization_url.into()),
                    token_url: None,
                    scopes: IndexMap::new(),
                }),
                ..OAuthFlows::default()
            },
        }
    }
}

/// Supported OAuth2 flows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthFlows {
    /// Implicit flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,
    /// Authorization code flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "authorizationCode")]
    pub authorization_code: Option<OAuthFlow>,
    /// Client credentials flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "clientCredentials")]
    pub client_credentials: Option<OAuthFlow>,
}

/// One OAuth2 flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthFlow {
    /// Authorization endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "authorizationUrl")]
    pub authorization_url: Option<String>,
    /// Token endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "tokenUrl")]
    pub token_url: Option<String>,
    /// Available scopes. Always emitted, even empty.
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

/// A tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// JSON Schema primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String.
    String,
    /// Floating point number.
    Number,
    /// Integer.
    Integer,
    /// Boolean.
    Boolean,
    /// Array.
    Array,
    /// Object.
    Object,
}

/// A schema object. The default value is the empty schema, which accepts
/// anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Format hint, e.g. `int64`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Reference to a component schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Object properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Required property names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Map value schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<Box<Schema>>,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl Schema {
    /// A schema of the given type.
    pub fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// A reference to `#/components/schemas/<name>`.
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{name}")),
            ..Self::default()
        }
    }

    /// Sets the format hint.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// An array of `items`.
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    /// A map with `values`.
    pub fn map(values: Schema) -> Self {
        Self {
            additional_properties: Some(Box::new(values)),
            ..Self::of(SchemaType::Object)
        }
    }

    /// Adds a property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Schema, required: bool) -> Self {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_serializes_paths() {
        let doc = OpenApi::new(Info {
            title: "API".into(),
            version: "1.0.0".into(),
            description: None,
        });
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["openapi"], "3.0.3");
        assert_eq!(json["paths"], json!({}));
        assert!(json.get("components").is_none());
        assert!(json.get("servers").is_none());
    }

    #[test]
    fn test_path_item_slots() {
        let mut item = PathItem::default();
        assert!(item.is_empty());

        assert!(item.set(RouteMethod::Get, Operation::default()).is_none());
        let replaced = item.set(
            RouteMethod::Get,
            Operation {
                summary: Some("second".into()),
                ..Operation::default()
            },
        );
        assert!(replaced.is_some());
        item.set(RouteMethod::Patch, Operation::default());

        assert_eq!(item.len(), 2);
        assert_eq!(
            item.operation(RouteMethod::Get).and_then(|o| o.summary.as_deref()),
            Some("second")
        );
        assert!(item.operation(RouteMethod::Post).is_none());
    }

    #[test]
    fn test_oauth2_implicit_shape() {
        let scheme = SecurityScheme::oauth2_implicit("https://auth.example.com/authorize");
        let json = serde_json::to_value(&scheme).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "oauth2",
                "flows": {
                    "implicit": {
                        "authorizationUrl": "https://auth.example.com/authorize",
                        "scopes": {}
                    }
                }
            })
        );
    }

    #[test]
    fn test_schema_builders() {
        let schema = Schema::of(SchemaType::Object)
            .property("id", Schema::of(SchemaType::Integer).format("int64"), true)
            .property("tags", Schema::array(Schema::of(SchemaType::String)), false)
            .property("extra", Schema::map(Schema::default()), false);

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["required"], json!(["id"]));
        assert_eq!(json["properties"]["id"]["format"], "int64");
        assert_eq!(json["properties"]["tags"]["items"]["type"], "string");
        assert_eq!(json["properties"]["extra"]["additionalProperties"], json!({}));
    }

    #[test]
    fn test_reference_serialization() {
        let json = serde_json::to_value(Schema::reference("Error")).unwrap();
        assert_eq!(json, json!({"$ref": "#/components/schemas/Error"}));
    }

    #[test]
    fn test_parameter_serialization() {
        let param = Parameter::string("id", ParameterIn::Path, true);
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(
            json,
            json!({"name": "id", "in": "path", "required": true, "schema": {"type": "string"}})
        );
    }
}
