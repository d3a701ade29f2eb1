//! Structural shape descriptors for request and response bodies.
//!
//! A [`Shape`] only describes field names and types so the document crate
//! can emit a schema. It carries no runtime behavior.

use crate::handler::Response;
use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Component name of the fixed error schema.
pub const ERROR_SCHEMA: &str = "Error";

/// Describes the structure of a body.
///
/// # Example
///
/// ```
/// use trellis_core::Shape;
///
/// let user = Shape::object()
///     .field("id", Shape::Integer)
///     .field("name", Shape::String)
///     .optional("email", Shape::String)
///     .named("User");
///
/// assert_eq!(user.name(), Some("User"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A string.
    String,
    /// A 64-bit integer.
    Integer,
    /// A floating point number.
    Number,
    /// A boolean.
    Boolean,
    /// A homogeneous list.
    Array(Box<Shape>),
    /// An object with known fields.
    Object(Vec<Field>),
    /// An object with arbitrary keys and uniform values.
    Map(Box<Shape>),
    /// Anything at all.
    Any,
    /// A shape registered once as a reusable component.
    Named(String, Box<Shape>),
    /// A sample value; the schema is inferred from it when emitted.
    Example(Value),
}

/// One field of an object shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Wire name.
    pub name: String,
    /// Field shape.
    pub shape: Shape,
    /// Whether the field must be present.
    pub required: bool,
}

impl Shape {
    /// An object with no fields yet.
    pub fn object() -> Self {
        Self::Object(Vec::new())
    }

    /// A list of `item`.
    pub fn array(item: Shape) -> Self {
        Self::Array(Box::new(item))
    }

    /// A map from string keys to `value`.
    pub fn map(value: Shape) -> Self {
        Self::Map(Box::new(value))
    }

    /// A shape inferred from a sample value.
    pub fn example(value: Value) -> Self {
        Self::Example(value)
    }

    /// A shape inferred from a serialized sample.
    pub fn example_of<T: Serialize>(sample: &T) -> serde_json::Result<Self> {
        serde_json::to_value(sample).map(Self::Example)
    }

    /// Adds a required field. Has no effect unless the shape is an object
    /// (possibly behind a name).
    #[must_use]
    pub fn field(self, name: impl Into<String>, shape: Shape) -> Self {
        self.with_field(Field {
            name: name.into(),
            shape,
            required: true,
        })
    }

    /// Adds an optional field. Same rules as [`Shape::field`].
    #[must_use]
    pub fn optional(self, name: impl Into<String>, shape: Shape) -> Self {
        self.with_field(Field {
            name: name.into(),
            shape,
            required: false,
        })
    }

    fn with_field(self, field: Field) -> Self {
        match self {
            Self::Object(mut fields) => {
                fields.retain(|f| f.name != field.name);
                fields.push(field);
                Self::Object(fields)
            }
            Self::Named(name, inner) => Self::Named(name, Box::new(inner.with_field(field))),
            other => other,
        }
    }

    /// Registers this shape as a named component.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Self {
        Self::Named(name.into(), Box::new(self))
    }

    /// Component name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name, _) => Some(name),
            _ => None,
        }
    }

    /// The fixed error schema used by every default 400, 404 and 500 response.
    pub fn error() -> Self {
        Self::object()
            .optional("code", Self::String)
            .optional("message", Self::String)
            .optional("data", Self::map(Self::Any))
            .named(ERROR_SCHEMA)
    }
}

/// Error response body matching [`Shape::error`].
///
/// ```
/// use trellis_core::ErrorBody;
///
/// let body = ErrorBody::new("not_found")
///     .message("no such user")
///     .data("id", 42);
/// let json = serde_json::to_value(&body).unwrap();
///
/// assert_eq!(json["code"], "not_found");
/// assert_eq!(json["data"]["id"], 42);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Additional data.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl ErrorBody {
    /// Creates a body with the given code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds one entry of additional data.
    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Renders a JSON response with the given status.
    pub fn into_response(self, status: StatusCode) -> Response {
        let body = serde_json::to_vec(&self).unwrap_or_default();
        let mut response = Response::new(Bytes::from(body));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}
