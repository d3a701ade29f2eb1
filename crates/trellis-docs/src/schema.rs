//! Shape to schema conversion.
//!
//! Named shapes are hoisted into `components.schemas` and replaced by a
//! `$ref`. New components are staged and only committed once the whole
//! operation converted, so a failed route leaves the components untouched.

use indexmap::IndexMap;
use serde_json::Value;
use trellis_core::{Field, Shape};

use crate::error::{DocsError, DocsResult};
use crate::openapi::{Schema, SchemaType};

/// Converts shapes against an existing component set.
pub(crate) struct SchemaEmitter<'a> {
    existing: &'a IndexMap<String, Schema>,
    staged: IndexMap<String, Schema>,
}

impl<'a> SchemaEmitter<'a> {
    pub(crate) fn new(existing: &'a IndexMap<String, Schema>) -> Self {
        Self {
            existing,
            staged: IndexMap::new(),
        }
    }

    /// Components discovered so far that are not in the existing set.
    pub(crate) fn into_staged(self) -> IndexMap<String, Schema> {
        self.staged
    }

    pub(crate) fn emit(&mut self, shape: &Shape) -> DocsResult<Schema> {
        Ok(match shape {
            Shape::String => Schema::of(SchemaType::String),
            Shape::Integer => Schema::of(SchemaType::Integer).format("int64"),
            Shape::Number => Schema::of(SchemaType::Number).format("double"),
            Shape::Boolean => Schema::of(SchemaType::Boolean),
            Shape::Any => Schema::default(),
            Shape::Array(item) => Schema::array(self.emit(item)?),
            Shape::Map(value) => Schema::map(self.emit(value)?),
            Shape::Object(fields) => self.object(fields)?,
            Shape::Named(name, inner) => self.named(name, inner)?,
            Shape::Example(value) => {
                let mut schema = infer(value)?;
                schema.example = Some(value.clone());
                schema
            }
        })
    }

    fn object(&mut self, fields: &[Field]) -> DocsResult<Schema> {
        fields.iter().try_fold(Schema::of(SchemaType::Object), |schema, field| {
            Ok(schema.property(&field.name, self.emit(&field.shape)?, field.required))
        })
    }

    fn named(&mut self, name: &str, inner: &Shape) -> DocsResult<Schema> {
        if name.is_empty() {
            return Err(DocsError::schema("component name must not be empty"));
        }

        let schema = self.emit(inner)?;
        match self.existing.get(name).or_else(|| self.staged.get(name)) {
            Some(registered) if *registered != schema => {
                return Err(DocsError::SchemaConflict {
                    name: name.to_string(),
                })
            }
            Some(_) => {}
            None => {
                self.staged.insert(name.to_string(), schema);
            }
        }
        Ok(Schema::reference(name))
    }
}

/// The `Error` component, as emitted for [`Shape::error`].
pub(crate) fn error_schema() -> Schema {
    Schema::of(SchemaType::Object)
        .property("code", Schema::of(SchemaType::String), false)
        .property("message", Schema::of(SchemaType::String), false)
        .property("data", Schema::map(Schema::default()), false)
}

/// Infers a schema from a sample value.
fn infer(value: &Value) -> DocsResult<Schema> {
    match value {
        Value::Null => Err(DocsError::schema("cannot infer a schema from null")),
        Value::Bool(_) => Ok(Schema::of(SchemaType::Boolean)),
        Value::Number(n) if n.is_f64() => Ok(Schema::of(SchemaType::Number).format("double")),
        Value::Number(_) => Ok(Schema::of(SchemaType::Integer).format("int64")),
        Value::String(_) => Ok(Schema::of(SchemaType::String)),
        Value::Array(items) => match items.first() {
            Some(first) => Ok(Schema::array(infer(first)?)),
            None => Err(DocsError::schema(
                "cannot infer an item schema from an empty array",
            )),
        },
        Value::Object(map) => map.iter().try_fold(Schema::of(SchemaType::Object), |schema, (key, v)| {
            // null members carry no type information
            let property = if v.is_null() { Schema::default() } else { infer(v)? };
            Ok(schema.property(key, property, false))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn emit_one(shape: &Shape) -> DocsResult<(Schema, IndexMap<String, Schema>)> {
        let existing = IndexMap::new();
        let mut emitter = SchemaEmitter::new(&existing);
        let schema = emitter.emit(shape)?;
        Ok((schema, emitter.into_staged()))
    }

    #[test]
    fn test_error_schema_matches_error_shape() {
        let (schema, staged) = emit_one(&Shape::error()).unwrap();
        assert_eq!(schema, Schema::reference(trellis_core::ERROR_SCHEMA));
        assert_eq!(staged[trellis_core::ERROR_SCHEMA], error_schema());
    }

    #[test]
    fn test_primitives() {
        let (schema, staged) = emit_one(&Shape::Integer).unwrap();
        assert_eq!(schema.schema_type, Some(SchemaType::Integer));
        assert_eq!(schema.format.as_deref(), Some("int64"));
        assert!(staged.is_empty());

        let (any, _) = emit_one(&Shape::Any).unwrap();
        assert_eq!(any, Schema::default());
    }

    #[test]
    fn test_object_required_fields() {
        let shape = Shape::object()
            .field("id", Shape::Integer)
            .optional("tags", Shape::array(Shape::String));
        let (schema, _) = emit_one(&shape).unwrap();

        assert_eq!(schema.required, vec!["id"]);
        assert_eq!(schema.properties.len(), 2);
        assert_eq!(
            schema.properties["tags"].items.as_ref().and_then(|s| s.schema_type),
            Some(SchemaType::String)
        );
    }

    #[test]
    fn test_named_hoisted_to_components() {
        let address = Shape::object().field("city", Shape::String).named("Address");
        let user = Shape::object()
            .field("home", address.clone())
            .field("work", address)
            .named("User");

        let (schema, staged) = emit_one(&user).unwrap();
        assert_eq!(schema, Schema::reference("User"));

        let names: Vec<_> = staged.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Address", "User"]);
        assert_eq!(
            staged["User"].properties["home"].reference.as_deref(),
            Some("#/components/schemas/Address")
        );
    }

    #[test]
    fn test_named_conflict_against_existing() {
        let mut existing = IndexMap::new();
        existing.insert("User".to_string(), Schema::of(SchemaType::String));

        let mut emitter = SchemaEmitter::new(&existing);
        let err = emitter
            .emit(&Shape::object().field("id", Shape::Integer).named("User"))
            .unwrap_err();
        assert!(matches!(err, DocsError::SchemaConflict { ref name } if name == "User"));

        // identical re-registration is fine
        let mut emitter = SchemaEmitter::new(&existing);
        assert!(emitter.emit(&Shape::String.named("User")).is_ok());
        assert!(emitter.into_staged().is_empty());
    }

    #[test]
    fn test_named_conflict_within_shape() {
        let shape = Shape::object()
            .field("a", Shape::String.named("Thing"))
            .field("b", Shape::Integer.named("Thing"));
        assert!(matches!(
            emit_one(&shape),
            Err(DocsError::SchemaConflict { .. })
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            emit_one(&Shape::String.named("")),
            Err(DocsError::SchemaConversion { .. })
        ));
    }

    #[test]
    fn test_example_inference() {
        let sample = json!({"id": 7, "score": 1.5, "name": "x", "flags": [true], "note": null});
        let (schema, _) = emit_one(&Shape::example(sample.clone())).unwrap();

        assert_eq!(schema.schema_type, Some(SchemaType::Object));
        assert_eq!(schema.properties["id"].schema_type, Some(SchemaType::Integer));
        assert_eq!(schema.properties["score"].schema_type, Some(SchemaType::Number));
        assert_eq!(
            schema.properties["flags"].items.as_ref().and_then(|s| s.schema_type),
            Some(SchemaType::Boolean)
        );
        assert_eq!(schema.properties["note"], Schema::default());
        assert_eq!(schema.example, Some(sample));
    }

    #[test]
    fn test_example_inference_failures() {
        assert!(emit_one(&Shape::example(Value::Null)).is_err());
        assert!(emit_one(&Shape::example(json!([]))).is_err());
        assert!(emit_one(&Shape::example(json!({"items": []}))).is_err());
    }
}
