//! Maps type expressions to JSON Schema fragments

use serde_json::{Map, Value};

use crate::json_field_access::JsonFieldAccess;
use crate::json_schema::{JsonSchemaType, SchemaField};
use crate::type_descriptor::{ScalarKind, TypeExpr};

/// A single JSON Schema object node
pub type SchemaFragment = Map<String, Value>;

impl From<ScalarKind> for JsonSchemaType {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::String => Self::String,
            ScalarKind::Integer => Self::Integer,
            ScalarKind::Float => Self::Number,
            ScalarKind::Boolean => Self::Boolean,
            ScalarKind::Null => Self::Null,
        }
    }
}

/// Build the schema fragment describing `expr`
///
/// Arrays always carry `items`, `{}` when the element type is unconstrained.
/// Mapping key types are not encoded. A union is described by its first
/// non-null variant. Unsupported types yield `{}`.
#[must_use]
pub fn synthesize_schema(expr: &TypeExpr) -> SchemaFragment {
    let mut fragment = SchemaFragment::new();
    match expr {
        TypeExpr::Scalar(kind) => {
            fragment.insert_field(SchemaField::Type, JsonSchemaType::from(*kind));
        }
        TypeExpr::List(element) => {
            fragment.insert_field(SchemaField::Type, JsonSchemaType::Array);
            fragment.insert_field(SchemaField::Items, synthesize_schema(element));
        }
        TypeExpr::Dict { value, .. } => {
            fragment.insert_field(SchemaField::Type, JsonSchemaType::Object);
            fragment.insert_field(SchemaField::AdditionalProperties, synthesize_schema(value));
        }
        TypeExpr::Union(variants) => {
            return variants
                .iter()
                .find(|variant| !variant.is_null())
                .map_or_else(
                    || synthesize_schema(&TypeExpr::Scalar(ScalarKind::Null)),
                    synthesize_schema,
                );
        }
        TypeExpr::Any => {}
        TypeExpr::Unsupported(original) => {
            tracing::info!("Type '{original}' is not supported for JSON schema.");
        }
    }
    fragment
}
