//! JSON Schema vocabulary used by the synthesizer
//!
//! Type names and keywords are enums rather than string literals so the
//! synthesizer cannot misspell a keyword.

use serde::Serialize;
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

/// JSON schema type names emitted into `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JsonSchemaType {
    /// `object`
    Object,
    /// `array`
    Array,
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `null`
    Null,
}

impl From<JsonSchemaType> for Value {
    fn from(schema_type: JsonSchemaType) -> Self {
        Self::String(schema_type.as_ref().to_string())
    }
}

/// Schema fragment keywords written by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum SchemaField {
    /// The additionalProperties field for mapping types
    AdditionalProperties,
    /// The default field carrying a coerced default value
    Default,
    /// The description field
    Description,
    /// The items field for array types
    Items,
    /// The properties field for object types
    Properties,
    /// The required field for object types
    Required,
    /// The type field
    Type,
}

impl From<SchemaField> for String {
    fn from(field: SchemaField) -> Self {
        field.as_ref().to_string()
    }
}
