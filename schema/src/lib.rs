//! # fncall_schema
//!
//! Turns loosely typed function-calling parameter declarations into canonical
//! JSON Schema tool definitions.
//!
//! Source datasets describe parameters with short type strings such as
//! `List[int]`, `Optional[Dict[str,float]]` or malformed variants like
//! `Tuple[float`, optionally followed by modifier flags (`str, optional`).
//! This crate:
//!
//! 1. repairs and canonicalizes the base type string ([`normalize`])
//! 2. parses it into a small type algebra ([`parse_type_expr`], [`TypeExpr`])
//! 3. synthesizes a JSON Schema fragment ([`synthesize_schema`])
//! 4. coerces a raw default to the type ([`coerce`])
//! 5. assembles `properties` / `required` for a whole tool
//!    ([`ToolDefinitionAssembler`])
//!
//! Nothing in steps 1-5 fails: malformed or unsupported descriptors degrade to
//! an unconstrained `{}` schema and a diagnostic log entry.
//!
//! ```
//! use fncall_schema::{ToolParameterSet, assemble_parameters};
//! use serde_json::json;
//!
//! let parameters = ToolParameterSet::from_json(&json!({
//!     "ids": {"type": "List[int]", "description": "ids"},
//!     "limit": {"type": "int, optional", "default": "5"},
//! }))?;
//! let assembled = assemble_parameters(&parameters);
//!
//! assert_eq!(
//!     assembled.properties()["ids"],
//!     json!({"type": "array", "items": {"type": "integer"}, "description": "ids"})
//! );
//! assert_eq!(assembled.properties()["limit"]["default"], json!(5));
//! assert_eq!(assembled.required(), ["ids"]);
//! # Ok::<(), error_stack::Report<fncall_schema::Error>>(())
//! ```

mod assembler;
mod coercion;
mod constants;
mod error;
mod function;
mod json_field_access;
mod json_schema;
mod logging;
mod synthesizer;
mod type_descriptor;

pub use assembler::{
    AssemblerOptions, ModifierSplit, ParameterDescriptor, ToolDefinitionAssembler,
    ToolParameterSet, ToolParameters, assemble_parameters,
};
pub use coercion::{ValueKind, coerce, coerce_with_type_str, textual_form};
pub use error::{Error, Result};
pub use function::{
    FunctionDefinition, ToolDefinition, ToolKind, convert_tool, sanitize_function_name,
};
pub use json_field_access::JsonFieldAccess;
pub use json_schema::{JsonSchemaType, SchemaField};
pub use logging::{TracingLevel, init_tracing};
pub use synthesizer::{SchemaFragment, synthesize_schema};
pub use type_descriptor::{
    Normalized, ScalarKind, TypeExpr, normalize, parse_type_expr, resolve_type_expr,
};
