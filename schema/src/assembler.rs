//! Assembles the `properties` / `required` pair for one tool's parameter set
//!
//! Each parameter runs through the same pipeline: split the raw descriptor into
//! base type and modifier flags, resolve the base type, synthesize its schema,
//! then coerce and conditionally attach the declared default. Parameters are
//! independent of each other and the output keeps declaration order.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::coercion::{ValueKind, coerce, textual_form};
use crate::constants::{
    FIELD_DEFAULT, FIELD_DESCRIPTION, FIELD_TYPE, MODIFIER_SEPARATOR, OPTIONAL_MODIFIER,
};
use crate::error::{Error, Result};
use crate::json_field_access::JsonFieldAccess;
use crate::json_schema::{JsonSchemaType, SchemaField};
use crate::synthesizer::{SchemaFragment, synthesize_schema};
use crate::type_descriptor::{TypeExpr, resolve_type_expr};

/// How a raw descriptor is split into base type and modifier flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ModifierSplit {
    /// Split on every comma, as the converted datasets were produced
    #[default]
    Flat,
    /// Ignore commas nested inside `[...]`
    BracketAware,
}

/// Options controlling how parameter sets are assembled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerOptions {
    modifier_split:  ModifierSplit,
    optional_marker: String,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            modifier_split:  ModifierSplit::default(),
            optional_marker: OPTIONAL_MODIFIER.to_string(),
        }
    }
}

impl AssemblerOptions {
    /// Use `split` to separate base types from modifiers
    #[must_use]
    pub const fn with_modifier_split(mut self, split: ModifierSplit) -> Self {
        self.modifier_split = split;
        self
    }

    /// Treat `marker` as the modifier that makes a parameter optional
    #[must_use]
    pub fn with_optional_marker(mut self, marker: impl Into<String>) -> Self {
        self.optional_marker = marker.into();
        self
    }

    /// The configured split mode
    #[must_use]
    pub const fn modifier_split(&self) -> ModifierSplit {
        self.modifier_split
    }

    /// The configured optional marker
    #[must_use]
    pub fn optional_marker(&self) -> &str {
        &self.optional_marker
    }
}

/// One declared parameter of a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    name:        String,
    raw_type:    String,
    description: Option<Value>,
    default:     Option<Value>,
}

impl ParameterDescriptor {
    /// Create a descriptor with no description or default
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        Self {
            name:        name.into(),
            raw_type:    raw_type.into(),
            description: None,
            default:     None,
        }
    }

    /// Attach a description, copied verbatim into the schema
    #[must_use]
    pub fn with_description(mut self, description: impl Into<Value>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a raw default value
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Build a descriptor from its `{type, description?, default?}` JSON form
    ///
    /// A missing `type` is treated as the empty descriptor. An explicit
    /// `"default": null` counts as a declared default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameterSet`] if `value` is not an object or its
    /// `type` is not a string.
    pub fn from_json(name: &str, value: &Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(error_stack::Report::new(Error::invalid(
                &format!("parameter '{name}'"),
                "expected an object",
            ))
            .attach(format!("Received: {value}")));
        };

        let raw_type = match object.get_field(FIELD_TYPE) {
            None => String::new(),
            Some(Value::String(raw_type)) => raw_type.clone(),
            Some(other) => {
                return Err(error_stack::Report::new(Error::invalid(
                    &format!("parameter '{name}'"),
                    "'type' must be a string",
                ))
                .attach(format!("Received: {other}")));
            }
        };

        Ok(Self {
            name: name.to_string(),
            raw_type,
            description: object.get_field(FIELD_DESCRIPTION).cloned(),
            default: object.get_field(FIELD_DEFAULT).cloned(),
        })
    }

    /// Parameter name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw type descriptor including modifier flags
    #[must_use]
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    /// Description, if declared
    #[must_use]
    pub const fn description(&self) -> Option<&Value> {
        self.description.as_ref()
    }

    /// Raw default, if declared
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Trimmed descriptor tokens; the first is the base type, the rest are modifiers
    #[must_use]
    pub fn tokens(&self, split: ModifierSplit) -> Vec<&str> {
        match split {
            ModifierSplit::Flat => self
                .raw_type
                .split(MODIFIER_SEPARATOR)
                .map(str::trim)
                .collect(),
            ModifierSplit::BracketAware => split_top_level(&self.raw_type),
        }
    }

    /// The base type segment of the descriptor
    #[must_use]
    pub fn base_type(&self, split: ModifierSplit) -> &str {
        self.tokens(split).first().copied().unwrap_or_default()
    }

    /// Modifier flags following the base type
    #[must_use]
    pub fn modifiers(&self, split: ModifierSplit) -> Vec<&str> {
        self.tokens(split).into_iter().skip(1).collect()
    }
}

/// Split on separators outside brackets, trimming each token
fn split_top_level(raw: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (index, ch) in raw.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            MODIFIER_SEPARATOR if depth == 0 => {
                tokens.push(raw[start..index].trim());
                start = index + ch.len_utf8();
            }
            _ => {}
        }
    }
    tokens.push(raw[start..].trim());
    tokens
}

/// Ordered collection of a tool's declared parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolParameterSet {
    parameters: Vec<ParameterDescriptor>,
}

impl ToolParameterSet {
    /// Create an empty parameter set
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parameters: Vec::new(),
        }
    }

    /// Append a parameter, keeping declaration order
    ///
    /// A parameter whose name is already declared replaces the earlier
    /// declaration at its original position, so names stay unique.
    pub fn push(&mut self, parameter: ParameterDescriptor) {
        if let Some(existing) = self
            .parameters
            .iter_mut()
            .find(|existing| existing.name == parameter.name)
        {
            tracing::warn!(
                "Parameter '{}' declared twice; keeping the later declaration",
                parameter.name
            );
            *existing = parameter;
        } else {
            self.parameters.push(parameter);
        }
    }

    /// Build the set from a `name -> {type, description?, default?}` mapping
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameterSet`] if `value` is not an object or any
    /// entry is malformed.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            error_stack::Report::new(Error::invalid("parameter set", "expected an object"))
                .attach(format!("Received: {value}"))
        })?;

        object
            .iter()
            .map(|(name, parameter)| ParameterDescriptor::from_json(name, parameter))
            .collect()
    }

    /// Iterate parameters in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, ParameterDescriptor> {
        self.parameters.iter()
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the set has no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl FromIterator<ParameterDescriptor> for ToolParameterSet {
    fn from_iter<I: IntoIterator<Item = ParameterDescriptor>>(iter: I) -> Self {
        let mut set = Self::new();
        for parameter in iter {
            set.push(parameter);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ToolParameterSet {
    type IntoIter = std::slice::Iter<'a, ParameterDescriptor>;
    type Item = &'a ParameterDescriptor;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The assembled `properties` / `required` pair
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolParameters {
    properties: SchemaFragment,
    required:   Vec<String>,
}

impl ToolParameters {
    /// Parameter name to schema fragment, in declaration order
    #[must_use]
    pub const fn properties(&self) -> &SchemaFragment {
        &self.properties
    }

    /// Names of required parameters, in declaration order
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// The `{type: "object", properties, required}` parameters schema
    #[must_use]
    pub fn to_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert_field(SchemaField::Type, JsonSchemaType::Object);
        schema.insert_field(SchemaField::Properties, self.properties.clone());
        schema.insert_field(SchemaField::Required, self.required.clone());
        Value::Object(schema)
    }
}

/// Drives normalization, parsing, synthesis and coercion across a parameter set
#[derive(Debug, Clone, Default)]
pub struct ToolDefinitionAssembler {
    options: AssemblerOptions,
}

impl ToolDefinitionAssembler {
    /// Create an assembler with the given options
    #[must_use]
    pub const fn new(options: AssemblerOptions) -> Self {
        Self { options }
    }

    /// The options in effect
    #[must_use]
    pub const fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Assemble `properties` and `required` for every parameter in `parameters`
    #[must_use]
    pub fn assemble(&self, parameters: &ToolParameterSet) -> ToolParameters {
        let mut assembled = ToolParameters::default();
        for parameter in parameters {
            assembled
                .properties
                .insert(parameter.name().to_string(), Value::Object(self.assemble_parameter(parameter)));
            if self.is_required(parameter) {
                assembled.required.push(parameter.name().to_string());
            }
        }
        assembled
    }

    /// Build the schema fragment for one parameter
    #[must_use]
    pub fn assemble_parameter(&self, parameter: &ParameterDescriptor) -> SchemaFragment {
        let expr = resolve_type_expr(parameter.base_type(self.options.modifier_split));
        let mut fragment = synthesize_schema(&expr);

        if let Some(description) = parameter.description() {
            fragment.insert_field(SchemaField::Description, description.clone());
        }

        if let Some(raw_default) = parameter.default()
            && expr.is_supported()
            && let Some(default) = resolve_default(parameter.name(), raw_default, &expr)
        {
            fragment.insert_field(SchemaField::Default, default);
        }

        fragment
    }

    /// Whether `parameter` belongs in `required`
    #[must_use]
    pub fn is_required(&self, parameter: &ParameterDescriptor) -> bool {
        !parameter
            .modifiers(self.options.modifier_split)
            .contains(&self.options.optional_marker.as_str())
    }
}

/// Assemble a parameter set with default options
#[must_use]
pub fn assemble_parameters(parameters: &ToolParameterSet) -> ToolParameters {
    ToolDefinitionAssembler::default().assemble(parameters)
}

/// Text compared when a default changes kind
///
/// Booleans render as `True`/`False` and null as `None`, the spelling the
/// existing converted datasets were checked against. Everything else uses
/// [`textual_form`].
fn display_form(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Bool(true) => Cow::Borrowed("True"),
        Value::Bool(false) => Cow::Borrowed("False"),
        Value::Null => Cow::Borrowed("None"),
        other => textual_form(other),
    }
}

/// Coerce a raw default and decide whether the result may be attached
///
/// The coerced value is kept when its kind matches the raw default's kind, or
/// when the kind changed but the display form did not (and it is not null).
fn resolve_default(name: &str, raw_default: &Value, expr: &TypeExpr) -> Option<Value> {
    let coerced = coerce(raw_default, expr);
    let raw_kind = ValueKind::of(raw_default);
    let coerced_kind = ValueKind::of(&coerced);

    if raw_kind == coerced_kind {
        tracing::debug!("Default for '{name}' kept its kind ({raw_kind}); attaching");
        return Some(coerced);
    }

    tracing::info!(
        "Default for '{name}' changed from {raw_kind} to {coerced_kind}: {raw_default} -> {coerced}"
    );
    if display_form(&coerced) != display_form(raw_default) {
        tracing::warn!("Default for '{name}' changed meaning when cast to {expr}; dropping it");
        None
    } else if coerced.is_null() {
        None
    } else {
        Some(coerced)
    }
}
