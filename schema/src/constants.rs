//! Field names of the incoming tool definition contract and other fixed tokens

// ============================================================================
// INPUT CONTRACT FIELDS
// ============================================================================

/// Parameter field holding the raw type descriptor
pub const FIELD_TYPE: &str = "type";
/// Parameter and tool field holding free-form description text
pub const FIELD_DESCRIPTION: &str = "description";
/// Parameter field holding the raw default value
pub const FIELD_DEFAULT: &str = "default";
/// Tool field holding the function name
pub const FIELD_NAME: &str = "name";
/// Tool field holding the parameter mapping
pub const FIELD_PARAMETERS: &str = "parameters";

// ============================================================================
// DESCRIPTOR TOKENS
// ============================================================================

/// Separator between the base type and its modifier flags
pub const MODIFIER_SEPARATOR: char = ',';
/// Modifier flag that excludes a parameter from `required`
pub const OPTIONAL_MODIFIER: &str = "optional";

// ============================================================================
// LIMITS
// ============================================================================

/// Deepest bracket nesting a type descriptor may have before it is rejected
pub const MAX_NESTING_DEPTH: usize = 64;

// ============================================================================
// ENVIRONMENT
// ============================================================================

/// Environment variable selecting the tracing level
pub const LOGLEVEL_ENV: &str = "LOGLEVEL";
