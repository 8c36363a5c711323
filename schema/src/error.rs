use error_stack::Report;
use thiserror::Error;

// Error message prefixes
const MSG_FAILED_TO_PREFIX: &str = "Failed to";
const MSG_INVALID_PREFIX: &str = "Invalid";

/// Result type for the `fncall_schema` library
pub type Result<T> = core::result::Result<T, Report<Error>>;

/// Error categories raised at the crate's fallible boundaries
///
/// Only [`Error::TypeParse`], [`Error::InvalidParameterSet`] and [`Error::Logging`]
/// ever reach a caller. The remaining variants are absorbed inside the conversion pipeline and degrade to
/// an unconstrained schema or a zero value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A type descriptor did not match the supported grammar after normalization
    #[error("Type parsing error: {0}")]
    TypeParse(String),

    /// A type descriptor names a construct JSON Schema cannot express
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A value could not be converted to the requested type
    #[error("Cannot coerce {value} to {target}")]
    Coercion {
        /// Compact JSON text of the rejected value
        value:  String,
        /// Display form of the target type expression
        target: String,
    },

    /// The incoming tool parameter mapping violates the input contract
    #[error("Invalid parameter set: {0}")]
    InvalidParameterSet(String),

    /// The tracing subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl Error {
    /// Create a "Failed to X" logging error
    pub fn failed_to(action: &str, details: impl std::fmt::Display) -> Self {
        Self::Logging(format!("{MSG_FAILED_TO_PREFIX} {action}: {details}"))
    }

    /// Create an "Invalid X" parameter set error
    pub fn invalid(what: &str, details: impl std::fmt::Display) -> Self {
        Self::InvalidParameterSet(format!("{MSG_INVALID_PREFIX} {what}: {details}"))
    }

    /// Create a coercion error for `value` against `target`
    pub fn coercion(value: &serde_json::Value, target: impl std::fmt::Display) -> Self {
        Self::Coercion {
            value:  value.to_string(),
            target: target.to_string(),
        }
    }
}
