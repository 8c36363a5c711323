//! Type descriptor handling: normalization, parsing and the resulting type algebra

mod normalizer;
mod parser;
mod type_expr;

pub use normalizer::{Normalized, normalize};
pub use parser::parse_type_expr;
pub use type_expr::{ScalarKind, TypeExpr};

use crate::error::Error;

/// Normalize and parse a raw base-type descriptor without failing
///
/// Explicitly unsupported constructs and descriptors that do not parse both
/// come back as [`TypeExpr::Unsupported`] carrying the original text. Parse
/// failures are logged at warning level.
#[must_use]
pub fn resolve_type_expr(raw: &str) -> TypeExpr {
    let normalized = normalize(raw);
    let Some(descriptor) = normalized.as_type_str() else {
        tracing::debug!("{}", Error::UnsupportedType(raw.to_string()));
        return TypeExpr::Unsupported(raw.to_string());
    };

    match parse_type_expr(descriptor) {
        Ok(expr) => expr,
        Err(report) => {
            tracing::warn!("Type parsing error for '{raw}': {report:?}");
            TypeExpr::Unsupported(raw.to_string())
        }
    }
}
