//! Recursive-descent parser for normalized type descriptors
//!
//! The grammar is fixed:
//! - primitives: `str`, `int`, `float`, `bool`, `None`, `NoneType`, `Any`
//! - `List[T]`
//! - `Dict[K,V]`
//! - `Union[T1,T2,...]` (at least two variants)
//! - `Optional[T]`, parsed as `Union[T,None]`
//!
//! Parsing happens in two passes. nom recognizes the bracket/comma structure
//! into a tree of identifiers, then [`lower`] checks each identifier and its
//! arity against the whitelist. Descriptors nested deeper than
//! [`MAX_NESTING_DEPTH`] are rejected before either pass runs.

use error_stack::Report;
use nom::bytes::complete::take_while1;
use nom::character::complete::char;
use nom::combinator::{all_consuming, opt};
use nom::multi::separated_list1;
use nom::sequence::delimited;
use nom::{IResult, Parser};

use super::type_expr::{ScalarKind, TypeExpr};
use crate::constants::MAX_NESTING_DEPTH;
use crate::error::{Error, Result};

/// Generic constructors; they are only valid with type arguments
const GENERIC_CONSTRUCTORS: &[&str] = &["List", "Dict", "Union", "Optional"];

/// Identifier with optional bracketed arguments, before validation
#[derive(Debug)]
struct RawType<'a> {
    name: &'a str,
    args: Option<Vec<RawType<'a>>>,
}

/// Parse an identifier (alphanumeric + underscore)
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)
}

/// Parse a bracketed, comma separated argument list
fn arguments(input: &str) -> IResult<&str, Vec<RawType<'_>>> {
    delimited(char('['), separated_list1(char(','), raw_type), char(']')).parse(input)
}

/// Parse one type with its nested arguments
fn raw_type(input: &str) -> IResult<&str, RawType<'_>> {
    let (input, name) = identifier(input)?;
    let (input, args) = opt(arguments).parse(input)?;
    Ok((input, RawType { name, args }))
}

/// Deepest `[` nesting in `descriptor`
fn nesting_depth(descriptor: &str) -> usize {
    let (_, deepest) = descriptor
        .chars()
        .fold((0_usize, 0_usize), |(depth, deepest), ch| match ch {
            '[' => (depth + 1, deepest.max(depth + 1)),
            ']' => (depth.saturating_sub(1), deepest),
            _ => (depth, deepest),
        });
    deepest
}

/// Check identifiers and arity, producing the type expression
fn lower(raw: &RawType<'_>, depth: usize) -> core::result::Result<TypeExpr, String> {
    if depth > MAX_NESTING_DEPTH {
        return Err(format!("nesting exceeds {MAX_NESTING_DEPTH} levels"));
    }
    let nested = |inner: &RawType<'_>| lower(inner, depth + 1);
    let expr = match (raw.name, raw.args.as_deref()) {
        ("str", None) => TypeExpr::Scalar(ScalarKind::String),
        ("int", None) => TypeExpr::Scalar(ScalarKind::Integer),
        ("float", None) => TypeExpr::Scalar(ScalarKind::Float),
        ("bool", None) => TypeExpr::Scalar(ScalarKind::Boolean),
        ("None" | "NoneType", None) => TypeExpr::Scalar(ScalarKind::Null),
        ("Any", None) => TypeExpr::Any,
        ("List", Some([element])) => TypeExpr::list(nested(element)?),
        ("Dict", Some([key, value])) => TypeExpr::dict(nested(key)?, nested(value)?),
        ("Union", Some(variants)) if variants.len() >= 2 => TypeExpr::Union(
            variants
                .iter()
                .map(nested)
                .collect::<core::result::Result<_, _>>()?,
        ),
        ("Optional", Some([inner])) => TypeExpr::optional(nested(inner)?),
        (name, None) if GENERIC_CONSTRUCTORS.contains(&name) => {
            return Err(format!("'{name}' requires type arguments"));
        }
        (name, Some(args)) if GENERIC_CONSTRUCTORS.contains(&name) => {
            return Err(format!(
                "'{name}' does not accept {} type argument(s)",
                args.len()
            ));
        }
        (name, Some(_)) if is_primitive(name) => {
            return Err(format!("'{name}' does not accept type arguments"));
        }
        (name, _) => return Err(format!("unknown type identifier '{name}'")),
    };
    Ok(expr)
}

fn is_primitive(name: &str) -> bool {
    matches!(
        name,
        "str" | "int" | "float" | "bool" | "None" | "NoneType" | "Any"
    )
}

/// Parse a normalized descriptor into a [`TypeExpr`]
///
/// # Errors
///
/// Returns [`Error::TypeParse`] when the descriptor does not match the grammar,
/// names an identifier outside the whitelist, gives a constructor the wrong
/// number of arguments, or nests deeper than [`MAX_NESTING_DEPTH`].
pub fn parse_type_expr(descriptor: &str) -> Result<TypeExpr> {
    let depth = nesting_depth(descriptor);
    if depth > MAX_NESTING_DEPTH {
        return Err(Report::new(Error::TypeParse(format!(
            "descriptor nests {depth} levels deep, the limit is {MAX_NESTING_DEPTH}"
        )))
        .attach(format!("Descriptor length: {} bytes", descriptor.len())));
    }

    let raw = match all_consuming(raw_type).parse(descriptor) {
        Ok((_, raw)) => raw,
        Err(e) => {
            return Err(Report::new(Error::TypeParse(format!(
                "'{descriptor}' is not a valid type descriptor"
            )))
            .attach(format!("Parser error: {e}")));
        }
    };

    lower(&raw, 0).map_err(|reason| {
        Report::new(Error::TypeParse(format!("'{descriptor}': {reason}")))
            .attach(format!("Descriptor: {descriptor}"))
    })
}
