//! Best-effort conversion of raw values to a type expression
//!
//! [`coerce`] is total. Internally every conversion is attempted strictly
//! first, so union resolution can tell a real match from a fallback; the
//! public entry point then replaces a failed conversion with the target's zero
//! value.

use std::borrow::Cow;

use serde_json::{Map, Value};
use strum::Display;

use crate::error::Error;
use crate::type_descriptor::{ScalarKind, TypeExpr, resolve_type_expr};

/// Sentinel string treated as null when the target admits null
const NONE_LITERAL: &str = "none";

/// Separator used to split string input into list elements
const LIST_SEPARATOR: char = ',';

type CoercionResult = core::result::Result<Value, Error>;

/// Primitive kind of a JSON value, with integers and floats told apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// A number without a fractional representation
    Integer,
    /// A number stored as a float
    Float,
    /// A string
    String,
    /// An array
    Array,
    /// An object
    Object,
}

impl ValueKind {
    /// Classify `value`
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Integer,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

/// Textual form of a value: strings verbatim, everything else as compact JSON
#[must_use]
pub fn textual_form(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Coerce `value` to conform to `expr`, never failing
///
/// Scalars that cannot be converted become their zero value (`""`, `0`, `0.0`,
/// `false`). Unions try their non-null variants in declared order. Lists accept
/// comma separated strings and bare scalars. Non-mapping values coerced to a
/// mapping become `{}`. `Any` and unsupported types pass the value through.
#[must_use]
pub fn coerce(value: &Value, expr: &TypeExpr) -> Value {
    match expr {
        TypeExpr::Scalar(kind) => {
            coerce_scalar(value, *kind).unwrap_or_else(|_| zero_value(*kind))
        }
        TypeExpr::List(element) => Value::Array(
            as_sequence(value)
                .iter()
                .map(|item| coerce(item, element))
                .collect(),
        ),
        TypeExpr::Dict { key, value: item } => value.as_object().map_or_else(
            || Value::Object(Map::new()),
            |object| {
                Value::Object(
                    object
                        .iter()
                        .map(|(k, v)| (coerce_key(k, key), coerce(v, item)))
                        .collect(),
                )
            },
        ),
        TypeExpr::Union(variants) => coerce_union(value, variants),
        TypeExpr::Any | TypeExpr::Unsupported(_) => value.clone(),
    }
}

/// Parse `type_str` and coerce `value` against it
///
/// An empty type string yields `null`. A type string that cannot be parsed
/// leaves the value unchanged.
#[must_use]
pub fn coerce_with_type_str(value: &Value, type_str: &str) -> Value {
    if type_str.trim().is_empty() {
        return Value::Null;
    }
    coerce(value, &resolve_type_expr(type_str))
}

/// Strict conversion used while resolving unions
fn try_coerce(value: &Value, expr: &TypeExpr) -> CoercionResult {
    match expr {
        TypeExpr::Scalar(kind) => coerce_scalar(value, *kind),
        TypeExpr::List(element) => as_sequence(value)
            .iter()
            .map(|item| try_coerce(item, element))
            .collect::<core::result::Result<Vec<_>, _>>()
            .map(Value::Array),
        TypeExpr::Dict { key, value: item } => {
            let object = value.as_object().ok_or_else(|| Error::coercion(value, expr))?;
            let mut coerced = Map::new();
            for (k, v) in object {
                let coerced_key = try_coerce(&Value::String(k.clone()), key)?;
                coerced.insert(textual_form(&coerced_key).into_owned(), try_coerce(v, item)?);
            }
            Ok(Value::Object(coerced))
        }
        TypeExpr::Union(variants) => try_union(value, variants),
        TypeExpr::Any | TypeExpr::Unsupported(_) => Ok(value.clone()),
    }
}

fn coerce_union(value: &Value, variants: &[TypeExpr]) -> Value {
    try_union(value, variants).unwrap_or_else(|_| {
        variants
            .first()
            .map_or(Value::Null, |first| coerce(&Value::Null, first))
    })
}

fn try_union(value: &Value, variants: &[TypeExpr]) -> CoercionResult {
    if is_none_like(value) && variants.iter().any(TypeExpr::is_null) {
        return Ok(Value::Null);
    }

    variants
        .iter()
        .filter(|variant| !variant.is_null())
        .find_map(|variant| try_coerce(value, variant).ok())
        .ok_or_else(|| Error::coercion(value, TypeExpr::Union(variants.to_vec())))
}

fn is_none_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.eq_ignore_ascii_case(NONE_LITERAL),
        _ => false,
    }
}

/// View a value as list elements, splitting strings and wrapping scalars
fn as_sequence(value: &Value) -> Cow<'_, [Value]> {
    match value {
        Value::Array(items) => Cow::Borrowed(items.as_slice()),
        Value::String(s) => Cow::Owned(
            s.split(LIST_SEPARATOR)
                .map(|segment| Value::String(segment.trim().to_string()))
                .collect(),
        ),
        Value::Null => Cow::Owned(Vec::new()),
        other => Cow::Owned(vec![other.clone()]),
    }
}

/// Coerce an object key and render it back to a key string
fn coerce_key(key: &str, expr: &TypeExpr) -> String {
    let coerced = coerce(&Value::String(key.to_string()), expr);
    textual_form(&coerced).into_owned()
}

fn coerce_scalar(value: &Value, kind: ScalarKind) -> CoercionResult {
    let coerced = match kind {
        ScalarKind::String => to_string(value),
        ScalarKind::Integer => to_integer(value),
        ScalarKind::Float => to_float(value),
        ScalarKind::Boolean => Some(Value::Bool(to_boolean(value))),
        ScalarKind::Null => Some(Value::Null),
    };
    coerced.ok_or_else(|| Error::coercion(value, kind.descriptor_name()))
}

fn zero_value(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::String => Value::String(String::new()),
        ScalarKind::Integer => Value::from(0),
        ScalarKind::Float => Value::from(0.0),
        ScalarKind::Boolean => Value::Bool(false),
        ScalarKind::Null => Value::Null,
    }
}

fn to_string(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Value::String(s.clone())),
        other => Some(Value::String(other.to_string())),
    }
}

fn to_integer(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .or_else(|_| trimmed.parse::<u64>().map(Value::from))
                .ok()
        }
        Value::Number(n) if n.is_f64() => n.as_f64().and_then(truncate_to_i64).map(Value::from),
        Value::Number(_) => Some(value.clone()),
        Value::Bool(b) => Some(Value::from(i64::from(*b))),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "the truncated value is range checked before the cast"
)]
fn truncate_to_i64(float: f64) -> Option<i64> {
    let truncated = float.trunc();
    (truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64)
        .then(|| truncated as i64)
}

fn to_float(value: &Value) -> Option<Value> {
    let float = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    float.is_finite().then(|| Value::from(float))
}

fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) if s.eq_ignore_ascii_case("true") => true,
        Value::String(s) if s.eq_ignore_ascii_case("false") => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(object) => !object.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn coerce_str(value: &Value, descriptor: &str) -> Value {
        coerce(value, &resolve_type_expr(descriptor))
    }

    #[test]
    fn test_boolean() {
        assert_eq!(coerce_str(&json!("TRUE"), "bool"), json!(true));
        assert_eq!(coerce_str(&json!("False"), "bool"), json!(false));
        assert_eq!(coerce_str(&json!("yes"), "bool"), json!(true));
        assert_eq!(coerce_str(&json!(""), "bool"), json!(false));
        assert_eq!(coerce_str(&json!(0), "bool"), json!(false));
        assert_eq!(coerce_str(&json!(2.5), "bool"), json!(true));
        assert_eq!(coerce_str(&json!(null), "bool"), json!(false));
        assert_eq!(coerce_str(&json!([]), "bool"), json!(false));
    }

    #[test]
    fn test_integer() {
        assert_eq!(coerce_str(&json!("5"), "int"), json!(5));
        assert_eq!(coerce_str(&json!(" -12 "), "int"), json!(-12));
        assert_eq!(coerce_str(&json!(7.9), "int"), json!(7));
        assert_eq!(coerce_str(&json!(true), "int"), json!(1));
        assert_eq!(coerce_str(&json!("five"), "int"), json!(0));
        assert_eq!(coerce_str(&json!("5.0"), "int"), json!(0));
        assert_eq!(coerce_str(&json!(null), "int"), json!(0));
        assert_eq!(
            coerce_str(&json!("18446744073709551615"), "int"),
            json!(u64::MAX)
        );
    }

    #[test]
    fn test_float_and_string() {
        assert_eq!(coerce_str(&json!("2.5"), "float"), json!(2.5));
        assert_eq!(coerce_str(&json!(3), "float"), json!(3.0));
        assert_eq!(coerce_str(&json!("NaN"), "float"), json!(0.0));
        assert_eq!(coerce_str(&json!("abc"), "float"), json!(0.0));
        assert_eq!(coerce_str(&json!(42), "str"), json!("42"));
        assert_eq!(coerce_str(&json!(false), "str"), json!("false"));
        assert_eq!(coerce_str(&json!([1, "a"]), "str"), json!("[1,\"a\"]"));
        assert_eq!(coerce_str(&json!(null), "str"), json!(""));
        assert_eq!(coerce_str(&json!("anything"), "None"), json!(null));
    }

    #[test]
    fn test_optional() {
        assert_eq!(coerce_str(&json!(null), "Optional[int]"), json!(null));
        assert_eq!(coerce_str(&json!("none"), "Optional[int]"), json!(null));
        assert_eq!(coerce_str(&json!("None"), "Optional[int]"), json!(null));
        assert_eq!(coerce_str(&json!("5"), "Optional[int]"), json!(5));
        assert_eq!(coerce_str(&json!("x"), "Optional[int]"), json!(0));
    }

    #[test]
    fn test_union_is_order_dependent() {
        assert_eq!(coerce_str(&json!("5"), "Union[int,float]"), json!(5));
        assert_eq!(coerce_str(&json!("5"), "Union[float,int]"), json!(5.0));
        assert_eq!(coerce_str(&json!("5"), "Union[str,int]"), json!("5"));
        assert_eq!(coerce_str(&json!("abc"), "Union[int,str]"), json!("abc"));
        assert_eq!(coerce_str(&json!("abc"), "Union[int,float]"), json!(0));
        assert_eq!(coerce_str(&json!("abc"), "Union[None,int]"), json!(null));
        assert_eq!(coerce_str(&json!(null), "Union[int,str]"), json!(0));
        assert_eq!(coerce_str(&json!(null), "Union[None,int]"), json!(null));
    }

    #[test]
    fn test_lists() {
        assert_eq!(coerce_str(&json!("1, 2,3"), "List[int]"), json!([1, 2, 3]));
        assert_eq!(coerce_str(&json!(["1", 2.0]), "List[int]"), json!([1, 2]));
        assert_eq!(coerce_str(&json!(4), "List[str]"), json!(["4"]));
        assert_eq!(coerce_str(&json!(""), "List[str]"), json!([""]));
        assert_eq!(coerce_str(&json!(null), "List[int]"), json!([]));
        assert_eq!(coerce_str(&json!("a,b"), "list"), json!(["a", "b"]));
        assert_eq!(
            coerce_str(&json!([[1, "2"], "3,4"]), "List[List[int]]"),
            json!([[1, 2], [3, 4]])
        );
    }

    #[test]
    fn test_dicts() {
        assert_eq!(
            coerce_str(&json!({"a": "1.5", "b": 2}), "Dict[str,float]"),
            json!({"a": 1.5, "b": 2.0})
        );
        assert_eq!(
            coerce_str(&json!({"1": "x", "2": "true"}), "Dict[int,bool]"),
            json!({"1": true, "2": true})
        );
        assert_eq!(coerce_str(&json!("a=1"), "Dict[str,int]"), json!({}));
        assert_eq!(coerce_str(&json!({"k": [1]}), "dict"), json!({"k": [1]}));
    }

    #[test]
    fn test_union_with_structured_variants() {
        assert_eq!(
            coerce_str(&json!({"a": "1"}), "Union[Dict[str,int],str]"),
            json!({"a": 1})
        );
        assert_eq!(
            coerce_str(&json!("plain"), "Union[Dict[str,int],str]"),
            json!("plain")
        );
        assert_eq!(
            coerce_str(&json!("1,2"), "Optional[List[int]]"),
            json!([1, 2])
        );
    }

    #[test]
    fn test_passthrough() {
        let value = json!({"nested": [1, null, "x"]});
        assert_eq!(coerce(&value, &TypeExpr::Any), value);
        assert_eq!(
            coerce(&value, &TypeExpr::Unsupported("Callable".into())),
            value
        );
    }

    #[test]
    fn test_coerce_with_type_str() {
        assert_eq!(coerce_with_type_str(&json!("5"), ""), json!(null));
        assert_eq!(coerce_with_type_str(&json!("5"), "  "), json!(null));
        assert_eq!(coerce_with_type_str(&json!("5"), "Dict[str"), json!("5"));
        assert_eq!(coerce_with_type_str(&json!("5"), "int"), json!(5));
        assert_eq!(coerce_with_type_str(&json!("1,2"), "Tuple[int"), json!(["1", "2"]));
    }

    #[test]
    fn test_total_over_adversarial_inputs() {
        let values = [
            json!(null),
            json!(true),
            json!(0),
            json!(-1),
            json!(u64::MAX),
            json!(1.0e308),
            json!(-0.0),
            json!(""),
            json!(" "),
            json!(","),
            json!("none"),
            json!("NaN"),
            json!("-inf"),
            json!("1e999"),
            json!("[1,2]"),
            json!("\u{0}\u{ffff}"),
            json!([]),
            json!([null, [null], {}]),
            json!({}),
            json!({"": {"": []}}),
        ];
        let descriptors = [
            "str",
            "int",
            "float",
            "bool",
            "None",
            "Any",
            "List[int]",
            "List[List[float]]",
            "Dict[int,List[bool]]",
            "Optional[Dict[str,Optional[int]]]",
            "Union[None,List[str],Dict[str,Any]]",
            "Union[bool,int]",
            "Callable[[int]]",
            "garbage[[",
        ];
        for descriptor in descriptors {
            let expr = resolve_type_expr(descriptor);
            for value in &values {
                let coerced = coerce(value, &expr);
                if let TypeExpr::Scalar(kind) = &expr {
                    let expected = match kind {
                        ScalarKind::String => ValueKind::String,
                        ScalarKind::Integer => ValueKind::Integer,
                        ScalarKind::Float => ValueKind::Float,
                        ScalarKind::Boolean => ValueKind::Boolean,
                        ScalarKind::Null => ValueKind::Null,
                    };
                    assert_eq!(ValueKind::of(&coerced), expected, "{value} as {descriptor}");
                }
            }
        }
    }

    #[test]
    fn test_value_kind_and_textual_form() {
        assert_eq!(ValueKind::of(&json!(5)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(5.0)), ValueKind::Float);
        assert_eq!(ValueKind::of(&json!("5")), ValueKind::String);
        assert_eq!(textual_form(&json!("5")), "5");
        assert_eq!(textual_form(&json!(5)), "5");
        assert_eq!(textual_form(&json!(5.0)), "5.0");
        assert_eq!(textual_form(&json!([1, 2])), "[1,2]");
    }
}
