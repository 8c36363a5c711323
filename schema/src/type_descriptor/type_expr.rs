//! Type algebra produced by the descriptor parser

use std::fmt;

use itertools::Itertools;
use strum::{AsRefStr, Display, EnumString};

/// Primitive kinds a descriptor can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ScalarKind {
    /// `str`
    String,
    /// `int`
    Integer,
    /// `float`
    Float,
    /// `bool`
    Boolean,
    /// `None` / `NoneType`
    Null,
}

impl ScalarKind {
    /// Identifier used for this kind in descriptor syntax
    #[must_use]
    pub const fn descriptor_name(self) -> &'static str {
        match self {
            Self::String => "str",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Boolean => "bool",
            Self::Null => "None",
        }
    }
}

/// Parsed form of a parameter's base type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A primitive
    Scalar(ScalarKind),
    /// Homogeneous sequence
    List(Box<TypeExpr>),
    /// Mapping; the key type is only used for coercion
    Dict {
        /// Key type
        key:   Box<TypeExpr>,
        /// Value type
        value: Box<TypeExpr>,
    },
    /// Ordered alternatives, first match wins
    Union(Vec<TypeExpr>),
    /// Unconstrained
    Any,
    /// A descriptor that could not be expressed, with the original text
    Unsupported(String),
}

impl TypeExpr {
    /// `List[element]`
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// `Dict[key, value]`
    #[must_use]
    pub fn dict(key: Self, value: Self) -> Self {
        Self::Dict {
            key:   Box::new(key),
            value: Box::new(value),
        }
    }

    /// `Optional[inner]`, represented as a union with a trailing null
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Union(vec![inner, Self::Scalar(ScalarKind::Null)])
    }

    /// Whether this is the null scalar
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(ScalarKind::Null))
    }

    /// Whether a schema and default can be derived from this expression
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.descriptor_name()),
            Self::List(element) => write!(f, "List[{element}]"),
            Self::Dict { key, value } => write!(f, "Dict[{key},{value}]"),
            Self::Union(variants) => write!(f, "Union[{}]", variants.iter().join(",")),
            Self::Any => f.write_str("Any"),
            Self::Unsupported(original) => f.write_str(original),
        }
    }
}
