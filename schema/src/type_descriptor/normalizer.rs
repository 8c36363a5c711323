//! Repairs and canonicalizes raw type descriptors before parsing
//!
//! Source datasets carry legacy aliases (`list`, `dict`), truncated generics
//! (`Tuple[float`) and constructs the parser does not model precisely. The
//! rewrites here are lossy but deterministic, and running them twice changes
//! nothing.

/// Bare identifiers rewritten to a canonical generic form
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("list", "List[Any]"),
    ("set", "List[Any]"),
    ("tuple", "List[Any]"),
    ("Tuple", "List[Any]"),
    ("List", "List[Any]"),
    ("dict", "Dict[str,Any]"),
    ("Dict", "Dict[str,Any]"),
];

/// Prefix of function types; JSON Schema has no function type
const UNSUPPORTED_PREFIX: &str = "Callable";

/// Generic prefixes collapsed to a coarser canonical form
const COLLAPSED_PREFIXES: &[(&str, &str)] = &[
    ("Tuple[", "List[Any]"),
    ("List[Tuple", "List[List[Any]]"),
    ("List[Union[", "List[Any]"),
];

/// Outcome of normalizing one type descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The descriptor was already canonical
    Canonical(String),
    /// The descriptor was repaired or rewritten
    Rewritten {
        /// Descriptor as received
        original:   String,
        /// Descriptor after rewriting
        normalized: String,
    },
    /// The descriptor names a construct that cannot be expressed; carries the original text
    Unsupported(String),
}

impl Normalized {
    /// The descriptor to hand to the parser, if any
    #[must_use]
    pub fn as_type_str(&self) -> Option<&str> {
        match self {
            Self::Canonical(normalized) | Self::Rewritten { normalized, .. } => Some(normalized),
            Self::Unsupported(_) => None,
        }
    }
}

/// Normalize a raw base-type descriptor
#[must_use]
pub fn normalize(raw: &str) -> Normalized {
    let mut descriptor: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if descriptor.starts_with(UNSUPPORTED_PREFIX) {
        return Normalized::Unsupported(raw.to_string());
    }

    if let Some((_, canonical)) = TYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == descriptor)
    {
        descriptor = (*canonical).to_string();
    }

    if let Some((_, collapsed)) = COLLAPSED_PREFIXES
        .iter()
        .find(|(prefix, _)| descriptor.starts_with(*prefix))
    {
        descriptor = (*collapsed).to_string();
    }

    close_brackets(&mut descriptor);
    drop_trailing_commas(&mut descriptor);

    if descriptor == raw {
        Normalized::Canonical(descriptor)
    } else {
        tracing::debug!("Normalized type '{raw}' to '{descriptor}'");
        Normalized::Rewritten {
            original:   raw.to_string(),
            normalized: descriptor,
        }
    }
}

/// Append the `]` characters needed to balance every `[`
fn close_brackets(descriptor: &mut String) {
    let open = descriptor.matches('[').count();
    let close = descriptor.matches(']').count();
    if open > close {
        descriptor.push_str(&"]".repeat(open - close));
    }
}

/// Remove every run of commas that directly precedes a closing bracket
fn drop_trailing_commas(descriptor: &mut String) {
    let mut repaired = String::with_capacity(descriptor.len());
    for ch in descriptor.chars() {
        if ch == ']' {
            while repaired.ends_with(',') {
                repaired.pop();
            }
        }
        repaired.push(ch);
    }
    *descriptor = repaired;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(raw: &str) -> Option<String> {
        normalize(raw).as_type_str().map(ToString::to_string)
    }

    #[test]
    fn test_canonical_is_noop() {
        assert_eq!(
            normalize("List[int]"),
            Normalized::Canonical("List[int]".to_string())
        );
        assert_eq!(normalize("str"), Normalized::Canonical("str".to_string()));
    }

    #[test]
    fn test_whitespace_and_trailing_commas() {
        assert_eq!(
            normalize(" Dict[str, float] "),
            Normalized::Rewritten {
                original:   " Dict[str, float] ".to_string(),
                normalized: "Dict[str,float]".to_string(),
            }
        );
        assert_eq!(normalized("List[int,]").as_deref(), Some("List[int]"));
        assert_eq!(normalized("List[int,"), Some("List[int]".to_string()));
        assert_eq!(
            normalized(&format!("List[int{}]", ",".repeat(20_000))).as_deref(),
            Some("List[int]")
        );
    }

    #[test]
    fn test_aliases() {
        for alias in ["list", "set", "tuple", "Tuple", "List"] {
            assert_eq!(normalized(alias).as_deref(), Some("List[Any]"), "{alias}");
        }
        assert_eq!(normalized("dict").as_deref(), Some("Dict[str,Any]"));
        assert_eq!(normalized("Dict").as_deref(), Some("Dict[str,Any]"));
        assert_eq!(normalized("Any").as_deref(), Some("Any"));
    }

    #[test]
    fn test_collapsed_generics() {
        assert_eq!(normalized("Tuple[float, float]").as_deref(), Some("List[Any]"));
        assert_eq!(normalized("Tuple[float").as_deref(), Some("List[Any]"));
        assert_eq!(
            normalized("List[Tuple[int, str]]").as_deref(),
            Some("List[List[Any]]")
        );
        assert_eq!(normalized("List[Union[int").as_deref(), Some("List[Any]"));
    }

    #[test]
    fn test_bracket_repair() {
        assert_eq!(
            normalized("Optional[Dict[str").as_deref(),
            Some("Optional[Dict[str]]")
        );
        assert_eq!(normalized("List[int]]").as_deref(), Some("List[int]]"));
    }

    #[test]
    fn test_callable_is_unsupported() {
        assert_eq!(
            normalize("Callable"),
            Normalized::Unsupported("Callable".to_string())
        );
        assert_eq!(
            normalize("Callable[[float]"),
            Normalized::Unsupported("Callable[[float]".to_string())
        );
        assert_eq!(normalize(" Callable[[int], str]").as_type_str(), None);
    }

    #[test]
    fn test_idempotent() {
        let corpus = [
            "",
            "int",
            " Optional[ List[ str ] ] ",
            "List[int,",
            "List[int,,]",
            "Tuple[float",
            "List[Tuple[float",
            "List[Union[int, str]]",
            "dict",
            "set",
            "Dict[str,List[int",
            "]List[",
            "Union[int,str,]",
        ];
        for raw in corpus {
            let Some(first) = normalized(raw) else {
                continue;
            };
            assert_eq!(
                normalize(&first),
                Normalized::Canonical(first.clone()),
                "normalizing {raw:?} twice"
            );
        }
    }
}
