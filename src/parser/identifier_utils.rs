//! Identifier, type and literal helpers shared by the statement parsers.
//!
//! # Examples
//!
//! ```ignore
//! use crate::parser::identifier_utils::*;
//!
//! let name = split_object_name("main.sales.orders");
//! assert_eq!(name.schema, "sales");
//!
//! assert_eq!(standard_type("BIGINT"), "long");
//! assert_eq!(unquote_literal("'Orders'"), "Orders");
//! ```

/// Equivalent type names. Anything not listed passes through lower-cased.
const TYPE_TRANSLATION: &[(&str, &str)] = &[
    ("tinyint", "byte"),
    ("smallint", "short"),
    ("integer", "int"),
    ("bigint", "long"),
];

/// Catalog, schema and object name of a dotted name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualifiedName {
    pub catalog: String,
    pub schema: String,
    pub name: String,
}

/// Split a dotted name into its last three segments.
///
/// Missing leading segments are empty strings. Back-ticks around segments are removed.
pub fn split_object_name(qualified: &str) -> QualifiedName {
    let parts: Vec<&str> = qualified.split('.').collect();
    let segment = |from_end: usize| -> String {
        parts
            .len()
            .checked_sub(from_end)
            .map(|i| strip_backticks(parts[i]))
            .unwrap_or_default()
    };

    QualifiedName {
        catalog: segment(3),
        schema: segment(2),
        name: segment(1),
    }
}

/// Remove every back-tick from an identifier.
#[inline]
pub fn strip_backticks(ident: &str) -> String {
    ident.replace('`', "")
}

/// Map a raw type name onto its standardized spelling.
///
/// Idempotent: standardizing an already standardized type returns it unchanged.
pub fn standard_type(raw: &str) -> String {
    let lower = raw.to_lowercase();
    TYPE_TRANSLATION
        .iter()
        .find(|(from, _)| *from == lower)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or(lower)
}

/// Strip the surrounding single quotes of a literal token.
///
/// Text that is not quoted on both ends is returned unchanged.
pub fn unquote_literal(token: &str) -> String {
    if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
        token[1..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}
