//! Getter and setter declarations for data members.

use super::signature::format_type_name;
use crate::ast::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
}

impl AccessorKind {
    fn prefix(self) -> &'static str {
        match self {
            AccessorKind::Getter => "get",
            AccessorKind::Setter => "set",
        }
    }
}

/// Method-name stem for a field: `m_userName` -> `UserName`.
///
/// One `m_` or `_` prefix, or else one `_` suffix, is dropped; the rest is
/// split on `_` and every fragment gets an upper-case first letter. A name
/// following none of these conventions is only capitalised.
pub fn method_name_from_field(field: &str) -> String {
    let stem = if let Some(rest) = field.strip_prefix("m_") {
        rest
    } else if let Some(rest) = field.strip_prefix('_') {
        rest
    } else if let Some(rest) = field.strip_suffix('_') {
        rest
    } else {
        field
    };
    stem.split('_').map(capitalize).collect()
}

/// Name of the accessor of `kind` for `field`, e.g. `getCount`.
pub fn accessor_name<C: Cursor>(
    field: &C,
    kind: AccessorKind,
) -> String {
    format!("{}{}", kind.prefix(), method_name_from_field(&field.spelling()))
}

/// In-class declaration of an accessor, without the trailing `;`.
///
/// `int getCount() const` or `int setCount(int value)`.
pub fn build_accessor<C: Cursor>(
    field: &C,
    kind: AccessorKind,
) -> String {
    let ty = format_type_name(&field.type_spelling().unwrap_or_default());
    let name = accessor_name(field, kind);
    match kind {
        AccessorKind::Getter => format!("{ty} {name}() const"),
        AccessorKind::Setter => format!("{ty} {name}({ty} value)"),
    }
}

fn capitalize(fragment: &str) -> String {
    let mut chars = fragment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/src/stub/accessor_tests.rs"]
mod tests;
