//! Mapping a source position to the declaration a stub is generated for.

use std::path::Path;

use tracing::debug;

use crate::ast::{Cursor, CursorKind, TranslationUnit};

/// The function-like declaration at `line`/`col` of `file`.
///
/// When the position itself is not inside a function declaration (blank
/// column, leading whitespace), the name column is guessed from
/// `line_text` and the lookup is retried once.
pub fn resolve_function<U: TranslationUnit>(
    unit: &U,
    file: &Path,
    line: u32,
    col: u32,
    line_text: Option<&str>,
) -> Option<U::Cursor> {
    let is_function = |kind: CursorKind| kind.is_function();
    if let Some(found) = enclosing(unit.cursor_at(file, line, col), is_function) {
        return Some(found);
    }
    let guess = find_function_name_column(line_text?)?;
    debug!("[resolve] retrying {}:{line} at name column {guess}", file.display());
    enclosing(unit.cursor_at(file, line, guess), is_function)
}

/// The data member at `line`/`col` of `file`, with a cruder line fallback.
pub fn resolve_field<U: TranslationUnit>(
    unit: &U,
    file: &Path,
    line: u32,
    col: u32,
    line_text: Option<&str>,
) -> Option<U::Cursor> {
    let is_field = |kind: CursorKind| kind == CursorKind::FieldDecl;
    if let Some(found) = enclosing(unit.cursor_at(file, line, col), is_field) {
        return Some(found);
    }
    let guess = find_field_name_column(line_text?)?;
    debug!("[resolve] retrying field lookup {}:{line} at column {guess}", file.display());
    enclosing(unit.cursor_at(file, line, guess), is_field)
}

fn enclosing<C: Cursor>(
    start: Option<C>,
    accept: impl Fn(CursorKind) -> bool,
) -> Option<C> {
    let mut current = start;
    while let Some(cursor) = current {
        if accept(cursor.kind()) {
            return Some(cursor);
        }
        current = cursor.lexical_parent();
    }
    None
}

/// 1-based column of the last character before the outermost parameter list
/// on the line, found by balancing parentheses from the right.
///
/// Braces count as nesting too, so an inline body does not confuse the scan.
pub fn find_function_name_column(line: &str) -> Option<u32> {
    let bytes = line.as_bytes();
    let mut depth = 0i32;
    let mut open = None;

    for (i, &byte) in bytes.iter().enumerate().rev() {
        match byte {
            b')' | b'}' => depth += 1,
            b'(' | b'{' => depth -= 1,
            _ => {},
        }
        if byte == b'(' && depth == 0 {
            open = Some(i);
            break;
        }
    }

    let open = open?;
    let name_end = bytes[..open].iter().rposition(|byte| !byte.is_ascii_whitespace())?;
    Some(name_end as u32 + 1)
}

/// 1-based column of the first identifier-looking character on the line.
pub fn find_field_name_column(line: &str) -> Option<u32> {
    line.bytes().position(|byte| byte.is_ascii_alphabetic() || byte == b'_').map(|i| i as u32 + 1)
}

#[cfg(test)]
#[path = "../../tests/src/stub/resolve_tests.rs"]
mod tests;
