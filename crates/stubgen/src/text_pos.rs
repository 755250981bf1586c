use tower_lsp::lsp_types::Position;

/// Byte offset of an LSP position (UTF-16 columns) in `source`.
pub fn byte_offset_from_position(
    source: &str,
    position: Position,
) -> Option<usize> {
    let line_idx = position.line as usize;
    let mut lines = source.split('\n');
    let mut byte_offset = 0usize;

    for _ in 0..line_idx {
        let line = lines.next()?;
        byte_offset += line.len() + 1;
    }

    let line = lines.next()?;
    let mut utf16_offset = 0u32;
    let mut char_offset = 0usize;
    for ch in line.chars() {
        if utf16_offset >= position.character {
            break;
        }
        utf16_offset += ch.len_utf16() as u32;
        char_offset += ch.len_utf8();
    }

    Some(byte_offset + char_offset)
}

/// 1-based `(line, byte column)` of an LSP position, as the clang AST counts them.
///
/// Falls back to the raw position when `source` is shorter than `position`.
pub fn clang_position(
    source: &str,
    position: Position,
) -> (u32, u32) {
    let fallback = (position.line + 1, position.character + 1);
    let Some(offset) = byte_offset_from_position(source, position) else {
        return fallback;
    };
    let line_start = source[..offset].rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    (position.line + 1, (offset - line_start) as u32 + 1)
}

#[cfg(test)]
#[path = "../tests/src/text_pos_tests.rs"]
mod tests;
