//! Out-of-line signature synthesis.

use crate::ast::{Cursor, CursorKind};

/// Build the out-of-line declaration for `decl`, without a body.
///
/// `namespace_prefix` is the namespace qualification still missing at the
/// insertion point (`"a::b"`, or empty). Enclosing classes are always
/// spelled out.
pub fn build_declaration<C: Cursor>(
    decl: &C,
    inline: bool,
    namespace_prefix: &str,
) -> String {
    let classes = enclosing_records(decl);
    let name = strip_template_args(&decl.spelling());
    let qualifiers = scan_qualifiers(&decl.tokens(), &name);

    let mut out = String::new();
    for class in &classes {
        if let Some(header) = template_header(class) {
            out.push_str(&header);
            out.push('\n');
        }
    }
    if let Some(header) = template_header(decl) {
        out.push_str(&header);
        out.push('\n');
    }

    if inline {
        out.push_str("inline ");
    }
    if qualifiers.constexpr {
        out.push_str("constexpr ");
    }
    if has_return_type(decl, &name)
        && let Some(result) = decl.result_type_spelling()
    {
        out.push_str(&format_type_name(&result));
        out.push(' ');
    }

    if !namespace_prefix.is_empty() {
        out.push_str(namespace_prefix);
        out.push_str("::");
    }
    for class in &classes {
        out.push_str(&class.spelling());
        if let Some(args) = template_args(class) {
            out.push_str(&args);
        }
        out.push_str("::");
    }

    out.push_str(&name);
    out.push('(');
    out.push_str(&parameter_list(decl));
    out.push(')');
    out.push_str(&qualifiers.trailing);
    out
}

/// `name(type, type)`, the way a user would recognise the declaration.
pub fn display_name<C: Cursor>(decl: &C) -> String {
    let types: Vec<String> = parameters(decl)
        .iter()
        .map(|param| format_type_name(&param.type_spelling().unwrap_or_default()))
        .collect();
    format!("{}({})", decl.spelling(), types.join(", "))
}

/// Attach `*` and `&` to the type they modify: `const char *` becomes `const char*`.
pub fn format_type_name(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len());
    for ch in type_name.chars() {
        if matches!(ch, '*' | '&') && out.ends_with(' ') {
            out.pop();
        }
        out.push(ch);
    }
    out
}

/// Remove the first balanced `<...>` group from a name (`max<int>` -> `max`).
///
/// Operator names are returned unchanged, their angle brackets are part of
/// the name.
pub fn strip_template_args(name: &str) -> String {
    if name.starts_with("operator") {
        return name.to_string();
    }
    let Some(start) = name.find('<') else {
        return name.to_string();
    };

    let mut depth = 0usize;
    for (i, ch) in name[start..].char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + i + 1;
                    return format!("{}{}", &name[..start], &name[end..]);
                }
            },
            _ => {},
        }
    }
    name.to_string()
}

/// Records enclosing `decl`, outermost first.
pub(crate) fn enclosing_records<C: Cursor>(decl: &C) -> Vec<C> {
    let mut records = Vec::new();
    let mut current = decl.semantic_parent();
    while let Some(cursor) = current {
        if cursor.kind().is_record() {
            records.push(cursor.clone());
        }
        current = cursor.semantic_parent();
    }
    records.reverse();
    records
}

fn parameters<C: Cursor>(decl: &C) -> Vec<C> {
    decl.children().into_iter().filter(|child| child.kind() == CursorKind::ParmDecl).collect()
}

fn parameter_list<C: Cursor>(decl: &C) -> String {
    parameters(decl)
        .iter()
        .map(|param| {
            let ty = format_type_name(&param.type_spelling().unwrap_or_default());
            let name = param.spelling();
            if name.is_empty() { ty } else { format!("{ty} {name}") }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn template_parameters<C: Cursor>(cursor: &C) -> Vec<C> {
    cursor.children().into_iter().filter(|child| child.kind().is_template_parameter()).collect()
}

fn template_header<C: Cursor>(cursor: &C) -> Option<String> {
    let params = template_parameters(cursor);
    if params.is_empty() {
        return None;
    }
    let parts: Vec<String> = params
        .iter()
        .map(|param| match param.kind() {
            CursorKind::NonTypeTemplateParameter => {
                let ty = format_type_name(&param.type_spelling().unwrap_or_default());
                format!("{ty} {}", param.spelling())
            },
            _ => format!("typename {}", param.spelling()),
        })
        .collect();
    Some(format!("template<{}>", parts.join(", ")))
}

fn template_args<C: Cursor>(cursor: &C) -> Option<String> {
    let params = template_parameters(cursor);
    if params.is_empty() {
        return None;
    }
    let names: Vec<String> = params.iter().map(Cursor::spelling).collect();
    Some(format!("<{}>", names.join(", ")))
}

fn has_return_type<C: Cursor>(
    decl: &C,
    name: &str,
) -> bool {
    if matches!(decl.kind(), CursorKind::Constructor | CursorKind::Destructor | CursorKind::ConversionFunction) {
        return false;
    }
    if is_conversion_name(name) {
        return false;
    }
    // Templated constructors are not always tagged as constructors.
    decl.semantic_parent().filter(|parent| parent.kind().is_record()).is_none_or(|parent| parent.spelling() != name)
}

fn is_conversion_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("operator ") else {
        return false;
    };
    let rest = rest.trim_start();
    let starts_like_type = rest.chars().next().is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_');
    starts_like_type && !rest.starts_with("new") && !rest.starts_with("delete")
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Qualifiers {
    pub(crate) constexpr: bool,
    /// Everything to append after the parameter list, each with a leading space.
    pub(crate) trailing: String,
}

/// Recover specifiers the AST does not expose from the raw tokens.
///
/// Only depth-0 tokens between the parameter list and the body, a `;`, a
/// pure/default/delete `=`, an initializer list or a trailing return type
/// are considered. `constexpr` is honored anywhere before the body.
pub(crate) fn scan_qualifiers(
    tokens: &[String],
    name: &str,
) -> Qualifiers {
    let mut qualifiers = Qualifiers::default();
    let body = body_start(tokens);
    let tokens = &tokens[..body];

    let mut depth = 0usize;
    for token in tokens {
        match token.as_str() {
            "(" => depth += 1,
            ")" => depth = depth.saturating_sub(1),
            "constexpr" if depth == 0 => qualifiers.constexpr = true,
            _ => {},
        }
    }

    let Some(open) = parameter_list_start(tokens, name) else {
        return qualifiers;
    };
    let Some(close) = matching_paren(tokens, open) else {
        return qualifiers;
    };

    let mut i = close + 1;
    while i < tokens.len() {
        match tokens[i].as_str() {
            "=" | ":" | "->" => break,
            "const" => qualifiers.trailing.push_str(" const"),
            "volatile" => qualifiers.trailing.push_str(" volatile"),
            "&" | "&&" => {
                qualifiers.trailing.push(' ');
                qualifiers.trailing.push_str(&tokens[i]);
            },
            "noexcept" => {
                qualifiers.trailing.push_str(" noexcept");
                if tokens.get(i + 1).is_some_and(|next| next == "(")
                    && let Some(end) = matching_paren(tokens, i + 1)
                {
                    qualifiers.trailing.push_str(&join_tokens(&tokens[i + 1..=end]));
                    i = end;
                }
            },
            "(" => {
                // throw(...), attributes and the like.
                match matching_paren(tokens, i) {
                    Some(end) => i = end,
                    None => break,
                }
            },
            _ => {},
        }
        i += 1;
    }
    qualifiers
}

/// Index of the first depth-0 `{` or `;`, or the token count.
fn body_start(tokens: &[String]) -> usize {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.as_str() {
            "(" => depth += 1,
            ")" => depth = depth.saturating_sub(1),
            "{" | ";" if depth == 0 => return i,
            _ => {},
        }
    }
    tokens.len()
}

fn parameter_list_start(
    tokens: &[String],
    name: &str,
) -> Option<usize> {
    let base = name.trim_start_matches('~');
    let base = if base.starts_with("operator") { "operator" } else { base };

    let mut depth = 0usize;
    let mut name_at = None;
    for (i, token) in tokens.iter().enumerate() {
        match token.as_str() {
            "(" => depth += 1,
            ")" => depth = depth.saturating_sub(1),
            t if depth == 0 && t == base => {
                name_at = Some(i);
                break;
            },
            _ => {},
        }
    }

    let from = match name_at {
        Some(i) => {
            let mut from = i + 1;
            // `operator()` carries its own parentheses.
            if base == "operator"
                && tokens.get(from).is_some_and(|t| t == "(")
                && tokens.get(from + 1).is_some_and(|t| t == ")")
            {
                from += 2;
            }
            from
        },
        None => 0,
    };
    tokens[from.min(tokens.len())..].iter().position(|t| t == "(").map(|pos| pos + from)
}

fn matching_paren(
    tokens: &[String],
    open: usize,
) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.as_str() {
            "(" => depth += 1,
            ")" => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            },
            _ => {},
        }
    }
    None
}

/// Concatenate tokens, separating only adjacent words.
fn join_tokens(tokens: &[String]) -> String {
    let is_word = |ch: char| ch.is_ascii_alphanumeric() || ch == '_';
    let mut out = String::new();
    for token in tokens {
        let needs_space = out.chars().last().is_some_and(is_word) && token.chars().next().is_some_and(is_word);
        if needs_space {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src/stub/signature_tests.rs"]
mod tests;
