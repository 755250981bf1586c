use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = ())]
pub(crate) enum TokenKind {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//.*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[regex(r#"'([^'\\]|\\[\s\S])*'"#)]
    Char,
    #[regex(r#""([^"\\]|\\[\s\S])*""#)]
    String,
    #[regex(r"[0-9][0-9a-zA-Z_.']*")]
    Number,

    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token("&&")]
    AndAnd,
    #[token("...")]
    Ellipsis,
    #[token("##")]
    HashHash,
    #[regex(r"[!%&*+,\-./:;<=>?^|~#()\[\]{}]")]
    Punct,
}

/// Split C++ source into token spellings, dropping whitespace and comments.
///
/// Characters the lexer does not know are kept as single-character tokens so
/// positions never silently disappear.
pub fn lex(source: &str) -> Vec<String> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(TokenKind::Whitespace | TokenKind::Comment) => {},
            Ok(_) | Err(()) => tokens.push(lexer.slice().to_owned()),
        }
    }

    tokens
}

#[cfg(test)]
#[path = "../../tests/src/ast/tokens_tests.rs"]
mod tests;
