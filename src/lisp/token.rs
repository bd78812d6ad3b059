//! Token definitions for Emacs Lisp source
//!
//! Tokens are produced by the logos derive macro. The token set is deliberately
//! small: the reader only needs to recover the shape of top-level forms, so
//! every run of symbol constituents is an [`Token::Atom`] and numbers are told
//! apart from symbols later, when atoms become [`Sexp`](super::sexp::Sexp)
//! values.
//!
//! Note that `#` is a symbol constituent while `'` is not, so `#'foo` lexes
//! as the atom `#` followed by a quote. The reader strips that artifact after
//! parsing, see [`sanitize`](super::reader::sanitize).

use logos::Logos;
use std::fmt;

/// All tokens of the Emacs Lisp reader
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(skip r"[ \t\r\n\f]+|;[^\n]*")]
pub enum Token {
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("'")]
    Quote,
    #[token("`")]
    Backquote,
    #[token(",")]
    Comma,
    #[token(",@")]
    CommaAt,

    /// String literal, with escapes resolved
    #[regex(r#""([^"\\]|\\(.|\n))*""#, unescape_string)]
    Str(String),

    /// Character literal such as `?a` or `?\(`, as its code point
    #[regex(r"\?[^\\\s]", plain_char, priority = 4)]
    #[regex(r"\?\\(.|\n)", escaped_char, priority = 4)]
    Char(i64),

    /// Symbol or number
    #[regex(r#"[^\s"';()\[\]`,]+"#, |lex| lex.slice().to_string())]
    Atom(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenParen => write!(f, "`(`"),
            Token::CloseParen => write!(f, "`)`"),
            Token::OpenBracket => write!(f, "`[`"),
            Token::CloseBracket => write!(f, "`]`"),
            Token::Quote => write!(f, "`'`"),
            Token::Backquote => write!(f, "backquote"),
            Token::Comma => write!(f, "`,`"),
            Token::CommaAt => write!(f, "`,@`"),
            Token::Str(_) => write!(f, "string"),
            Token::Char(_) => write!(f, "character"),
            Token::Atom(text) => write!(f, "`{}`", text),
        }
    }
}

fn unescape_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

/// Resolve backslash escapes inside a string literal.
///
/// A backslash before a newline continues the string on the next line and
/// produces nothing.
pub fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('e') => result.push('\u{1b}'),
            Some('\n') => {}
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

fn plain_char(lex: &mut logos::Lexer<Token>) -> Option<i64> {
    lex.slice().chars().nth(1).map(|ch| ch as i64)
}

fn escaped_char(lex: &mut logos::Lexer<Token>) -> Option<i64> {
    let ch = lex.slice().chars().nth(2)?;
    let code = match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'e' => '\u{1b}',
        's' => ' ',
        other => other,
    };
    Some(code as i64)
}

/// Tokenize source text, keeping the byte span of every token.
///
/// Text the lexer cannot match is returned as an `Err` carrying its span, so
/// the reader can report it as a syntax error.
pub fn tokenize(source: &str) -> Vec<Result<(Token, logos::Span), logos::Span>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(Ok((token, lexer.span()))),
            Err(()) => tokens.push(Err(lexer.span())),
        }
    }

    tokens
}
