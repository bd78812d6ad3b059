//! Reader for Emacs Lisp source files
//!
//! The reader turns source text into [`Sexp`] values in two stages: logos
//! tokenizes the text and a chumsky grammar assembles the token stream into
//! nested lists. A source file is wrapped as `(\n<content>\n)` before parsing
//! so that all of its top-level forms come back as one list.
//!
//! Reader macros are kept structural: `'x` becomes [`Sexp::Quoted`], while
//! backquote, unquote and splice become two element lists headed by the
//! symbols `` ` ``, `,` and `,@`. Function quotes `#'foo` come out as the
//! symbol `#` followed by `'foo`; [`sanitize`] removes the stray `#`.

use chumsky::prelude::*;
use chumsky::Stream;
use std::path::Path;

use super::error::{LispError, LispResult, ReadError};
use super::sexp::Sexp;
use super::token::{tokenize, Token};

type ParserError = Simple<Token>;

/// Grammar for a single S-expression
fn sexp() -> impl Parser<Token, Sexp, Error = ParserError> + Clone {
    recursive(|sexp| {
        let atom = filter_map(|span, token: Token| match token {
            Token::Str(text) => Ok(Sexp::String(text)),
            Token::Char(code) => Ok(Sexp::Integer(code)),
            Token::Atom(text) => Ok(Sexp::from_atom(&text)),
            other => Err(ParserError::expected_input_found(span, None, Some(other))),
        });

        let list = sexp
            .clone()
            .repeated()
            .delimited_by(just(Token::OpenParen), just(Token::CloseParen))
            .map(Sexp::List);

        let vector = sexp
            .clone()
            .repeated()
            .delimited_by(just(Token::OpenBracket), just(Token::CloseBracket))
            .map(Sexp::Vector);

        let quoted = just(Token::Quote)
            .ignore_then(sexp.clone())
            .map(Sexp::quote);

        let backquoted = just(Token::Backquote)
            .ignore_then(sexp.clone())
            .map(|inner| Sexp::List(vec![Sexp::symbol("`"), inner]));

        let unquoted = just(Token::Comma)
            .ignore_then(sexp.clone())
            .map(|inner| Sexp::List(vec![Sexp::symbol(","), inner]));

        let spliced = just(Token::CommaAt)
            .ignore_then(sexp)
            .map(|inner| Sexp::List(vec![Sexp::symbol(",@"), inner]));

        choice((atom, list, vector, quoted, backquoted, unquoted, spliced))
    })
}

/// Count the line of `offset`, shifted by the lines a wrapper added in front
fn line_at(text: &str, offset: usize, leading_lines: usize, max_line: usize) -> usize {
    let offset = offset.min(text.len());
    let newlines = text.as_bytes()[..offset]
        .iter()
        .filter(|byte| **byte == b'\n')
        .count();
    (newlines + 1)
        .saturating_sub(leading_lines)
        .clamp(1, max_line.max(1))
}

fn describe(error: &ParserError) -> String {
    if let chumsky::error::SimpleReason::Custom(message) = error.reason() {
        return message.clone();
    }
    match error.found() {
        Some(token) => format!("unexpected {}", token),
        None => "unexpected end of input".to_string(),
    }
}

/// Parse exactly one S-expression out of `text`.
///
/// `leading_lines` is the number of lines a caller prepended to the real
/// source, so that reported line numbers point into the original text.
fn parse_text(text: &str, leading_lines: usize, max_line: usize) -> Result<Sexp, ReadError> {
    let mut tokens = Vec::new();
    for result in tokenize(text) {
        match result {
            Ok(token) => tokens.push(token),
            Err(span) => {
                let line = line_at(text, span.start, leading_lines, max_line);
                let message = format!("unrecognized input `{}`", &text[span.clone()]);
                return Err(ReadError::new(message, span, line));
            }
        }
    }

    let len = text.len();
    let stream = Stream::from_iter(len..len + 1, tokens.into_iter());
    sexp().then_ignore(end()).parse(stream).map_err(|errors| {
        // chumsky always reports at least one error on failure
        let Some(error) = errors.into_iter().next() else {
            return ReadError::new("unreadable input", 0..len, 1);
        };
        let span = error.span();
        let line = line_at(text, span.start, leading_lines, max_line);
        ReadError::new(describe(&error), span, line)
    })
}

/// Read a single S-expression
pub fn read(source: &str) -> Result<Sexp, ReadError> {
    parse_text(source, 0, source.lines().count())
}

/// Read all top-level forms of a source file's content
pub fn read_forms(content: &str) -> Result<Vec<Sexp>, ReadError> {
    let wrapped = format!("(\n{}\n)", content);
    match parse_text(&wrapped, 1, content.lines().count())? {
        Sexp::List(forms) => Ok(forms),
        other => Ok(vec![other]),
    }
}

/// Read all top-level forms of the file at `path`
pub fn read_file(path: &Path) -> LispResult<Vec<Sexp>> {
    let content = std::fs::read_to_string(path).map_err(|source| LispError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(read_forms(&content)?)
}

/// Remove function-quote artifacts from a form tree.
///
/// Wherever the symbol `#` is immediately followed by a quoted symbol, the
/// `#` is dropped and the quoted symbol kept. This applies at every depth,
/// including inside vectors and quoted forms.
pub fn sanitize(form: Sexp) -> Sexp {
    match form {
        Sexp::List(items) => Sexp::List(sanitize_items(items)),
        Sexp::Vector(items) => Sexp::Vector(sanitize_items(items)),
        Sexp::Quoted(inner) => Sexp::Quoted(Box::new(sanitize(*inner))),
        other => other,
    }
}

fn sanitize_items(items: Vec<Sexp>) -> Vec<Sexp> {
    let mut result = Vec::with_capacity(items.len());
    let mut items = items.into_iter().peekable();
    while let Some(item) = items.next() {
        let is_artifact = item.as_symbol() == Some("#")
            && items.peek().is_some_and(Sexp::is_quoted_symbol);
        if !is_artifact {
            result.push(sanitize(item));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Sexp {
        Sexp::symbol(name)
    }

    #[test]
    fn test_read_nested_list() {
        let form = read("(defun greet (name) \"Say hi\")").unwrap();
        assert_eq!(
            form,
            Sexp::List(vec![
                sym("defun"),
                sym("greet"),
                Sexp::List(vec![sym("name")]),
                Sexp::String("Say hi".into()),
            ])
        );
    }

    #[test]
    fn test_read_forms_without_outer_parens() {
        let forms = read_forms(";;; Commentary\n(defvar a 1)\n\n(defvar b 2) ; done").unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[1].to_string(), "(defvar b 2)");
    }

    #[test]
    fn test_read_empty_file() {
        assert_eq!(read_forms("").unwrap(), Vec::<Sexp>::new());
        assert_eq!(read_forms(";; only comments").unwrap(), Vec::<Sexp>::new());
    }

    #[test]
    fn test_read_reader_macros() {
        let form = read("`(a ,b ,@c)").unwrap();
        assert_eq!(form.to_string(), "(` (a (, b) (,@ c)))");
        assert_eq!(read("'foo").unwrap(), Sexp::quote(sym("foo")));
    }

    #[test]
    fn test_read_dotted_pair_and_vector() {
        let form = read("'(my-package . \"1.2\")").unwrap();
        let inner = form.unquote().unwrap();
        assert!(inner.as_cons_cell().is_some());

        let vector = read("[1 2.5 ?a]").unwrap();
        assert_eq!(
            vector,
            Sexp::Vector(vec![Sexp::Integer(1), Sexp::Float(2.5), Sexp::Integer(97)])
        );
    }

    #[test]
    fn test_unbalanced_input_reports_line() {
        let error = read_forms("(defvar a 1)\n(defun broken (x)\n  \"Doc\"").unwrap_err();
        assert!(error.message.contains("end of input"), "{}", error.message);
        assert_eq!(error.line, 3);

        let error = read_forms("(defvar a 1))\n").unwrap_err();
        assert_eq!(error.line, 1);
        assert_eq!(error.message, "unexpected `)`");
    }

    #[test]
    fn test_unterminated_string_is_a_read_error() {
        let error = read_forms("(defvar a 1)\n(defvar b \"oops)").unwrap_err();
        assert_eq!(error.line, 2);
    }

    #[test]
    fn test_read_file_missing() {
        let error = read_file(Path::new("/nonexistent/foo.el")).unwrap_err();
        assert!(matches!(error, LispError::Io { .. }));
    }

    #[test]
    fn test_sanitize_function_quotes_at_every_depth() {
        let form = read("(add-hook 'foo-hook #'foo-setup [#'bar] '(#'baz))").unwrap();
        assert_eq!(
            sanitize(form).to_string(),
            "(add-hook 'foo-hook 'foo-setup ['bar] '('baz))"
        );
    }

    #[test]
    fn test_sanitize_keeps_other_hashes() {
        let form = read("(mapcar #'(lambda (x) x) xs)").unwrap();
        assert_eq!(
            sanitize(form).to_string(),
            "(mapcar # '(lambda (x) x) xs)"
        );
    }
}
