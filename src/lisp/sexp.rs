//! S-expression values produced by the reader
//!
//! The interpreter never evaluates these values, it only inspects their
//! shape. The helpers below answer the handful of structural questions the
//! definition forms ask: is this a quoted symbol, a cons cell, a constant.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Emacs Lisp float syntax, checked after integer parsing failed
static FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:[0-9]+\.[0-9]+(?:e[-+]?[0-9]+)?|\.[0-9]+(?:e[-+]?[0-9]+)?|[0-9]+e[-+]?[0-9]+)$")
        .expect("float pattern is valid")
});

/// Characters that may never appear in a bare symbol
static SYMBOL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[^\s"';()\[\]`,]+$"#).expect("symbol pattern is valid"));

#[derive(Debug, Clone, PartialEq)]
pub enum Sexp {
    Symbol(String),
    String(String),
    Integer(i64),
    Float(f64),
    Quoted(Box<Sexp>),
    List(Vec<Sexp>),
    Vector(Vec<Sexp>),
}

impl Sexp {
    /// Classify a lexed atom as a number or a symbol
    pub fn from_atom(text: &str) -> Sexp {
        if let Ok(value) = text.parse::<i64>() {
            return Sexp::Integer(value);
        }
        if FLOAT_PATTERN.is_match(text) {
            if let Ok(value) = text.parse::<f64>() {
                return Sexp::Float(value);
            }
        }
        Sexp::Symbol(text.to_string())
    }

    pub fn symbol(name: impl Into<String>) -> Sexp {
        Sexp::Symbol(name.into())
    }

    pub fn quote(inner: Sexp) -> Sexp {
        Sexp::Quoted(Box::new(inner))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Sexp::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Sexp::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::List(items) => Some(items),
            _ => None,
        }
    }

    /// `'foo`, but not `'(foo)` or `'"foo"`
    pub fn is_quoted_symbol(&self) -> bool {
        self.quoted_symbol().is_some()
    }

    pub fn quoted_symbol(&self) -> Option<&str> {
        match self {
            Sexp::Quoted(inner) => inner.as_symbol(),
            _ => None,
        }
    }

    /// Strip one level of quoting
    pub fn unquote(&self) -> Option<&Sexp> {
        match self {
            Sexp::Quoted(inner) => Some(inner),
            _ => None,
        }
    }

    /// The car and cdr of a dotted pair `(a . b)`
    pub fn as_cons_cell(&self) -> Option<(&Sexp, &Sexp)> {
        match self {
            Sexp::List(items) if items.len() == 3 && items[1].as_symbol() == Some(".") => {
                Some((&items[0], &items[2]))
            }
            _ => None,
        }
    }

    /// Constants that may be recorded verbatim: strings, numbers, the empty
    /// list and the unquoted booleans `t` and `nil`.
    pub fn is_primitive(&self) -> bool {
        match self {
            Sexp::String(_) | Sexp::Integer(_) | Sexp::Float(_) => true,
            Sexp::List(items) => items.is_empty(),
            Sexp::Symbol(name) => name == "t" || name == "nil",
            _ => false,
        }
    }

    /// Everything except `nil` and `()` is true
    pub fn is_truthy(&self) -> bool {
        match self {
            Sexp::Symbol(name) => name != "nil",
            Sexp::List(items) => !items.is_empty(),
            _ => true,
        }
    }
}

/// Whether `name` is a plain symbol token
pub fn is_symbol_name(name: &str) -> bool {
    SYMBOL_PATTERN.is_match(name)
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "\"")?;
    for ch in text.chars() {
        match ch {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            other => write!(f, "{}", other)?,
        }
    }
    write!(f, "\"")
}

fn write_sequence(f: &mut fmt::Formatter<'_>, items: &[Sexp]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexp::Symbol(name) => write!(f, "{}", name),
            Sexp::String(text) => write_escaped(f, text),
            Sexp::Integer(value) => write!(f, "{}", value),
            Sexp::Float(value) => write!(f, "{:?}", value),
            Sexp::Quoted(inner) => write!(f, "'{}", inner),
            Sexp::List(items) => {
                write!(f, "(")?;
                write_sequence(f, items)?;
                write!(f, ")")
            }
            Sexp::Vector(items) => {
                write!(f, "[")?;
                write_sequence(f, items)?;
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoms_are_classified() {
        assert_eq!(Sexp::from_atom("42"), Sexp::Integer(42));
        assert_eq!(Sexp::from_atom("-7"), Sexp::Integer(-7));
        assert_eq!(Sexp::from_atom("1.5"), Sexp::Float(1.5));
        assert_eq!(Sexp::from_atom("1e3"), Sexp::Float(1000.0));
        assert_eq!(Sexp::from_atom("inf"), Sexp::symbol("inf"));
        assert_eq!(Sexp::from_atom("1+"), Sexp::symbol("1+"));
        assert_eq!(Sexp::from_atom("&optional"), Sexp::symbol("&optional"));
    }

    #[test]
    fn test_quoted_symbols() {
        assert!(Sexp::quote(Sexp::symbol("stringp")).is_quoted_symbol());
        assert!(!Sexp::quote(Sexp::List(vec![])).is_quoted_symbol());
        assert!(!Sexp::symbol("stringp").is_quoted_symbol());
    }

    #[test]
    fn test_cons_cells() {
        let cell = Sexp::List(vec![
            Sexp::symbol("foo"),
            Sexp::symbol("."),
            Sexp::String("1.2".into()),
        ]);
        let (car, cdr) = cell.as_cons_cell().expect("cons cell");
        assert_eq!(car, &Sexp::symbol("foo"));
        assert_eq!(cdr, &Sexp::String("1.2".into()));

        let list = Sexp::List(vec![
            Sexp::symbol("foo"),
            Sexp::symbol("bar"),
            Sexp::symbol("baz"),
        ]);
        assert!(list.as_cons_cell().is_none());
    }

    #[test]
    fn test_primitives_and_truthiness() {
        assert!(Sexp::Integer(1).is_primitive());
        assert!(Sexp::List(vec![]).is_primitive());
        assert!(Sexp::symbol("t").is_primitive());
        assert!(!Sexp::symbol("foo").is_primitive());
        assert!(!Sexp::List(vec![Sexp::symbol("foo")]).is_primitive());

        assert!(!Sexp::symbol("nil").is_truthy());
        assert!(!Sexp::List(vec![]).is_truthy());
        assert!(Sexp::symbol("t").is_truthy());
        assert!(Sexp::Integer(0).is_truthy());
    }

    #[test]
    fn test_symbol_names() {
        assert!(is_symbol_name("my-var"));
        assert!(is_symbol_name("foo/bar*"));
        assert!(!is_symbol_name(""));
        assert!(!is_symbol_name("foo bar"));
        assert!(!is_symbol_name("(foo)"));
    }

    #[test]
    fn test_display() {
        let form = Sexp::List(vec![
            Sexp::symbol("defvar"),
            Sexp::symbol("x"),
            Sexp::Float(1.0),
            Sexp::String("Say \"hi\"".into()),
            Sexp::quote(Sexp::Vector(vec![Sexp::Integer(1)])),
        ]);
        assert_eq!(form.to_string(), r#"(defvar x 1.0 "Say \"hi\"" '[1])"#);
    }
}
