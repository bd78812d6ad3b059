//! Help mode inline markup
//!
//! Emacs help buffers turn a handful of conventions in docstrings into links:
//! `` `foo' `` quotes a symbol, "function `foo'" names what kind of symbol it
//! is, "Info node `(elisp)Foo'" points into a manual, and upper case words
//! such as `BUFFER` stand for arguments. [`InlineMarkup`] recognizes these
//! conventions in a run of text and produces [`InlineNode`]s.
//!
//! All branches live in one alternation, so at every position the first
//! branch in this order wins:
//!
//! 1. emphasis `*text*`
//! 2. Info node or anchor
//! 3. command, function, option, variable and face references
//! 4. explicit symbol
//! 5. URL
//! 6. any quoted text: a symbol reference if it looks like a symbol,
//!    a code literal otherwise
//! 7. a meta-variable of at least four upper case characters

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::inlines::{InlineContent, InlineNode, ReferenceInline, Role};
use crate::lisp::sexp::is_symbol_name;

static HELP_MODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?:\*(?P<emphasis>[^\s*](?:[^*]*[^\s*])?)\*)
        | (?:(?P<infoprefix>[Ii]nfo\s+(?:[Nn]ode|[Aa]nchor)\s+)`(?P<infonode>[^']+)')
        | (?:(?P<cmdprefix>[Cc]ommand\s+)`(?P<command>[^']+)')
        | (?:(?P<funprefix>[Ff]unction\s+)`(?P<function>[^']+)')
        | (?:(?P<optprefix>[Oo]ption\s+)`(?P<option>[^']+)')
        | (?:(?P<varprefix>[Vv]ariable\s+)`(?P<variable>[^']+)')
        | (?:(?P<faceprefix>[Ff]ace\s+)`(?P<face>[^']+)')
        | (?:(?P<symprefix>[Ss]ymbol\s+)`(?P<symbol>[^']+)')
        | (?:(?P<urlprefix>URL\s+)`(?P<url>[^']+)')
        | (?:`(?P<literal>[^']+)')
        | (?:\b(?P<metavar>[A-Z][-_A-Z]{3,})\b)
        ",
    )
    .expect("help mode pattern is valid")
});

/// Upper case runs inside code literals, of any length
static METAVAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][-_A-Z]*\b").expect("metavar pattern is valid"));

/// Turns the value of one matched branch into nodes
pub type BranchHandler = fn(&Captures<'_>, &str) -> InlineContent;

/// An inline pattern together with the handlers for its named branches
#[derive(Clone)]
pub struct InlineMarkup {
    pattern: Regex,
    handlers: Vec<(&'static str, BranchHandler)>,
}

impl InlineMarkup {
    /// Build a transformer from a pattern and its branch handlers.
    ///
    /// Every alternative of `pattern` must contain a named group that has a
    /// handler; groups without one (such as prefixes) are passed to handlers
    /// through the captures.
    pub fn new(pattern: Regex, handlers: Vec<(&'static str, BranchHandler)>) -> Self {
        Self { pattern, handlers }
    }

    /// The markup understood by Emacs help mode
    pub fn help_mode() -> Self {
        Self::new(
            HELP_MODE_PATTERN.clone(),
            vec![
                ("emphasis", emphasis as BranchHandler),
                ("infonode", infonode as BranchHandler),
                ("command", command as BranchHandler),
                ("function", function as BranchHandler),
                ("option", option as BranchHandler),
                ("variable", variable as BranchHandler),
                ("face", face as BranchHandler),
                ("symbol", explicit_symbol as BranchHandler),
                ("url", url as BranchHandler),
                ("literal", literal as BranchHandler),
                ("metavar", metavariable as BranchHandler),
            ],
        )
    }

    /// Transform `text` into inline nodes.
    ///
    /// Text before, between and after matches is kept verbatim as plain
    /// text, so no part of the input is lost.
    pub fn transform(&self, text: &str) -> InlineContent {
        let mut nodes = Vec::new();
        let mut position = 0;

        for captures in self.pattern.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if whole.start() > position {
                nodes.push(InlineNode::plain(&text[position..whole.start()]));
            }
            nodes.extend(self.transform_match(&captures));
            position = whole.end();
        }
        if position < text.len() {
            nodes.push(InlineNode::plain(&text[position..]));
        }

        nodes
    }

    fn transform_match(&self, captures: &Captures<'_>) -> InlineContent {
        for (name, handler) in &self.handlers {
            if let Some(value) = captures.name(name) {
                return handler(captures, value.as_str());
            }
        }
        // Every branch of the pattern has a handler, so this is a bug in the
        // pattern table
        panic!(
            "Inline markup branch without handler matched {:?}",
            captures.get(0).map(|m| m.as_str())
        );
    }
}

impl Default for InlineMarkup {
    fn default() -> Self {
        Self::help_mode()
    }
}

/// Transform `text` with the help mode markup
pub fn transform(text: &str) -> InlineContent {
    static HELP_MODE: Lazy<InlineMarkup> = Lazy::new(InlineMarkup::help_mode);
    HELP_MODE.transform(text)
}

/// Split upper case runs out of a code literal as meta-variables
pub fn split_metavariables(code: &str) -> InlineContent {
    let mut nodes = Vec::new();
    let mut position = 0;
    for found in METAVAR_PATTERN.find_iter(code) {
        if found.start() > position {
            nodes.push(InlineNode::plain(&code[position..found.start()]));
        }
        nodes.push(InlineNode::MetaVariable(found.as_str().to_string()));
        position = found.end();
    }
    if position < code.len() {
        nodes.push(InlineNode::plain(&code[position..]));
    }
    nodes
}

fn prefixed_reference(captures: &Captures<'_>, prefix: &str, reference: ReferenceInline) -> InlineContent {
    let mut nodes = Vec::with_capacity(2);
    if let Some(prefix) = captures.name(prefix) {
        nodes.push(InlineNode::plain(prefix.as_str()));
    }
    nodes.push(InlineNode::Reference(reference));
    nodes
}

fn emphasis(_captures: &Captures<'_>, value: &str) -> InlineContent {
    vec![InlineNode::Emphasis(value.to_string())]
}

fn infonode(captures: &Captures<'_>, value: &str) -> InlineContent {
    prefixed_reference(captures, "infoprefix", ReferenceInline::new(Role::Info, value))
}

fn command(captures: &Captures<'_>, value: &str) -> InlineContent {
    prefixed_reference(captures, "cmdprefix", ReferenceInline::new(Role::Command, value))
}

fn function(captures: &Captures<'_>, value: &str) -> InlineContent {
    prefixed_reference(captures, "funprefix", ReferenceInline::new(Role::Function, value))
}

fn option(captures: &Captures<'_>, value: &str) -> InlineContent {
    prefixed_reference(captures, "optprefix", ReferenceInline::new(Role::Option, value))
}

fn variable(captures: &Captures<'_>, value: &str) -> InlineContent {
    prefixed_reference(captures, "varprefix", ReferenceInline::new(Role::Variable, value))
}

fn face(captures: &Captures<'_>, value: &str) -> InlineContent {
    prefixed_reference(captures, "faceprefix", ReferenceInline::new(Role::Face, value))
}

fn explicit_symbol(captures: &Captures<'_>, value: &str) -> InlineContent {
    let reference =
        ReferenceInline::new(Role::QuotedSymbol, value).with_text(format!("`{}'", value));
    prefixed_reference(captures, "symprefix", reference)
}

fn url(captures: &Captures<'_>, value: &str) -> InlineContent {
    let reference = ReferenceInline::new(Role::Url, value).with_text(value);
    prefixed_reference(captures, "urlprefix", reference)
}

fn literal(_captures: &Captures<'_>, value: &str) -> InlineContent {
    if is_symbol_name(value) {
        vec![InlineNode::Reference(ReferenceInline::new(Role::Symbol, value))]
    } else {
        vec![InlineNode::Literal(split_metavariables(value))]
    }
}

fn metavariable(_captures: &Captures<'_>, value: &str) -> InlineContent {
    vec![InlineNode::MetaVariable(value.to_string())]
}
