//! Inline nodes produced by the help markup transformer

use serde::Serialize;
use std::fmt;

/// Sequence of inline nodes parsed from one run of text
pub type InlineContent = Vec<InlineNode>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InlineNode {
    /// Text without markup
    Plain(String),
    /// `*text*`
    Emphasis(String),
    /// Cross reference to a symbol, an Info node or a URL
    Reference(ReferenceInline),
    /// Code literal; meta-variables inside it are split out
    Literal(InlineContent),
    /// Placeholder for an argument, conventionally upper case in docstrings
    MetaVariable(String),
}

impl InlineNode {
    pub fn plain(text: impl Into<String>) -> Self {
        InlineNode::Plain(text.into())
    }

    pub fn as_plain(&self) -> Option<&str> {
        match self {
            InlineNode::Plain(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceInline> {
        match self {
            InlineNode::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// The text a reader would see, without any markup
    pub fn text(&self) -> String {
        match self {
            InlineNode::Plain(text) | InlineNode::Emphasis(text) => text.clone(),
            InlineNode::Reference(reference) => reference.display_text().to_string(),
            InlineNode::Literal(children) => text_of(children),
            InlineNode::MetaVariable(name) => metavariable_text(name),
        }
    }
}

/// Concatenate the visible text of `content`
pub fn text_of(content: &[InlineNode]) -> String {
    content.iter().map(InlineNode::text).collect()
}

/// Meta-variables are shown in lower case
pub fn metavariable_text(name: &str) -> String {
    name.to_lowercase()
}

/// What a reference points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Node or anchor in an Info manual
    Info,
    Command,
    Function,
    Option,
    Variable,
    Face,
    /// Symbol introduced explicitly with "symbol `name'"
    QuotedSymbol,
    Url,
    /// Any symbol quoted as `name'
    Symbol,
}

impl Role {
    /// The cross reference type, with an `el:` domain prefix for Emacs Lisp
    /// objects
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Info => "infonode",
            Role::Command => "el:command",
            Role::Function => "el:function",
            Role::Option => "el:option",
            Role::Variable => "el:variable",
            Role::Face => "el:face",
            Role::QuotedSymbol => "symbol",
            Role::Url => "url",
            Role::Symbol => "el:symbol",
        }
    }

    /// Split into domain and reference type, e.g. `("el", "function")`
    pub fn domain_and_type(&self) -> (Option<&'static str>, &'static str) {
        let name = self.as_str();
        match name.split_once(':') {
            Some((domain, reftype)) => (Some(domain), reftype),
            None => (None, name),
        }
    }

    /// How the reference text is rendered
    pub fn inner_style(&self) -> InnerStyle {
        match self {
            Role::Info => InnerStyle::Emphasis,
            Role::Url => InnerStyle::Plain,
            _ => InnerStyle::Literal,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InnerStyle {
    Plain,
    Emphasis,
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceInline {
    pub role: Role,
    pub target: String,
    /// Text to show instead of the target
    pub text: Option<String>,
}

impl ReferenceInline {
    pub fn new(role: Role, target: impl Into<String>) -> Self {
        Self {
            role,
            target: target.into(),
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn display_text(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.target)
    }
}
