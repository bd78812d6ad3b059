//! Auto-documentation of symbols
//!
//! Each [`ObjectKind`] documents a symbol in one scope and reads its docstring
//! from one property. [`describe`] looks a symbol up in an [`Environment`] and
//! assembles everything the symbol table knows about it into a
//! [`Description`]: the signature, the parsed docstring, the properties of
//! variables and the version in which an option was introduced.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::diagnostics::{Diagnostic, Location, Reporter, SourceLocator};
use crate::docstring::{BlockContent, DocstringParser, InlineContent, InlineNode, ReferenceInline, Role};
use crate::lisp::{properties, Environment, PropertyValue, Scope, Symbol};

/// The kinds of objects that can be documented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectKind {
    Function,
    Macro,
    Command,
    Variable,
    Option,
    Hook,
    Face,
    ClStruct,
    ClSlot,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 9] = [
        ObjectKind::Function,
        ObjectKind::Macro,
        ObjectKind::Command,
        ObjectKind::Variable,
        ObjectKind::Option,
        ObjectKind::Hook,
        ObjectKind::Face,
        ObjectKind::ClStruct,
        ObjectKind::ClSlot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Function => "function",
            ObjectKind::Macro => "macro",
            ObjectKind::Command => "command",
            ObjectKind::Variable => "variable",
            ObjectKind::Option => "option",
            ObjectKind::Hook => "hook",
            ObjectKind::Face => "face",
            ObjectKind::ClStruct => "cl-struct",
            ObjectKind::ClSlot => "cl-slot",
        }
    }

    /// Human readable name, as used in generated sentences
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Option => "user option",
            ObjectKind::ClStruct => "CL struct",
            ObjectKind::ClSlot => "slot",
            other => other.as_str(),
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            ObjectKind::Function | ObjectKind::Macro | ObjectKind::Command | ObjectKind::ClSlot => {
                Scope::Function
            }
            ObjectKind::Variable | ObjectKind::Option | ObjectKind::Hook => Scope::Variable,
            ObjectKind::Face => Scope::Face,
            ObjectKind::ClStruct => Scope::Struct,
        }
    }

    /// The property holding the docstring of this kind of object
    pub fn docstring_property(&self) -> &'static str {
        match self.scope() {
            Scope::Function => properties::FUNCTION_DOCUMENTATION,
            Scope::Variable => properties::VARIABLE_DOCUMENTATION,
            Scope::Face => properties::FACE_DOCUMENTATION,
            Scope::Struct => properties::STRUCTURE_DOCUMENTATION,
        }
    }

    /// Whether the signature carries the argument list
    pub fn has_arglist(&self) -> bool {
        matches!(
            self,
            ObjectKind::Function | ObjectKind::Macro | ObjectKind::Command
        )
    }

    pub fn is_variable(&self) -> bool {
        self.scope() == Scope::Variable
    }

    /// Whether the kind notes the package version that introduced it
    pub fn notes_version(&self) -> bool {
        self.is_variable() || *self == ObjectKind::Face
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown object kind: {}", s))
    }
}

/// One entry of a function signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "name", rename_all = "kebab-case")]
pub enum Parameter {
    Name(String),
    /// `&optional`, `&rest` and friends
    Marker(String),
}

impl Parameter {
    pub fn parse(token: &str) -> Self {
        if token.starts_with('&') {
            Parameter::Marker(token.to_string())
        } else {
            Parameter::Name(token.to_string())
        }
    }
}

/// Everything known about one documented symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub name: String,
    pub kind: ObjectKind,
    /// The name, followed by the argument list for function kinds
    pub signature: String,
    pub parameters: Vec<Parameter>,
    pub docstring: BlockContent,
    /// One entry per sentence about buffer-locality and file-local safety
    pub variable_properties: Vec<InlineContent>,
    pub version_note: Option<String>,
}

/// Describe `name` as a `kind`, with the default docstring parser
pub fn describe(
    env: &Environment,
    kind: ObjectKind,
    name: &str,
    reporter: &mut dyn Reporter,
) -> Option<Description> {
    describe_with(&DocstringParser::default(), env, kind, name, reporter)
}

/// Describe `name` as a `kind`.
///
/// Returns `None` for undefined symbols. A symbol outside the scope of `kind`
/// or without docstring is still described, after a warning.
pub fn describe_with(
    parser: &DocstringParser,
    env: &Environment,
    kind: ObjectKind,
    name: &str,
    reporter: &mut dyn Reporter,
) -> Option<Description> {
    let Some(symbol) = env.lookup(name) else {
        reporter.report(warning(name, format!("Undefined symbol {}", name)));
        return None;
    };

    let scope = kind.scope();
    if !symbol.in_scope(scope) {
        reporter.report(warning(
            name,
            format!("Symbol {} not present in scope {}", name, scope),
        ));
    }

    let arglist: &[String] = if kind.has_arglist() {
        symbol
            .property(properties::FUNCTION_ARGLIST)
            .and_then(PropertyValue::as_list)
            .unwrap_or_default()
    } else {
        &[]
    };
    let signature = std::iter::once(name)
        .chain(arglist.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    let docstring = match symbol.string_property(kind.docstring_property()) {
        Some(text) if !text.is_empty() => {
            let file = symbol.provenance(scope).and_then(|p| p.file.as_deref());
            parser.parse(text, &SourceLocator::new(file, Some(name)), reporter)
        }
        _ => {
            reporter.report(warning(name, format!("no docstring for symbol {}", name)));
            Vec::new()
        }
    };

    let variable_properties = if kind.is_variable() {
        variable_properties(symbol)
    } else {
        Vec::new()
    };
    let version_note = if kind.notes_version() {
        version_note(symbol, kind)
    } else {
        None
    };

    Some(Description {
        name: name.to_string(),
        kind,
        signature,
        parameters: arglist.iter().map(|token| Parameter::parse(token)).collect(),
        docstring,
        variable_properties,
        version_note,
    })
}

fn warning(name: &str, message: String) -> Diagnostic {
    Diagnostic::warning(message).with_location(Location {
        source: SourceLocator::for_symbol(name),
        line: None,
    })
}

fn flag(symbol: &Symbol, property: &str) -> bool {
    symbol
        .property(property)
        .map(PropertyValue::is_truthy)
        .unwrap_or(false)
}

/// The name of the predicate that makes a variable safe, if any
fn safe_predicate(symbol: &Symbol) -> Option<String> {
    match symbol.property(properties::SAFE_LOCAL_VARIABLE)? {
        PropertyValue::Symbol(name) | PropertyValue::String(name) => Some(name.clone()),
        PropertyValue::Bool(true) => Some("t".to_string()),
        _ => None,
    }
}

/// Sentences about the file-local behavior of a variable
pub fn variable_properties(symbol: &Symbol) -> Vec<InlineContent> {
    let mut sentences = Vec::new();
    if flag(symbol, properties::BUFFER_LOCAL) {
        sentences.push(vec![InlineNode::plain(
            "Automatically becomes buffer-local when set.",
        )]);
    }
    if flag(symbol, properties::RISKY_LOCAL_VARIABLE) {
        sentences.push(vec![InlineNode::plain(
            "This variable may be risky if used as a file-local variable.",
        )]);
    }
    if let Some(predicate) = safe_predicate(symbol) {
        sentences.push(vec![
            InlineNode::plain(
                "This variable is safe as a file local variable if its value satisfies the predicate ",
            ),
            InlineNode::Reference(ReferenceInline::new(Role::Function, predicate)),
            InlineNode::plain("."),
        ]);
    }
    sentences
}

/// The note on the package version that introduced `symbol` or changed it
pub fn version_note(symbol: &Symbol, kind: ObjectKind) -> Option<String> {
    match symbol.property(properties::CUSTOM_PACKAGE_VERSION)? {
        PropertyValue::Version { package, version } if !version.is_empty() => Some(format!(
            "This {} was introduced, or its default value was changed, in version {} of the {} package.",
            kind.label(),
            version,
            package
        )),
        _ => None,
    }
}
