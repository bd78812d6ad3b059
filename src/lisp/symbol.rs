//! Interned symbols, their scopes and their properties

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::sexp::Sexp;

/// Names of the symbol properties the interpreter records
pub mod properties {
    pub const FUNCTION_DOCUMENTATION: &str = "function-documentation";
    pub const FUNCTION_ARGLIST: &str = "function-arglist";
    pub const VARIABLE_DOCUMENTATION: &str = "variable-documentation";
    pub const BUFFER_LOCAL: &str = "buffer-local";
    pub const SAFE_LOCAL_VARIABLE: &str = "safe-local-variable";
    pub const RISKY_LOCAL_VARIABLE: &str = "risky-local-variable";
    pub const CUSTOM_PACKAGE_VERSION: &str = "custom-package-version";
    pub const FACE_DOCUMENTATION: &str = "face-documentation";
    pub const STRUCTURE_DOCUMENTATION: &str = "structure-documentation";
    pub const STRUCTURE_SLOTS: &str = "structure-slots";
}

/// A namespace partition in which a symbol may hold a definition
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Function,
    Variable,
    Face,
    Struct,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Function => "function",
            Scope::Variable => "variable",
            Scope::Face => "face",
            Scope::Struct => "struct",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(Scope::Function),
            "variable" => Ok(Scope::Variable),
            "face" => Ok(Scope::Face),
            "struct" => Ok(Scope::Struct),
            other => Err(format!("Unknown scope: {}", other)),
        }
    }
}

/// Where a scope membership came from. Both parts may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub file: Option<PathBuf>,
    pub feature: Option<String>,
}

impl Provenance {
    pub fn new(file: Option<&Path>, feature: Option<&str>) -> Self {
        Self {
            file: file.map(Path::to_path_buf),
            feature: feature.map(str::to_string),
        }
    }
}

/// The value of a symbol property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// `nil` or the empty list
    Empty,
    /// Reference to another interned symbol, by name
    Symbol(String),
    /// Ordered sequence of tokens, e.g. an argument list
    List(Vec<String>),
    /// The package and version that introduced a variable or face
    Version { package: String, version: String },
}

impl PropertyValue {
    /// Convert a primitive constant, or `None` if `sexp` is not one
    pub fn from_constant(sexp: &Sexp) -> Option<Self> {
        if !sexp.is_primitive() {
            return None;
        }
        let value = match sexp {
            Sexp::String(text) => PropertyValue::String(text.clone()),
            Sexp::Integer(value) => PropertyValue::Integer(*value),
            Sexp::Float(value) => PropertyValue::Float(*value),
            Sexp::Symbol(name) if name == "t" => PropertyValue::Bool(true),
            _ => PropertyValue::Empty,
        };
        Some(value)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            PropertyValue::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Lisp truthiness: everything but `Bool(false)` and `Empty`
    pub fn is_truthy(&self) -> bool {
        !matches!(self, PropertyValue::Bool(false) | PropertyValue::Empty)
    }
}

/// A named symbol with its scopes and properties.
///
/// Symbols are owned by an [`Environment`](super::environment::Environment),
/// which guarantees that there is exactly one symbol per name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    name: String,
    scopes: BTreeMap<Scope, Provenance>,
    properties: BTreeMap<String, PropertyValue>,
}

impl Symbol {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scopes: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scopes(&self) -> &BTreeMap<Scope, Provenance> {
        &self.scopes
    }

    pub fn in_scope(&self, scope: Scope) -> bool {
        self.scopes.contains_key(&scope)
    }

    pub fn provenance(&self, scope: Scope) -> Option<&Provenance> {
        self.scopes.get(&scope)
    }

    /// Record the provenance for `scope`, replacing any earlier one
    pub fn set_provenance(&mut self, scope: Scope, provenance: Provenance) {
        self.scopes.insert(scope, provenance);
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// The property as string, if it is set to one
    pub fn string_property(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(PropertyValue::as_str)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_are_independent() {
        let mut symbol = Symbol::new("foo");
        symbol.set_provenance(Scope::Function, Provenance::new(None, Some("foo")));
        symbol.set_provenance(Scope::Variable, Provenance::default());
        assert!(symbol.in_scope(Scope::Function));
        assert!(symbol.in_scope(Scope::Variable));
        assert!(!symbol.in_scope(Scope::Face));
        assert_eq!(
            symbol.provenance(Scope::Function).unwrap().feature.as_deref(),
            Some("foo")
        );
    }

    #[test]
    fn test_constants() {
        assert_eq!(
            PropertyValue::from_constant(&Sexp::String("x".into())),
            Some(PropertyValue::String("x".into()))
        );
        assert_eq!(
            PropertyValue::from_constant(&Sexp::symbol("t")),
            Some(PropertyValue::Bool(true))
        );
        assert_eq!(
            PropertyValue::from_constant(&Sexp::symbol("nil")),
            Some(PropertyValue::Empty)
        );
        assert_eq!(PropertyValue::from_constant(&Sexp::symbol("foo")), None);
        assert_eq!(
            PropertyValue::from_constant(&Sexp::List(vec![Sexp::symbol("f")])),
            None
        );
    }

    #[test]
    fn test_scope_names_round_trip() {
        for scope in [Scope::Function, Scope::Variable, Scope::Face, Scope::Struct] {
            assert_eq!(scope.as_str().parse::<Scope>(), Ok(scope));
        }
        assert!("macro".parse::<Scope>().is_err());
    }
}
