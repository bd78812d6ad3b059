//! Handlers for the recognized top-level forms
//!
//! Every handler follows the same shape: find the defined name, record the
//! scope membership with the provenance of the current load context, then
//! copy whatever constant information the form carries (argument lists,
//! docstrings, keyword options) into symbol properties. Nothing is ever
//! evaluated; non-constant operands are ignored.

use std::collections::BTreeMap;
use tracing::debug;

use super::custom::parse_custom_keywords;
use super::error::{LispError, LispResult};
use super::interpreter::{FormHandler, Interpreter, LoadContext};
use super::sexp::Sexp;
use super::symbol::{properties, PropertyValue, Scope};

/// Spellings of function and macro definitions
pub const FUNCTION_FORMS: &[&str] = &[
    "defun",
    "defmacro",
    "defsubst",
    "cl-defun",
    "cl-defmacro",
    "cl-defsubst",
    "define-inline",
];

/// Spellings of variable definitions
pub const VARIABLE_FORMS: &[&str] = &["defvar", "defcustom", "defvar-local", "defconst"];

/// Spellings of compile time evaluation wrappers
pub const EVAL_FORMS: &[&str] = &["eval-and-compile", "eval-when-compile"];

/// The dispatch table every interpreter starts with
pub fn default_handlers() -> BTreeMap<String, FormHandler> {
    let mut handlers: BTreeMap<String, FormHandler> = BTreeMap::new();
    for name in FUNCTION_FORMS {
        handlers.insert(name.to_string(), defun);
    }
    for name in VARIABLE_FORMS {
        handlers.insert(name.to_string(), defvar);
    }
    for name in EVAL_FORMS {
        handlers.insert(name.to_string(), eval_inner);
    }
    handlers.insert("defface".to_string(), defface);
    handlers.insert("put".to_string(), put);
    handlers.insert("cl-defstruct".to_string(), cl_defstruct);
    handlers
}

fn defined_name<'a>(operator: &str, operands: &'a [Sexp]) -> LispResult<&'a Sexp> {
    operands
        .first()
        .ok_or_else(|| LispError::MalformedDefinitionSite(format!("{} without a name", operator)))
}

/// Split `operands` at an optional docstring.
///
/// If `operands[0]` is a string it is the docstring and the rest follows it.
/// Otherwise there is no docstring and nothing is consumed.
fn split_docstring(operands: &[Sexp]) -> (Option<&str>, &[Sexp]) {
    match operands.split_first() {
        Some((Sexp::String(docstring), rest)) => (Some(docstring), rest),
        _ => (None, operands),
    }
}

fn arglist_tokens(arglist: Option<&Sexp>) -> Vec<String> {
    match arglist {
        Some(Sexp::List(items)) => items.iter().map(Sexp::to_string).collect(),
        _ => Vec::new(),
    }
}

/// `(defun NAME ARGLIST [DOCSTRING] BODY...)` and its aliases
pub fn defun(
    interpreter: &mut Interpreter,
    context: &LoadContext,
    operator: &str,
    operands: &[Sexp],
) -> LispResult<Option<Sexp>> {
    let name = defined_name(operator, operands)?;
    let arglist = arglist_tokens(operands.get(1));
    let docstring = match operands.get(2) {
        Some(Sexp::String(docstring)) => Some(docstring),
        _ => None,
    };

    let symbol = interpreter.env_mut().intern_sexp(name)?;
    symbol.set_provenance(Scope::Function, context.provenance());
    symbol.set_property(properties::FUNCTION_ARGLIST, PropertyValue::List(arglist));
    if let Some(docstring) = docstring {
        symbol.set_property(
            properties::FUNCTION_DOCUMENTATION,
            PropertyValue::String(docstring.clone()),
        );
    }
    Ok(None)
}

/// `(defvar NAME [VALUE [DOCSTRING]] KEYWORDS...)` and its aliases
pub fn defvar(
    interpreter: &mut Interpreter,
    context: &LoadContext,
    operator: &str,
    operands: &[Sexp],
) -> LispResult<Option<Sexp>> {
    let name = defined_name(operator, operands)?;
    let after_value = operands.get(2..).unwrap_or_default();
    let (docstring, keywords) = split_docstring(after_value);

    let symbol = interpreter.env_mut().intern_sexp(name)?;
    symbol.set_provenance(Scope::Variable, context.provenance());
    if let Some(docstring) = docstring {
        symbol.set_property(
            properties::VARIABLE_DOCUMENTATION,
            PropertyValue::String(docstring.to_string()),
        );
    }
    symbol.set_property(
        properties::BUFFER_LOCAL,
        PropertyValue::Bool(operator.ends_with("-local")),
    );
    for (key, value) in parse_custom_keywords(keywords) {
        symbol.set_property(key, value);
    }
    Ok(None)
}

/// `(defface NAME SPEC DOCSTRING KEYWORDS...)`
pub fn defface(
    interpreter: &mut Interpreter,
    context: &LoadContext,
    operator: &str,
    operands: &[Sexp],
) -> LispResult<Option<Sexp>> {
    let name = defined_name(operator, operands)?;
    let after_spec = operands.get(2..).unwrap_or_default();
    let (docstring, keywords) = split_docstring(after_spec);

    let symbol = interpreter.env_mut().intern_sexp(name)?;
    symbol.set_provenance(Scope::Face, context.provenance());
    if let Some(docstring) = docstring {
        symbol.set_property(
            properties::FACE_DOCUMENTATION,
            PropertyValue::String(docstring.to_string()),
        );
    }
    for (key, value) in parse_custom_keywords(keywords) {
        symbol.set_property(key, value);
    }
    Ok(None)
}

/// `(put 'SYMBOL 'PROPERTY VALUE)` with a constant value.
///
/// Returns the recorded value. Calls with unquoted names or a value that is
/// neither a quoted symbol nor a primitive constant have no effect.
pub fn put(
    interpreter: &mut Interpreter,
    _context: &LoadContext,
    _operator: &str,
    operands: &[Sexp],
) -> LispResult<Option<Sexp>> {
    let [name, property, value, ..] = operands else {
        debug!(operands = operands.len(), "Skipping put with missing operands");
        return Ok(None);
    };
    let (Some(name), Some(property)) = (name.quoted_symbol(), property.quoted_symbol()) else {
        debug!(%name, %property, "Skipping put on computed symbol or property");
        return Ok(None);
    };

    let stored = if let Some(target) = value.quoted_symbol() {
        let target = interpreter.env_mut().intern(target)?;
        PropertyValue::Symbol(target.name().to_string())
    } else if let Some(constant) = PropertyValue::from_constant(value) {
        constant
    } else {
        debug!(symbol = name, property, %value, "Skipping put with non-constant value");
        return Ok(None);
    };

    interpreter.env_mut().intern(name)?.set_property(property, stored);
    Ok(Some(value.clone()))
}

/// `(eval-and-compile BODY...)`: evaluate the body as top-level forms
pub fn eval_inner(
    interpreter: &mut Interpreter,
    context: &LoadContext,
    _operator: &str,
    operands: &[Sexp],
) -> LispResult<Option<Sexp>> {
    interpreter.eval_all(operands, context)
}

/// The name of a structure and the prefix of its slot accessors
fn struct_name_and_prefix<'a>(spec: &'a Sexp) -> Option<(&'a Sexp, String)> {
    match spec {
        Sexp::Symbol(name) => Some((spec, format!("{}-", name))),
        Sexp::List(items) => {
            let (name_sexp, options) = items.split_first()?;
            let name = name_sexp.as_symbol()?;
            let conc_name = options.iter().find_map(|option| match option.as_list() {
                Some([key, value, ..]) if key.as_symbol() == Some(":conc-name") => {
                    value.as_symbol().or_else(|| value.as_str())
                }
                _ => None,
            });
            let prefix = match conc_name {
                Some("nil") => String::new(),
                Some(prefix) => prefix.to_string(),
                None => format!("{}-", name),
            };
            Some((name_sexp, prefix))
        }
        _ => None,
    }
}

/// `(cl-defstruct NAME [DOCSTRING] SLOTS...)`
///
/// NAME is a symbol or `(NAME OPTIONS...)`. Each slot is a symbol or a list
/// headed by the slot name, and gets an accessor function.
pub fn cl_defstruct(
    interpreter: &mut Interpreter,
    context: &LoadContext,
    operator: &str,
    operands: &[Sexp],
) -> LispResult<Option<Sexp>> {
    let spec = defined_name(operator, operands)?;
    let (name, prefix) = struct_name_and_prefix(spec)
        .ok_or_else(|| LispError::InvalidSymbolName(spec.to_string()))?;
    let (docstring, slot_specs) = split_docstring(&operands[1..]);

    let slots: Vec<String> = slot_specs
        .iter()
        .filter_map(|slot| match slot {
            Sexp::Symbol(name) => Some(name.clone()),
            Sexp::List(items) => items.first().and_then(Sexp::as_symbol).map(str::to_string),
            _ => None,
        })
        .collect();

    let provenance = context.provenance();
    let env = interpreter.env_mut();
    let symbol = env.intern_sexp(name)?;
    symbol.set_provenance(Scope::Struct, provenance.clone());
    if let Some(docstring) = docstring {
        symbol.set_property(
            properties::STRUCTURE_DOCUMENTATION,
            PropertyValue::String(docstring.to_string()),
        );
    }
    symbol.set_property(properties::STRUCTURE_SLOTS, PropertyValue::List(slots.clone()));

    for slot in &slots {
        let accessor = env.define_in_scope(
            &format!("{}{}", prefix, slot),
            Scope::Function,
            provenance.clone(),
        )?;
        accessor.set_property(
            properties::FUNCTION_ARGLIST,
            PropertyValue::List(vec!["cl-x".to_string()]),
        );
    }
    Ok(None)
}
