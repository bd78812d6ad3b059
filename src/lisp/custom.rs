//! Property lists and the keywords of `defcustom`-style definitions

use std::collections::BTreeMap;
use tracing::debug;

use super::sexp::Sexp;
use super::symbol::{properties, PropertyValue};

/// Split an alternating key/value sequence into pairs.
///
/// Keys must be symbols; a pair whose key is anything else is skipped, as is
/// a trailing key without a value.
pub fn parse_plist(items: &[Sexp]) -> Vec<(&str, &Sexp)> {
    items
        .chunks_exact(2)
        .filter_map(|pair| match pair[0].as_symbol() {
            Some(key) => Some((key, &pair[1])),
            None => {
                debug!(key = %pair[0], "Skipping plist entry with non-symbol key");
                None
            }
        })
        .collect()
}

/// Parse a `:package-version` value of the form `'(package . "version")`
pub fn parse_package_version(sexp: &Sexp) -> Option<(String, String)> {
    let (car, cdr) = sexp.unquote()?.as_cons_cell()?;
    let package = car.as_symbol()?;
    let version = cdr.as_str()?;
    Some((package.to_string(), version.to_string()))
}

/// Derive symbol properties from the keywords of a variable or face definition.
///
/// Recognized keywords are `:safe` (a quoted predicate symbol), `:risky` (any
/// true value) and `:package-version`. Everything else is ignored.
pub fn parse_custom_keywords(items: &[Sexp]) -> BTreeMap<&'static str, PropertyValue> {
    let mut result = BTreeMap::new();

    for (key, value) in parse_plist(items) {
        match key {
            ":safe" => match value.quoted_symbol() {
                Some(predicate) => {
                    result.insert(
                        properties::SAFE_LOCAL_VARIABLE,
                        PropertyValue::Symbol(predicate.to_string()),
                    );
                }
                None => debug!(%value, "Ignoring :safe without a quoted predicate"),
            },
            ":risky" => {
                if value.is_truthy() {
                    result.insert(properties::RISKY_LOCAL_VARIABLE, PropertyValue::Bool(true));
                }
            }
            ":package-version" => match parse_package_version(value) {
                Some((package, version)) => {
                    result.insert(
                        properties::CUSTOM_PACKAGE_VERSION,
                        PropertyValue::Version { package, version },
                    );
                }
                None => debug!(%value, "Ignoring malformed :package-version"),
            },
            other => debug!(key = other, "Ignoring plist key"),
        }
    }

    result
}
