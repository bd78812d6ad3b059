//! Info manual references
//!
//! Docstrings refer to Info nodes as `(manual)node`, e.g. `(elisp)Hooks`. A
//! target parses into an [`InfoTarget`], which knows the title Info itself
//! would show and, for the manuals published on the web, the matching URL.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

use crate::docstring::{ReferenceInline, Role};

static INFO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((?P<manual>.+)\)(?P<node>.+?)$").expect("valid info pattern"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Manuals with a web version, and the URL template of their nodes
const MANUAL_URLS: &[(&str, &str)] = &[
    (
        "emacs",
        "http://www.gnu.org/software/emacs/manual/html_node/emacs/{node}.html#{node}",
    ),
    (
        "elisp",
        "http://www.gnu.org/software/emacs/manual/html_node/elisp/{node}.html#{node}",
    ),
    (
        "cl",
        "http://www.gnu.org/software/emacs/manual/html_node/cl/{node}.html#{node}",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfoTargetError {
    #[error("Invalid info target: {0}")]
    Invalid(String),
    #[error("Cannot resolve info manual {0}")]
    UnknownManual(String),
}

/// A node in an Info manual
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoTarget {
    pub manual: String,
    pub node: String,
}

impl InfoTarget {
    /// Parse a `(manual)node` target; runs of whitespace count as one space
    pub fn parse(target: &str) -> Result<Self, InfoTargetError> {
        let target = normalize_whitespace(target);
        let captures = INFO_PATTERN
            .captures(&target)
            .ok_or_else(|| InfoTargetError::Invalid(target.clone()))?;
        Ok(Self {
            manual: captures["manual"].to_string(),
            node: captures["node"].to_string(),
        })
    }

    /// Title in the style of Info, e.g. `Hooks(elisp)`
    pub fn title(&self) -> String {
        format!("{}({})", self.node, self.manual)
    }

    /// Web URL of the node
    pub fn url(&self) -> Result<String, InfoTargetError> {
        let template = MANUAL_URLS
            .iter()
            .find(|(manual, _)| *manual == self.manual)
            .map(|(_, template)| *template)
            .ok_or_else(|| InfoTargetError::UnknownManual(self.manual.clone()))?;
        Ok(template.replace("{node}", &self.node.replace(' ', "-")))
    }
}

impl fmt::Display for InfoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.manual, self.node)
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

/// Build an Info reference as a role would.
///
/// Without an explicit title the text becomes the Info style title of the
/// target. Invalid targets keep the target as text.
pub fn info_reference(target: &str, explicit_title: Option<&str>) -> ReferenceInline {
    let target = normalize_whitespace(target);
    let reference = ReferenceInline::new(Role::Info, target.clone());
    match explicit_title {
        Some(title) => reference.with_text(title),
        None => match InfoTarget::parse(&target) {
            Ok(info) => reference.with_text(info.title()),
            Err(_) => reference,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_title() {
        let target = InfoTarget::parse("(elisp)Hooks").unwrap();
        assert_eq!(target.manual, "elisp");
        assert_eq!(target.node, "Hooks");
        assert_eq!(target.title(), "Hooks(elisp)");
        assert_eq!(target.to_string(), "(elisp)Hooks");
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let target = InfoTarget::parse("(emacs)Init\n   File").unwrap();
        assert_eq!(target.node, "Init File");
    }

    #[test]
    fn test_url_replaces_spaces() {
        let target = InfoTarget::parse("(emacs)Init File").unwrap();
        assert_eq!(
            target.url().unwrap(),
            "http://www.gnu.org/software/emacs/manual/html_node/emacs/Init-File.html#Init-File"
        );
    }

    #[test]
    fn test_invalid_target() {
        assert_eq!(
            InfoTarget::parse("Hooks"),
            Err(InfoTargetError::Invalid("Hooks".to_string()))
        );
    }

    #[test]
    fn test_unknown_manual() {
        let target = InfoTarget::parse("(magit)Staging").unwrap();
        let error = target.url().unwrap_err();
        assert_eq!(error, InfoTargetError::UnknownManual("magit".to_string()));
        assert_eq!(error.to_string(), "Cannot resolve info manual magit");
    }

    #[test]
    fn test_info_reference_titles() {
        let reference = info_reference("(cl)Structures", None);
        assert_eq!(reference.target, "(cl)Structures");
        assert_eq!(reference.display_text(), "Structures(cl)");

        let explicit = info_reference("(cl)Structures", Some("CL structures"));
        assert_eq!(explicit.display_text(), "CL structures");

        let invalid = info_reference("Structures", None);
        assert_eq!(invalid.text, None);
    }
}
