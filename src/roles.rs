//! Roles for hand-written documentation
//!
//! Besides the markup found in docstrings, documentation written by hand
//! refers to meta-variables, code with embedded meta-variables, Info nodes and
//! slots of CL structures. The functions here build the inline nodes for these
//! roles and resolve slot names against the structure being documented.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::docstring::{InlineContent, InlineNode, ReferenceInline, Role};
use crate::info::info_reference;
use crate::lisp::{LispError, LispResult};

/// `{name}` segments in code
static BRACED_METAVAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("valid braced meta-variable pattern"));

/// A meta-variable
pub fn metavariable(text: &str) -> InlineNode {
    InlineNode::MetaVariable(text.to_string())
}

/// A code literal in which every `{name}` is a meta-variable
pub fn varcode(text: &str) -> InlineNode {
    let mut children: InlineContent = Vec::new();
    let mut position = 0;
    for captures in BRACED_METAVAR.captures_iter(text) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if whole.start() > position {
            children.push(InlineNode::plain(&text[position..whole.start()]));
        }
        children.push(metavariable(name.as_str()));
        position = whole.end();
    }
    if position < text.len() {
        children.push(InlineNode::plain(&text[position..]));
    }
    InlineNode::Literal(children)
}

/// Reference to an Info node, titled like Info does unless a title is given
pub fn infonode(target: &str, explicit_title: Option<&str>) -> InlineNode {
    InlineNode::Reference(info_reference(target, explicit_title))
}

/// The accessor name of `slot` in the structure currently being documented
pub fn resolve_slot_name(current_struct: Option<&str>, slot: &str) -> LispResult<String> {
    let structure = current_struct
        .ok_or_else(|| LispError::MalformedDefinitionSite("Missing containing structure".into()))?;
    Ok(format!("{}-{}", structure, slot))
}

/// A resolved slot reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotReference {
    pub title: String,
    pub target: String,
}

impl SlotReference {
    pub fn to_inline(&self) -> InlineNode {
        InlineNode::Reference(
            ReferenceInline::new(Role::Function, self.target.clone()).with_text(self.title.clone()),
        )
    }
}

/// Resolve a reference to a CL slot.
///
/// The target is either a bare slot, resolved against `current_struct`, or
/// `struct slot`, which names the accessor `struct-slot`. A leading `~`, or a
/// structure equal to the current one, shortens the title to the slot name
/// unless the title was given explicitly.
pub fn resolve_slot_reference(
    current_struct: Option<&str>,
    title: &str,
    target: &str,
    explicit_title: bool,
) -> SlotReference {
    let omit_struct = target.starts_with('~');
    let target = target.trim_start_matches('~');

    match target.split_once(' ') {
        Some((structure, slot)) => {
            let title = if !explicit_title && (omit_struct || current_struct == Some(structure)) {
                slot.to_string()
            } else {
                title.to_string()
            };
            SlotReference {
                title,
                target: format!("{}-{}", structure, slot),
            }
        }
        None => {
            let target = match current_struct {
                Some(structure) => format!("{}-{}", structure, target),
                None => target.to_string(),
            };
            SlotReference {
                title: title.to_string(),
                target,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_varcode_splits_braces() {
        assert_eq!(
            varcode("(setq {var} {value})"),
            InlineNode::Literal(vec![
                InlineNode::plain("(setq "),
                metavariable("var"),
                InlineNode::plain(" "),
                metavariable("value"),
                InlineNode::plain(")"),
            ])
        );
    }

    #[test]
    fn test_varcode_without_metavariables() {
        assert_eq!(
            varcode("(foo)"),
            InlineNode::Literal(vec![InlineNode::plain("(foo)")])
        );
        assert_eq!(varcode("{x}"), InlineNode::Literal(vec![metavariable("x")]));
    }

    #[test]
    fn test_infonode_title() {
        assert_eq!(infonode("(elisp)Hooks", None).text(), "Hooks(elisp)");
    }

    #[test]
    fn test_resolve_slot_name() {
        assert_eq!(
            resolve_slot_name(Some("point"), "x").unwrap(),
            "point-x".to_string()
        );
        assert!(matches!(
            resolve_slot_name(None, "x"),
            Err(LispError::MalformedDefinitionSite(message)) if message == "Missing containing structure"
        ));
    }

    #[rstest]
    #[case(None, "x", "x", false, "x", "x")]
    #[case(Some("point"), "x", "x", false, "x", "point-x")]
    #[case(None, "point x", "point x", false, "point x", "point-x")]
    #[case(Some("point"), "point x", "point x", false, "x", "point-x")]
    #[case(Some("line"), "point x", "point x", false, "point x", "point-x")]
    #[case(None, "~point x", "~point x", false, "x", "point-x")]
    #[case(None, "X coordinate", "~point x", true, "X coordinate", "point-x")]
    fn test_resolve_slot_reference(
        #[case] current: Option<&str>,
        #[case] title: &str,
        #[case] target: &str,
        #[case] explicit: bool,
        #[case] expected_title: &str,
        #[case] expected_target: &str,
    ) {
        let reference = resolve_slot_reference(current, title, target, explicit);
        assert_eq!(reference.title, expected_title);
        assert_eq!(reference.target, expected_target);
    }

    #[test]
    fn test_slot_reference_inline() {
        let node = resolve_slot_reference(Some("point"), "x", "x", false).to_inline();
        let reference = node.as_reference().unwrap();
        assert_eq!(reference.role, Role::Function);
        assert_eq!(reference.target, "point-x");
        assert_eq!(reference.display_text(), "x");
    }
}
