//! Help mode markup inside parsed docstrings, and the hand-written roles

use elisp_autodoc::diagnostics::{Diagnostic, SourceLocator};
use elisp_autodoc::docstring::inlines::text_of;
use elisp_autodoc::docstring::markup::BranchHandler;
use elisp_autodoc::docstring::{BlockContent, DocstringParser, InlineMarkup, InlineNode, Role};
use elisp_autodoc::info::InfoTarget;
use elisp_autodoc::roles::{resolve_slot_reference, varcode};
use elisp_autodoc::testing::assert_blocks;
use regex::{Captures, Regex};
use rstest::rstest;

fn parse_with(parser: &DocstringParser, text: &str) -> BlockContent {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let blocks = parser.parse(text, &SourceLocator::default(), &mut diagnostics);
    assert!(diagnostics.is_empty(), "unexpected diagnostics {:?}", diagnostics);
    blocks
}

#[rstest]
#[case("Run the command `foo-run'.", Role::Command, "foo-run")]
#[case("See function `foo-bar' for details.", Role::Function, "foo-bar")]
#[case("Customize the option `foo-enabled'.", Role::Option, "foo-enabled")]
#[case("The variable `foo-state' holds it.", Role::Variable, "foo-state")]
#[case("Shown in face `foo-face'.", Role::Face, "foo-face")]
#[case("Read Info node `(emacs)Init File'.", Role::Info, "(emacs)Init File")]
#[case("Visit URL `https://www.gnu.org/software/emacs/'.", Role::Url, "https://www.gnu.org/software/emacs/")]
#[case("The symbol `foo' is special.", Role::QuotedSymbol, "foo")]
#[case("Bind `foo-map' first.", Role::Symbol, "foo-map")]
fn test_reference_in_paragraph(#[case] text: &str, #[case] role: Role, #[case] target: &str) {
    let blocks = parse_with(&DocstringParser::default(), text);
    assert_blocks(&blocks).item_count(1).item(0, |item| {
        item.assert_paragraph().has_reference(role, target);
    });
}

#[test]
fn test_metavariables_in_terms_and_code() {
    let blocks = parse_with(
        &DocstringParser::default(),
        "Call `(foo-apply FUNCTION LIST)' on BUFFER.",
    );
    assert_blocks(&blocks).item(0, |item| {
        item.assert_paragraph()
            .has_metavariable("FUNCTION")
            .has_metavariable("LIST")
            .has_metavariable("BUFFER")
            .text("Call (foo-apply function list) on buffer.")
            .inline(1, |node| {
                node.literal("(foo-apply function list)");
            })
            .inline(3, |node| {
                node.metavariable("BUFFER");
            });
    });
}

fn shout(_captures: &Captures<'_>, value: &str) -> Vec<InlineNode> {
    vec![InlineNode::Emphasis(value.to_uppercase())]
}

#[test]
fn test_custom_markup() {
    let markup = InlineMarkup::new(
        Regex::new(r"!(?P<shout>\w+)!").unwrap(),
        vec![("shout", shout as BranchHandler)],
    );
    let parser = DocstringParser::new().with_markup(markup);
    let blocks = parse_with(&parser, "Say !hello! and `ignore' quotes.");
    assert_blocks(&blocks).item(0, |item| {
        item.assert_paragraph()
            .inline_count(3)
            .inline(0, |node| {
                node.plain("Say ");
            })
            .inline(1, |node| {
                node.emphasis("HELLO");
            })
            .inline(2, |node| {
                node.plain(" and `ignore' quotes.");
            });
    });
}

#[test]
fn test_info_target_urls() {
    let target = InfoTarget::parse("(elisp)Hooks").unwrap();
    assert_eq!(
        target.url().unwrap(),
        "http://www.gnu.org/software/emacs/manual/html_node/elisp/Hooks.html#Hooks"
    );
}

#[test]
fn test_roles_for_hand_written_text() {
    let node = varcode("(foo-set {name} {value})");
    assert_eq!(node.text(), "(foo-set name value)");
    if let InlineNode::Literal(children) = &node {
        assert_eq!(text_of(children), "(foo-set name value)");
        assert_eq!(children.len(), 5);
    } else {
        panic!("varcode must produce a literal, got {:?}", node);
    }

    let slot = resolve_slot_reference(Some("greet-card"), "recipient", "recipient", false);
    assert_eq!(slot.target, "greet-card-recipient");
    assert_eq!(slot.title, "recipient");
}
