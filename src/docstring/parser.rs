//! Block structure parser for docstrings
//!
//! Docstrings follow a small line based grammar: paragraphs are separated by
//! blank lines, and a single line followed by an indented block is a term of
//! a definition list. The parser is a set of cooperating states, each a
//! function that consumes lines and returns the index of the first line it
//! did not consume:
//!
//! - `body` starts new blocks and skips blank lines.
//! - `text` decides whether a flush-left line starts a paragraph or a
//!   definition list.
//! - `definition_list` collects items for as long as the next lines form
//!   another term with an indented definition.
//! - `definition` reads one indented definition and parses it as a nested
//!   body.
//!
//! Problems never abort parsing. They are reported as warnings and the parser
//! carries on with the best interpretation of the text.

use tracing::debug;

use super::blocks::{
    Block, BlockContent, BlockQuote, DefinitionItem, DefinitionList, Origin, Paragraph,
};
use super::lines::{read_indented, split_lines, Line, LineKind, DEFAULT_TAB_WIDTH};
use super::markup::InlineMarkup;
use super::treeviz::to_treeviz_str;
use crate::diagnostics::{Diagnostic, Reporter, SourceLocator};

/// Reported when a definition list is directly followed by unindented text
pub const DEFINITION_LIST_UNINDENT: &str =
    "Definition list ends without a blank line; unexpected unindent.";

/// Reported when a paragraph is directly followed by indented text
pub const UNEXPECTED_INDENTATION: &str = "Unexpected indentation.";

/// Parses docstrings into block trees
#[derive(Clone)]
pub struct DocstringParser {
    markup: InlineMarkup,
    tab_width: usize,
    debug: bool,
}

impl DocstringParser {
    pub fn new() -> Self {
        Self {
            markup: InlineMarkup::help_mode(),
            tab_width: DEFAULT_TAB_WIDTH,
            debug: false,
        }
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn with_markup(mut self, markup: InlineMarkup) -> Self {
        self.markup = markup;
        self
    }

    /// Log every parsed tree at debug level
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Parse `text`, reporting problems to `reporter`
    pub fn parse(
        &self,
        text: &str,
        source: &SourceLocator,
        reporter: &mut dyn Reporter,
    ) -> BlockContent {
        let lines = split_lines(text, self.tab_width);
        let mut state = BlockParser {
            markup: &self.markup,
            source,
            reporter,
        };
        let blocks = state.body(&lines);
        if self.debug {
            debug!(source = %source, "Parsed docstring\n{}", to_treeviz_str(&blocks));
        }
        blocks
    }
}

impl Default for DocstringParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `text` with the default settings
pub fn parse_docstring(
    text: &str,
    source: &SourceLocator,
    reporter: &mut dyn Reporter,
) -> BlockContent {
    DocstringParser::new().parse(text, source, reporter)
}

struct BlockParser<'a> {
    markup: &'a InlineMarkup,
    source: &'a SourceLocator,
    reporter: &'a mut dyn Reporter,
}

impl BlockParser<'_> {
    fn origin(&self, line: &Line) -> Origin {
        Origin {
            line: line.number,
            offset: line.offset,
            source: self.source.clone(),
        }
    }

    fn warn(&mut self, message: &str, line: &Line) {
        let diagnostic =
            Diagnostic::warning(message).with_location(self.source.at_line(line.number));
        self.reporter.report(diagnostic);
    }

    fn paragraph(&self, lines: &[Line]) -> Block {
        let raw = lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Block::Paragraph(Paragraph {
            content: self.markup.transform(&raw),
            origin: self.origin(&lines[0]),
            raw,
        })
    }

    fn body(&mut self, lines: &[Line]) -> BlockContent {
        let mut blocks = Vec::new();
        let mut position = 0;
        while position < lines.len() {
            position = match lines[position].kind() {
                LineKind::Blank => position + 1,
                LineKind::Indented => self.block_quote(lines, position, &mut blocks),
                LineKind::Text => self.text(lines, position, &mut blocks),
            };
        }
        blocks
    }

    fn block_quote(&mut self, lines: &[Line], start: usize, blocks: &mut BlockContent) -> usize {
        let (block, next) = read_indented(lines, start);
        let children = self.body(&block.lines);
        blocks.push(Block::BlockQuote(BlockQuote {
            children,
            origin: self.origin(&lines[start]),
        }));
        next
    }

    fn text(&mut self, lines: &[Line], start: usize, blocks: &mut BlockContent) -> usize {
        match lines.get(start + 1).map(Line::kind) {
            Some(LineKind::Indented) => self.definition_list(lines, start, blocks),
            Some(LineKind::Text) => {
                let mut end = start;
                while end < lines.len() && lines[end].is_text() {
                    end += 1;
                }
                blocks.push(self.paragraph(&lines[start..end]));
                if let Some(next) = lines.get(end).filter(|line| line.is_indented()) {
                    self.warn(UNEXPECTED_INDENTATION, next);
                }
                end
            }
            Some(LineKind::Blank) | None => {
                blocks.push(self.paragraph(&lines[start..=start]));
                start + 1
            }
        }
    }

    /// A term line immediately followed by an indented line.
    ///
    /// A term without a definition ends the list; its line is left to the
    /// enclosing body.
    fn starts_definition(lines: &[Line], position: usize) -> bool {
        lines.get(position).is_some_and(Line::is_text)
            && lines.get(position + 1).is_some_and(Line::is_indented)
    }

    fn definition_list(
        &mut self,
        lines: &[Line],
        start: usize,
        blocks: &mut BlockContent,
    ) -> usize {
        let mut items = Vec::new();
        let mut position = start;
        let mut blank_finish = true;

        while Self::starts_definition(lines, position) {
            let (item, next, finish) = self.definition(lines, position);
            items.push(item);
            blank_finish = finish;
            position = next;
        }

        blocks.push(Block::DefinitionList(DefinitionList {
            items,
            origin: self.origin(&lines[start]),
        }));

        if !blank_finish {
            if let Some(line) = lines.get(position) {
                self.warn(DEFINITION_LIST_UNINDENT, line);
            }
        }
        position
    }

    fn definition(&mut self, lines: &[Line], term_index: usize) -> (DefinitionItem, usize, bool) {
        let term_line = &lines[term_index];
        let (block, next) = read_indented(lines, term_index + 1);
        let definition = self.body(&block.lines);
        let term = term_line.text.trim().to_string();
        let item = DefinitionItem {
            term_content: self.markup.transform(&term),
            term,
            definition,
            origin: self.origin(term_line),
        };
        (item, next, block.blank_finish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::docstring::inlines::{InlineNode, ReferenceInline, Role};

    fn parse(text: &str) -> (BlockContent, Vec<Diagnostic>) {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let blocks = parse_docstring(text, &SourceLocator::for_symbol("foo"), &mut diagnostics);
        (blocks, diagnostics)
    }

    #[test]
    fn test_paragraphs() {
        let (blocks, diagnostics) = parse("Do foo.\n\nMore about\nfoo.");
        assert!(diagnostics.is_empty());
        assert_eq!(blocks.len(), 2);
        let second = blocks[1].as_paragraph().unwrap();
        assert_eq!(second.raw, "More about\nfoo.");
        assert_eq!(second.origin.line, 3);
        assert_eq!(second.origin.offset, 9);
        assert_eq!(second.origin.source.symbol.as_deref(), Some("foo"));
    }

    #[test]
    fn test_paragraph_content_is_transformed() {
        let (blocks, _) = parse("See `foo'.");
        assert_eq!(
            blocks[0].as_paragraph().unwrap().content,
            vec![
                InlineNode::plain("See "),
                InlineNode::Reference(ReferenceInline::new(Role::Symbol, "foo")),
                InlineNode::plain("."),
            ]
        );
    }

    #[test]
    fn test_definition_list() {
        let (blocks, diagnostics) = parse(
            "Options:\n\n`first'\n    The first.\n\nsecond\n    The second.\n\n    Really.\n",
        );
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(blocks.len(), 2);

        let list = blocks[1].as_definition_list().unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].term, "`first'");
        assert_eq!(
            list.items[0].term_content,
            vec![InlineNode::Reference(ReferenceInline::new(Role::Symbol, "first"))]
        );
        assert_eq!(list.items[0].origin.line, 3);
        assert_eq!(list.items[1].definition.len(), 2);
        assert_eq!(
            list.items[1].definition[1].as_paragraph().unwrap().raw,
            "Really."
        );
    }

    #[test]
    fn test_definition_list_without_blank_finish_warns_once() {
        let (blocks, diagnostics) = parse("term\n    Definition.\nUnindented text.");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].as_definition_list().is_some());
        assert_eq!(blocks[1].as_paragraph().unwrap().raw, "Unindented text.");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].message, DEFINITION_LIST_UNINDENT);
        assert_eq!(diagnostics[0].location.as_ref().unwrap().line, Some(3));
    }

    #[test]
    fn test_adjacent_items_without_blank_lines() {
        let (blocks, diagnostics) = parse("one\n  First.\ntwo\n  Second.");
        assert!(diagnostics.is_empty());
        let list = blocks[0].as_definition_list().unwrap();
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_term_without_definition_ends_the_list() {
        let (blocks, diagnostics) = parse("one\n  First.\n\ndangling");
        assert!(diagnostics.is_empty());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].as_definition_list().unwrap().items.len(), 1);
        assert_eq!(blocks[1].as_paragraph().unwrap().raw, "dangling");
    }

    #[test]
    fn test_nested_definition_lists() {
        let (blocks, _) = parse("outer\n    inner\n        Deep.\n");
        let outer = blocks[0].as_definition_list().unwrap();
        let inner = outer.items[0].definition[0].as_definition_list().unwrap();
        assert_eq!(inner.items[0].term, "inner");
        assert_eq!(inner.items[0].origin.line, 2);
        assert_eq!(
            inner.items[0].definition[0].as_paragraph().unwrap().origin.line,
            3
        );
    }

    #[test]
    fn test_unexpected_indentation() {
        let (blocks, diagnostics) = parse("First line\nsecond line\n    indented");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].as_block_quote().is_some());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, UNEXPECTED_INDENTATION);
    }

    #[test]
    fn test_block_quote_after_blank_line() {
        let (blocks, diagnostics) = parse("Example:\n\n    (foo-mode 1)\n");
        assert!(diagnostics.is_empty());
        let quote = blocks[1].as_block_quote().unwrap();
        assert_eq!(quote.children[0].as_paragraph().unwrap().raw, "(foo-mode 1)");
        assert_eq!(quote.origin.line, 3);
    }

    #[test]
    fn test_tabs_are_expanded() {
        let (blocks, _) = parse("term\n\tTabbed definition.");
        let list = blocks[0].as_definition_list().unwrap();
        assert_eq!(
            list.items[0].definition[0].as_paragraph().unwrap().raw,
            "Tabbed definition."
        );
    }

    #[test]
    fn test_empty_docstring() {
        let (blocks, diagnostics) = parse("");
        assert!(blocks.is_empty());
        assert!(diagnostics.is_empty());
    }
}
