//! Fluent assertions over parsed docstrings
//!
//! Matching on nested block enums by hand gets long quickly. [`assert_blocks`]
//! walks a block tree with closures instead, and every failure message names
//! the path to the offending node, e.g. `items[1]:definition[0]:items[0]`.
//!
//! ```rust-example
//! assert_blocks(&blocks)
//!     .item_count(2)
//!     .item(0, |item| {
//!         item.assert_paragraph()
//!             .text("Toggle foo mode.")
//!             .has_reference(Role::Symbol, "foo-mode");
//!     })
//!     .item(1, |item| {
//!         item.assert_definition_list().item(0, |def| {
//!             def.term("ARG").definition(|body| {
//!                 body.item_count(1);
//!             });
//!         });
//!     });
//! ```

use crate::docstring::inlines::text_of;
use crate::docstring::{Block, DefinitionItem, DefinitionList, InlineNode, Paragraph, Role};

/// Start asserting on a sequence of blocks
pub fn assert_blocks(blocks: &[Block]) -> BlocksAssertion<'_> {
    BlocksAssertion {
        blocks,
        context: "items".to_string(),
    }
}

fn summarize_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::node_type)
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct BlocksAssertion<'a> {
    blocks: &'a [Block],
    context: String,
}

impl<'a> BlocksAssertion<'a> {
    pub fn item_count(self, expected: usize) -> Self {
        let actual = self.blocks.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} blocks, found {} blocks: [{}]",
            self.context,
            expected,
            actual,
            summarize_blocks(self.blocks)
        );
        self
    }

    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>),
    {
        assert!(
            index < self.blocks.len(),
            "{}: Item index {} out of bounds ({} blocks)",
            self.context,
            index,
            self.blocks.len()
        );
        assertion(BlockAssertion {
            block: &self.blocks[index],
            context: format!("{}[{}]", self.context, index),
        });
        self
    }
}

pub struct BlockAssertion<'a> {
    block: &'a Block,
    context: String,
}

impl<'a> BlockAssertion<'a> {
    /// Assert the block starts on `line` of the docstring
    pub fn line(self, expected: usize) -> Self {
        let actual = self.block.origin().line;
        assert_eq!(
            actual, expected,
            "{}: Expected block at line {}, found line {}",
            self.context, expected, actual
        );
        self
    }

    pub fn assert_paragraph(self) -> ParagraphAssertion<'a> {
        match self.block {
            Block::Paragraph(paragraph) => ParagraphAssertion {
                paragraph,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Paragraph, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    pub fn assert_definition_list(self) -> DefinitionListAssertion<'a> {
        match self.block {
            Block::DefinitionList(list) => DefinitionListAssertion {
                list,
                context: self.context,
            },
            other => panic!(
                "{}: Expected DefinitionList, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    /// Assert the block is a block quote and continue with its children
    pub fn assert_block_quote(self) -> BlocksAssertion<'a> {
        match self.block {
            Block::BlockQuote(quote) => BlocksAssertion {
                blocks: &quote.children,
                context: format!("{}:quote", self.context),
            },
            other => panic!(
                "{}: Expected BlockQuote, found {}",
                self.context,
                other.node_type()
            ),
        }
    }
}

pub struct ParagraphAssertion<'a> {
    paragraph: &'a Paragraph,
    context: String,
}

impl<'a> ParagraphAssertion<'a> {
    /// Assert the visible text after inline markup
    pub fn text(self, expected: &str) -> Self {
        let actual = self.paragraph.text();
        assert_eq!(
            actual, expected,
            "{}: Expected paragraph text {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    /// Assert the source text of the paragraph
    pub fn raw(self, expected: &str) -> Self {
        assert_eq!(
            self.paragraph.raw, expected,
            "{}: Expected raw text {:?}, found {:?}",
            self.context, expected, self.paragraph.raw
        );
        self
    }

    pub fn text_contains(self, substring: &str) -> Self {
        let actual = self.paragraph.text();
        assert!(
            actual.contains(substring),
            "{}: Expected paragraph text to contain {:?}, found {:?}",
            self.context,
            substring,
            actual
        );
        self
    }

    pub fn inline_count(self, expected: usize) -> Self {
        let actual = self.paragraph.content.len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} inline nodes, found {}: {:?}",
            self.context, expected, actual, self.paragraph.content
        );
        self
    }

    pub fn inline<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(InlineAssertion<'a>),
    {
        let content = &self.paragraph.content;
        assert!(
            index < content.len(),
            "{}: Inline index {} out of bounds ({} nodes)",
            self.context,
            index,
            content.len()
        );
        assertion(InlineAssertion {
            node: &content[index],
            context: format!("{}:inlines[{}]", self.context, index),
        });
        self
    }

    /// Assert some inline node references `target` with `role`
    pub fn has_reference(self, role: Role, target: &str) -> Self {
        let found = self.paragraph.content.iter().any(|node| {
            node.as_reference()
                .is_some_and(|reference| reference.role == role && reference.target == target)
        });
        assert!(
            found,
            "{}: Expected a {} reference to {:?} in {:?}",
            self.context, role, target, self.paragraph.content
        );
        self
    }

    /// Assert some inline node, possibly inside a literal, is the meta-variable `name`
    pub fn has_metavariable(self, name: &str) -> Self {
        fn contains(nodes: &[InlineNode], name: &str) -> bool {
            nodes.iter().any(|node| match node {
                InlineNode::MetaVariable(found) => found == name,
                InlineNode::Literal(children) => contains(children, name),
                _ => false,
            })
        }
        assert!(
            contains(&self.paragraph.content, name),
            "{}: Expected meta-variable {} in {:?}",
            self.context,
            name,
            self.paragraph.content
        );
        self
    }
}

pub struct DefinitionListAssertion<'a> {
    list: &'a DefinitionList,
    context: String,
}

impl<'a> DefinitionListAssertion<'a> {
    pub fn item_count(self, expected: usize) -> Self {
        let actual = self.list.items.len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} definitions, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(DefinitionItemAssertion<'a>),
    {
        assert!(
            index < self.list.items.len(),
            "{}: Definition index {} out of bounds ({} definitions)",
            self.context,
            index,
            self.list.items.len()
        );
        assertion(DefinitionItemAssertion {
            item: &self.list.items[index],
            context: format!("{}:items[{}]", self.context, index),
        });
        self
    }
}

pub struct DefinitionItemAssertion<'a> {
    item: &'a DefinitionItem,
    context: String,
}

impl<'a> DefinitionItemAssertion<'a> {
    pub fn term(self, expected: &str) -> Self {
        assert_eq!(
            self.item.term, expected,
            "{}: Expected term {:?}, found {:?}",
            self.context, expected, self.item.term
        );
        self
    }

    /// Assert the visible text of the term after inline markup
    pub fn term_text(self, expected: &str) -> Self {
        let actual = text_of(&self.item.term_content);
        assert_eq!(
            actual, expected,
            "{}: Expected term text {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    pub fn line(self, expected: usize) -> Self {
        assert_eq!(
            self.item.origin.line, expected,
            "{}: Expected term at line {}, found line {}",
            self.context, expected, self.item.origin.line
        );
        self
    }

    pub fn definition<F>(self, assertion: F) -> Self
    where
        F: FnOnce(BlocksAssertion<'a>),
    {
        assertion(BlocksAssertion {
            blocks: &self.item.definition,
            context: format!("{}:definition", self.context),
        });
        self
    }
}

pub struct InlineAssertion<'a> {
    node: &'a InlineNode,
    context: String,
}

impl<'a> InlineAssertion<'a> {
    pub fn plain(self, expected: &str) -> Self {
        match self.node {
            InlineNode::Plain(text) => assert_eq!(
                text, expected,
                "{}: Expected plain text {:?}, found {:?}",
                self.context, expected, text
            ),
            other => panic!("{}: Expected plain text, found {:?}", self.context, other),
        }
        self
    }

    pub fn emphasis(self, expected: &str) -> Self {
        match self.node {
            InlineNode::Emphasis(text) => assert_eq!(
                text, expected,
                "{}: Expected emphasis {:?}, found {:?}",
                self.context, expected, text
            ),
            other => panic!("{}: Expected emphasis, found {:?}", self.context, other),
        }
        self
    }

    pub fn reference(self, role: Role, target: &str) -> Self {
        match self.node {
            InlineNode::Reference(reference) => {
                assert_eq!(
                    reference.role, role,
                    "{}: Expected {} reference, found {}",
                    self.context, role, reference.role
                );
                assert_eq!(
                    reference.target, target,
                    "{}: Expected reference to {:?}, found {:?}",
                    self.context, target, reference.target
                );
            }
            other => panic!("{}: Expected reference, found {:?}", self.context, other),
        }
        self
    }

    /// Assert a code literal with the given visible text
    pub fn literal(self, expected: &str) -> Self {
        match self.node {
            InlineNode::Literal(children) => {
                let actual = text_of(children);
                assert_eq!(
                    actual, expected,
                    "{}: Expected literal {:?}, found {:?}",
                    self.context, expected, actual
                );
            }
            other => panic!("{}: Expected literal, found {:?}", self.context, other),
        }
        self
    }

    pub fn metavariable(self, expected: &str) -> Self {
        match self.node {
            InlineNode::MetaVariable(name) => assert_eq!(
                name, expected,
                "{}: Expected meta-variable {}, found {}",
                self.context, expected, name
            ),
            other => panic!("{}: Expected meta-variable, found {:?}", self.context, other),
        }
        self
    }
}
