//! Block nodes of a parsed docstring
//!
//! A docstring parses into a flat sequence of blocks. Definition list items
//! and block quotes contain nested block sequences of their own. Every block
//! records the line it starts on and where the docstring came from.

use serde::Serialize;

use super::inlines::{text_of, InlineContent};
use crate::diagnostics::{Location, SourceLocator};

/// Sequence of blocks produced from a docstring or a nested indented region
pub type BlockContent = Vec<Block>;

/// Where a block starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    /// 1-based line in the docstring
    pub line: usize,
    /// Byte offset of that line in the docstring
    pub offset: usize,
    pub source: SourceLocator,
}

impl Origin {
    pub fn location(&self) -> Location {
        self.source.at_line(self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Paragraph(Paragraph),
    DefinitionList(DefinitionList),
    BlockQuote(BlockQuote),
}

impl Block {
    pub fn node_type(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "Paragraph",
            Block::DefinitionList(_) => "DefinitionList",
            Block::BlockQuote(_) => "BlockQuote",
        }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            Block::Paragraph(paragraph) => &paragraph.origin,
            Block::DefinitionList(list) => &list.origin,
            Block::BlockQuote(quote) => &quote.origin,
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    pub fn as_definition_list(&self) -> Option<&DefinitionList> {
        match self {
            Block::DefinitionList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_block_quote(&self) -> Option<&BlockQuote> {
        match self {
            Block::BlockQuote(quote) => Some(quote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    /// The source lines of the paragraph, joined by newlines
    pub raw: String,
    pub content: InlineContent,
    pub origin: Origin,
}

impl Paragraph {
    /// Visible text after inline markup
    pub fn text(&self) -> String {
        text_of(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionList {
    pub items: Vec<DefinitionItem>,
    pub origin: Origin,
}

/// A term and its indented definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionItem {
    pub term: String,
    pub term_content: InlineContent,
    pub definition: BlockContent,
    pub origin: Origin,
}

/// An indented region that does not belong to a definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockQuote {
    pub children: BlockContent,
    pub origin: Origin,
}
