//! Docstring parsing
//!
//! Docstrings are parsed in two layers. The block layer ([`parser`]) splits
//! the text into paragraphs, definition lists and block quotes. The inline
//! layer ([`markup`]) turns the text of every paragraph and definition term
//! into [`InlineNode`]s, resolving the help mode conventions for symbol
//! references and meta-variables.

pub mod blocks;
pub mod inlines;
pub mod lines;
pub mod markup;
pub mod parser;
pub mod treeviz;

pub use blocks::{Block, BlockContent, BlockQuote, DefinitionItem, DefinitionList, Origin, Paragraph};
pub use inlines::{InlineContent, InlineNode, ReferenceInline, Role};
pub use markup::InlineMarkup;
pub use parser::{parse_docstring, DocstringParser};
