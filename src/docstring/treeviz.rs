//! Treeviz formatter for docstring block trees

use super::blocks::{Block, DefinitionItem};
use super::inlines::{text_of, InlineContent, InlineNode};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Summary of the inline nodes in `content` that carry markup
fn inline_summary(content: &InlineContent) -> String {
    content
        .iter()
        .filter_map(|node| match node {
            InlineNode::Plain(_) => None,
            InlineNode::Emphasis(text) => Some(format!("*{}*", text)),
            InlineNode::Reference(reference) => {
                Some(format!("{}:{}", reference.role, reference.target))
            }
            InlineNode::Literal(children) => Some(format!("code:{}", text_of(children))),
            InlineNode::MetaVariable(name) => Some(format!("metavar:{}", name)),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn to_treeviz_str(blocks: &[Block]) -> String {
    let mut result = String::new();
    append_blocks(&mut result, blocks, "");
    result
}

fn append_blocks(result: &mut String, blocks: &[Block], prefix: &str) {
    for (i, block) in blocks.iter().enumerate() {
        let is_last = i == blocks.len() - 1;
        append_block(result, block, prefix, is_last);
    }
}

fn append_block(result: &mut String, block: &Block, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });

    match block {
        Block::Paragraph(paragraph) => {
            result.push_str(&format!(
                "{}{} {}@{}: {}\n",
                prefix,
                connector,
                block.node_type(),
                paragraph.origin.line,
                truncate(&one_line(&paragraph.raw), 30)
            ));
            let summary = inline_summary(&paragraph.content);
            if !summary.is_empty() {
                result.push_str(&format!("{}└─ [{}]\n", new_prefix, summary));
            }
        }
        Block::DefinitionList(list) => {
            result.push_str(&format!(
                "{}{} {}@{}: {} items\n",
                prefix,
                connector,
                block.node_type(),
                list.origin.line,
                list.items.len()
            ));
            append_items(result, &list.items, &new_prefix);
        }
        Block::BlockQuote(quote) => {
            result.push_str(&format!(
                "{}{} {}@{}\n",
                prefix,
                connector,
                block.node_type(),
                quote.origin.line
            ));
            append_blocks(result, &quote.children, &new_prefix);
        }
    }
}

fn append_items(result: &mut String, items: &[DefinitionItem], prefix: &str) {
    for (i, item) in items.iter().enumerate() {
        let is_last = i == items.len() - 1;
        let connector = if is_last { "└─" } else { "├─" };
        result.push_str(&format!(
            "{}{} Term@{}: {}\n",
            prefix,
            connector,
            item.origin.line,
            truncate(&item.term, 30)
        ));

        let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        append_blocks(result, &item.definition, &new_prefix);
    }
}
