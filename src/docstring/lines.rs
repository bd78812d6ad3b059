//! Line handling for docstrings
//!
//! The block parser works on whole lines. Tabs are expanded and trailing
//! whitespace is dropped up front, so classification only has to look at the
//! first character of a line.

/// Tab stops used by Emacs when none are configured
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// One line of a docstring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the docstring
    pub number: usize,
    /// Byte offset of the line start in the docstring
    pub offset: usize,
    /// Line content with tabs expanded and trailing whitespace removed
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Indented,
    Text,
}

impl Line {
    pub fn kind(&self) -> LineKind {
        if self.text.is_empty() {
            LineKind::Blank
        } else if self.text.starts_with(' ') {
            LineKind::Indented
        } else {
            LineKind::Text
        }
    }

    pub fn is_blank(&self) -> bool {
        self.kind() == LineKind::Blank
    }

    pub fn is_indented(&self) -> bool {
        self.kind() == LineKind::Indented
    }

    pub fn is_text(&self) -> bool {
        self.kind() == LineKind::Text
    }

    pub fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }
}

/// Replace tabs by spaces up to the next multiple of `tab_width`
pub fn expand_tabs(text: &str, tab_width: usize) -> String {
    let tab_width = tab_width.max(1);
    let mut result = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let spaces = tab_width - column % tab_width;
            result.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            result.push(ch);
            column += 1;
        }
    }
    result
}

/// Split a docstring into normalized lines
pub fn split_lines(text: &str, tab_width: usize) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for (index, raw) in text.split('\n').enumerate() {
        lines.push(Line {
            number: index + 1,
            offset,
            text: expand_tabs(raw, tab_width).trim_end().to_string(),
        });
        offset += raw.len() + 1;
    }
    // A trailing newline does not start another line
    if text.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// A run of indented lines, as found after a definition term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentedBlock {
    /// The lines with their common indentation removed
    pub lines: Vec<Line>,
    /// Whether the block was followed by a blank line or the end of input
    pub blank_finish: bool,
}

/// Read the indented block starting at `start`.
///
/// The block runs up to the next line that is neither blank nor indented.
/// Trailing blank lines are consumed but not part of the block. Returns the
/// block and the index of the first line after it.
pub fn read_indented(lines: &[Line], start: usize) -> (IndentedBlock, usize) {
    let mut end = start;
    while end < lines.len() && !lines[end].is_text() {
        end += 1;
    }

    let blank_finish = end == lines.len() || (end > start && lines[end - 1].is_blank());

    let mut last = end;
    while last > start && lines[last - 1].is_blank() {
        last -= 1;
    }

    let block = IndentedBlock {
        lines: dedent(&lines[start..last]),
        blank_finish,
    };
    (block, end)
}

/// Remove the indentation common to all non-blank lines
pub fn dedent(lines: &[Line]) -> Vec<Line> {
    let common = lines
        .iter()
        .filter(|line| !line.is_blank())
        .map(Line::indent)
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| Line {
            number: line.number,
            offset: line.offset,
            text: line.text.get(common..).unwrap_or_default().to_string(),
        })
        .collect()
}
