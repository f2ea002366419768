//! List continuation on Enter and list re-indentation on Tab.
//!
//! Both hooks fall back to plain editor behaviour when the line is not a
//! list item. The fallback for Enter is passed in explicitly so hosts with
//! their own auto-indent can keep it.

use markdown_wrap_syntax::{ListMarker, Token};

use crate::editing::key_history::KeyHistory;
use crate::editing::ordered_list::{ordered_list_number, reset_ordinal};
use crate::editing::{Edit, NewSelection, SelectionRange};
use crate::text::{LineIndex, Position, char_len, leading_whitespace};

/// Signature of the non-list indent rule.
pub type IndentFn = fn(&str) -> String;

/// Plain auto-indent: the new line keeps the previous line's indentation.
pub fn default_indent(line: &str) -> String {
    leading_whitespace(line).to_string()
}

/// Prefixes that turn a new line into a fresh checkbox item.
const CHECKBOX_PREFIXES: [&str; 3] = ["- [ ] ", "- [x] ", "- [X] "];

/// Enter and Tab behaviour for markdown lists.
#[derive(Debug, Clone)]
pub struct ListContinuation<F = IndentFn> {
    fallback: F,
    indent_unit: String,
}

impl Default for ListContinuation {
    fn default() -> Self {
        Self::with_fallback(default_indent)
    }
}

impl ListContinuation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F> ListContinuation<F>
where
    F: Fn(&str) -> String,
{
    pub fn with_fallback(fallback: F) -> Self {
        Self {
            fallback,
            indent_unit: "\t".to_string(),
        }
    }

    /// Sets the string one Tab press inserts.
    pub fn with_indent_unit(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    /// What a new line opened after `previous_line` should start with.
    ///
    /// A second Enter in a row ends the list and falls back to plain indent.
    pub fn next_line_indent(&self, previous_line: &str, history: &KeyHistory) -> String {
        if history.is_double_enter() {
            return (self.fallback)(previous_line);
        }

        let left_spaces = leading_whitespace(previous_line);
        let content = &previous_line[left_spaces.len()..];

        if CHECKBOX_PREFIXES.iter().any(|p| content.starts_with(p)) {
            return format!("{left_spaces}- [ ] ");
        }
        if content.starts_with("- ") {
            return format!("{left_spaces}- ");
        }
        if content.starts_with("* ") && previous_line.trim() != "* * *" {
            return format!("{left_spaces}* ");
        }
        if let Some(n) = ordered_list_number(content) {
            return format!("{left_spaces}{}. ", n.saturating_add(1));
        }

        (self.fallback)(previous_line)
    }

    /// Decides what Tab does on the row of `range`, given that row's tokens.
    ///
    /// Only a caret on a list item is handled here; anything else is left to
    /// the default indent.
    pub fn tab_indent(&self, line_tokens: &[Token<'_>], range: &SelectionRange) -> TabIndent {
        if !range.is_empty() {
            return TabIndent::Passthrough;
        }
        let Some((first, kind)) = line_tokens
            .first()
            .and_then(|token| token.list_marker().map(|kind| (token, kind)))
        else {
            return TabIndent::Passthrough;
        };

        let marker = match kind {
            ListMarker::Ordered(_) => reset_ordinal(first.text).map(|replacement| MarkerRewrite {
                columns: char_len(first.text),
                replacement,
            }),
            ListMarker::Bullet(_) => None,
        };
        TabIndent::Indent(LineIndent {
            row: range.start.row,
            marker,
            indent_unit: self.indent_unit.clone(),
        })
    }
}

/// Outcome of the Tab hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabIndent {
    /// Re-indent a list row.
    Indent(LineIndent),
    /// Not a list row; use the default indent.
    Passthrough,
}

/// Indents one list row, optionally renumbering its marker first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndent {
    pub row: usize,
    pub marker: Option<MarkerRewrite>,
    pub indent_unit: String,
}

/// Replaces the first `columns` characters of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRewrite {
    pub columns: usize,
    pub replacement: String,
}

impl LineIndent {
    /// Applies the indent to `text`; `caret` is carried along with the row.
    pub fn apply(&self, text: &str, caret: Position) -> Edit {
        let index = LineIndex::new(text);
        let row = self.row.min(index.line_count() - 1);
        let line = index.line(row).unwrap_or_default();
        let line_start = index.byte_of_offset(index.position_to_offset(Position::new(row, 0)));
        let line_end = line_start + line.len();

        let (new_line, column) = match &self.marker {
            Some(rewrite) => {
                let split = line
                    .char_indices()
                    .nth(rewrite.columns)
                    .map_or(line.len(), |(i, _)| i);
                let new_len = char_len(&rewrite.replacement);
                let column = if caret.column >= rewrite.columns {
                    caret.column - rewrite.columns + new_len
                } else {
                    caret.column.min(new_len)
                };
                (format!("{}{}", rewrite.replacement, &line[split..]), column)
            }
            None => (line.to_string(), caret.column),
        };

        let mut new_text = String::with_capacity(text.len() + self.indent_unit.len() + 4);
        new_text.push_str(&text[..line_start]);
        new_text.push_str(&self.indent_unit);
        new_text.push_str(&new_line);
        new_text.push_str(&text[line_end..]);

        let column = if caret.row == row {
            column + char_len(&self.indent_unit)
        } else {
            caret.column
        };
        Edit {
            text: new_text,
            selection: NewSelection::Range(SelectionRange::caret(Position::new(caret.row, column))),
        }
    }
}

/// The editor's own Tab: insert one indent unit at the caret, or indent every
/// row a selection touches.
pub fn default_tab(text: &str, range: &SelectionRange, indent_unit: &str) -> Edit {
    if range.is_empty() {
        return Edit::replace(text, range, indent_unit);
    }

    let unit_len = char_len(indent_unit);
    let index = LineIndex::new(text);
    let last_row = range.end.row.min(index.line_count() - 1);
    let mut new_text = String::with_capacity(text.len() + indent_unit.len() * (last_row + 1));
    let mut copied = 0;
    for row in range.start.row..=last_row {
        let start = index.byte_of_offset(index.position_to_offset(Position::new(row, 0)));
        new_text.push_str(&text[copied..start]);
        new_text.push_str(indent_unit);
        copied = start;
    }
    new_text.push_str(&text[copied..]);

    let shift = |p: Position| Position::new(p.row, p.column + unit_len);
    Edit {
        text: new_text,
        selection: NewSelection::Range(SelectionRange::new(
            shift(range.start),
            shift(range.end),
        )),
    }
}
