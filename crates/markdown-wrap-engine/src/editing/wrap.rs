//! Wrapping the selection with markup.
//!
//! Every toolbar command and shortcut ends up here with a different
//! [`WrapSpec`]. There are three cases:
//!
//! - **Inline** (non-empty selection, `by_line == false`): the markers hug
//!   the non-whitespace core of the selection, so wrapping `" hello "` in
//!   `**` gives `" **hello** "`.
//! - **By line** (non-empty selection, `by_line == true`): every selected
//!   line gets the prefix and suffix, for list-style markup.
//! - **Insertion** (empty selection): `prefix + placeholder + suffix` is
//!   inserted at the caret and the placeholder is highlighted so it can be
//!   typed over.
//!
//! Selections are computed the way a relative-motion editor would see them
//! and are not re-validated here: when inserted text contains line
//! separators, the highlight of an insertion can land on the wrong row or
//! column. Hosts clamp with [`NewSelection::resolve`].

use crate::editing::{Edit, NewSelection, SelectionRange};
use crate::text::{LineIndex, Position, char_len};

/// Parameters of a wrap operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapSpec {
    pub prefix: String,
    pub suffix: String,
    /// Inserted between the markers when nothing is selected.
    pub default_text: String,
    /// Used instead of the selected text (or of `default_text`) when set.
    pub replacement_text: Option<String>,
    /// Apply the prefix and suffix to each selected line.
    pub by_line: bool,
}

impl WrapSpec {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            ..Self::default()
        }
    }

    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    pub fn with_replacement(mut self, text: impl Into<String>) -> Self {
        self.replacement_text = Some(text.into());
        self
    }

    pub fn by_line(mut self, by_line: bool) -> Self {
        self.by_line = by_line;
        self
    }
}

/// Applies `spec` to the `selection` of `text`.
pub fn wrap(text: &str, selection: &SelectionRange, spec: &WrapSpec) -> Edit {
    let index = LineIndex::new(text);
    let start = index.position_to_offset(selection.start);
    let end = index.position_to_offset(selection.end).max(start);
    let start_byte = index.byte_of_offset(start);
    let end_byte = index.byte_of_offset(end);

    let before = &text[..start_byte];
    let after = &text[end_byte..];

    if start == end {
        return insert_at_caret(before, after, start, spec);
    }

    let selected = &text[start_byte..end_byte];
    let content = spec.replacement_text.as_deref().unwrap_or(selected);
    let mut edit = if spec.by_line {
        let clamped = SelectionRange {
            start: index.offset_to_position(start),
            end: index.offset_to_position(end),
        };
        wrap_lines(before, content, after, &clamped, spec)
    } else {
        wrap_inline(before, content, after, start, spec)
    };

    if let Some(replacement) = &spec.replacement_text
        && let NewSelection::Range(range) = &mut edit.selection
    {
        let delta = char_len(replacement) as isize - (end - start) as isize;
        range.end.column = range.end.column.saturating_add_signed(delta);
    }

    edit
}

fn wrap_inline(before: &str, content: &str, after: &str, start: usize, spec: &WrapSpec) -> Edit {
    let (leading, core, trailing) = split_outer_whitespace(content);

    let mut text = String::with_capacity(
        before.len() + content.len() + spec.prefix.len() + spec.suffix.len() + after.len(),
    );
    text.push_str(before);
    text.push_str(leading);
    text.push_str(&spec.prefix);
    text.push_str(core);
    text.push_str(&spec.suffix);
    text.push_str(trailing);
    text.push_str(after);

    // Offsets are taken before the prefix and shifted by its length.
    let index = LineIndex::new(&text);
    let prefix_len = char_len(&spec.prefix);
    let core_start = start + char_len(leading);
    let core_end = core_start + char_len(core);

    let mut range_start = index.offset_to_position(core_start);
    let mut range_end = index.offset_to_position(core_end);
    range_start.column += prefix_len;
    range_end.column += prefix_len;

    Edit {
        text,
        selection: NewSelection::Range(SelectionRange {
            start: range_start,
            end: range_end,
        }),
    }
}

fn wrap_lines(
    before: &str,
    content: &str,
    after: &str,
    selection: &SelectionRange,
    spec: &WrapSpec,
) -> Edit {
    // Separators inside the prefix are emitted once, ahead of the block;
    // each line gets the fragment after the last one.
    let (head, marker) = match spec.prefix.rfind('\n') {
        Some(i) => spec.prefix.split_at(i + 1),
        None => ("", spec.prefix.as_str()),
    };

    let mut text = String::with_capacity(before.len() + content.len() + after.len() + 64);
    text.push_str(before);
    text.push_str(head);
    let mut pieces = content.split('\n').peekable();
    while let Some(piece) = pieces.next() {
        let last = pieces.peek().is_none();
        let (line, separator) = match piece.strip_suffix('\r') {
            Some(line) if !last => (line, "\r\n"),
            _ if !last => (piece, "\n"),
            _ => (piece, ""),
        };
        text.push_str(marker);
        text.push_str(line);
        text.push_str(&spec.suffix);
        text.push_str(separator);
    }
    text.push_str(after);

    let added_rows = spec.prefix.matches('\n').count();
    let marker_len = char_len(marker);
    let shift = |p: Position| Position {
        row: p.row + added_rows,
        column: p.column + marker_len,
    };

    Edit {
        text,
        selection: NewSelection::Range(SelectionRange {
            start: shift(selection.start),
            end: shift(selection.end),
        }),
    }
}

fn insert_at_caret(before: &str, after: &str, caret: usize, spec: &WrapSpec) -> Edit {
    let middle = spec
        .replacement_text
        .as_deref()
        .unwrap_or(spec.default_text.as_str());

    let mut text = String::with_capacity(
        before.len() + spec.prefix.len() + middle.len() + spec.suffix.len() + after.len(),
    );
    text.push_str(before);
    text.push_str(&spec.prefix);
    text.push_str(middle);
    text.push_str(&spec.suffix);
    text.push_str(after);

    let prefix_len = char_len(&spec.prefix);
    let selection = if middle.is_empty() {
        NewSelection::CaretRight(prefix_len)
    } else {
        // Assumes `middle` is a single line.
        let start = LineIndex::new(&text).offset_to_position(caret + prefix_len);
        let end = Position {
            row: start.row,
            column: start.column + char_len(middle),
        };
        NewSelection::Range(SelectionRange { start, end })
    };

    Edit { text, selection }
}

/// Splits `content` into leading whitespace, core and trailing whitespace.
///
/// Content with no non-whitespace character is returned whole as the core.
fn split_outer_whitespace(content: &str) -> (&str, &str, &str) {
    let Some(first) = content.find(|c: char| !c.is_whitespace()) else {
        return ("", content, "");
    };
    let last = content
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(content.len(), |(i, c)| i + c.len_utf8());
    (&content[..first], &content[first..last], &content[last..])
}
