//! Conversion between linear character offsets and `(row, column)` positions.
//!
//! Offsets count characters, not bytes, and a line separator counts as a
//! single character whether it is `\n` or `\r\n`. Every conversion clamps
//! out-of-range input to the nearest valid value instead of failing.

use serde::{Deserialize, Serialize};

use super::lines::{LineRef, lines_with_spans};

/// Zero-based `(row, column)` coordinate in the buffer.
///
/// Ordering is row-major, then column-major, which matches field order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Line table for one snapshot of the buffer text.
///
/// Build it once per operation and reuse it for every conversion on the same
/// text; it is never kept across edits.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    lines: Vec<LineRef>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: lines_with_spans(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Logical length of the whole buffer.
    pub fn len(&self) -> usize {
        self.lines.last().map_or(0, LineRef::end)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Content of `row` without its separator.
    pub fn line(&self, row: usize) -> Option<&'a str> {
        self.lines.get(row).map(|l| &self.text[l.span.clone()])
    }

    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len());
        let row = self
            .lines
            .partition_point(|l| l.start <= offset)
            .saturating_sub(1);
        let line = &self.lines[row];
        Position {
            row,
            column: (offset - line.start).min(line.char_len),
        }
    }

    pub fn position_to_offset(&self, position: Position) -> usize {
        let line = self.clamped_line(position.row);
        line.start + position.column.min(line.char_len)
    }

    /// Moves `position` onto the nearest position that exists in the buffer.
    pub fn clamp(&self, position: Position) -> Position {
        self.offset_to_position(self.position_to_offset(position))
    }

    /// Byte index in the text of a logical offset, for slicing.
    pub fn byte_of_offset(&self, offset: usize) -> usize {
        let position = self.offset_to_position(offset);
        let line = &self.lines[position.row];
        let content = &self.text[line.span.clone()];
        let within = content
            .char_indices()
            .nth(position.column)
            .map_or(content.len(), |(i, _)| i);
        line.span.start + within
    }

    fn clamped_line(&self, row: usize) -> &LineRef {
        let last = self.lines.len() - 1;
        &self.lines[row.min(last)]
    }
}

/// Converts a logical offset to a position in `text`.
pub fn offset_to_position(offset: usize, text: &str) -> Position {
    LineIndex::new(text).offset_to_position(offset)
}

/// Converts a position to a logical offset in `text`.
pub fn position_to_offset(position: Position, text: &str) -> usize {
    LineIndex::new(text).position_to_offset(position)
}

/// Content of line `row` in `text`, without its separator.
pub fn line_at(text: &str, row: usize) -> Option<&str> {
    LineIndex::new(text).line(row)
}
