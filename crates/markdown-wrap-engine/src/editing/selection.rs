use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::text::{LineIndex, Position};

/// An ordered pair of positions delimiting highlighted text, or a caret when
/// both ends are equal.
///
/// `start <= end` always holds for ranges built with [`SelectionRange::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: Position,
    pub end: Position,
}

impl SelectionRange {
    /// Builds a range from two ends given in any order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn caret(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start.row == self.end.row
    }

    pub fn from_offsets(offsets: Range<usize>, text: &str) -> Self {
        let index = LineIndex::new(text);
        Self::new(
            index.offset_to_position(offsets.start),
            index.offset_to_position(offsets.end),
        )
    }

    /// Logical offsets of both ends, clamped to the buffer.
    pub fn to_offsets(&self, text: &str) -> Range<usize> {
        let index = LineIndex::new(text);
        index.position_to_offset(self.start)..index.position_to_offset(self.end)
    }

    /// Both ends moved onto positions that exist in `text`.
    pub fn clamped(&self, text: &str) -> Self {
        let index = LineIndex::new(text);
        Self::new(index.clamp(self.start), index.clamp(self.end))
    }

    pub fn selected_text<'a>(&self, text: &'a str) -> &'a str {
        let index = LineIndex::new(text);
        let start = index.byte_of_offset(index.position_to_offset(self.start));
        let end = index.byte_of_offset(index.position_to_offset(self.end));
        &text[start..end.max(start)]
    }

    /// The line the range starts on.
    pub fn current_line<'a>(&self, text: &'a str) -> &'a str {
        let index = LineIndex::new(text);
        index
            .line(self.start.row.min(index.line_count() - 1))
            .unwrap_or_default()
    }

    /// The line before the one the range starts on, if any.
    pub fn previous_line<'a>(&self, text: &'a str) -> Option<&'a str> {
        let row = self.start.row.checked_sub(1)?;
        LineIndex::new(text).line(row)
    }
}
