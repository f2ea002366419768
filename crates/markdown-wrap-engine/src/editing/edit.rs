use crate::editing::SelectionRange;
use crate::text::{LineIndex, Position, char_len};

/// Where the selection should land once the host has shown the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewSelection {
    /// An explicit range, as computed against the new text. It may point past
    /// the end of a line; [`NewSelection::resolve`] clamps it.
    Range(SelectionRange),
    /// Move the caret right this many characters, one at a time, starting
    /// from where the caret was before the edit. Hosts that only expose
    /// relative cursor motion can replay this directly.
    CaretRight(usize),
}

impl NewSelection {
    /// Turns the request into a concrete range inside `text`.
    ///
    /// `origin` is the caret position before the edit.
    pub fn resolve(self, origin: Position, text: &str) -> SelectionRange {
        let index = LineIndex::new(text);
        match self {
            NewSelection::Range(range) => {
                SelectionRange::new(index.clamp(range.start), index.clamp(range.end))
            }
            NewSelection::CaretRight(count) => {
                let offset = index.position_to_offset(origin) + count;
                SelectionRange::caret(index.offset_to_position(offset))
            }
        }
    }
}

/// New buffer contents plus the selection that goes with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub selection: NewSelection,
}

impl Edit {
    /// Replaces the selected text with `insert` and puts the caret after it.
    pub fn replace(text: &str, selection: &SelectionRange, insert: &str) -> Self {
        let index = LineIndex::new(text);
        let start = index.position_to_offset(selection.start);
        let end = index.position_to_offset(selection.end).max(start);
        let (start_byte, end_byte) = (index.byte_of_offset(start), index.byte_of_offset(end));

        let mut new_text = String::with_capacity(text.len() + insert.len());
        new_text.push_str(&text[..start_byte]);
        new_text.push_str(insert);
        new_text.push_str(&text[end_byte..]);

        let caret = LineIndex::new(&new_text).offset_to_position(start + char_len(insert));
        Self {
            text: new_text,
            selection: NewSelection::Range(SelectionRange::caret(caret)),
        }
    }
}
