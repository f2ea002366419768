//! # Buffer geometry
//!
//! Line tables and the offset/position mapping every editing operation is
//! built on. All functions here are pure functions of the buffer text.

pub mod lines;
pub mod position;

pub use lines::{LineRef, char_len, leading_whitespace, lines_with_spans};
pub use position::{LineIndex, Position, line_at, offset_to_position, position_to_offset};
