pub mod editing;
pub mod text;

// Re-export key types for easier usage
pub use editing::*;
pub use text::{LineIndex, Position, offset_to_position, position_to_offset};
