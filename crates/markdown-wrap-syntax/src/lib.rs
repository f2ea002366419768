//! # markdown-wrap-syntax
//!
//! A line-level Markdown lexer built on [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! The editing engine never needs a full Markdown tree. What it needs is the
//! lexical shape of the row under the caret: does the row open with a list
//! marker, and is that marker a bullet or an ordinal? This crate answers that
//! with a flat, lossless token stream.
//!
//! ```text
//! "  7. item" → [LIST_MARKER("  7. "), TEXT("item")]
//! "# Title"   → [HASH, WHITESPACE, TEXT]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markdown_wrap_syntax::{lex_line, ListMarker, SyntaxKind};
//!
//! let tokens = lex_line("3. Buy milk");
//! assert_eq!(tokens[0].kind, SyntaxKind::LIST_MARKER);
//! assert_eq!(tokens[0].list_marker(), Some(ListMarker::Ordered(3)));
//! ```

pub mod lexer;
pub mod syntax_kind;

pub use lexer::{ListMarker, Token, lex, lex_line, lex_with_spans};
pub use syntax_kind::SyntaxKind;
