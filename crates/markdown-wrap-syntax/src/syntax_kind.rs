//! SyntaxKind enum for the tokens of a single Markdown line.
//!
//! Kinds use SCREAMING_CASE, the convention of rust-analyzer style lexers.

/// All token kinds a line can be split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// Plain text content
    TEXT,
    /// A list item marker at the start of a line, including its indentation
    /// and trailing whitespace: `"- "`, `"  * "`, `"12. "`
    LIST_MARKER,
    /// `>` character for blockquotes
    GT,
    /// `-` character outside of a list marker
    DASH,
    /// `*` character outside of a list marker (emphasis, thematic breaks)
    STAR,
    /// `+` character outside of a list marker
    PLUS,
    /// `#` for headings
    HASH,
    /// Single backtick for code spans and fences
    BACKTICK,
    /// `~` character for fences and strikethrough
    TILDE,
    /// `[` for links and checkboxes
    LBRACKET,
    /// `]` for links and checkboxes
    RBRACKET,
    /// `(` for link URLs
    LPAREN,
    /// `)` for link URLs
    RPAREN,
}
