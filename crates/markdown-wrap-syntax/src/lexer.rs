//! # Lexer - Tokenizing Markdown Lines
//!
//! Breaks source text into tokens using the [Logos] lexer generator. The
//! editor only ever asks about one row at a time ("is the first token of this
//! line a list marker?"), so the lexer is line-oriented: list markers are only
//! recognised at the start of a line.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte of the input appears in exactly one token:
//!
//! ```
//! use markdown_wrap_syntax::lexer::lex;
//!
//! let input = "  3. Buy *milk*\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## List markers
//!
//! A list marker token spans up to three columns of indentation, the marker
//! itself (`-`, `*`, `+` or `<digits>.`) and the whitespace after it, so
//! `"  7. item"` lexes as `[LIST_MARKER("  7. "), TEXT("item")]`. A marker
//! pattern that does not start a line is reported as plain `TEXT`.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// Logos needs its own enum to derive on; [`TokenKind::to_syntax_kind`] maps
/// each variant to the public [`SyntaxKind`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
pub enum TokenKind {
    /// Indentation, bullet or ordinal, and the whitespace that follows
    #[regex(r"[ \t]{0,3}([*+-]|[0-9]+\.)[ \t]+")]
    ListMarker,

    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    #[token(">")]
    Gt,

    #[token("-")]
    Dash,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("#")]
    Hash,

    #[token("`")]
    Backtick,

    #[token("~")]
    Tilde,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^\s\[\]()>`*+#~-]+")]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::ListMarker => SyntaxKind::LIST_MARKER,
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Hash => SyntaxKind::HASH,
            TokenKind::Backtick => SyntaxKind::BACKTICK,
            TokenKind::Tilde => SyntaxKind::TILDE,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// What a list marker token introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// `-`, `*` or `+`
    Bullet(char),
    /// `<digits>.`
    Ordered(u64),
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

impl Token<'_> {
    /// Classifies a `LIST_MARKER` token. Returns `None` for every other kind.
    pub fn list_marker(&self) -> Option<ListMarker> {
        if self.kind != SyntaxKind::LIST_MARKER {
            return None;
        }
        let marker = self.text.trim_matches([' ', '\t']);
        match marker.strip_suffix('.') {
            Some(digits) => digits.parse().ok().map(ListMarker::Ordered),
            None => marker.chars().next().map(ListMarker::Bullet),
        }
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens: Vec<(Token<'_>, std::ops::Range<usize>)> = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let at_line_start = tokens
            .last()
            .is_none_or(|(prev, _)| prev.kind == SyntaxKind::NEWLINE);
        let kind = match result {
            Ok(TokenKind::ListMarker)
                if !at_line_start || is_thematic_break(rest_of_line(input, span.start)) =>
            {
                SyntaxKind::TEXT
            }
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Logos error means unrecognized character - treat as TEXT
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}

fn rest_of_line(input: &str, from: usize) -> &str {
    let rest = &input[from..];
    rest.find('\n').map_or(rest, |end| &rest[..end])
}

/// `* * *`, `---`, `_ _ _` and the like: three or more of the same rule
/// character, with optional spaces or tabs between them.
fn is_thematic_break(line: &str) -> bool {
    let mut marks = line
        .trim_end_matches('\r')
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t'));
    let Some(first @ ('*' | '-' | '_')) = marks.next() else {
        return false;
    };
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

/// Tokens of a single row, as handed to the Tab handler.
pub fn lex_line(line: &str) -> Vec<Token<'_>> {
    lex(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn token(kind: SyntaxKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    fn kinds(input: &str) -> String {
        format!(
            "{:?}",
            lex(input).iter().map(|t| t.kind).collect::<Vec<_>>()
        )
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_dash_bullet() {
        assert_eq!(
            lex("- item"),
            vec![
                token(SyntaxKind::LIST_MARKER, "- "),
                token(SyntaxKind::TEXT, "item"),
            ]
        );
    }

    #[test]
    fn lex_indented_ordinal() {
        assert_eq!(
            lex("  7. item"),
            vec![
                token(SyntaxKind::LIST_MARKER, "  7. "),
                token(SyntaxKind::TEXT, "item"),
            ]
        );
    }

    #[test]
    fn lex_tab_indented_marker() {
        assert_eq!(
            lex("\t1. item")[0],
            token(SyntaxKind::LIST_MARKER, "\t1. ")
        );
    }

    #[test]
    fn deep_indentation_is_not_a_marker() {
        let tokens = lex("    - item");
        assert_eq!(tokens[0], token(SyntaxKind::WHITESPACE, "    "));
        assert_eq!(tokens[1], token(SyntaxKind::TEXT, "- "));
    }

    #[test]
    fn marker_inside_line_is_text() {
        let tokens = lex("a - b");
        assert!(tokens.iter().all(|t| t.kind != SyntaxKind::LIST_MARKER));
    }

    #[test]
    fn marker_after_newline_is_recognised() {
        let tokens = lex("one\n- two");
        assert_eq!(tokens[2], token(SyntaxKind::LIST_MARKER, "- "));
    }

    #[test]
    fn ordinal_without_space_is_text() {
        assert_snapshot!(kinds("7.item"), @"[TEXT]");
        assert_snapshot!(kinds("12.5 apples"), @"[TEXT, WHITESPACE, TEXT]");
    }

    #[test]
    fn checkbox_line_tokens() {
        assert_snapshot!(
            kinds("- [x] done"),
            @"[LIST_MARKER, LBRACKET, TEXT, RBRACKET, WHITESPACE, TEXT]"
        );
    }

    #[test]
    fn heading_and_quote_tokens() {
        assert_snapshot!(kinds("## Title"), @"[HASH, HASH, WHITESPACE, TEXT]");
        assert_snapshot!(kinds("> quote"), @"[GT, WHITESPACE, TEXT]");
    }

    #[test]
    fn emphasis_is_not_a_marker() {
        assert_snapshot!(kinds("*em*"), @"[STAR, TEXT, STAR]");
    }

    #[test]
    fn horizontal_rule_is_not_a_marker() {
        assert_snapshot!(kinds("* * *"), @"[TEXT, TEXT, STAR]");
        let tokens = lex("- a\n- - -\r\n- b");
        let markers: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == SyntaxKind::LIST_MARKER)
            .map(|t| t.text)
            .collect();
        assert_eq!(markers, vec!["- ", "- "]);
    }

    #[rstest]
    #[case("***", true)]
    #[case("* * *", true)]
    #[case("- - -\r", true)]
    #[case("_\t_ _", true)]
    #[case("**", false)]
    #[case("* - *", false)]
    #[case("* * x", false)]
    #[case("", false)]
    fn thematic_break_lines(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_thematic_break(line), expected);
    }

    #[test]
    fn lex_newline_crlf() {
        assert_eq!(lex("\r\n"), vec![token(SyntaxKind::NEWLINE, "\r\n")]);
    }

    #[rstest]
    #[case("- item", Some(ListMarker::Bullet('-')))]
    #[case("* item", Some(ListMarker::Bullet('*')))]
    #[case("+ item", Some(ListMarker::Bullet('+')))]
    #[case("  12. item", Some(ListMarker::Ordered(12)))]
    #[case("7. ", Some(ListMarker::Ordered(7)))]
    #[case("item", None)]
    #[case("", None)]
    #[case("* * *", None)]
    #[case("- - -", None)]
    #[case("  -  -  -  ", None)]
    #[case("- -", Some(ListMarker::Bullet('-')))]
    #[case("- - x", Some(ListMarker::Bullet('-')))]
    fn first_token_marker(#[case] line: &str, #[case] expected: Option<ListMarker>) {
        let tokens = lex_line(line);
        assert_eq!(tokens.first().and_then(Token::list_marker), expected);
    }

    #[test]
    fn all_bytes_preserved() {
        let input = "## Heading\n\n> A *quote* with [link](url)\n\n- List item\n  2. Nested\n\n```rust\ncode\n```";
        let tokens = lex(input);
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn spans_are_correct() {
        let input = "- [ ] task\n3. step";
        for (token, span) in &lex_with_spans(input) {
            assert_eq!(token.text, &input[span.clone()]);
        }
    }
}
