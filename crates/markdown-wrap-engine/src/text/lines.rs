use std::ops::Range;

/// A reference to a single line of the buffer.
///
/// Byte spans are used for slicing; `start` and `char_len` are in logical
/// characters, where a line separator (`\n` or `\r\n`) counts as one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// Byte span of the line content, excluding its separator.
    pub span: Range<usize>,
    /// Byte length of the separator ending this line: 0 (last line), 1 or 2.
    pub separator_len: usize,
    /// Logical offset of the first character of the line.
    pub start: usize,
    /// Number of characters in the line content.
    pub char_len: usize,
}

impl LineRef {
    /// Logical offset just past the last content character.
    pub fn end(&self) -> usize {
        self.start + self.char_len
    }

    pub fn has_separator(&self) -> bool {
        self.separator_len > 0
    }
}

/// Splits `text` into lines with their byte spans and logical offsets.
///
/// Always yields at least one line. A trailing separator opens an empty last
/// line, so `"a\n"` has two rows.
pub fn lines_with_spans(text: &str) -> Vec<LineRef> {
    let mut lines = Vec::new();
    let mut byte = 0usize;
    let mut offset = 0usize;

    for raw in text.split_inclusive('\n') {
        let content = match raw.strip_suffix('\n') {
            Some(line) => line.strip_suffix('\r').unwrap_or(line),
            None => raw,
        };
        let separator_len = raw.len() - content.len();
        let char_len = content.chars().count();

        lines.push(LineRef {
            span: byte..byte + content.len(),
            separator_len,
            start: offset,
            char_len,
        });

        byte += raw.len();
        offset += char_len + usize::from(separator_len > 0);
    }

    if lines.last().is_none_or(LineRef::has_separator) {
        lines.push(LineRef {
            span: byte..byte,
            separator_len: 0,
            start: offset,
            char_len: 0,
        });
    }

    lines
}

/// Leading indentation of a line: the run of spaces and tabs it starts with.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Number of logical characters in `text`, counting `\r\n` as one.
pub fn char_len(text: &str) -> usize {
    text.chars().count() - text.matches("\r\n").count()
}
