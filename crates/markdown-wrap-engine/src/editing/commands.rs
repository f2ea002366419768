use serde::{Deserialize, Serialize};

use crate::editing::ordered_list::ordered_list_number;
use crate::editing::{SelectionRange, WrapSpec};

/// Editor commands a host can send by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    TextBold,
    TextItalic,
    /// Wrap the selection in a link to `url`. An empty URL does nothing.
    TextLink { url: String },
    /// Inline code span, or a fenced block when the selection spans lines.
    TextCode,
    InsertText(String),
    TextNumberedList,
    TextBulletedList,
    TextCheckbox,
    TextHeading,
    TextHorizontalRule,
    /// Notes dropped onto the editor, as markdown link tags.
    DropItems { markdown_tags: Vec<String> },
    /// Give the editor focus. No buffer change.
    Focus,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unsupported command: {0}")]
    Unsupported(String),
    #[error("Command {name} requires a value")]
    MissingValue { name: String },
}

impl Cmd {
    /// Parses a host command name and its optional argument.
    pub fn from_name(name: &str, value: Option<&str>) -> Result<Self, CommandError> {
        let required = || {
            value.map(str::to_string).ok_or_else(|| CommandError::MissingValue {
                name: name.to_string(),
            })
        };

        let cmd = match name {
            "textBold" => Cmd::TextBold,
            "textItalic" => Cmd::TextItalic,
            "textLink" => Cmd::TextLink { url: required()? },
            "textCode" => Cmd::TextCode,
            "insertText" => Cmd::InsertText(required()?),
            "textNumberedList" => Cmd::TextNumberedList,
            "textBulletedList" => Cmd::TextBulletedList,
            "textCheckbox" => Cmd::TextCheckbox,
            "textHeading" => Cmd::TextHeading,
            "textHorizontalRule" => Cmd::TextHorizontalRule,
            "dropItems" => Cmd::DropItems {
                markdown_tags: required()?.lines().map(str::to_string).collect(),
            },
            "focus" => Cmd::Focus,
            other => return Err(CommandError::Unsupported(other.to_string())),
        };
        Ok(cmd)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cmd::TextBold => "textBold",
            Cmd::TextItalic => "textItalic",
            Cmd::TextLink { .. } => "textLink",
            Cmd::TextCode => "textCode",
            Cmd::InsertText(_) => "insertText",
            Cmd::TextNumberedList => "textNumberedList",
            Cmd::TextBulletedList => "textBulletedList",
            Cmd::TextCheckbox => "textCheckbox",
            Cmd::TextHeading => "textHeading",
            Cmd::TextHorizontalRule => "textHorizontalRule",
            Cmd::DropItems { .. } => "dropItems",
            Cmd::Focus => "focus",
        }
    }
}

/// Text inserted between markers when a command runs on an empty selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub strong_text: String,
    pub emphasized_text: String,
    pub list_item: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            strong_text: "strong text".to_string(),
            emphasized_text: "emphasized text".to_string(),
            list_item: "List item".to_string(),
        }
    }
}

/// Translates a command into the wrap it performs on `selection`.
///
/// Returns `None` for commands that leave the buffer alone.
pub fn compile_command(
    cmd: &Cmd,
    text: &str,
    selection: &SelectionRange,
    placeholders: &Placeholders,
) -> Option<WrapSpec> {
    let spec = match cmd {
        Cmd::TextBold => WrapSpec::new("**", "**").with_default_text(&placeholders.strong_text),
        Cmd::TextItalic => WrapSpec::new("*", "*").with_default_text(&placeholders.emphasized_text),
        Cmd::TextLink { url } if url.is_empty() => return None,
        Cmd::TextLink { url } => WrapSpec::new("[", format!("]({url})")),
        Cmd::TextCode => code_spec(selection.selected_text(text)),
        Cmd::InsertText(value) => WrapSpec::new(value.as_str(), ""),
        Cmd::TextNumberedList => {
            // An ordinal of 0 counts as no number.
            let numbered = |line: &str| ordered_list_number(line).filter(|&n| n != 0);
            let n = numbered(selection.current_line(text))
                .or_else(|| selection.previous_line(text).and_then(numbered))
                .unwrap_or(0);
            let marker = format!("{}. ", n.saturating_add(1));
            list_item(text, selection, &marker).with_default_text(&placeholders.list_item)
        }
        Cmd::TextBulletedList => {
            list_item(text, selection, "- ").with_default_text(&placeholders.list_item)
        }
        Cmd::TextCheckbox => {
            list_item(text, selection, "- [ ] ").with_default_text(&placeholders.list_item)
        }
        Cmd::TextHeading => list_item(text, selection, "## "),
        Cmd::TextHorizontalRule => list_item(text, selection, "* * *").by_line(false),
        Cmd::DropItems { markdown_tags } => {
            WrapSpec::new("", "").with_replacement(markdown_tags.join("\n"))
        }
        Cmd::Focus => return None,
    };
    Some(spec)
}

/// A by-line list wrap, opening a new line unless the caret already sits on
/// an empty one.
fn list_item(text: &str, selection: &SelectionRange, marker: &str) -> WrapSpec {
    let on_empty_line = selection.is_single_line() && selection.current_line(text).is_empty();
    let newline = if on_empty_line { "" } else { "\n" };
    WrapSpec::new(format!("{newline}{marker}"), "").by_line(true)
}

const FENCE: &str = "```";

fn code_spec(selected: &str) -> WrapSpec {
    let Some(newline) = selected.find('\n') else {
        return WrapSpec::new("`", "`");
    };
    let separator = if selected[..newline].ends_with('\r') {
        "\r\n"
    } else {
        "\n"
    };

    if selected.starts_with(FENCE) && selected.ends_with(FENCE) {
        // Unfence: drop the fence and separator at both ends.
        let edge = FENCE.len() + separator.len();
        let total = selected.chars().count();
        let inner: String = selected
            .chars()
            .skip(edge)
            .take(total.saturating_sub(2 * edge))
            .collect();
        return WrapSpec::new("", "").with_replacement(inner);
    }

    WrapSpec::new(format!("{FENCE}{separator}"), format!("{separator}{FENCE}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Position;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn caret(row: usize, column: usize) -> SelectionRange {
        SelectionRange::caret(Position::new(row, column))
    }

    fn compile(cmd: &Cmd, text: &str, selection: SelectionRange) -> Option<WrapSpec> {
        compile_command(cmd, text, &selection, &Placeholders::default())
    }

    #[rstest]
    #[case("textBold", None, Cmd::TextBold)]
    #[case("textItalic", None, Cmd::TextItalic)]
    #[case("textLink", Some("https://example.com"), Cmd::TextLink { url: "https://example.com".to_string() })]
    #[case("textCode", None, Cmd::TextCode)]
    #[case("insertText", Some("hi"), Cmd::InsertText("hi".to_string()))]
    #[case("textHorizontalRule", None, Cmd::TextHorizontalRule)]
    #[case("focus", None, Cmd::Focus)]
    #[case("dropItems", Some("[a](:/1)\n[b](:/2)"), Cmd::DropItems { markdown_tags: vec!["[a](:/1)".to_string(), "[b](:/2)".to_string()] })]
    fn parses_command_names(
        #[case] name: &str,
        #[case] value: Option<&str>,
        #[case] expected: Cmd,
    ) {
        let cmd = Cmd::from_name(name, value).unwrap();
        assert_eq!(cmd.name(), name);
        assert_eq!(cmd, expected);
    }

    #[test]
    fn rejects_unknown_and_incomplete_commands() {
        assert_eq!(
            Cmd::from_name("attachFile", None),
            Err(CommandError::Unsupported("attachFile".to_string()))
        );
        assert_eq!(
            Cmd::from_name("insertText", None),
            Err(CommandError::MissingValue {
                name: "insertText".to_string()
            })
        );
    }

    #[test]
    fn bold_and_italic_use_placeholders() {
        let bold = compile(&Cmd::TextBold, "", caret(0, 0)).unwrap();
        assert_eq!(bold, WrapSpec::new("**", "**").with_default_text("strong text"));

        let italic = compile(&Cmd::TextItalic, "", caret(0, 0)).unwrap();
        assert_eq!(italic.default_text, "emphasized text");
    }

    #[test]
    fn link_wraps_with_url_and_empty_url_is_noop() {
        let link = Cmd::TextLink {
            url: "https://example.com".to_string(),
        };
        assert_eq!(
            compile(&link, "", caret(0, 0)),
            Some(WrapSpec::new("[", "](https://example.com)"))
        );

        let empty = Cmd::TextLink { url: String::new() };
        assert_eq!(compile(&empty, "", caret(0, 0)), None);
        assert_eq!(compile(&Cmd::Focus, "", caret(0, 0)), None);
    }

    #[rstest]
    #[case("code", WrapSpec::new("`", "`"))]
    #[case("a\nb", WrapSpec::new("```\n", "\n```"))]
    #[case("a\r\nb", WrapSpec::new("```\r\n", "\r\n```"))]
    #[case("```\nlet x = 1;\n```", WrapSpec::new("", "").with_replacement("let x = 1;"))]
    #[case("```\r\nx\r\n```", WrapSpec::new("", "").with_replacement("x"))]
    #[case("```\n```", WrapSpec::new("", "").with_replacement(""))]
    fn code_spans_and_fences(#[case] selected: &str, #[case] expected: WrapSpec) {
        assert_eq!(code_spec(selected), expected);
    }

    #[test]
    fn list_item_on_empty_line_has_no_leading_newline() {
        let spec = compile(&Cmd::TextCheckbox, "a\n\nb", caret(1, 0)).unwrap();
        assert_eq!(spec.prefix, "- [ ] ");
        assert!(spec.by_line);
        assert_eq!(spec.default_text, "List item");
    }

    #[test]
    fn list_item_on_text_line_opens_new_line() {
        let spec = compile(&Cmd::TextBulletedList, "abc", caret(0, 3)).unwrap();
        assert_eq!(spec.prefix, "\n- ");
    }

    #[test]
    fn multi_row_selection_always_gets_newline() {
        let range = SelectionRange::new(Position::new(0, 0), Position::new(1, 0));
        let spec = compile(&Cmd::TextHeading, "\nb", range).unwrap();
        assert_eq!(spec.prefix, "\n## ");
        assert_eq!(spec.default_text, "");
    }

    #[rstest]
    #[case("3. three", caret(0, 8), "\n4. ")]
    #[case("1. one\nsecond", caret(1, 2), "\n2. ")]
    #[case("plain", caret(0, 0), "\n1. ")]
    #[case("", caret(0, 0), "1. ")]
    #[case("5. five\n", caret(1, 0), "6. ")]
    #[case("5. a\n0. b", caret(1, 4), "\n6. ")]
    #[case("0. zero", caret(0, 7), "\n1. ")]
    fn numbered_list_continues_numbering(
        #[case] text: &str,
        #[case] selection: SelectionRange,
        #[case] prefix: &str,
    ) {
        let spec = compile(&Cmd::TextNumberedList, text, selection).unwrap();
        assert_eq!(spec.prefix, prefix);
    }

    #[test]
    fn horizontal_rule_is_not_by_line() {
        let spec = compile(&Cmd::TextHorizontalRule, "x", caret(0, 1)).unwrap();
        assert_eq!(spec.prefix, "\n* * *");
        assert!(!spec.by_line);
    }

    #[test]
    fn dropped_notes_replace_the_selection() {
        let cmd = Cmd::DropItems {
            markdown_tags: vec!["[a](:/1)".to_string(), "[b](:/2)".to_string()],
        };
        let spec = compile(&cmd, "", caret(0, 0)).unwrap();
        assert_eq!(spec.replacement_text.as_deref(), Some("[a](:/1)\n[b](:/2)"));
    }
}
