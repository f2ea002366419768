use std::ops::Range;

use markdown_wrap_syntax::lex_line;
use xi_rope::Rope;
use xi_rope::delta::Builder;

use crate::editing::commands::{Cmd, Placeholders, compile_command};
use crate::editing::continuation::{ListContinuation, TabIndent, default_tab};
use crate::editing::key_history::KeyHistory;
use crate::editing::{Edit, EditToken, NewSelection, Patch, SelectionRange, WrapSpec, wrap};
use crate::text::{LineIndex, Position, line_at};

/// Selection waiting for the host to show the edit that produced it.
#[derive(Debug, Clone)]
struct PendingSelection {
    token: EditToken,
    selection: NewSelection,
    origin: Position,
}

/// An open markdown buffer with its selection and key history.
///
/// Edits are committed in two phases. [`Session::apply_edit`] replaces the
/// buffer and returns a [`Patch`] whose token the host hands back to
/// [`Session::apply_pending_selection`] once the new text is on screen.
/// Another edit in between makes the token stale.
///
/// ```rust
/// # use markdown_wrap_engine::Session;
/// let mut session = Session::from_bytes(b"say hello").unwrap();
/// session.exec_command("textBold", None);
/// assert_eq!(session.text(), "say hello**strong text**");
/// ```
pub struct Session {
    buffer: Rope,
    selection: SelectionRange,
    version: u64,
    key_history: KeyHistory,
    pending: Option<PendingSelection>,
    continuation: ListContinuation,
    placeholders: Placeholders,
}

impl Session {
    pub fn new(text: &str) -> Self {
        let caret = LineIndex::new(text).offset_to_position(usize::MAX);
        Self {
            buffer: Rope::from(text),
            selection: SelectionRange::caret(caret),
            version: 0,
            key_history: KeyHistory::new(),
            pending: None,
            continuation: ListContinuation::new(),
            placeholders: Placeholders::default(),
        }
    }

    /// Opens a buffer from raw bytes with the caret at the end.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn with_indent_unit(mut self, unit: impl Into<String>) -> Self {
        self.continuation = self.continuation.with_indent_unit(unit);
        self
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.text().into_bytes()
    }

    pub fn selection(&self) -> SelectionRange {
        self.selection
    }

    /// Moves the selection, clamped to the buffer.
    pub fn set_selection(&mut self, selection: SelectionRange) {
        self.selection = selection.clamped(&self.text());
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn key_history(&self) -> &KeyHistory {
        &self.key_history
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    /// Token of the edit whose selection is still waiting to be applied.
    pub fn pending_token(&self) -> Option<EditToken> {
        self.pending.as_ref().map(|p| p.token)
    }

    /// First phase: replace the buffer with `edit.text`.
    ///
    /// Only the span that differs from the current text goes into the rope
    /// delta. The selection is left alone until the returned token comes back.
    pub fn apply_edit(&mut self, edit: Edit) -> Patch {
        let old = self.text();
        let (removed, inserted) = diff_span(&old, &edit.text);

        let mut builder = Builder::new(self.buffer.len());
        if inserted.is_empty() {
            builder.delete(removed);
        } else {
            builder.replace(removed, Rope::from(&edit.text[inserted.clone()]));
        }
        self.buffer = builder.build().apply(&self.buffer);

        self.version += 1;
        let token = EditToken {
            version: self.version,
        };
        self.pending = Some(PendingSelection {
            token,
            selection: edit.selection,
            origin: self.selection.start,
        });

        let changed = if inserted.is_empty() {
            Vec::new()
        } else {
            vec![inserted]
        };
        Patch {
            changed,
            token,
            version: self.version,
        }
    }

    /// Second phase: apply the selection of the edit identified by `token`.
    ///
    /// Returns `false` and leaves the selection alone when the token is stale
    /// or was already used.
    pub fn apply_pending_selection(&mut self, token: EditToken) -> bool {
        let current = self.pending.as_ref().is_some_and(|p| p.token == token);
        if !current || token.version != self.version {
            log::warn!(
                "Ignoring stale selection for edit {} (buffer is at {})",
                token.version,
                self.version
            );
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };

        self.selection = pending.selection.resolve(pending.origin, &self.text());
        log::debug!("Selection committed for edit {}: {:?}", token.version, self.selection);
        true
    }

    /// Wraps the current selection.
    pub fn wrap(&mut self, spec: &WrapSpec) -> Patch {
        let edit = wrap(&self.text(), &self.selection, spec);
        self.apply_edit(edit)
    }

    /// Runs a command. Commands that need no buffer change succeed without
    /// an edit.
    pub fn exec(&mut self, cmd: &Cmd) -> bool {
        log::debug!("Executing command {}", cmd.name());
        let text = self.text();
        if let Some(spec) = compile_command(cmd, &text, &self.selection, &self.placeholders) {
            self.wrap(&spec);
        }
        true
    }

    /// Runs a command by its host name. Unknown names return `false`.
    pub fn exec_command(&mut self, name: &str, value: Option<&str>) -> bool {
        match Cmd::from_name(name, value) {
            Ok(cmd) => self.exec(&cmd),
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    /// Records a key-down event. Call once per event, before acting on it.
    pub fn key_down(&mut self, key: &str) {
        self.key_history.record(key);
    }

    pub fn next_line_indent(&self, previous_line: &str) -> String {
        self.continuation
            .next_line_indent(previous_line, &self.key_history)
    }

    /// Splits the line at the caret, continuing any list the line belongs to.
    pub fn press_enter(&mut self) -> Patch {
        let text = self.text();
        let start = self.selection.start;
        let line = line_at(&text, start.row).unwrap_or_default();
        let before_caret: String = line.chars().take(start.column).collect();

        let indent = self.next_line_indent(&before_caret);
        let edit = Edit::replace(&text, &self.selection, &format!("\n{indent}"));
        self.apply_edit(edit)
    }

    /// Indents the list row under the caret, or falls back to plain Tab.
    pub fn press_tab(&mut self) -> Patch {
        let text = self.text();
        let line = line_at(&text, self.selection.start.row).unwrap_or_default();
        let tokens = lex_line(line);

        let edit = match self.continuation.tab_indent(&tokens, &self.selection) {
            TabIndent::Indent(indent) => indent.apply(&text, self.selection.start),
            TabIndent::Passthrough => {
                default_tab(&text, &self.selection, self.continuation.indent_unit())
            }
        };
        self.apply_edit(edit)
    }

    /// Drops the selection and puts the caret at the top of the buffer.
    pub fn clear_state(&mut self) {
        self.selection = SelectionRange::caret(Position::default());
        self.pending = None;
    }

    /// Removes the selected text and returns it for the clipboard.
    pub fn cut_selection(&mut self) -> Option<String> {
        if self.selection.is_empty() {
            return None;
        }
        let text = self.text();
        let cut = self.selection.selected_text(&text).to_string();
        let patch = self.apply_edit(Edit::replace(&text, &self.selection, ""));
        self.apply_pending_selection(patch.token);
        Some(cut)
    }

    /// Two-phase commit in one call, for hosts without a render step.
    pub fn commit(&mut self, edit: Edit) -> Patch {
        let patch = self.apply_edit(edit);
        self.apply_pending_selection(patch.token);
        patch
    }
}

/// Byte ranges that differ between `old` and `new`, after trimming the common
/// prefix and suffix.
fn diff_span(old: &str, new: &str) -> (Range<usize>, Range<usize>) {
    let prefix = old
        .char_indices()
        .zip(new.chars())
        .take_while(|((_, a), b)| a == b)
        .last()
        .map_or(0, |((i, c), _)| i + c.len_utf8());
    let suffix: usize = old[prefix..]
        .chars()
        .rev()
        .zip(new[prefix..].chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(c, _)| c.len_utf8())
        .sum();
    (prefix..old.len() - suffix, prefix..new.len() - suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::key_history::ENTER;
    use pretty_assertions::assert_eq;

    fn pos(row: usize, column: usize) -> Position {
        Position::new(row, column)
    }

    fn session(text: &str, selection: SelectionRange) -> Session {
        let mut session = Session::new(text);
        session.set_selection(selection);
        session
    }

    #[test]
    fn from_bytes_puts_caret_at_end() {
        let session = Session::from_bytes("ab\ncd".as_bytes()).unwrap();
        assert_eq!(session.selection(), SelectionRange::caret(pos(1, 2)));
        assert_eq!(session.version(), 0);
        assert_eq!(session.to_bytes(), b"ab\ncd");
    }

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        assert!(Session::from_bytes(&[0xFF, 0xFE]).is_err());
    }

    #[test]
    fn set_selection_clamps() {
        let session = session("abc", SelectionRange::new(pos(0, 1), pos(5, 5)));
        assert_eq!(session.selection(), SelectionRange::new(pos(0, 1), pos(0, 3)));
    }

    #[test]
    fn selection_waits_for_the_token() {
        let mut session = session(" hello ", SelectionRange::new(pos(0, 0), pos(0, 7)));
        let patch = session.wrap(&WrapSpec::new("**", "**"));

        assert_eq!(session.text(), " **hello** ");
        assert_eq!(patch.changed, vec![1..10]);
        assert_eq!(session.selection(), SelectionRange::new(pos(0, 0), pos(0, 7)));
        assert_eq!(session.pending_token(), Some(patch.token));

        assert!(session.apply_pending_selection(patch.token));
        assert_eq!(session.selection(), SelectionRange::new(pos(0, 3), pos(0, 8)));
        assert_eq!(session.pending_token(), None);
    }

    #[test]
    fn stale_token_is_rejected() {
        let mut session = session("ab", SelectionRange::caret(pos(0, 2)));
        let first = session.wrap(&WrapSpec::new("*", "*").with_default_text("x"));
        let second = session.wrap(&WrapSpec::new("`", "`"));

        assert!(!session.apply_pending_selection(first.token));
        assert!(session.apply_pending_selection(second.token));
        assert!(!session.apply_pending_selection(second.token));
    }

    #[test]
    fn caret_right_is_replayed_from_old_caret() {
        let mut session = session("ab", SelectionRange::caret(pos(0, 1)));
        let patch = session.wrap(&WrapSpec::new("`", "`"));
        assert_eq!(session.text(), "a``b");
        assert!(session.apply_pending_selection(patch.token));
        assert_eq!(session.selection(), SelectionRange::caret(pos(0, 2)));
    }

    #[test]
    fn exec_command_reports_unsupported_names() {
        let mut session = Session::new("text");
        assert!(!session.exec_command("attachFile", None));
        assert!(!session.exec_command("textLink", None));
        assert_eq!(session.version(), 0);

        assert!(session.exec_command("focus", None));
        assert!(session.exec_command("textLink", Some("")));
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn exec_bold_uses_configured_placeholder() {
        let placeholders = Placeholders {
            strong_text: "bold".to_string(),
            ..Placeholders::default()
        };
        let mut session = Session::new("").with_placeholders(placeholders);
        assert!(session.exec(&Cmd::TextBold));
        assert_eq!(session.text(), "**bold**");
    }

    #[test]
    fn enter_continues_ordered_list() {
        let mut session = session("3. item", SelectionRange::caret(pos(0, 7)));
        session.key_down(ENTER);
        let patch = session.press_enter();
        assert_eq!(session.text(), "3. item\n4. ");
        assert!(session.apply_pending_selection(patch.token));
        assert_eq!(session.selection(), SelectionRange::caret(pos(1, 3)));
    }

    #[test]
    fn second_enter_ends_the_list() {
        let mut session = session("- a", SelectionRange::caret(pos(0, 3)));
        session.key_down(ENTER);
        let patch = session.press_enter();
        session.apply_pending_selection(patch.token);
        assert_eq!(session.text(), "- a\n- ");

        session.key_down(ENTER);
        session.press_enter();
        assert_eq!(session.text(), "- a\n- \n");
    }

    #[test]
    fn enter_uses_line_up_to_caret() {
        let mut session = session("ab- c", SelectionRange::caret(pos(0, 2)));
        session.key_down(ENTER);
        session.press_enter();
        assert_eq!(session.text(), "ab\n- c");
    }

    #[test]
    fn tab_renumbers_list_item() {
        let mut session = session("7. item", SelectionRange::caret(pos(0, 0)));
        let patch = session.press_tab();
        assert_eq!(session.text(), "\t1. item");
        assert!(session.apply_pending_selection(patch.token));
        assert_eq!(session.selection(), SelectionRange::caret(pos(0, 1)));
    }

    #[test]
    fn cut_removes_and_returns_selection() {
        let mut session = session("hello world", SelectionRange::new(pos(0, 5), pos(0, 11)));
        assert_eq!(session.cut_selection().as_deref(), Some(" world"));
        assert_eq!(session.text(), "hello");
        assert_eq!(session.selection(), SelectionRange::caret(pos(0, 5)));

        assert_eq!(session.cut_selection(), None);
    }

    #[test]
    fn clear_state_moves_caret_home() {
        let mut session = session("a\nb", SelectionRange::new(pos(0, 1), pos(1, 1)));
        session.wrap(&WrapSpec::new("*", "*"));
        session.clear_state();
        assert_eq!(session.selection(), SelectionRange::caret(pos(0, 0)));
        assert_eq!(session.pending_token(), None);
    }

    #[test]
    fn diff_span_trims_common_ends() {
        assert_eq!(diff_span("abc", "aXc"), (1..2, 1..2));
        assert_eq!(diff_span("abc", "abc"), (3..3, 3..3));
        assert_eq!(diff_span("ab", "a``b"), (1..1, 1..3));
        assert_eq!(diff_span("héllo", "hello"), (1..3, 1..2));
        assert_eq!(diff_span("aa", "aaa"), (2..2, 2..3));
    }
}
