/*!
 * # Editing
 *
 * Everything that turns a key press or a toolbar command into new buffer
 * text plus a new selection.
 *
 * ## Flow
 *
 * 1. The host reports key presses to [`Session::key_down`] and commands to
 *    [`Session::exec_command`].
 * 2. Commands compile to a [`WrapSpec`] (`commands`), Enter and Tab go
 *    through [`ListContinuation`] (`continuation`).
 * 3. The resulting [`Edit`] is committed with [`Session::apply_edit`], which
 *    applies a minimal xi-rope delta and returns a [`Patch`].
 * 4. After redrawing, the host passes the patch token to
 *    [`Session::apply_pending_selection`].
 *
 * ## Module Structure
 *
 * - **`selection`**: `SelectionRange`
 * - **`edit`**: `Edit` and the deferred `NewSelection`
 * - **`wrap`**: the selection wrapper
 * - **`key_history`**: last two keys, for double-Enter detection
 * - **`ordered_list`**: ordinal extraction
 * - **`continuation`**: Enter and Tab hooks for lists
 * - **`commands`**: `Cmd` and its compilation to wraps
 * - **`patch`**: edit result metadata and commit tokens
 * - **`session`**: the buffer, its selection and the two-phase commit
 *
 * ```rust
 * use markdown_wrap_engine::editing::*;
 *
 * let mut session = Session::from_bytes(b"3. item").unwrap();
 * session.key_down("Enter");
 * let patch = session.press_enter();
 * // host redraws here
 * assert!(session.apply_pending_selection(patch.token));
 * assert_eq!(session.text(), "3. item\n4. ");
 * ```
 */

pub mod commands;
pub mod continuation;
pub mod edit;
pub mod key_history;
pub mod ordered_list;
pub mod patch;
pub mod selection;
pub mod session;
pub mod wrap;

pub use commands::{Cmd, CommandError, Placeholders, compile_command};
pub use continuation::{
    IndentFn, LineIndent, ListContinuation, MarkerRewrite, TabIndent, default_indent, default_tab,
};
pub use edit::{Edit, NewSelection};
pub use key_history::{ENTER, KeyHistory};
pub use ordered_list::ordered_list_number;
pub use patch::{EditToken, Patch};
pub use selection::SelectionRange;
pub use session::Session;
pub use wrap::{WrapSpec, wrap};
