// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// orchestrator, or into local ViewState mutations (login cursor, bid entry,
// confirmation prompts).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::protocol::{SessionRole, UserCommand};

use super::ViewState;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the orchestrator. Returns `None` when the key press was handled locally
/// by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch).
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if state.session.is_none() {
        return handle_login_keys(key_event, state);
    }

    if state.confirm_reset {
        return handle_confirm_reset(key_event, state);
    }

    let role = state.session.as_ref().map(|s| s.role);

    match key_event.code {
        KeyCode::Char('q') => Some(UserCommand::Quit),

        // Esc: clear local entry first, then fall back to logging out.
        KeyCode::Esc => {
            if !state.bid_input.is_empty() {
                state.bid_input.clear();
                None
            } else {
                Some(UserCommand::Logout)
            }
        }

        // Players panel scrolling.
        KeyCode::Up | KeyCode::Char('k') => {
            state.players_scroll = state.players_scroll.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.players_scroll + 1 < state.unassigned.len() {
                state.players_scroll += 1;
            }
            None
        }

        // Operator controls.
        KeyCode::Char('s') if role == Some(SessionRole::Operator) => {
            Some(UserCommand::StartAuction)
        }
        KeyCode::Char(' ') if role == Some(SessionRole::Operator) => {
            Some(UserCommand::TogglePause)
        }
        KeyCode::Char('f') if role == Some(SessionRole::Operator) => {
            if state.operator_finalize {
                Some(UserCommand::Finalize)
            } else {
                None
            }
        }
        KeyCode::Char('u') if role == Some(SessionRole::Operator) => Some(UserCommand::Undo),
        KeyCode::Char('R') if role == Some(SessionRole::Operator) => {
            state.confirm_reset = true;
            None
        }

        // Leader bid entry.
        KeyCode::Char(c) if c.is_ascii_digit() && matches!(role, Some(SessionRole::Leader(_))) => {
            if state.bid_input.len() < 6 {
                state.bid_input.push(c);
            }
            None
        }
        KeyCode::Backspace if matches!(role, Some(SessionRole::Leader(_))) => {
            state.bid_input.pop();
            None
        }
        KeyCode::Enter if matches!(role, Some(SessionRole::Leader(_))) => {
            let amount = state.bid_input.parse::<u32>().ok()?;
            state.bid_input.clear();
            Some(UserCommand::Bid { amount })
        }

        _ => None,
    }
}

/// Login screen: cursor movement, passcode entry, and submission.
fn handle_login_keys(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('q') if state.passcode_input.is_empty() => Some(UserCommand::Quit),

        KeyCode::Up => {
            state.login_cursor = state.login_cursor.saturating_sub(1);
            None
        }
        KeyCode::Down => {
            if state.login_cursor + 1 < state.login_users.len() {
                state.login_cursor += 1;
            }
            None
        }

        KeyCode::Char(c) if !c.is_control() => {
            if login_needs_passcode(state) && state.passcode_input.len() < 32 {
                state.passcode_input.push(c);
            }
            None
        }
        KeyCode::Backspace => {
            state.passcode_input.pop();
            None
        }
        KeyCode::Esc => {
            state.passcode_input.clear();
            None
        }

        KeyCode::Enter => {
            let user = state.login_users.get(state.login_cursor)?;
            let passcode = if login_needs_passcode(state) {
                Some(std::mem::take(&mut state.passcode_input))
            } else {
                None
            };
            Some(UserCommand::Login {
                user: user.name.clone(),
                passcode,
            })
        }

        _ => None,
    }
}

/// Whether the currently highlighted login entry asks for a passcode.
fn login_needs_passcode(state: &ViewState) -> bool {
    state.passcode_required
        && state
            .login_users
            .get(state.login_cursor)
            .map(|u| u.role != SessionRole::Observer)
            .unwrap_or(false)
}

/// Reset confirmation prompt: y confirms, anything else cancels.
fn handle_confirm_reset(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    state.confirm_reset = false;
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserCommand::ResetAll),
        _ => None,
    }
}
