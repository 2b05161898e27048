//! Keyboard handling for the live view.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit the live view
    Quit,
    /// Save the current frame as a PNG snapshot
    Snapshot,
    /// Save the current frame as plain text
    SaveText,
    /// Key not bound to anything
    None,
}

/// Map a key event to an action.
///
/// Bindings: `s` snapshot, `t` save text, `q` / `Esc` / `Ctrl-C` quit.
pub fn handle_key_event(event: KeyEvent) -> KeyAction {
    // Key release/repeat events would double-trigger exports
    if event.kind != KeyEventKind::Press {
        return KeyAction::None;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => KeyAction::Quit,
            _ => KeyAction::None,
        };
    }

    match event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Snapshot,
        KeyCode::Char('t') | KeyCode::Char('T') => KeyAction::SaveText,
        _ => KeyAction::None,
    }
}
