//! Keyboard bindings.
//!
//! This module owns the key-to-command mapping so the event loop stays
//! agnostic about concrete bindings and `crossterm` specifics.

use battle_core::PlayerAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// High-level outcome of processing a keyboard event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Submit the action to the runtime.
    Submit(PlayerAction),
    /// No meaningful command was produced.
    None,
}

/// Converts a raw key event into a higher-level command.
pub fn handle_key(key: KeyEvent) -> KeyAction {
    // Raw mode swallows SIGINT.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
            'a' | ' ' => KeyAction::Submit(PlayerAction::Attack),
            'h' => KeyAction::Submit(PlayerAction::Heal),
            'q' => KeyAction::Quit,
            _ => KeyAction::None,
        },
        KeyCode::Enter => KeyAction::Submit(PlayerAction::Attack),
        KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::None,
    }
}
