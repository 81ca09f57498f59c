//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings alongside arrow and paging keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only code and modifiers take part in the lookup; event kind and
    /// keyboard state flags are ignored.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };

        // Vim-style scrolling
        keys.bind(KeyCode::Char('j'), KeyModifiers::NONE, KeyAction::ScrollDown);
        keys.bind(KeyCode::Char('k'), KeyModifiers::NONE, KeyAction::ScrollUp);
        keys.bind(KeyCode::Char('g'), KeyModifiers::NONE, KeyAction::First);
        keys.bind(KeyCode::Char('G'), KeyModifiers::SHIFT, KeyAction::Last);

        // Arrow key scrolling
        keys.bind(KeyCode::Down, KeyModifiers::NONE, KeyAction::ScrollDown);
        keys.bind(KeyCode::Up, KeyModifiers::NONE, KeyAction::ScrollUp);
        keys.bind(KeyCode::Home, KeyModifiers::NONE, KeyAction::First);
        keys.bind(KeyCode::End, KeyModifiers::NONE, KeyAction::Last);

        // Page navigation
        keys.bind(KeyCode::Char('d'), KeyModifiers::CONTROL, KeyAction::PageDown);
        keys.bind(KeyCode::Char('u'), KeyModifiers::CONTROL, KeyAction::PageUp);
        keys.bind(KeyCode::PageDown, KeyModifiers::NONE, KeyAction::PageDown);
        keys.bind(KeyCode::PageUp, KeyModifiers::NONE, KeyAction::PageUp);
        keys.bind(KeyCode::Char(' '), KeyModifiers::NONE, KeyAction::PageDown);

        // Post navigation
        keys.bind(KeyCode::Char('J'), KeyModifiers::SHIFT, KeyAction::NextPost);
        keys.bind(KeyCode::Char('K'), KeyModifiers::SHIFT, KeyAction::PrevPost);
        keys.bind(KeyCode::Char('n'), KeyModifiers::NONE, KeyAction::NextPost);
        keys.bind(KeyCode::Char('p'), KeyModifiers::NONE, KeyAction::PrevPost);
        keys.bind(KeyCode::Tab, KeyModifiers::NONE, KeyAction::NextPost);
        keys.bind(KeyCode::BackTab, KeyModifiers::SHIFT, KeyAction::PrevPost);

        // Images
        keys.bind(KeyCode::Char('i'), KeyModifiers::NONE, KeyAction::ToggleImage);
        keys.bind(KeyCode::Enter, KeyModifiers::NONE, KeyAction::ToggleImage);

        // Application controls
        keys.bind(KeyCode::Char('q'), KeyModifiers::NONE, KeyAction::Quit);
        keys.bind(KeyCode::Esc, KeyModifiers::NONE, KeyAction::Quit);
        keys.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        keys
    }
}
