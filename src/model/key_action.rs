//! Domain-level keyboard actions independent of key bindings.

/// Abstract navigation commands consumed by the application state.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Post navigation
    /// Focus the next post. Default: J/Tab
    NextPost,
    /// Focus the previous post. Default: K/Shift+Tab
    PrevPost,
    /// Focus the first post. Default: g/Home
    First,
    /// Focus the last post. Default: G/End
    Last,

    // Scrolling within the focused post
    /// Scroll the focused post down one row. Default: j/↓
    ScrollDown,
    /// Scroll the focused post up one row. Default: k/↑
    ScrollUp,
    /// Scroll the focused post down one window. Default: Ctrl+d/Page Down/Space
    PageDown,
    /// Scroll the focused post up one window. Default: Ctrl+u/Page Up
    PageUp,

    // Images
    /// Show or hide the focused post's image preview. Default: i/Enter
    ToggleImage,

    // Application
    /// Exit the application. Default: q/Esc/Ctrl+c
    Quit,
}
