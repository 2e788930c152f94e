//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Tab key (switch login field).
    Tab,
    /// Escape key (close preview, otherwise quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key (scroll back one message).
    Up,
    /// Down arrow key (scroll forward one message).
    Down,
    /// Page up key.
    PageUp,
    /// Page down key.
    PageDown,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end, follow newest message).
    End,
}
