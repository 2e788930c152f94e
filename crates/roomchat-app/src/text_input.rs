//! Single-line editable text buffer.

/// Editable line with a cursor.
///
/// The cursor counts characters, not bytes, so multi-byte input edits
/// correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input holding `text` with the cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let buffer = text.into();
        let cursor = buffer.chars().count();
        Self { buffer, cursor }
    }

    /// Current contents.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.buffer.remove(at);
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_offset(self.cursor);
            self.buffer.remove(at);
        }
    }

    /// Move the cursor one character left.
    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one character right.
    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    /// Move the cursor to the start.
    pub fn home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end.
    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    /// Take the contents, leaving the input empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut input = TextInput::with_text("helo");
        input.left();
        input.insert('l');

        assert_eq!(input.as_str(), "hello");
        assert_eq!(input.cursor(), 4);

        input.home();
        input.delete();
        assert_eq!(input.as_str(), "ello");

        input.end();
        input.backspace();
        assert_eq!(input.as_str(), "ell");
    }

    #[test]
    fn multibyte_characters() {
        let mut input = TextInput::new();
        for c in "héllo✓".chars() {
            input.insert(c);
        }
        input.left();
        input.backspace();

        assert_eq!(input.as_str(), "héll✓");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut input = TextInput::with_text("ab");
        input.right();
        input.right();
        assert_eq!(input.cursor(), 2);

        input.home();
        input.left();
        input.backspace();
        assert_eq!(input.cursor(), 0);
        assert_eq!(input.as_str(), "ab");
    }

    #[test]
    fn take_resets() {
        let mut input = TextInput::with_text("hi");

        assert_eq!(input.take(), "hi");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }
}
