//! UTF-8 safe text input state with cursor management.
//!
//! Shared by the upload path input and the contact message editor.

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when the buffer holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty()
    }

    pub fn set_input(&mut self, s: impl Into<String>) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Empty the buffer and return what it held.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = self.input[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input[self.cursor..]
            .find('\n')
            .map_or(self.input.len(), |i| self.cursor + i);
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            let start = self.cursor - prev.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.input.drain(self.cursor..self.cursor + next.len_utf8());
        }
    }

    /// Line and column (in chars) of the cursor, for placing the terminal cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.input[..self.cursor];
        let line = before.matches('\n').count();
        let col = before.rsplit('\n').next().map_or(0, |tail| tail.chars().count());
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut st = TextInputState::new();
        st.set_input("h\u{1F642}llo");
        st.move_home();
        st.move_right();
        st.insert_char('e');
        assert_eq!(st.input(), "he\u{1F642}llo");
        st.move_right();
        st.backspace();
        assert_eq!(st.input(), "hello");
        st.move_left();
        st.backspace();
        assert_eq!(st.input(), "ello");
        st.delete();
        assert_eq!(st.input(), "llo");
    }

    #[test]
    fn multiline_cursor_tracking() {
        let mut st = TextInputState::new();
        for c in "Hi there\nI can help".chars() {
            st.insert_char(c);
        }
        assert_eq!(st.cursor_line_col(), (1, 10));
        st.move_home();
        assert_eq!(st.cursor_line_col(), (1, 0));
        st.move_left();
        st.move_home();
        assert_eq!(st.cursor_line_col(), (0, 0));
        st.move_end();
        assert_eq!(st.cursor_line_col(), (0, 8));

        assert!(!st.is_blank());
        assert_eq!(st.take(), "Hi there\nI can help");
        assert!(st.is_blank());
        assert_eq!(st.cursor(), 0);
    }
}
