//! Text buffer behind the message input box.

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Clone, Default)]
pub struct Composer {
    buffer: String,
    /// Cursor position in characters, not bytes.
    cursor: usize,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.buffer, self.cursor);
        self.buffer.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        let byte_pos = char_to_byte_index(&self.buffer, self.cursor);
        self.buffer.insert_str(byte_pos, text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.buffer, self.cursor);
            self.buffer.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_pos = char_to_byte_index(&self.buffer, self.cursor);
            self.buffer.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Hand the buffer over for sending, or `None` if there is nothing but whitespace.
    ///
    /// A blank buffer is left exactly as it was.
    pub fn take_submission(&mut self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        self.cursor = 0;
        Some(std::mem::take(&mut self.buffer))
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> Composer {
        let mut composer = Composer::new();
        for c in text.chars() {
            composer.insert_char(c);
        }
        composer
    }

    #[test]
    fn test_typing_updates_buffer() {
        let composer = typed("hello");
        assert_eq!(composer.text(), "hello");
        assert_eq!(composer.cursor(), 5);
    }

    #[test]
    fn test_take_submission_clears_buffer_and_keeps_whitespace() {
        let mut composer = typed("  hi  ");
        assert_eq!(composer.take_submission().as_deref(), Some("  hi  "));
        assert_eq!(composer.text(), "");
        assert_eq!(composer.cursor(), 0);
    }

    #[test]
    fn test_blank_submission_leaves_buffer_untouched() {
        let mut composer = typed(" \t ");
        assert_eq!(composer.take_submission(), None);
        assert_eq!(composer.text(), " \t ");
        assert_eq!(composer.cursor(), 3);

        let mut empty = Composer::new();
        assert_eq!(empty.take_submission(), None);
    }

    #[test]
    fn test_editing_in_the_middle_is_utf8_safe() {
        let mut composer = typed("héllo");
        composer.move_left();
        composer.move_left();
        composer.move_left();
        composer.backspace();
        assert_eq!(composer.text(), "hllo");

        composer.insert_char('ë');
        assert_eq!(composer.text(), "hëllo");

        composer.delete();
        assert_eq!(composer.text(), "hëlo");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut composer = typed("ab");
        composer.move_right();
        assert_eq!(composer.cursor(), 2);
        composer.move_home();
        composer.move_left();
        assert_eq!(composer.cursor(), 0);
        composer.backspace();
        assert_eq!(composer.text(), "ab");
        composer.move_end();
        composer.delete();
        assert_eq!(composer.text(), "ab");
    }

    #[test]
    fn test_paste_inserts_at_cursor() {
        let mut composer = typed("ac");
        composer.move_left();
        composer.insert_str("b\nb");
        assert_eq!(composer.text(), "ab\nbc");
        assert_eq!(composer.cursor(), 4);
    }
}
