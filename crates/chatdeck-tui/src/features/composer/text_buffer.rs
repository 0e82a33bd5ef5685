//! Editable text with a cursor.
//!
//! The text is stored as one `String`; lines are derived by splitting on
//! `\n`. The cursor is a char offset into the whole text, so multi-line
//! edits never have to splice line vectors.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    /// Char offset into `text`.
    cursor: usize,
}

impl TextBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the text and puts the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        if self.text == text {
            return;
        }
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Cursor position as (row, col) in chars.
    pub fn cursor(&self) -> (usize, usize) {
        let before: String = self.text.chars().take(self.cursor).collect();
        let row = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map_or(0, |line| line.chars().count());
        (row, col)
    }

    pub fn insert_str(&mut self, text: &str) {
        let byte = self.byte_at(self.cursor);
        self.text.insert_str(byte, text);
        self.cursor += text.chars().count();
    }

    pub fn insert_char(&mut self, ch: char) {
        let byte = self.byte_at(self.cursor);
        self.text.insert(byte, ch);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Backspace.
    pub fn delete_prev_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.delete_chars(self.cursor - 1, self.cursor);
        self.cursor -= 1;
    }

    /// Delete.
    pub fn delete_next_char(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        self.delete_chars(self.cursor, self.cursor + 1);
    }

    /// Deletes the word (or run of punctuation / whitespace) left of the cursor.
    pub fn delete_word_left(&mut self) {
        let start = self.word_left_target();
        self.delete_chars(start, self.cursor);
        self.cursor = start;
    }

    /// Deletes from the start of the current line to the cursor.
    pub fn delete_to_line_start(&mut self) {
        let start = self.line_start(self.cursor);
        self.delete_chars(start, self.cursor);
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    pub fn move_end(&mut self) {
        self.cursor = self.line_end(self.cursor);
    }

    pub fn move_up(&mut self) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            return;
        }
        let col = self.cursor - start;
        let prev_start = self.line_start(start - 1);
        let prev_len = start - 1 - prev_start;
        self.cursor = prev_start + col.min(prev_len);
    }

    pub fn move_down(&mut self) {
        let end = self.line_end(self.cursor);
        if end >= self.char_len() {
            return;
        }
        let col = self.cursor - self.line_start(self.cursor);
        let next_start = end + 1;
        let next_len = self.line_end(next_start) - next_start;
        self.cursor = next_start + col.min(next_len);
    }

    /// Applies an editing key. Returns whether the key was understood.
    ///
    /// `Enter` is not handled here; callers decide between send and newline.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('w') if ctrl => self.delete_word_left(),
            KeyCode::Char('u') if ctrl => self.delete_to_line_start(),
            KeyCode::Char('a') if ctrl => self.move_home(),
            KeyCode::Char('e') if ctrl => self.move_end(),
            KeyCode::Char(ch) if !ctrl && !alt => self.insert_char(ch),
            KeyCode::Backspace if alt => self.delete_word_left(),
            KeyCode::Backspace => self.delete_prev_char(),
            KeyCode::Delete => self.delete_next_char(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn delete_chars(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let range = self.byte_at(start)..self.byte_at(end);
        self.text.replace_range(range, "");
    }

    fn line_start(&self, char_idx: usize) -> usize {
        let chars: Vec<char> = self.text.chars().take(char_idx).collect();
        chars
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |pos| pos + 1)
    }

    fn line_end(&self, char_idx: usize) -> usize {
        self.text
            .chars()
            .skip(char_idx)
            .position(|c| c == '\n')
            .map_or(self.char_len(), |pos| char_idx + pos)
    }

    fn word_left_target(&self) -> usize {
        let chars: Vec<char> = self.text.chars().take(self.cursor).collect();
        let Some(&last) = chars.last() else {
            return 0;
        };
        let class = char_class(last);
        let mut idx = chars.len();
        while idx > 0 && char_class(chars[idx - 1]) == class {
            idx -= 1;
        }
        idx
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CharClass {
    Newline,
    Whitespace,
    Word,
    Punct,
}

fn char_class(c: char) -> CharClass {
    if c == '\n' {
        CharClass::Newline
    } else if c.is_whitespace() {
        CharClass::Whitespace
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}
