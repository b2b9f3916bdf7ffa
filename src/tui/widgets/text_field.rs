//! Single-line text field with cursor management.
//!
//! Used for the document name and the go-to path prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single-line input with a character limit.
pub struct TextField {
    content: String,
    /// Byte offset into `content`.
    cursor: usize,
    max_chars: usize,
}

impl TextField {
    pub fn new(max_chars: usize) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            max_chars,
        }
    }

    /// Apply an editing key. Returns false for keys the field ignores
    /// (Enter, Tab, Esc...), leaving them to the caller.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.insert_char(c);
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                self.clear();
                true
            }
            (_, KeyCode::Backspace) => {
                self.backspace();
                true
            }
            (_, KeyCode::Delete) => {
                self.delete();
                true
            }
            (_, KeyCode::Left) => {
                self.move_left();
                true
            }
            (_, KeyCode::Right) => {
                self.move_right();
                true
            }
            (_, KeyCode::Home) => {
                self.cursor = 0;
                true
            }
            (_, KeyCode::End) => {
                self.cursor = self.content.len();
                true
            }
            _ => false,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if c.is_control() || self.content.chars().count() >= self.max_chars {
            return;
        }
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    pub fn set_text(&mut self, text: &str) {
        self.content = text.chars().take(self.max_chars).collect();
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    /// Content without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }

    /// Whitespace-only counts as blank.
    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// Cursor column in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.content[..self.cursor].chars().count()
    }
}
