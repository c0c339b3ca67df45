use crate::autocomplete::{Autocomplete, EditorEvent, Outcome};
use crate::completion::AutocompleteIndex;
use crate::edit_state::{char_count, char_to_byte_index};

const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Char(char),
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Move(CursorMove),
}

/// Multi-line SQL buffer with the suggestion box attached.
///
/// Keys go to the suggestion box first; whatever it passes through is
/// applied as ordinary editing.
#[derive(Debug, Default)]
pub struct QueryEditor {
    content: String,
    cursor: usize,
    autocomplete: Autocomplete,
}

impl QueryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn autocomplete(&self) -> &Autocomplete {
        &self.autocomplete
    }

    /// Replaces the whole buffer, e.g. with a freshly generated query.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = char_count(&self.content);
        self.autocomplete.reset();
    }

    pub fn clear(&mut self) {
        self.set_content(String::new());
    }

    pub fn blur(&mut self, index: &AutocompleteIndex) {
        self.autocomplete.handle(EditorEvent::Blur, index);
    }

    /// Returns `false` when the key meant nothing to the editor (Escape with
    /// no suggestions open), so the caller may use it.
    pub fn handle_key(&mut self, key: EditorKey, index: &AutocompleteIndex) -> bool {
        let routed = match key {
            EditorKey::Move(CursorMove::Down) => Some(EditorEvent::ArrowDown),
            EditorKey::Move(CursorMove::Up) => Some(EditorEvent::ArrowUp),
            EditorKey::Tab => Some(EditorEvent::Tab),
            EditorKey::Enter => Some(EditorEvent::Enter),
            EditorKey::Escape => Some(EditorEvent::Escape),
            _ => None,
        };
        if let Some(event) = routed {
            match self.autocomplete.handle(event, index) {
                Outcome::Handled => return true,
                Outcome::Apply(splice) => {
                    self.content = splice.apply(&self.content);
                    self.cursor = splice.cursor;
                    return true;
                }
                Outcome::PassThrough => {}
            }
        }

        match key {
            EditorKey::Char(c) => self.insert_str(&c.to_string(), index),
            EditorKey::Enter => self.insert_str("\n", index),
            EditorKey::Tab => self.insert_str(&" ".repeat(TAB_WIDTH), index),
            EditorKey::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let byte_idx = char_to_byte_index(&self.content, self.cursor);
                    self.content.remove(byte_idx);
                }
                self.notify_text_changed(index);
            }
            EditorKey::Delete => {
                if self.cursor < char_count(&self.content) {
                    let byte_idx = char_to_byte_index(&self.content, self.cursor);
                    self.content.remove(byte_idx);
                }
                self.notify_text_changed(index);
            }
            EditorKey::Move(movement) => {
                self.cursor = self.moved_cursor(movement);
                self.autocomplete.handle(
                    EditorEvent::CursorMoved {
                        content: self.content.clone(),
                        cursor: self.cursor,
                    },
                    index,
                );
            }
            EditorKey::Escape => return false,
        }
        true
    }

    fn insert_str(&mut self, text: &str, index: &AutocompleteIndex) {
        let byte_idx = char_to_byte_index(&self.content, self.cursor);
        self.content.insert_str(byte_idx, text);
        self.cursor += char_count(text);
        self.notify_text_changed(index);
    }

    fn notify_text_changed(&mut self, index: &AutocompleteIndex) {
        self.autocomplete.handle(
            EditorEvent::TextChanged {
                content: self.content.clone(),
                cursor: self.cursor,
            },
            index,
        );
    }

    /// (line, column) of the cursor, both zero-based, in chars.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let (lines, line) = self.line_layout();
        let (start, _) = lines[line];
        (line, self.cursor - start)
    }

    // (start, len) per line plus the cursor's line.
    fn line_layout(&self) -> (Vec<(usize, usize)>, usize) {
        let mut lines = Vec::new();
        let mut start = 0;
        for line in self.content.split('\n') {
            let len = char_count(line);
            lines.push((start, len));
            start += len + 1;
        }
        let current = lines
            .iter()
            .position(|(s, l)| self.cursor >= *s && self.cursor <= s + l)
            .unwrap_or(0);
        (lines, current)
    }

    fn moved_cursor(&self, movement: CursorMove) -> usize {
        let total = char_count(&self.content);
        let (lines, line) = self.line_layout();
        let (start, len) = lines[line];
        let col = self.cursor - start;

        match movement {
            CursorMove::Left => self.cursor.saturating_sub(1),
            CursorMove::Right => (self.cursor + 1).min(total),
            CursorMove::Home => start,
            CursorMove::End => start + len,
            CursorMove::Up => match line.checked_sub(1) {
                Some(prev) => {
                    let (prev_start, prev_len) = lines[prev];
                    prev_start + col.min(prev_len)
                }
                None => self.cursor,
            },
            CursorMove::Down => match lines.get(line + 1) {
                Some((next_start, next_len)) => next_start + col.min(*next_len),
                None => self.cursor,
            },
        }
    }
}
