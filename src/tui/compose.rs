//! Multi-line input buffer for outgoing messages.
//!
//! The buffer is a flat character sequence laid out row by row over the
//! compose region. `cursor + pending_right == len` always holds:
//! `pending_right` counts the characters the cursor has been moved back
//! over, and `Right` may only walk forward across those.

/// Hard cap on the length of one message.
pub const MESGSIZE: usize = 512;
/// Blank columns on each side of the text inside the compose border.
pub const INPUT_INSET: usize = 1;

#[derive(Debug, Clone)]
pub struct ComposeBuffer {
    chars: Vec<char>,
    cursor: usize,
    pending_right: usize,
    lines: usize,
    columns: usize,
}

impl ComposeBuffer {
    /// Buffer for a region whose interior (inside the border) is
    /// `width` by `height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            chars: Vec::new(),
            cursor: 0,
            pending_right: 0,
            lines: height,
            columns: width.saturating_sub(2 * INPUT_INSET),
        }
    }

    pub fn capacity(&self) -> usize {
        MESGSIZE.min(self.lines * self.columns)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pending_right(&self) -> usize {
        self.pending_right
    }

    /// Type a character. Overwrites when the cursor was moved back,
    /// appends otherwise. Control characters and a full buffer are no-ops.
    pub fn insert(&mut self, c: char) -> bool {
        if c.is_control() || self.cursor >= self.capacity() {
            return false;
        }

        if self.cursor < self.chars.len() {
            self.chars[self.cursor] = c;
            self.pending_right -= 1;
        } else {
            self.chars.push(c);
        }
        self.cursor += 1;
        true
    }

    /// Erase the character before the cursor and everything after it.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.truncate(self.cursor);
        self.pending_right = 0;
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.pending_right += 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.pending_right == 0 {
            return false;
        }
        self.cursor += 1;
        self.pending_right -= 1;
        true
    }

    /// Take the whole message, leaving the buffer empty.
    pub fn submit(&mut self) -> Option<String> {
        if self.chars.is_empty() {
            return None;
        }
        let message = self.text();
        self.chars.clear();
        self.cursor = 0;
        self.pending_right = 0;
        Some(message)
    }

    /// Cursor as `(line, column)` relative to the text area. A full last
    /// line leaves the cursor one past its final column.
    pub fn cursor_position(&self) -> (usize, usize) {
        if self.columns == 0 || self.lines == 0 {
            return (0, 0);
        }
        let line = (self.cursor / self.columns).min(self.lines - 1);
        (line, self.cursor - line * self.columns)
    }

    /// Buffer contents split into region rows.
    pub fn display_lines(&self) -> Vec<String> {
        if self.columns == 0 {
            return Vec::new();
        }
        self.chars
            .chunks(self.columns)
            .take(self.lines)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }

    /// Adopt a new region size, truncating text that no longer fits.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.lines = height;
        self.columns = width.saturating_sub(2 * INPUT_INSET);

        let capacity = self.capacity();
        if self.chars.len() > capacity {
            self.chars.truncate(capacity);
        }
        self.cursor = self.cursor.min(self.chars.len());
        self.pending_right = self.chars.len() - self.cursor;
    }
}
