//! Scrolling headline display.
//!
//! The marquee is a grid of cells the size of its region's interior. Text
//! is always written on the bottom row; every message boundary and every
//! wrap scrolls the grid up one row. Bytes arrive frame by frame, so all
//! parser state (a half-read UTF-8 sequence, a word still waiting for its
//! delimiter) survives across calls to [`Marquee::consume`].

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::channel::Frame;

/// Blank columns kept between the left border and the text.
pub const INSET: usize = 1;
/// Blank columns kept between the text and the right border.
pub const RIGHT_MARGIN: usize = 1;
/// Message-relative column where a leading `(` clause is aligned.
pub const CLAUSE_COLUMN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', bold: false }
    }
}

/// Write position inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarqueeCursor {
    pub line: usize,
    pub column: usize,
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseState {
    Normal,
    /// A space was seen; collecting the following word until the next
    /// space or newline decides whether it fits.
    Word(Vec<char>),
}

#[derive(Debug, Clone)]
pub struct Marquee {
    width: usize,
    height: usize,
    rows: VecDeque<Vec<Cell>>,
    cursor: MarqueeCursor,
    /// Characters placed since the last message boundary.
    placed: usize,
    state: ParseState,
    utf8: Vec<u8>,
    last_batch: Option<DateTime<Local>>,
}

impl Marquee {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: (0..height).map(|_| vec![Cell::default(); width]).collect(),
            cursor: MarqueeCursor {
                line: height.saturating_sub(1),
                column: INSET,
                highlight: false,
            },
            placed: 0,
            state: ParseState::Normal,
            utf8: Vec::new(),
            last_batch: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cursor(&self) -> MarqueeCursor {
        self.cursor
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// Row text with trailing blanks removed.
    pub fn line_text(&self, line: usize) -> String {
        self.rows
            .get(line)
            .map(|row| row.iter().map(|c| c.ch).collect::<String>())
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    pub fn last_batch(&self) -> Option<DateTime<Local>> {
        self.last_batch
    }

    /// Feed one frame. Parsing stops at the first zero byte.
    pub fn consume(&mut self, frame: &Frame) {
        self.consume_bytes(frame.payload());
        self.last_batch = Some(Local::now());
    }

    pub fn consume_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if byte == 0 {
                break;
            }
            self.feed_byte(byte);
        }
    }

    fn feed_byte(&mut self, byte: u8) {
        if self.utf8.is_empty() && byte.is_ascii() {
            self.feed_char(byte as char);
            return;
        }

        self.utf8.push(byte);
        match std::str::from_utf8(&self.utf8) {
            Ok(s) => {
                let decoded: Vec<char> = s.chars().collect();
                self.utf8.clear();
                for c in decoded {
                    self.feed_char(c);
                }
            }
            Err(e) if e.error_len().is_some() => {
                // Invalid sequence; the offending byte may start a new one.
                let pending = std::mem::take(&mut self.utf8);
                let valid = e.valid_up_to();
                for c in String::from_utf8_lossy(&pending[..valid]).chars() {
                    self.feed_char(c);
                }
                self.feed_char(char::REPLACEMENT_CHARACTER);
                let skip = valid + e.error_len().unwrap_or(1);
                for &b in &pending[skip..] {
                    self.feed_byte(b);
                }
            }
            Err(_) => {}
        }
    }

    fn feed_char(&mut self, c: char) {
        let text_width = self.text_width();
        let clause_pad = self.clause_pad();
        match &mut self.state {
            ParseState::Normal => match c {
                '\n' => self.end_message(),
                ' ' => self.state = ParseState::Word(Vec::new()),
                c if c.is_control() => {}
                c => self.place(c),
            },
            ParseState::Word(word) => match c {
                ' ' | '\n' => {
                    self.flush_word();
                    self.feed_char(c);
                }
                c if c.is_control() => {}
                c => {
                    word.push(c);
                    let pad = if word.first() == Some(&'(') { clause_pad } else { 0 };
                    if word.len() + 1 + pad >= text_width {
                        // Cannot fit on any line; break it where it stands.
                        self.flush_word();
                    }
                }
            },
        }
    }

    /// Place the pending space and word, wrapping first if the word would
    /// overflow the current line.
    fn flush_word(&mut self) {
        let ParseState::Word(word) = std::mem::replace(&mut self.state, ParseState::Normal) else {
            return;
        };

        let pad = if word.first() == Some(&'(') {
            self.clause_pad()
        } else {
            0
        };
        if word.len() + 1 + pad > self.available() {
            self.scroll();
            self.cursor.column = INSET;
        }
        self.place(' ');
        for c in word {
            self.place(c);
        }
    }

    /// Columns `place` would skip for a `(` that follows the pending space.
    fn clause_pad(&self) -> usize {
        CLAUSE_COLUMN.saturating_sub(self.placed + 1)
    }

    fn end_message(&mut self) {
        self.cursor.highlight = !self.cursor.highlight;
        self.scroll();
        // Keep a blank row under the top border between messages.
        if let Some(top) = self.rows.front_mut() {
            top.fill(Cell::default());
        }
        self.cursor.column = INSET;
        self.placed = 0;
    }

    fn place(&mut self, c: char) {
        if c == '(' && self.placed < CLAUSE_COLUMN {
            let pad = CLAUSE_COLUMN - self.placed;
            self.cursor.column = (self.cursor.column + pad).min(self.last_column());
            self.placed = CLAUSE_COLUMN;
        }

        if self.available() == 0 {
            self.scroll();
            self.cursor.column = INSET;
        }

        let bold = self.cursor.highlight;
        let (line, column) = (self.cursor.line, self.cursor.column);
        if let Some(cell) = self.rows.get_mut(line).and_then(|row| row.get_mut(column)) {
            *cell = Cell { ch: c, bold };
        }
        self.cursor.column += 1;
        self.placed += 1;
    }

    fn scroll(&mut self) {
        if self.height == 0 {
            return;
        }
        self.rows.pop_front();
        self.rows.push_back(vec![Cell::default(); self.width]);
    }

    /// Columns left on the current line before the right margin.
    fn available(&self) -> usize {
        self.width
            .saturating_sub(self.cursor.column + RIGHT_MARGIN)
    }

    fn text_width(&self) -> usize {
        self.width.saturating_sub(INSET + RIGHT_MARGIN)
    }

    fn last_column(&self) -> usize {
        self.width.saturating_sub(RIGHT_MARGIN + 1).max(INSET)
    }

    /// Adopt new interior dimensions, keeping the most recent rows.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }

        for row in self.rows.iter_mut() {
            row.resize(width, Cell::default());
        }
        while self.rows.len() > height {
            self.rows.pop_front();
        }
        while self.rows.len() < height {
            self.rows.push_front(vec![Cell::default(); width]);
        }

        self.width = width;
        self.height = height;
        self.cursor.line = height.saturating_sub(1);
        if self.available() == 0 {
            self.scroll();
            self.cursor.column = INSET;
        }
    }
}
