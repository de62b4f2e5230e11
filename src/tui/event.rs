use std::time::{Duration, Instant};

/// Two presses on the same cell closer together than this count as a
/// double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    Backspace,
    MoveLeft,
    MoveRight,
    Insert(char),
    None,
}

/// Detects double clicks from a stream of left-button presses.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    last: Option<(Instant, u16, u16)>,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DOUBLE_CLICK_WINDOW)
    }
}

impl ClickTracker {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Record a press at `(column, row)`. Returns true when it completes
    /// a double click; the pair is then consumed.
    pub fn register(&mut self, column: u16, row: u16, now: Instant) -> bool {
        let double = match self.last {
            Some((at, c, r)) => {
                c == column && r == row && now.saturating_duration_since(at) <= self.window
            }
            None => false,
        };

        self.last = if double { None } else { Some((now, column, row)) };
        double
    }
}
