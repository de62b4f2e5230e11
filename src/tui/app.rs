use std::time::Instant;

use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::channel::Frame;
use crate::notifier::Notifier;
use crate::tui::compose::ComposeBuffer;
use crate::tui::event::{Action, ClickTracker};
use crate::tui::layout::{interior, regions};
use crate::tui::marquee::Marquee;

pub struct TuiApp {
    pub marquee: Marquee,
    pub compose: ComposeBuffer,
    pub clicks: ClickTracker,
    pub mouse_enabled: bool,
    /// Cell of the most recent double click.
    pub last_click: Option<(u16, u16)>,
    pub status_message: Option<String>,
    /// False once the producer side of the channel is gone.
    pub channel_open: bool,
    /// Show the terminal cursor in the compose region. Set by typing,
    /// cleared when headlines arrive.
    pub cursor_visible: bool,
    pub should_quit: bool,
    area: Rect,
    compose_height: u16,
}

impl TuiApp {
    pub fn new(area: Rect, compose_height: u16, mouse_enabled: bool) -> Self {
        let (marquee_area, compose_area) = regions(area, compose_height);
        let (marquee_width, marquee_height) = interior(marquee_area);
        let (compose_width, compose_lines) = interior(compose_area);

        Self {
            marquee: Marquee::new(marquee_width, marquee_height),
            compose: ComposeBuffer::new(compose_width, compose_lines),
            clicks: ClickTracker::default(),
            mouse_enabled,
            last_click: None,
            status_message: None,
            channel_open: true,
            cursor_visible: true,
            should_quit: false,
            area,
            compose_height,
        }
    }

    pub fn compose_height(&self) -> u16 {
        self.compose_height
    }

    /// Rebuild region geometry when the screen size changes.
    pub fn fit(&mut self, area: Rect) {
        if area == self.area {
            return;
        }

        let (marquee_area, compose_area) = regions(area, self.compose_height);
        let (width, height) = interior(marquee_area);
        self.marquee.resize(width, height);
        let (width, height) = interior(compose_area);
        self.compose.resize(width, height);
        self.area = area;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn mouse_status(&self) -> String {
        match (self.mouse_enabled, self.last_click) {
            (false, _) => " mouse off ".to_string(),
            (true, None) => " mouse on ".to_string(),
            (true, Some((column, row))) => format!(" mouse at ({}, {}) ", column, row),
        }
    }

    pub fn consume_frame(&mut self, frame: &Frame) {
        self.marquee.consume(frame);
        self.cursor_visible = false;
    }

    pub fn channel_closed(&mut self) {
        self.channel_open = false;
        self.set_status("news feed stopped");
    }

    /// Left-button press at a screen cell.
    pub fn click(&mut self, column: u16, row: u16, now: Instant) {
        if self.clicks.register(column, row, now) {
            self.last_click = Some((column, row));
        }
    }

    pub fn apply(&mut self, action: Action, notifier: &dyn Notifier) {
        self.cursor_visible = true;
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Submit => {
                if let Some(message) = self.compose.submit() {
                    info!("Submitting message ({} chars)", message.chars().count());
                    match notifier.notify(&message) {
                        Ok(()) => self.status_message = None,
                        Err(e) => {
                            warn!("Notifier failed: {}", e);
                            self.set_status(format!("notifier failed: {}", e));
                        }
                    }
                }
            }
            Action::Backspace => {
                self.compose.backspace();
            }
            Action::MoveLeft => {
                self.compose.move_left();
            }
            Action::MoveRight => {
                self.compose.move_right();
            }
            Action::Insert(c) => {
                self.compose.insert(c);
            }
            Action::None => {}
        }
    }
}
