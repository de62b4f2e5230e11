//! Keybinding configuration for the compose region.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub submit: Vec<String>,
    pub backspace: Vec<String>,
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: vec!["F1".to_string(), "Ctrl+c".to_string()],
            submit: vec!["Enter".to_string()],
            backspace: vec!["Backspace".to_string(), "Ctrl+h".to_string()],
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
        }
    }
}

impl KeybindingConfig {
    /// Map a key event to an action. Printable characters that are not
    /// bound to anything come back as [`Action::Insert`].
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let bindings = [
            (&self.quit, Action::Quit),
            (&self.submit, Action::Submit),
            (&self.backspace, Action::Backspace),
            (&self.move_left, Action::MoveLeft),
            (&self.move_right, Action::MoveRight),
        ];

        for (keys, action) in bindings {
            if matches_key(key, keys) {
                return action;
            }
        }

        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Action::Insert(c)
            }
            _ => Action::None,
        }
    }

    /// First configured quit key, for the status hint.
    pub fn quit_hint(&self) -> String {
        match self.quit.as_slice() {
            [] => "Ctrl+c".to_string(),
            [only] => only.clone(),
            [first, second, ..] => format!("{} or {}", first, second),
        }
    }
}

fn matches_key(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|binding| parse_key_string(binding).ok())
        .any(|parsed| parsed.matches(key))
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse strings like `"a"`, `"Enter"`, `"F1"`, `"Ctrl+c"`, `"Shift+Left"`.
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    let mut parts: Vec<&str> = s.split('+').collect();
    // "+" on its own, or a trailing "+" key as in "Ctrl++"
    if s.ends_with('+') && parts.len() >= 2 {
        parts.truncate(parts.len() - 2);
        parts.push("+");
    }

    let Some((key_part, modifier_parts)) = parts.split_last() else {
        return Err("Empty key binding".to_string());
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in modifier_parts {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        };
    }

    Ok(KeyBinding {
        code: parse_key_code(key_part)?,
        modifiers,
    })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    match lower.as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        _ => Err(format!("Unknown key: {}", s)),
    }
}
