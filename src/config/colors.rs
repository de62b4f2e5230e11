//! Color configuration for the ticker regions.

use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Region borders.
    #[serde(deserialize_with = "deserialize_color")]
    pub border: Color,
    /// The centered " ticker " caption.
    #[serde(deserialize_with = "deserialize_color")]
    pub title: Color,
    /// Marquee text of plain entries.
    #[serde(deserialize_with = "deserialize_color")]
    pub text: Color,
    /// Marquee text of the alternate (bold) entries.
    #[serde(deserialize_with = "deserialize_color")]
    pub highlight: Color,
    /// Text typed into the compose region.
    #[serde(deserialize_with = "deserialize_color")]
    pub input: Color,
    /// Status decorations (mouse state, quit hint, version).
    #[serde(deserialize_with = "deserialize_color")]
    pub status: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            border: Color::Reset,
            title: Color::Reset,
            text: Color::Reset,
            highlight: Color::Reset,
            input: Color::Reset,
            status: Color::Reset,
        }
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color_string(&s).map_err(de::Error::custom)
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("gray", Color::Gray),
    ("grey", Color::Gray),
    ("darkgray", Color::DarkGray),
    ("darkgrey", Color::DarkGray),
    ("lightred", Color::LightRed),
    ("lightgreen", Color::LightGreen),
    ("lightyellow", Color::LightYellow),
    ("lightblue", Color::LightBlue),
    ("lightmagenta", Color::LightMagenta),
    ("lightcyan", Color::LightCyan),
    ("white", Color::White),
    ("reset", Color::Reset),
    ("default", Color::Reset),
];

/// Parse a named color (case-insensitive) or a `#RRGGBB` / `#RGB` hex code.
pub fn parse_color_string(s: &str) -> Result<Color, String> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| format!("Invalid hex color: {}", s));
    }

    let lower = s.to_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, color)| *color)
        .ok_or_else(|| format!("Unknown color: {}", s))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        // #RGB expands each digit: F -> FF
        3 => Some(Color::Rgb(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color_string("Yellow").unwrap(), Color::Yellow);
        assert_eq!(parse_color_string("LIGHTBLUE").unwrap(), Color::LightBlue);
        assert_eq!(parse_color_string("default").unwrap(), Color::Reset);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color_string("#1e90ff").unwrap(), Color::Rgb(30, 144, 255));
        assert_eq!(parse_color_string("#F80").unwrap(), Color::Rgb(255, 136, 0));
    }

    #[test]
    fn test_parse_invalid_colors() {
        assert!(parse_color_string("chartreuse").is_err());
        assert!(parse_color_string("#GG0000").is_err());
        assert!(parse_color_string("#1234").is_err());
        assert!(parse_color_string("#aÿbcd").is_err());
    }
}
