//! Human-friendly durations such as `"30m"` or `"1h"`.

use serde::{de, Deserialize, Deserializer};

/// Parse an interval like `"1h"`, `"30m"`, `"1d"`, `"60s"` or raw seconds.
pub fn parse_interval(s: &str) -> Result<u64, String> {
    let s = s.trim().to_lowercase();

    let (digits, unit) = match s.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&s[..i], c),
        _ => (s.as_str(), 's'),
    };

    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => {
            return Err(format!(
                "Invalid interval: {}. Use format like '1h', '30m', '1d'",
                s
            ))
        }
    };

    let invalid = || format!("Invalid interval: {}. Use format like '1h', '30m', '1d'", s);
    let n = digits.trim().parse::<u64>().map_err(|_| invalid())?;
    if n == 0 {
        return Err(format!("Invalid interval: {}. Must be at least one second", s));
    }
    n.checked_mul(multiplier).ok_or_else(invalid)
}

/// Render seconds in the largest unit that divides them evenly.
pub fn format_interval(secs: u64) -> String {
    if secs >= 86400 && secs % 86400 == 0 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInterval {
    Seconds(u64),
    Text(String),
}

/// Accepts either an integer number of seconds or an interval string.
pub(crate) fn deserialize_interval<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawInterval::deserialize(deserializer)? {
        RawInterval::Seconds(0) => Err(de::Error::custom(
            "Invalid interval: 0. Must be at least one second",
        )),
        RawInterval::Seconds(secs) => Ok(secs),
        RawInterval::Text(text) => parse_interval(&text).map_err(de::Error::custom),
    }
}
