//! Presentation helpers shared by the dashboard components

use chrono::NaiveDateTime;

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Provider icon artwork sizes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconSize {
    /// Current conditions card
    Large,
    /// Forecast tile
    Small,
}

impl IconSize {
    fn suffix(self) -> &'static str {
        match self {
            IconSize::Large => "@4x",
            IconSize::Small => "@2x",
        }
    }
}

pub fn icon_url(icon: &str, size: IconSize) -> String {
    format!(
        "{ICON_URL_BASE}/{}{}.png",
        urlencoding::encode(icon),
        size.suffix()
    )
}

/// Terminal stand-in for the provider icon, keyed on the condition prefix
pub fn icon_glyph(icon: &str) -> &'static str {
    let night = icon.ends_with('n');
    match icon.get(..2) {
        Some("01") if night => "🌙",
        Some("01") => "☀️",
        Some("02") => "⛅",
        Some("03") | Some("04") => "☁️",
        Some("09") => "🌧️",
        Some("10") => "🌦️",
        Some("11") => "⛈️",
        Some("13") => "❄️",
        Some("50") => "🌫️",
        _ => "·",
    }
}

/// Round to the nearest whole degree, halves toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// "Wed, May 1" for a `YYYY-MM-DD HH:MM:SS` timestamp; the raw text otherwise.
pub fn date_label(timestamp_text: &str) -> String {
    match NaiveDateTime::parse_from_str(timestamp_text, TIMESTAMP_FORMAT) {
        Ok(parsed) => parsed.format("%a, %b %-d").to_string(),
        Err(_) => sanitize(timestamp_text),
    }
}

/// Upper-case the first letter of every word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }
    out
}

/// Strip control characters from provider or user text before it reaches the terminal.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_control()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_url_sizes() {
        assert_eq!(
            icon_url("10d", IconSize::Large),
            "https://openweathermap.org/img/wn/10d@4x.png"
        );
        assert_eq!(
            icon_url("01n", IconSize::Small),
            "https://openweathermap.org/img/wn/01n@2x.png"
        );
    }

    #[test]
    fn test_icon_glyph() {
        assert_eq!(icon_glyph("01d"), "☀️");
        assert_eq!(icon_glyph("01n"), "🌙");
        assert_eq!(icon_glyph("13d"), "❄️");
        assert_eq!(icon_glyph(""), "·");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(21.5), 22);
        assert_eq!(round_half_up(21.49), 21);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
    }

    #[test]
    fn test_date_label() {
        assert_eq!(date_label("2024-05-01 12:00:00"), "Wed, May 1");
        assert_eq!(date_label("not a date"), "not a date");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("overcast  clouds"), "Overcast  Clouds");
    }

    #[test]
    fn test_sanitize_drops_escape_sequences() {
        assert_eq!(sanitize("Par\u{1b}[2Jis"), "Par[2Jis");
        assert_eq!(sanitize("São Paulo"), "São Paulo");
    }
}
