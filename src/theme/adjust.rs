//! Hex-string tint helpers.
//!
//! Both helpers accept `#rrggbb` or `rrggbb` in any case and always emit
//! lowercase `#rrggbb`. Malformed input never errors: `adjust` falls back
//! to black and `invert` to white.

use crate::types::Colour;

/// Scale each channel of `hex` by `factor`.
pub fn adjust(hex: &str, factor: f64) -> String {
    adjust_colour(Colour::from_hex(hex).ok(), factor).to_hex_lower()
}

/// Complement each channel of `hex`.
pub fn invert(hex: &str) -> String {
    invert_colour(Colour::from_hex(hex).ok()).to_hex_lower()
}

/// [`adjust`] for an already-parsed colour; `None` yields black.
pub fn adjust_colour(colour: Option<Colour>, factor: f64) -> Colour {
    colour.map_or(Colour::BLACK, |c| c.scaled(factor))
}

/// [`invert`] for an already-parsed colour; `None` yields white.
pub fn invert_colour(colour: Option<Colour>) -> Colour {
    colour.map_or(Colour::WHITE, Colour::inverted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_identity() {
        assert_eq!(adjust("#808080", 1.0), "#808080");
        assert_eq!(adjust("#C8C8C8", 1.0), "#c8c8c8");
    }

    #[test]
    fn test_adjust_clamps() {
        assert_eq!(adjust("#FFFFFF", 2.0), "#ffffff");
        assert_eq!(adjust("#808080", 10.0), "#ffffff");
        assert_eq!(adjust("#808080", -1.0), "#000000");
        assert_eq!(adjust("#808080", 0.0), "#000000");
    }

    #[test]
    fn test_adjust_truncates() {
        // 0x37 * 1.5 = 82.5 -> 82
        assert_eq!(adjust("#373737", 1.5), "#525252");
        // 0xc8 * 1.2 = 240
        assert_eq!(adjust("#c8c8c8", 1.2), "#f0f0f0");
        assert_eq!(adjust("#c8c8c8", 0.8), "#a0a0a0");
    }

    #[test]
    fn test_adjust_malformed_lengths() {
        assert_eq!(adjust("bad", 1.0), "#000000");
        assert_eq!(adjust("", 1.0), "#000000");
        assert_eq!(adjust("#", 1.0), "#000000");
        assert_eq!(adjust("#12345", 1.0), "#000000");
        assert_eq!(adjust("#1234567", 1.0), "#000000");
        assert_eq!(adjust("#zzzzzz", 1.0), "#000000");
    }

    #[test]
    fn test_adjust_without_hash() {
        assert_eq!(adjust("102030", 2.0), "#204060");
    }

    #[test]
    fn test_invert() {
        assert_eq!(invert("#000000"), "#ffffff");
        assert_eq!(invert("#FFFFFF"), "#000000");
        assert_eq!(invert("#123456"), "#edcba9");
    }

    #[test]
    fn test_invert_malformed() {
        assert_eq!(invert("bad"), "#ffffff");
        assert_eq!(invert(""), "#ffffff");
        assert_eq!(invert("#12345"), "#ffffff");
    }

    #[test]
    fn test_invert_round_trip() {
        for hex in ["#000000", "#FFFFFF", "#4285F4", "#c8c8c8", "#0a0B0c", "7f8081"] {
            let expected = format!("#{}", hex.trim_start_matches('#').to_lowercase());
            assert_eq!(invert(&invert(hex)), expected);
        }
    }
}
