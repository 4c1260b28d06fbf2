//! Theme resolution.
//!
//! A [`Theme`] is computed once from the preference and accent documents and
//! handed to whatever draws the calculator, instead of every window
//! re-deriving its colours.

mod adjust;

pub use adjust::{adjust, adjust_colour, invert, invert_colour};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calc::Key;
use crate::config::{AccentConfig, Prefs};
use crate::types::Colour;

/// Accent used by the `light` theme.
pub const LIGHT_ACCENT: Colour = Colour::rgb(0xc8, 0xc8, 0xc8);

/// Accent used by the `dark` theme.
pub const DARK_ACCENT: Colour = Colour::rgb(0x37, 0x37, 0x37);

/// The theme picked in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    Light,
    Dark,
    /// Use the colour fetched from a wallpaper.
    Fetched,
}

impl ThemeChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeChoice::Light => "light",
            ThemeChoice::Dark => "dark",
            ThemeChoice::Fetched => "fetched",
        }
    }
}

impl fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeChoice::Light),
            "dark" => Ok(ThemeChoice::Dark),
            "fetched" => Ok(ThemeChoice::Fetched),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Which tint a key is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTint {
    Light,
    Neutral,
}

impl ButtonTint {
    /// Bracket and arithmetic keys are neutral, everything else light.
    pub fn for_key(key: Key) -> Self {
        match key {
            Key::Brackets => ButtonTint::Neutral,
            Key::Operator('%' | '÷' | '×' | '-' | '+') => ButtonTint::Neutral,
            _ => ButtonTint::Light,
        }
    }
}

/// Resolved UI colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub choice: Option<ThemeChoice>,
    /// The active accent (`accent_color_main`).
    pub accent: Option<Colour>,
    /// Calculator window background; `None` leaves the toolkit default.
    pub window: Option<Colour>,
    pub window_text: Colour,
    /// Background for the settings and about dialogs.
    pub dialog: Colour,
    pub dialog_text: Colour,
    pub light: Colour,
    pub dark: Colour,
    pub neutral: Colour,
    /// Text on keys and the display.
    pub text: Colour,
}

impl Theme {
    pub fn resolve(prefs: &Prefs, accent: &AccentConfig) -> Self {
        let choice = prefs.theme();
        let main = accent.main_colour();

        let window = match choice {
            Some(ThemeChoice::Light) => Some(adjust_colour(main, 1.2)),
            Some(ThemeChoice::Dark) => Some(adjust_colour(main, 0.8)),
            Some(ThemeChoice::Fetched) => accent.fetched_colour(),
            None => None,
        };

        let dialog = match choice {
            Some(ThemeChoice::Light) => adjust_colour(main, 1.2),
            _ => adjust_colour(main, 0.8),
        };

        Self {
            choice,
            accent: main,
            window,
            window_text: invert_colour(window),
            dialog,
            dialog_text: dialog.inverted(),
            light: adjust_colour(main, 1.5),
            dark: adjust_colour(main, 0.7),
            neutral: adjust_colour(main, 1.0),
            text: invert_colour(main),
        }
    }

    /// Background colour of a key.
    pub fn key_colour(&self, key: Key) -> Colour {
        match ButtonTint::for_key(key) {
            ButtonTint::Light => self.light,
            ButtonTint::Neutral => self.neutral,
        }
    }

    /// Named colours, in display order.
    pub fn entries(&self) -> Vec<(&'static str, Option<Colour>)> {
        vec![
            ("accent", self.accent),
            ("window", self.window),
            ("window-text", Some(self.window_text)),
            ("dialog", Some(self.dialog)),
            ("dialog-text", Some(self.dialog_text)),
            ("light", Some(self.light)),
            ("dark", Some(self.dark)),
            ("neutral", Some(self.neutral)),
            ("text", Some(self.text)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(choice: Option<&str>, main: &str, fetched: &str) -> Theme {
        let mut prefs = Prefs::default();
        prefs.theme = choice.map(str::to_string);
        let accent = AccentConfig {
            accent_color_main: main.to_string(),
            accent_color_fetched: fetched.to_string(),
            ..Default::default()
        };
        Theme::resolve(&prefs, &accent)
    }

    #[test]
    fn test_light_theme() {
        let t = theme(Some("light"), "#c8c8c8", "");
        assert_eq!(t.choice, Some(ThemeChoice::Light));
        assert_eq!(t.window, Some(Colour::rgb(240, 240, 240)));
        assert_eq!(t.window_text, Colour::rgb(15, 15, 15));
        assert_eq!(t.dialog, Colour::rgb(240, 240, 240));
        assert_eq!(t.light, Colour::rgb(255, 255, 255));
        assert_eq!(t.neutral, LIGHT_ACCENT);
        assert_eq!(t.text, Colour::rgb(55, 55, 55));
    }

    #[test]
    fn test_dark_theme() {
        let t = theme(Some("dark"), "#373737", "");
        assert_eq!(t.window, Some(Colour::rgb(44, 44, 44)));
        assert_eq!(t.dialog, Colour::rgb(44, 44, 44));
        assert_eq!(t.dark, Colour::rgb(38, 38, 38));
    }

    #[test]
    fn test_fetched_theme_uses_fetched_colour() {
        let t = theme(Some("fetched"), "#4285F4", "#4285F4");
        assert_eq!(t.window, Some(Colour::rgb(0x42, 0x85, 0xf4)));

        let unset = theme(Some("fetched"), "#4285F4", "");
        assert_eq!(unset.window, None);
        assert_eq!(unset.window_text, Colour::WHITE);
    }

    #[test]
    fn test_missing_accent_falls_back() {
        let t = theme(None, "", "");
        assert_eq!(t.window, None);
        assert_eq!(t.light, Colour::BLACK);
        assert_eq!(t.text, Colour::WHITE);
    }

    #[test]
    fn test_key_tints() {
        let t = theme(Some("light"), "#808080", "");
        assert_eq!(t.key_colour(Key::Operator('+')), t.neutral);
        assert_eq!(t.key_colour(Key::Brackets), t.neutral);
        assert_eq!(t.key_colour(Key::Digit('7')), t.light);
        assert_eq!(t.key_colour(Key::Operator('√')), t.light);
        assert_eq!(t.key_colour(Key::Equals), t.light);
    }

    #[test]
    fn test_theme_choice_parse() {
        assert_eq!("dark".parse::<ThemeChoice>(), Ok(ThemeChoice::Dark));
        assert!("blue".parse::<ThemeChoice>().is_err());
        assert_eq!(ThemeChoice::Fetched.to_string(), "fetched");
    }
}
