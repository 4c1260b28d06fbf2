use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Colour;

/// `accent.json`.
///
/// Both colours are stored as `#RRGGBB` strings. An empty
/// `accent_color_fetched` means no wallpaper has been sampled yet. Either
/// colour holding a non-string value reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccentConfig {
    #[serde(default, deserialize_with = "super::lenient")]
    pub accent_color_main: String,

    #[serde(default, deserialize_with = "super::lenient")]
    pub accent_color_fetched: String,

    /// Keys this crate does not use.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccentConfig {
    /// Typed view of a raw `accent.json` object.
    pub fn from_object(doc: &Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(doc.clone())).unwrap_or_default()
    }

    /// The active accent, if it parses.
    pub fn main_colour(&self) -> Option<Colour> {
        Colour::from_hex(&self.accent_color_main).ok()
    }

    /// The last fetched colour; `None` for the empty sentinel.
    pub fn fetched_colour(&self) -> Option<Colour> {
        if self.accent_color_fetched.is_empty() {
            return None;
        }
        Colour::from_hex(&self.accent_color_fetched).ok()
    }
}
