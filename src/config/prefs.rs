use serde::{Deserialize, Serialize};

use crate::theme::ThemeChoice;

/// `prefs.json`.
///
/// `theme` is kept as the raw string so an unknown value does not make the
/// whole document unreadable; [`Prefs::theme`] interprets it. A non-string
/// `theme` reads as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prefs {
    #[serde(
        default,
        deserialize_with = "super::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme: Option<String>,

    /// Keys this crate does not use.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Prefs {
    /// The selected theme, if it is one we know.
    pub fn theme(&self) -> Option<ThemeChoice> {
        self.theme.as_deref().and_then(|t| t.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefs() {
        let prefs: Prefs = serde_json::from_str(r#"{"theme": "fetched"}"#).unwrap();
        assert_eq!(prefs.theme(), Some(ThemeChoice::Fetched));
        assert!(prefs.extra.is_empty());
    }

    #[test]
    fn test_unknown_theme_is_none_but_kept() {
        let prefs: Prefs =
            serde_json::from_str(r#"{"theme": "solarized", "scale": 2}"#).unwrap();
        assert_eq!(prefs.theme(), None);

        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json["theme"], "solarized");
        assert_eq!(json["scale"], 2);
    }

    #[test]
    fn test_non_string_theme_is_unset() {
        let prefs: Prefs = serde_json::from_str(r#"{"theme": 3, "font": "Roboto"}"#).unwrap();
        assert_eq!(prefs.theme, None);
        assert_eq!(prefs.extra.get("font"), Some(&serde_json::json!("Roboto")));
    }

    #[test]
    fn test_empty_document() {
        let prefs: Prefs = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, Prefs::default());
        assert_eq!(serde_json::to_string(&prefs).unwrap(), "{}");
    }
}
