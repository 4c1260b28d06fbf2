//! matucalc - a themed calculator with wallpaper-derived accent colours
//!
//! The library holds the calculator's expression evaluator and key-press
//! buffer, the accent colour pipeline (decode, quantize, pick), the colour
//! helpers and theme object used to tint the UI, and the JSON preference
//! files that tie them together.

pub mod accent;
pub mod calc;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod theme;
pub mod types;

pub use accent::{derive_accent, AccentSource, DeriveOptions, DerivedAccent, ImageSource};
pub use calc::{evaluate, BracketMode, DisplayBuffer, Key};
pub use config::{AccentConfig, ConfigDir, Prefs};
pub use convert::{convert_images, ConvertReport};
pub use error::{ConfigError, DerivationError, EvalError, MatuError, Result};
pub use theme::{adjust, invert, Theme, ThemeChoice};
pub use types::Colour;
