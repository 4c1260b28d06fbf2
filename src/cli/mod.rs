pub mod completions;
pub mod convert;
pub mod eval;
pub mod fetch;
pub mod theme;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{ConfigDir, DEFAULT_CONFIG_DIR};

/// matucalc - a themed calculator with wallpaper-derived accents
#[derive(Parser, Debug)]
#[command(name = "matucalc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding prefs.json and accent.json
    #[arg(long, global = true, env = "MATUCALC_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> ConfigDir {
        ConfigDir::new(&self.config_dir)
    }

    /// Default `tracing` filter directive for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate calculator expressions
    Eval(eval::EvalArgs),

    /// Replay key presses through the calculator display
    Press(eval::PressArgs),

    /// Derive an accent colour from a wallpaper image
    Fetch(fetch::FetchArgs),

    /// Show or change the theme
    Theme(theme::ThemeArgs),

    /// Scale a colour's channels by a factor
    Adjust(theme::AdjustArgs),

    /// Invert a colour
    Invert(theme::InvertArgs),

    /// Collect images into a directory as JPEGs
    Convert(convert::ConvertArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
