//! Theme settings and the colour helpers behind them.

use clap::{Args, Subcommand};

use crate::config::ConfigDir;
use crate::error::Result;
use crate::output::Printer;
use crate::theme::{adjust, invert, Theme, ThemeChoice};

/// Show or change the theme
#[derive(Args, Debug)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommand {
    /// Print the resolved theme colours
    Show,

    /// Pick a theme, as the settings dialog's OK button does
    Set {
        #[arg(value_enum)]
        choice: ThemeChoice,
    },
}

pub fn run(args: ThemeArgs, config: &ConfigDir, printer: &Printer) -> Result<()> {
    match args.command {
        ThemeCommand::Show => show(config, printer),
        ThemeCommand::Set { choice } => {
            let main = config.commit_theme(choice)?;
            printer.status("Applied", &format!("{} theme, accent {}", choice, printer.swatch(main)));
            Ok(())
        }
    }
}

fn show(config: &ConfigDir, printer: &Printer) -> Result<()> {
    let theme = Theme::resolve(&config.load_prefs(), &config.load_accent());

    match theme.choice {
        Some(choice) => printer.info("Theme", choice.as_str()),
        None => printer.warning("Theme", "not set, using toolkit defaults"),
    }

    for (name, colour) in theme.entries() {
        match colour {
            Some(colour) => println!("{name:<12} {colour}"),
            None => println!("{name:<12} -"),
        }
    }
    Ok(())
}

/// Scale a colour's channels by a factor
#[derive(Args, Debug)]
pub struct AdjustArgs {
    /// Colour as #RRGGBB
    pub hex: String,

    /// Multiplier applied to each channel
    #[arg(allow_hyphen_values = true)]
    pub factor: f64,
}

pub fn run_adjust(args: AdjustArgs) -> Result<()> {
    println!("{}", adjust(&args.hex, args.factor));
    Ok(())
}

/// Invert a colour
#[derive(Args, Debug)]
pub struct InvertArgs {
    /// Colour as #RRGGBB
    pub hex: String,
}

pub fn run_invert(args: InvertArgs) -> Result<()> {
    println!("{}", invert(&args.hex));
    Ok(())
}
