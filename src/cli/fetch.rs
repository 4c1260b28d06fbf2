use std::path::PathBuf;

use clap::Args;

use crate::accent::{
    fetch_accent, AccentSource, Celebi, DeriveOptions, ImageSource, ScoreOptions,
    DEFAULT_MAX_COLOURS,
};
use crate::config::ConfigDir;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};

/// Derive an accent colour from a wallpaper image
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Image to sample
    #[arg(required = true)]
    pub image: PathBuf,

    /// Sample every n-th pixel
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub quality: u32,

    /// Palette size cap
    #[arg(long = "max-colors", default_value_t = DEFAULT_MAX_COLOURS)]
    pub max_colours: usize,

    /// Also print hue-distinct ranked candidates
    #[arg(long)]
    pub scored: bool,

    /// Do not write accent.json
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: FetchArgs, config: &ConfigDir, printer: &Printer) -> Result<()> {
    let options = DeriveOptions {
        quality: args.quality,
        max_colours: args.max_colours,
    };
    let source = ImageSource::<Celebi>::default();
    let display = display_path(&args.image);

    let derived = if args.dry_run {
        source.derive(&args.image, &options)?
    } else {
        fetch_accent(&source, &args.image, &options, config)?
    };

    printer.info(
        "Quantized",
        &format!(
            "{} into {}",
            plural(derived.sampled, "pixel", "pixels"),
            plural(derived.palette.len(), "colour", "colours")
        ),
    );

    let mut message = format!("{} from {}", printer.swatch(derived.colour), printer.cyan(&display));
    if args.dry_run {
        message.push_str(&printer.dim(" (not saved)"));
    }
    printer.status("Fetched", &message);

    println!("{}", derived.hex());

    if args.scored {
        for (i, colour) in derived.ranked(&ScoreOptions::default()).iter().enumerate() {
            println!("$accent-{}: {}", i + 1, colour);
        }
    }

    Ok(())
}
