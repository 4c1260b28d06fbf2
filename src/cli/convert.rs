use std::path::PathBuf;

use clap::Args;

use crate::convert::convert_images;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};

/// Collect images into a directory as JPEGs
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory with the picked images
    pub input: PathBuf,

    /// Directory to write JPEGs into (created if missing)
    pub output: PathBuf,
}

pub fn run(args: ConvertArgs, printer: &Printer) -> Result<()> {
    let report = convert_images(&args.input, &args.output)?;

    for (source, target) in &report.converted {
        printer.status("Converted", &format!("{} -> {}", display_path(source), display_path(target)));
    }
    for (source, target) in &report.moved {
        printer.status("Moved", &format!("{} -> {}", display_path(source), display_path(target)));
    }
    for (source, reason) in &report.skipped {
        printer.warning("Skipped", &format!("{} ({})", display_path(source), reason));
    }

    printer.info(
        "Finished",
        &format!(
            "{} in {}",
            plural(report.converted.len() + report.moved.len(), "image", "images"),
            display_path(&args.output)
        ),
    );
    Ok(())
}
