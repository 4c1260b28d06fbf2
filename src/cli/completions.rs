//! Shell completion scripts.

use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::error::{MatuError, Result};
use crate::output::{display_path, Printer};

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script into this directory instead of stdout
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs, printer: &Printer) -> Result<()> {
    let mut cmd = super::Cli::command();

    let Some(dir) = args.out_dir else {
        clap_complete::generate(args.shell, &mut cmd, "matucalc", &mut std::io::stdout());
        return Ok(());
    };

    let written = clap_complete::generate_to(args.shell, &mut cmd, "matucalc", &dir).map_err(|e| {
        MatuError::Io {
            path: dir.clone(),
            message: e.to_string(),
        }
    })?;
    printer.status("Generated", &format!("{} completions at {}", args.shell, display_path(&written)));
    Ok(())
}
