use clap::Parser;
use miette::Result;
use matucalc::cli::{Cli, Commands};
use matucalc::output::Printer;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let printer = Printer::new();
    let config = cli.config();

    match cli.command {
        Commands::Eval(args) => matucalc::cli::eval::run_eval(args, &printer)?,
        Commands::Press(args) => matucalc::cli::eval::run_press(args, &printer)?,
        Commands::Fetch(args) => matucalc::cli::fetch::run(args, &config, &printer)?,
        Commands::Theme(args) => matucalc::cli::theme::run(args, &config, &printer)?,
        Commands::Adjust(args) => matucalc::cli::theme::run_adjust(args)?,
        Commands::Invert(args) => matucalc::cli::theme::run_invert(args)?,
        Commands::Convert(args) => matucalc::cli::convert::run(args, &printer)?,
        Commands::Completions(args) => matucalc::cli::completions::run(args, &printer)?,
    }

    Ok(())
}
