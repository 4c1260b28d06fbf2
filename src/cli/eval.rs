//! `eval` and `press`: the calculator's `=` key from the command line.

use std::str::FromStr;

use clap::Args;

use crate::calc::{evaluate, BracketMode, DisplayBuffer, Key};
use crate::error::{MatuError, Result};
use crate::output::{plural, Printer};

/// Evaluate calculator expressions
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Expressions as typed on the display, e.g. "√9+5!"
    #[arg(required = true, allow_hyphen_values = true)]
    pub expressions: Vec<String>,
}

pub fn run_eval(args: EvalArgs, printer: &Printer) -> Result<()> {
    if let [expression] = args.expressions.as_slice() {
        println!("{}", evaluate(expression)?);
        return Ok(());
    }

    let mut failed = 0;
    for expression in &args.expressions {
        match evaluate(expression) {
            Ok(result) => println!("{result}"),
            Err(e) => {
                failed += 1;
                printer.error("Error", &format!("{expression}: {e}"));
            }
        }
    }

    if failed > 0 {
        return Err(MatuError::Input {
            message: format!(
                "{} of {} could not be evaluated",
                failed,
                plural(args.expressions.len(), "expression", "expressions")
            ),
            help: None,
        });
    }
    Ok(())
}

/// Replay key presses through the calculator display
#[derive(Args, Debug)]
pub struct PressArgs {
    /// Key labels or aliases (`*`, `/`, `enter`, `bs`, `ac`, `()`); runs of
    /// plain keys such as "12+3" are split into single presses
    #[arg(required = true, allow_hyphen_values = true)]
    pub keys: Vec<String>,

    /// How the `()` key picks a bracket
    #[arg(long, value_enum, default_value_t = BracketMode::default())]
    pub brackets: BracketMode,
}

/// Turn arguments into keys, splitting unrecognised words into characters.
pub fn parse_keys(args: &[String]) -> Result<Vec<Key>> {
    let mut keys = Vec::new();
    for arg in args {
        if let Ok(key) = Key::from_str(arg) {
            keys.push(key);
            continue;
        }
        for c in arg.chars() {
            let key = Key::from_str(c.encode_utf8(&mut [0; 4])).map_err(|e| MatuError::Input {
                message: format!("{e} in '{arg}'"),
                help: Some("Keys are 0-9 . ( ) % ÷ × - + π √ ^ ! plus (), bs, ac and =".to_string()),
            })?;
            keys.push(key);
        }
    }
    Ok(keys)
}

pub fn run_press(args: PressArgs, printer: &Printer) -> Result<()> {
    let keys = parse_keys(&args.keys)?;
    let mut display = DisplayBuffer::new(args.brackets);

    for key in keys {
        if let Err(e) = display.press(key) {
            // The display keeps its text, like the app
            printer.warning("Error", &e.to_string());
        }
    }

    println!("{}", display.text());
    Ok(())
}
