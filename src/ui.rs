//! Terminal output
//!
//! All user-facing messages go to stderr so task output on stdout stays clean.

use crate::error::TuskError;
use colored::Colorize;

/// Print an error. Command line errors are already rendered by clap.
pub fn print_error(err: &TuskError) {
    match err {
        TuskError::Cli(e) => eprint!("{}", e),
        other => eprintln!("{} {}", "Error:".red().bold(), other),
    }
}

/// Print an informational message
pub fn info(message: &str) {
    eprintln!("{} {}", "[tusk]".blue().bold(), message);
}

/// Print a debug message
pub fn debug(message: &str) {
    eprintln!("{} {}", "[debug]".dimmed(), message);
}

/// Print a command about to run
pub fn command(command: &str) {
    eprintln!("{} {}", "$".green().bold(), command);
}

/// Print a success message
pub fn success(message: &str) {
    eprintln!("{} {}", "[done]".green().bold(), message);
}
