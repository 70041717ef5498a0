//! Command handlers for the `tsv` CLI.
//!
//! Each submodule implements one command. Handlers return the process exit
//! code; only `main` exits.

mod check;
mod markers;

pub use check::{parse_check_args, run_check, CheckArgs, OutputFormat, TSC_ENV};
pub use markers::{print_markers, render_markers};

/// Malformed command-line arguments.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for {option}")]
    InvalidValue { option: &'static str, value: String },

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}
