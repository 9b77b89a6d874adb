//! Command-line parsing for the launcher.
//!
//! Exactly four forms are recognized: `--input <dir>`, `--output <dir>`,
//! `--version` and `--help`/`-h`. Tokens are read left to right and the first
//! one that ends the run (help, version, or an error) decides the outcome.
//! Parsing never exits the process; it hands a [`CliExit`] back to `main`,
//! which prints it on the root process only.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};

use crate::core::paths::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, RunPaths};
use crate::core::role::ProcessRole;
use crate::exit_codes;

const INPUT_FLAG: &str = "--input";
const OUTPUT_FLAG: &str = "--output";

#[derive(Debug, Parser)]
#[command(
    name = "launcher",
    version,
    about = "Bootstrap a distributed simulation run",
    disable_version_flag = true,
    args_override_self = true
)]
struct Cli {
    /// Input directory.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_INPUT_DIR, allow_hyphen_values = true)]
    input: PathBuf,

    /// Output directory.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR, allow_hyphen_values = true)]
    output: PathBuf,
}

/// Which standard stream a [`CliExit`] message belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Parsing ended without a run: help, version, or a usage error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliExit {
    pub code: i32,
    pub message: String,
    pub stream: Stream,
}

impl CliExit {
    fn info(message: String) -> Self {
        Self {
            code: exit_codes::OK,
            message,
            stream: Stream::Stdout,
        }
    }

    fn usage(message: String) -> Self {
        Self {
            code: exit_codes::USAGE,
            message,
            stream: Stream::Stderr,
        }
    }

    fn unknown_option(token: &str) -> Self {
        Self::usage(format!(
            "error: unknown option: {token}\n\nFor more information, try '--help'.\n"
        ))
    }

    /// Print the message, on the root process only.
    pub fn emit(&self, role: &ProcessRole) {
        if !role.is_root() {
            return;
        }
        let written = match self.stream {
            Stream::Stdout => std::io::stdout().write_all(self.message.as_bytes()),
            Stream::Stderr => std::io::stderr().write_all(self.message.as_bytes()),
        };
        written.ok();
    }
}

/// Parse the run directories from `args` (program name first).
///
/// A repeated option keeps its last value.
pub fn parse_run_arguments<I, T>(args: I) -> Result<RunPaths, CliExit>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    reject_foreign_forms(&args)?;

    let command = Cli::command().arg(
        Arg::new("version")
            .long("version")
            .action(ArgAction::Version)
            .help("Print version information"),
    );
    let cli = command
        .try_get_matches_from(args)
        .and_then(|matches| Cli::from_arg_matches(&matches))
        .map_err(|err| match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                CliExit::info(err.render().to_string())
            }
            _ => CliExit::usage(err.render().to_string()),
        })?;
    Ok(RunPaths::new(cli.input, cli.output))
}

/// Catch the spellings clap would accept but the launcher does not: a bare
/// `--` and `--input=<dir>`/`--output=<dir>`.
///
/// Scanning stops at the first help or version flag, which wins over
/// anything after it. The token after `--input`/`--output` is a value and is
/// never inspected.
fn reject_foreign_forms(args: &[OsString]) -> Result<(), CliExit> {
    let mut tokens = args.iter().skip(1);
    while let Some(token) = tokens.next() {
        let token = token.to_string_lossy();
        match token.as_ref() {
            INPUT_FLAG | OUTPUT_FLAG => {
                tokens.next();
            }
            "--help" | "-h" | "--version" => return Ok(()),
            "--" => return Err(CliExit::unknown_option(&token)),
            joined
                if joined.starts_with(&format!("{INPUT_FLAG}="))
                    || joined.starts_with(&format!("{OUTPUT_FLAG}=")) =>
            {
                return Err(CliExit::unknown_option(joined));
            }
            _ => {}
        }
    }
    Ok(())
}
