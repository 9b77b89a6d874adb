//! Launcher entrypoint.
//!
//! Works out this process's rank, sets up logging and the floating-point
//! environment, and runs the startup sequence. The only place that terminates the process.

use anyhow::{Context, Result};

use launcher::bootstrap::{Failure, bootstrap};
use launcher::core::role::ProcessRole;
use launcher::exit_codes;
use launcher::io::fenv::configure_numeric_environment;
use launcher::io::group::detect_role;
use launcher::logging;

fn main() {
    let role = match detect_role() {
        Ok(role) => role,
        Err(err) => {
            // Rank unknown: every process reports.
            eprintln!("{err}");
            std::process::exit(exit_codes::ABORT);
        }
    };
    logging::init(&role);

    let flush = configure_numeric_environment();
    tracing::info!(?flush, rank = role.rank(), "floating-point environment ready");

    match run(&role) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            if role.is_root() {
                eprintln!("{:#}", err);
            }
            std::process::exit(exit_codes::ABORT);
        }
    }
}

fn run(role: &ProcessRole) -> Result<i32> {
    match bootstrap(std::env::args_os(), *role) {
        Ok(_startup) => Ok(exit_codes::OK),
        Err(Failure::Exit(exit)) => {
            exit.emit(role);
            Ok(exit.code)
        }
        Err(Failure::Fatal(err)) => Err(err).context("startup aborted"),
    }
}
