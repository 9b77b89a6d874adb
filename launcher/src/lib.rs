//! Process bootstrap and runtime I/O for a distributed simulation executable.
//!
//! Every process of the group runs the same startup sequence; only the root
//! touches the filesystem or prints. The layering follows a strict split:
//!
//! - **[`core`]**: Pure, deterministic logic (run paths, verbosity, process
//!   role, backup naming). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (directory provisioning, the
//!   rank-aware output channel, parameter files, the FPU control register).
//!
//! Orchestration modules ([`cli`], [`bootstrap`], [`report`]) coordinate core
//! logic with I/O. Nothing here calls `std::process::exit`; the binary does.

pub mod bootstrap;
pub mod cli;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
