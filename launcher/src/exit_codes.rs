//! Stable exit codes for the launcher binary.

/// Startup completed, or `--help`/`--version` was printed.
pub const OK: i32 = 0;
/// Bad command line: unknown token or an option missing its value.
pub const USAGE: i32 = 1;
/// Fatal environment or configuration error; the whole process group stops.
pub const ABORT: i32 = 2;
