//! Deterministic, pure logic shared by the launcher.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod paths;
pub mod role;
pub mod verbosity;
