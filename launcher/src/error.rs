//! Crate-level error type and `Result` alias.
//!
//! Every variant is fatal to the process group: the single top-level caller
//! reports it on the root process and exits with [`crate::exit_codes::ABORT`].
//! Recoverable conditions (an existing output directory) never surface here.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing input directory: {}", path.display())]
    MissingInputDirectory { path: PathBuf },

    #[error("output path exists but is not a directory: {}", path.display())]
    OutputNotDirectory { path: PathBuf },

    #[error("back up existing output {} to {}: {source}", from.display(), to.display())]
    Backup {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("open or create output channel file {}: {source}", path.display())]
    OpenChannelFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output channel already redirected to {}", path.display())]
    ChannelAlreadyRedirected { path: PathBuf },

    #[error("unknown verbose level '{value}' (expected NONE, ESSENTIAL or DETAILED)")]
    UnknownVerboseLevel { value: String },

    #[error("missing parameter '{key}' in {file}")]
    MissingParameter { key: String, file: String },

    #[error("parameter '{key}' in {file} is not a {expected}")]
    ParameterType {
        key: String,
        file: String,
        expected: &'static str,
    },

    #[error("read parameter file {}: {source}", path.display())]
    ReadParameters {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse parameter file {}: {source}", path.display())]
    ParseParameters {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid rank in {var}: '{value}'")]
    InvalidRank { var: &'static str, value: String },

    #[error("write to output channel: {0}")]
    Write(#[from] std::io::Error),
}
