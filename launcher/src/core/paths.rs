//! Run directory contract: the input/output pair fixed at startup.

use std::path::{Path, PathBuf};

/// Default input directory, relative to the working directory.
pub const DEFAULT_INPUT_DIR: &str = "input";
/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Subdirectories created under every fresh output directory.
pub const OUTPUT_SUBDIRS: [&str; 4] = ["stations", "elements", "develop", "plots"];

/// Marker between the output directory name and the backup timestamp.
pub const BACKUP_MARKER: &str = "__backup@";

/// Input and output directories of a run.
///
/// Built once from the command line and read-only afterwards. Either path may
/// be absolute or relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl RunPaths {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Resolve a file name from the parameter files against the input directory.
    ///
    /// A name starting with `/` is absolute and returned unchanged; anything
    /// else (including `./x` and `~/x`) is joined under the input directory.
    pub fn resolve_input_path(&self, filename: &str) -> PathBuf {
        if filename.starts_with('/') {
            return PathBuf::from(filename);
        }
        self.input_dir.join(filename)
    }

    /// Path of a file placed directly in the output directory.
    pub fn output_file(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }

    /// All directories of a fresh output tree, parent first.
    pub fn output_tree(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(OUTPUT_SUBDIRS.len() + 1);
        dirs.push(self.output_dir.clone());
        dirs.extend(OUTPUT_SUBDIRS.iter().map(|name| self.output_dir.join(name)));
        dirs
    }
}

/// Name the backup of an existing output directory: `<output>__backup@<stamp>`.
///
/// The marker is appended to the last path component, so `runs/out/` backs up
/// to `runs/out__backup@<stamp>` beside it.
pub fn backup_path(output_dir: &Path, stamp: &str) -> PathBuf {
    let mut name = output_dir
        .components()
        .next_back()
        .map(|component| component.as_os_str().to_os_string())
        .unwrap_or_default();
    name.push(BACKUP_MARKER);
    name.push(stamp);
    match output_dir.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
