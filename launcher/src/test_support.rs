//! Test-only helpers: in-memory parameters, capturable writers, scratch run dirs.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::core::paths::RunPaths;
use crate::error::{Error, Result};
use crate::io::inparam::{ADVANCED_PARAMETERS, ParameterSource};

const MEMORY_ORIGIN: &str = "<memory>";

#[derive(Debug, Clone)]
enum Param {
    Str(String),
    Bool(bool),
}

/// Parameter source backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MapParameters {
    values: HashMap<String, Param>,
}

impl MapParameters {
    pub fn with_str(mut self, key: &str, value: &str) -> Self {
        self.values
            .insert(key.to_string(), Param::Str(value.to_string()));
        self
    }

    pub fn with_bool(mut self, key: &str, value: bool) -> Self {
        self.values.insert(key.to_string(), Param::Bool(value));
        self
    }

    /// The three `verbose:*` keys.
    pub fn verbose(channel: &str, level: &str, warnings: bool) -> Self {
        Self::default()
            .with_str("verbose:channel", channel)
            .with_str("verbose:level", level)
            .with_bool("verbose:warnings", warnings)
    }

    fn lookup(&self, key: &str) -> Result<&Param> {
        self.values.get(key).ok_or_else(|| Error::MissingParameter {
            key: key.to_string(),
            file: MEMORY_ORIGIN.to_string(),
        })
    }

    fn type_error(key: &str, expected: &'static str) -> Error {
        Error::ParameterType {
            key: key.to_string(),
            file: MEMORY_ORIGIN.to_string(),
            expected,
        }
    }
}

impl ParameterSource for MapParameters {
    fn get_str(&self, key: &str) -> Result<String> {
        match self.lookup(key)? {
            Param::Str(value) => Ok(value.clone()),
            Param::Bool(_) => Err(Self::type_error(key, "string")),
        }
    }

    fn get_bool(&self, key: &str) -> Result<bool> {
        match self.lookup(key)? {
            Param::Bool(value) => Ok(*value),
            Param::Str(_) => Err(Self::type_error(key, "boolean")),
        }
    }
}

/// Cloneable writer whose bytes can be read back.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().expect("buffer lock");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().expect("buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Advanced parameters for a quiet console run.
pub const STDOUT_PARAMETERS: &str = r#"[verbose]
channel = "STDOUT"
level = "ESSENTIAL"
warnings = true
"#;

/// Scratch working directory with an `input/` holding the advanced parameters.
pub struct TestDirs {
    temp: tempfile::TempDir,
    paths: RunPaths,
}

impl TestDirs {
    /// Create `input/` and write `parameters` as its advanced parameter file.
    pub fn new(parameters: &str) -> anyhow::Result<Self> {
        let temp = tempfile::tempdir()?;
        let paths = RunPaths::new(temp.path().join("input"), temp.path().join("output"));
        fs::create_dir_all(&paths.input_dir)?;
        fs::write(paths.input_dir.join(ADVANCED_PARAMETERS), parameters)?;
        Ok(Self { temp, paths })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    /// Command line selecting these directories, program name first.
    pub fn args(&self) -> Vec<PathBuf> {
        vec![
            PathBuf::from("launcher"),
            PathBuf::from("--input"),
            self.paths.input_dir.clone(),
            PathBuf::from("--output"),
            self.paths.output_dir.clone(),
        ]
    }

    /// Backup directories created next to the output directory.
    pub fn backups(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(self.root())? {
            let path = entry?.path();
            let is_backup = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("output__backup@"));
            if is_backup {
                found.push(path);
            }
        }
        found.sort();
        Ok(found)
    }
}
