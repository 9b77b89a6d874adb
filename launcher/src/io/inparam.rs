//! Parameter source consumed at startup.
//!
//! Keys are colon-separated paths into nested tables: `verbose:level` reads
//! `level` from the `[verbose]` table.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use toml::{Table, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// File holding the advanced parameters, relative to the input directory.
pub const ADVANCED_PARAMETERS: &str = "inparam.advanced.toml";

pub trait ParameterSource {
    fn get_str(&self, key: &str) -> Result<String>;
    fn get_bool(&self, key: &str) -> Result<bool>;
}

/// Parameters read from one TOML document.
#[derive(Debug, Clone)]
pub struct TomlParameters {
    origin: String,
    table: Table,
}

impl TomlParameters {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ReadParameters {
            path: path.to_path_buf(),
            source,
        })?;
        let table = toml::from_str::<Table>(&contents).map_err(|source| {
            Error::ParseParameters {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), keys = table.len(), "parameters loaded");
        Ok(Self {
            origin: path.display().to_string(),
            table,
        })
    }

    /// Typed lookup of `key`; `expected` names the type in error messages.
    pub fn get<T: DeserializeOwned>(&self, key: &str, expected: &'static str) -> Result<T> {
        self.lookup(key)?
            .clone()
            .try_into::<T>()
            .map_err(|_| self.type_error(key, expected))
    }

    fn lookup(&self, key: &str) -> Result<&Value> {
        let mut segments = key.split(':');
        let first = segments.next().unwrap_or_default();
        let mut value = self.table.get(first).ok_or_else(|| self.missing(key))?;
        for segment in segments {
            value = value
                .as_table()
                .and_then(|table| table.get(segment))
                .ok_or_else(|| self.missing(key))?;
        }
        Ok(value)
    }

    fn missing(&self, key: &str) -> Error {
        Error::MissingParameter {
            key: key.to_string(),
            file: self.origin.clone(),
        }
    }

    fn type_error(&self, key: &str, expected: &'static str) -> Error {
        Error::ParameterType {
            key: key.to_string(),
            file: self.origin.clone(),
            expected,
        }
    }
}

impl ParameterSource for TomlParameters {
    fn get_str(&self, key: &str) -> Result<String> {
        match self.lookup(key)? {
            Value::String(value) => Ok(value.clone()),
            _ => Err(self.type_error(key, "string")),
        }
    }

    fn get_bool(&self, key: &str) -> Result<bool> {
        match self.lookup(key)? {
            Value::Boolean(value) => Ok(*value),
            _ => Err(self.type_error(key, "boolean")),
        }
    }
}
