//! Environment snapshot the settings groups are parsed from.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Immutable key/value snapshot. Keys are matched case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    /// Snapshot of the current process environment. Non-UTF-8 entries are skipped.
    pub fn from_process() -> Self {
        Self::from_pairs(
            std::env::vars_os().filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        EnvSource {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into().to_ascii_uppercase(), v.into()))
                .collect(),
        }
    }

    /// Layers a dotenv file beneath this snapshot: keys already present win. A missing file is ignored.
    pub fn with_env_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => return Ok(self),
            Err(e) => return Err(ConfigError::EnvFile(format!("{}: {}", path.display(), e))),
        };
        for item in iter {
            let (key, value) = item.map_err(|e| ConfigError::EnvFile(format!("{}: {}", path.display(), e)))?;
            self.vars.entry(key.to_ascii_uppercase()).or_insert(value);
        }
        Ok(self)
    }

    /// Returns a copy with `key` set, replacing any previous value.
    pub fn with_var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_ascii_uppercase(), value.into());
        self
    }

    /// Returns a copy with `key` removed.
    pub fn without_var(mut self, key: &str) -> Self {
        self.vars.remove(&key.to_ascii_uppercase());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(&key.to_ascii_uppercase()).map(String::as_str)
    }

    /// First value found among `keys` (primary name, then aliases), with the key it came from.
    fn lookup(&self, keys: &[&'static str]) -> Option<(&'static str, &str)> {
        keys.iter().find_map(|k| self.get(k).map(|v| (*k, v)))
    }

    pub(crate) fn string(&self, keys: &[&'static str], default: &str) -> String {
        self.lookup(keys)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| default.to_string())
    }

    pub(crate) fn optional_string(&self, keys: &[&'static str]) -> Option<String> {
        self.lookup(keys)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub(crate) fn parse<T>(&self, keys: &[&'static str], default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.lookup(keys) {
            None => Ok(default),
            Some((key, raw)) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: raw.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub(crate) fn flag(&self, keys: &[&'static str], default: bool) -> Result<bool, ConfigError> {
        match self.lookup(keys) {
            None => Ok(default),
            Some((key, raw)) => parse_bool(raw).ok_or_else(|| ConfigError::Invalid {
                key,
                value: raw.to_string(),
                reason: "expected a boolean".into(),
            }),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "t" | "y" => Some(true),
        "0" | "false" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}
