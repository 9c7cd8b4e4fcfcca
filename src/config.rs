//! External configuration: connection parameters from the process
//! environment and the file-type to table mapping from a YAML file.
//!
//! The importer never invents table names; every destination comes from the
//! mapping file. Connection credentials are treated as opaque values.

use std::{collections::BTreeMap, env, fs::File, io::BufReader, path::Path};

use serde::Deserialize;

use crate::error::ImportError;

/// Flat connection parameters, read from `DB_HOST`, `DB_PORT`, `DB_NAME`,
/// `DB_USER`, and `DB_PASSWORD`.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ImportError> {
        let port_raw = env_or("DB_PORT", "5432");
        let port = port_raw.parse().map_err(|_| {
            ImportError::Config(format!("DB_PORT '{port_raw}' is not a valid port number"))
        })?;
        Ok(Self {
            host: env_or("DB_HOST", "localhost"),
            port,
            dbname: env_or("DB_NAME", "postgres"),
            user: env_or("DB_USER", "postgres"),
            password: env_or("DB_PASSWORD", ""),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Static mapping from file-name fragments to destination table names.
///
/// A file matches an entry when its name contains the fragment as a
/// substring. Entries are kept sorted, so resolution order is deterministic.
#[derive(Debug, Clone, Deserialize)]
pub struct TableMapping {
    #[serde(rename = "tables")]
    entries: BTreeMap<String, String>,
}

impl TableMapping {
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let file = File::open(path).map_err(|err| {
            ImportError::Config(format!("opening mapping file {}: {err}", path.display()))
        })?;
        let mapping: TableMapping =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|err| {
                ImportError::Config(format!("parsing mapping file {}: {err}", path.display()))
            })?;
        if mapping.entries.is_empty() {
            return Err(ImportError::Config(format!(
                "mapping file {} defines no tables",
                path.display()
            )));
        }
        Ok(mapping)
    }

    /// Creates a mapping directly from fragment/table pairs.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(fragment, table)| (fragment.into(), table.into()))
                .collect(),
        }
    }

    /// Returns the destination table for a file name, if any fragment matches.
    pub fn resolve(&self, file_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(fragment, _)| file_name.contains(fragment.as_str()))
            .map(|(_, table)| table.as_str())
    }

    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
