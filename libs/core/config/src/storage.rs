use crate::{env_or_default, ConfigError, FromEnv};
use std::path::PathBuf;
use std::str::FromStr;

/// Default location of the users CSV store, relative to the working directory.
pub const DEFAULT_CSV_PATH: &str = "data/data.csv";

/// Which repository implementation backs the users API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// Comma-delimited file on local disk
    Csv,
    /// Process memory, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(StorageBackend::Csv),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// Storage configuration for the users store
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub csv_path: PathBuf,
}

impl FromEnv for StorageConfig {
    /// Reads from environment variables:
    /// - USERS_STORE: `csv` (default) or `memory`
    /// - USERS_CSV_PATH: defaults to `data/data.csv`
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env_or_default("USERS_STORE", "csv")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "USERS_STORE".to_string(),
                details,
            })?;
        let csv_path = PathBuf::from(env_or_default("USERS_CSV_PATH", DEFAULT_CSV_PATH));

        Ok(Self { backend, csv_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        temp_env::with_vars(
            [("USERS_STORE", None::<&str>), ("USERS_CSV_PATH", None::<&str>)],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.backend, StorageBackend::Csv);
                assert_eq!(config.csv_path, PathBuf::from("data/data.csv"));
            },
        );
    }

    #[test]
    fn test_storage_config_memory_backend() {
        temp_env::with_vars(
            [("USERS_STORE", Some("Memory")), ("USERS_CSV_PATH", Some("/tmp/users.csv"))],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.backend, StorageBackend::Memory);
                assert_eq!(config.csv_path, PathBuf::from("/tmp/users.csv"));
            },
        );
    }

    #[test]
    fn test_storage_config_unknown_backend() {
        temp_env::with_var("USERS_STORE", Some("postgres"), || {
            let err = StorageConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("USERS_STORE"));
            assert!(err.to_string().contains("postgres"));
        });
    }
}
