use crate::error::{AppError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_DATA_FILE: &str = "data/articles.json";
pub const DEFAULT_TABLE: &str = "NewsfeedEntries";

/// Which datastore holds the raw entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    File { path: PathBuf },
    Dynamo { table_name: String },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

/// Service configuration, loaded from TOML or the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub store: StoreConfig,
}

impl ServiceConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| AppError::ConfigError(e.to_string()))
    }

    /// Load from the file named by `NEWSFEED_CONFIG`, or from individual
    /// `NEWSFEED_BACKEND` / `NEWSFEED_DATA_FILE` / `ENTRIES_TABLE` variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = var("NEWSFEED_CONFIG") {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| AppError::ConfigError(format!("{path}: {e}")))?;
            info!(path = %path, "Loaded config file");
            return Self::from_toml(&contents);
        }

        let backend = var("NEWSFEED_BACKEND").unwrap_or_else(|| "file".into());
        let store = match backend.to_lowercase().as_str() {
            "file" => StoreConfig::File {
                path: var("NEWSFEED_DATA_FILE")
                    .unwrap_or_else(|| DEFAULT_DATA_FILE.into())
                    .into(),
            },
            "dynamo" => StoreConfig::Dynamo {
                table_name: var("ENTRIES_TABLE").unwrap_or_else(|| DEFAULT_TABLE.into()),
            },
            other => {
                return Err(AppError::ConfigError(format!("Unknown backend: {other}")));
            }
        };

        Ok(Self { store })
    }
}
