//! Store configuration read from the environment

use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = ".taskboard-data";
pub const DEFAULT_STORAGE_KEY: &str = "task-list";

/// How a persisted board is treated when it is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadPolicy {
    /// Drop blank tasks and repeated ids, trim text
    #[default]
    Validate,
    /// Use the parsed board exactly as stored
    Trust,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub load_policy: LoadPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            load_policy: LoadPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Build a config from `TASKBOARD_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("TASKBOARD_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let storage_key = normalize_key(lookup("TASKBOARD_STORAGE_KEY"));

        let validate = parse_flag(lookup("TASKBOARD_VALIDATE_ON_LOAD").as_deref(), true);
        let load_policy = if validate {
            LoadPolicy::Validate
        } else {
            LoadPolicy::Trust
        };

        Self {
            data_dir,
            storage_key,
            load_policy,
        }
    }

    /// Set the slot key; a blank key keeps the default
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = normalize_key(Some(key.into()));
        self
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }
}

fn normalize_key(raw: Option<String>) -> String {
    raw.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string())
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}
