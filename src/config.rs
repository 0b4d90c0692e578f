//! Desk configuration.
//!
//! Loaded from `config/config.toml` (optional) with `OMBUD__`-prefixed
//! environment overrides, e.g. `OMBUD__RETAIN_RESOLVED_AT_ON_REOPEN=false`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::model::Priority;

#[derive(Debug, Clone, Deserialize)]
pub struct DeskConfig {
    /// Keep `resolved_at` when a complaint leaves Resolved again. `true`
    /// preserves the historical "first resolved" timestamp; `false` clears it
    /// so a re-opened complaint reads as unresolved.
    #[serde(default = "default_retain_resolved_at")]
    pub retain_resolved_at_on_reopen: bool,
    /// How many times complaint creation retries numbering after an
    /// identifier conflict before surfacing the error.
    #[serde(default = "default_numbering_max_attempts")]
    pub numbering_max_attempts: u32,
    /// Priority assigned when the filing carries no subcategory.
    #[serde(default = "default_priority")]
    pub default_priority: Priority,
}

fn default_retain_resolved_at() -> bool {
    true
}

fn default_numbering_max_attempts() -> u32 {
    3
}

fn default_priority() -> Priority {
    Priority::Medium
}

impl Default for DeskConfig {
    fn default() -> Self {
        DeskConfig {
            retain_resolved_at_on_reopen: default_retain_resolved_at(),
            numbering_max_attempts: default_numbering_max_attempts(),
            default_priority: default_priority(),
        }
    }
}

impl DeskConfig {
    /// Load the desk configuration from `config/config.toml`, falling back to
    /// env vars when the file is absent or unreadable.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/config.toml").required(false))
            .add_source(Environment::with_prefix("OMBUD").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if std::path::Path::new("config/config.toml").exists() {
                    log::warn!("failed to load config file, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix("OMBUD").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        settings.try_deserialize()
    }
}
