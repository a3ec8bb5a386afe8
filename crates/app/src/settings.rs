//! Application settings.
//!
//! Layered from an optional `tankbook.toml` in the working directory plus
//! `TANKBOOK_`-prefixed environment variables (e.g. `TANKBOOK_SERVER__PORT`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter (trace/debug/info/warn/error).
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// Database selection: the literal string `memory` or a sqlite file path.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "String")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl From<String> for Database {
    fn from(value: String) -> Self {
        match value.as_str() {
            "memory" => Self::Memory,
            _ => Self::Sqlite(value),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("tankbook").required(false))
            .add_source(Environment::with_prefix("TANKBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
