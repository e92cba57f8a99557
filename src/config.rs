//! Service configuration.
//!
//! Sources, later ones win:
//! 1. built-in defaults
//! 2. `config.toml` (or the file named by `LEDGER_CONFIG`)
//! 3. `LEDGER_*` environment variables
//! 4. bare `PORT`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::error::LedgerError;

pub const ENV_PREFIX: &str = "LEDGER_";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Process-wide configuration, read on first access.
///
/// Runs before logging is set up, so a bad source is reported on stderr and
/// the defaults are used.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: configuration error, using defaults: {e}");
        Config::default()
    })
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Json,
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub port: u16,
    pub loglevel: String,
    pub storage: StorageKind,
    pub data_path: PathBuf,
    pub database_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            port: 3000,
            loglevel: "info".to_string(),
            storage: StorageKind::Json,
            data_path: PathBuf::from("data/expenses.json"),
            database_url: "sqlite:data/expenses.sqlite".to_string(),
        }
    }
}

impl Config {
    /// Defaults layered under the config file; environment is merged by [`Config::load`].
    pub fn figment() -> Figment {
        let file = std::env::var(format!("{ENV_PREFIX}CONFIG"))
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
    }

    pub fn load() -> Result<Self, LedgerError> {
        let figment = Self::figment()
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Env::raw().only(&["port"]));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self, LedgerError> {
        Ok(figment.extract::<Config>()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, LedgerError> {
        format!("{}:{}", self.listen_addr, self.port)
            .parse()
            .map_err(|e| LedgerError::Validation(format!("invalid listen address: {e}")))
    }
}
