//! Persistence seam: the whole ordered expense list is loaded and persisted as one unit.
//!
//! Layout:
//! - `json_file.rs`: single JSON array file (default backing)
//! - `sqlite.rs`: SQLite table keyed by list position
//! - `memory.rs`: process-local list, for tests and throwaway runs

pub mod json_file;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{Config, StorageKind};
use crate::error::LedgerError;
use crate::types::Expense;
use tracing::info;

#[ractor::async_trait]
pub trait Store: Send + Sync + 'static {
    /// Read the complete store in its persisted order.
    async fn load(&self) -> Result<Vec<Expense>, LedgerError>;

    /// Replace the complete store with `expenses`.
    async fn persist(&self, expenses: &[Expense]) -> Result<(), LedgerError>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// Build the backing selected by `cfg.storage`.
pub async fn open(cfg: &Config) -> Result<Box<dyn Store>, LedgerError> {
    let store: Box<dyn Store> = match cfg.storage {
        StorageKind::Json => Box::new(JsonFileStore::open(&cfg.data_path).await?),
        StorageKind::Sqlite => Box::new(SqliteStore::connect(&cfg.database_url).await?),
        StorageKind::Memory => Box::new(MemoryStore::default()),
    };
    info!(backing = %store.describe(), "expense store opened");
    Ok(store)
}
