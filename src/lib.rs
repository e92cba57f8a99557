pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod service;
pub mod store;
pub mod types;

pub use error::LedgerError;
pub use types::Expense;
