pub mod ledger;
pub mod ledger_actor;

pub use ledger::ExpenseId;
pub use ledger_actor::{LedgerHandle, spawn};
