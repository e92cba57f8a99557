use std::sync::Mutex;

use crate::error::LedgerError;
use crate::store::Store;
use crate::types::Expense;

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Vec<Expense>>,
}

impl MemoryStore {
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            inner: Mutex::new(expenses),
        }
    }
}

#[ractor::async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> Result<Vec<Expense>, LedgerError> {
        let guard = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        Ok(guard.clone())
    }

    async fn persist(&self, expenses: &[Expense]) -> Result<(), LedgerError> {
        let mut guard = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        *guard = expenses.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
