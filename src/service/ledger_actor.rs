use crate::error::LedgerError;
use crate::service::ledger::{self, ExpenseId, ListFilter};
use crate::store::Store;
use crate::types::{Expense, ExpenseInput, ExpenseQuery};

use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracing::{debug, info};

type Reply<T> = RpcReplyPort<Result<T, LedgerError>>;

/// Public messages handled by the ledger actor.
///
/// Every message runs a full load → transform → persist cycle; the mailbox
/// serializes them, so no two cycles overlap.
#[derive(Debug)]
pub enum LedgerActorMessage {
    /// Filtered view of the store.
    List(ExpenseQuery, Reply<Vec<Expense>>),
    /// Append a new expense; replies with the whole updated store.
    Create(ExpenseInput, Reply<Vec<Expense>>),
    /// Look up one expense.
    Get(ExpenseId, Reply<Expense>),
    /// Overlay the given fields; replies with the whole updated store.
    Update(ExpenseId, ExpenseInput, Reply<Vec<Expense>>),
    /// Remove one expense; replies with the remaining store.
    Delete(ExpenseId, Reply<Vec<Expense>>),
}

/// Handle for interacting with the ledger actor.
#[derive(Clone)]
pub struct LedgerHandle {
    actor: ActorRef<LedgerActorMessage>,
}

fn rpc_failed(op: &str, e: impl std::fmt::Display) -> LedgerError {
    LedgerError::RactorError(format!("{op} RPC failed: {e}"))
}

impl LedgerHandle {
    pub async fn list(&self, query: ExpenseQuery) -> Result<Vec<Expense>, LedgerError> {
        ractor::call!(self.actor, LedgerActorMessage::List, query)
            .map_err(|e| rpc_failed("List", e))?
    }

    pub async fn create(&self, input: ExpenseInput) -> Result<Vec<Expense>, LedgerError> {
        ractor::call!(self.actor, LedgerActorMessage::Create, input)
            .map_err(|e| rpc_failed("Create", e))?
    }

    pub async fn get(&self, id: ExpenseId) -> Result<Expense, LedgerError> {
        ractor::call!(self.actor, LedgerActorMessage::Get, id).map_err(|e| rpc_failed("Get", e))?
    }

    pub async fn update(
        &self,
        id: ExpenseId,
        patch: ExpenseInput,
    ) -> Result<Vec<Expense>, LedgerError> {
        ractor::call!(self.actor, LedgerActorMessage::Update, id, patch)
            .map_err(|e| rpc_failed("Update", e))?
    }

    pub async fn delete(&self, id: ExpenseId) -> Result<Vec<Expense>, LedgerError> {
        ractor::call!(self.actor, LedgerActorMessage::Delete, id)
            .map_err(|e| rpc_failed("Delete", e))?
    }

    /// Stop the actor once queued messages drain.
    pub fn stop(&self) {
        self.actor.stop(Some("shutdown".to_string()));
    }
}

/// Internal state held by the ledger actor.
struct LedgerActorState {
    store: Box<dyn Store>,
}

/// ractor-based single writer over the expense store
struct LedgerActor;

#[ractor::async_trait]
impl Actor for LedgerActor {
    type Msg = LedgerActorMessage;
    type State = LedgerActorState;
    type Arguments = Box<dyn Store>;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        store: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        // fail fast on an unreadable store instead of on the first request
        let count = store
            .load()
            .await
            .map_err(|e| ActorProcessingErr::from(format!("expense store load failed: {e}")))?
            .len();
        info!(backing = %store.describe(), count, "LedgerActor started");
        Ok(LedgerActorState { store })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            LedgerActorMessage::List(query, rp) => {
                let _ = rp.send(self.handle_list(state, query).await);
            }
            LedgerActorMessage::Create(input, rp) => {
                let _ = rp.send(self.handle_create(state, input).await);
            }
            LedgerActorMessage::Get(id, rp) => {
                let _ = rp.send(self.handle_get(state, id).await);
            }
            LedgerActorMessage::Update(id, patch, rp) => {
                let _ = rp.send(self.handle_update(state, id, patch).await);
            }
            LedgerActorMessage::Delete(id, rp) => {
                let _ = rp.send(self.handle_delete(state, id).await);
            }
        }
        Ok(())
    }
}

impl LedgerActor {
    async fn handle_list(
        &self,
        state: &mut LedgerActorState,
        query: ExpenseQuery,
    ) -> Result<Vec<Expense>, LedgerError> {
        let filter = ListFilter::from_query(&query)?;
        let expenses = filter.apply(state.store.load().await?);
        debug!(count = expenses.len(), ?query, "expenses listed");
        Ok(expenses)
    }

    async fn handle_create(
        &self,
        state: &mut LedgerActorState,
        input: ExpenseInput,
    ) -> Result<Vec<Expense>, LedgerError> {
        let new = input.validate()?;
        let mut expenses = state.store.load().await?;
        let id = ledger::insert(&mut expenses, new, Utc::now())?;
        state.store.persist(&expenses).await?;
        info!(id, count = expenses.len(), "expense created");
        Ok(expenses)
    }

    async fn handle_get(
        &self,
        state: &mut LedgerActorState,
        id: ExpenseId,
    ) -> Result<Expense, LedgerError> {
        let expenses = state.store.load().await?;
        ledger::find(&expenses, id).cloned()
    }

    async fn handle_update(
        &self,
        state: &mut LedgerActorState,
        id: ExpenseId,
        patch: ExpenseInput,
    ) -> Result<Vec<Expense>, LedgerError> {
        let mut expenses = state.store.load().await?;
        ledger::update(&mut expenses, id, patch)?;
        state.store.persist(&expenses).await?;
        info!(id, "expense updated");
        Ok(expenses)
    }

    async fn handle_delete(
        &self,
        state: &mut LedgerActorState,
        id: ExpenseId,
    ) -> Result<Vec<Expense>, LedgerError> {
        let mut expenses = state.store.load().await?;
        ledger::remove(&mut expenses, id)?;
        state.store.persist(&expenses).await?;
        info!(id, count = expenses.len(), "expense deleted");
        Ok(expenses)
    }
}

/// Spawn the ledger actor over `store` and return a handle.
pub async fn spawn(store: Box<dyn Store>) -> Result<LedgerHandle, LedgerError> {
    let (actor, _jh) = Actor::spawn(None, LedgerActor, store)
        .await
        .map_err(|e| LedgerError::RactorError(format!("failed to spawn LedgerActor: {e}")))?;
    Ok(LedgerHandle { actor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn coffee() -> Expense {
        Expense {
            id: 1,
            name: "Coffee".into(),
            nominal: 5.0,
            category: "Food".into(),
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn tea() -> ExpenseInput {
        ExpenseInput {
            name: Some("Tea".into()),
            nominal: Some(3.0),
            category: Some("Food".into()),
        }
    }

    #[tokio::test]
    async fn create_on_empty_store_assigns_one() -> Result<(), LedgerError> {
        let handle = spawn(Box::new(MemoryStore::default())).await?;
        let all = handle.create(tea()).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 1);
        handle.stop();
        Ok(())
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() -> Result<(), LedgerError> {
        let before = Utc::now();
        let handle = spawn(Box::new(MemoryStore::with_expenses(vec![coffee()]))).await?;
        let all = handle.create(tea()).await?;
        let created = all.last().cloned().unwrap();
        assert_eq!(created.id, 2);
        assert!(created.date >= before);

        let fetched = handle.get(created.id).await?;
        assert_eq!(fetched, created);
        handle.stop();
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() -> Result<(), LedgerError> {
        let handle = spawn(Box::new(MemoryStore::with_expenses(vec![coffee()]))).await?;
        assert!(matches!(
            handle.update(7, ExpenseInput::default()).await,
            Err(LedgerError::NotFound(7))
        ));
        assert!(matches!(
            handle.delete(7).await,
            Err(LedgerError::NotFound(7))
        ));
        assert_eq!(handle.list(ExpenseQuery::default()).await?, vec![coffee()]);

        let remaining = handle.delete(1).await?;
        assert!(remaining.is_empty());
        assert!(matches!(handle.get(1).await, Err(LedgerError::NotFound(1))));
        handle.stop();
        Ok(())
    }

    #[tokio::test]
    async fn invalid_create_does_not_touch_store() -> Result<(), LedgerError> {
        let handle = spawn(Box::new(MemoryStore::with_expenses(vec![coffee()]))).await?;
        let bad = ExpenseInput {
            name: Some("Tea".into()),
            ..Default::default()
        };
        assert!(matches!(
            handle.create(bad).await,
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(handle.list(ExpenseQuery::default()).await?.len(), 1);
        handle.stop();
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_id_space_keeps_actor_alive() -> Result<(), LedgerError> {
        let edited = Expense {
            id: i64::MAX,
            ..coffee()
        };
        let handle = spawn(Box::new(MemoryStore::with_expenses(vec![edited.clone()]))).await?;
        assert!(matches!(
            handle.create(tea()).await,
            Err(LedgerError::IdSpaceExhausted(_))
        ));
        assert_eq!(handle.list(ExpenseQuery::default()).await?, vec![edited]);
        handle.stop();
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_never_lose_updates() -> Result<(), LedgerError> {
        let handle = spawn(Box::new(MemoryStore::default())).await?;
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let h = handle.clone();
                tokio::spawn(async move { h.create(tea()).await })
            })
            .collect();
        for task in tasks {
            task.await.expect("create task panicked")?;
        }

        let all = handle.list(ExpenseQuery::default()).await?;
        let ids: Vec<i64> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
        handle.stop();
        Ok(())
    }
}
