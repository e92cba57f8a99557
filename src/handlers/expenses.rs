use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::Serialize;

use crate::middleware::LedgerJson;
use crate::server::router::LedgerState;
use crate::service::ledger::parse_id;
use crate::types::{ApiResponse, Expense, ExpenseInput, ExpenseQuery};
use crate::LedgerError;

type Envelope<T> = (StatusCode, Json<ApiResponse<T>>);

fn respond<T: Serialize>(status: StatusCode, data: T) -> Envelope<T> {
    (status, Json(ApiResponse::success(status, data)))
}

/// GET /expenses?category=&startdate=&enddate=
pub async fn list_expenses(
    State(state): State<LedgerState>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Envelope<Vec<Expense>>, LedgerError> {
    let Query(query) = query.map_err(|e| LedgerError::Validation(e.body_text()))?;
    let expenses = state.handle.list(query).await?;
    Ok(respond(StatusCode::OK, expenses))
}

/// POST /expenses -> 201 with the whole store.
pub async fn create_expense(
    State(state): State<LedgerState>,
    LedgerJson(input): LedgerJson<ExpenseInput>,
) -> Result<Envelope<Vec<Expense>>, LedgerError> {
    let expenses = state.handle.create(input).await?;
    Ok(respond(StatusCode::CREATED, expenses))
}

/// GET /expenses/{id}
pub async fn get_expense(
    State(state): State<LedgerState>,
    Path(id): Path<String>,
) -> Result<Envelope<Expense>, LedgerError> {
    let id = parse_id(&id)?;
    let expense = state.handle.get(id).await?;
    Ok(respond(StatusCode::OK, expense))
}

/// PATCH /expenses/{id} -> whole store after the edit.
pub async fn patch_expense(
    State(state): State<LedgerState>,
    Path(id): Path<String>,
    LedgerJson(patch): LedgerJson<ExpenseInput>,
) -> Result<Envelope<Vec<Expense>>, LedgerError> {
    let id = parse_id(&id)?;
    let expenses = state.handle.update(id, patch).await?;
    Ok(respond(StatusCode::OK, expenses))
}

/// DELETE /expenses/{id} -> remaining store.
pub async fn delete_expense(
    State(state): State<LedgerState>,
    Path(id): Path<String>,
) -> Result<Envelope<Vec<Expense>>, LedgerError> {
    let id = parse_id(&id)?;
    let expenses = state.handle.delete(id).await?;
    Ok(respond(StatusCode::OK, expenses))
}
