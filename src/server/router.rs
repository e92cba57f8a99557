use axum::{
    Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::handlers::expenses::{
    create_expense, delete_expense, get_expense, list_expenses, patch_expense,
};
use crate::service::LedgerHandle;
use crate::types::ApiResponse;

#[derive(Clone)]
pub struct LedgerState {
    pub handle: LedgerHandle,
}

impl LedgerState {
    pub fn new(handle: LedgerHandle) -> Self {
        Self { handle }
    }
}

pub fn ledger_router(state: LedgerState) -> Router {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/{id}",
            get(get_expense).patch(patch_expense).delete(delete_expense),
        )
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found(uri: Uri) -> (StatusCode, axum::Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        axum::Json(ApiResponse::failure(
            StatusCode::NOT_FOUND,
            format!("no route for {}", uri.path()),
        )),
    )
}
