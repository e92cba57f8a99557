use axum::{Json, http::StatusCode, response::IntoResponse};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::types::envelope::ApiResponse;

pub const MISSING_FIELDS: &str = "Name, nominal, and category cannot be empty";
pub const ID_NOT_INTEGER: &str = "Id must be integer";

#[derive(Debug, ThisError)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("startdate is newer than enddate")]
    InvalidRange,

    #[error("Expense with id {0} not found")]
    NotFound(i64),

    #[error("Cannot assign an id after {0}")]
    IdSpaceExhausted(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Ractor error: {0}")]
    RactorError(String),
}

impl LedgerError {
    pub fn missing_fields() -> Self {
        LedgerError::Validation(MISSING_FIELDS.to_string())
    }

    pub fn id_not_integer() -> Self {
        LedgerError::Validation(ID_NOT_INTEGER.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_) | LedgerError::InvalidRange => StatusCode::BAD_REQUEST,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::IdSpaceExhausted(_) => StatusCode::CONFLICT,
            LedgerError::Io(_)
            | LedgerError::Json(_)
            | LedgerError::DatabaseError(_)
            | LedgerError::Config(_)
            | LedgerError::RactorError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<figment::Error> for LedgerError {
    fn from(e: figment::Error) -> Self {
        LedgerError::Config(Box::new(e))
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed on storage fault");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiResponse::<()>::failure(status, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        assert_eq!(
            LedgerError::NotFound(99).to_string(),
            "Expense with id 99 not found"
        );
        assert_eq!(LedgerError::NotFound(99).status(), StatusCode::NOT_FOUND);
        assert_eq!(LedgerError::InvalidRange.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            LedgerError::IdSpaceExhausted(i64::MAX).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            LedgerError::id_not_integer().to_string(),
            "Id must be integer"
        );
    }

    #[test]
    fn storage_faults_map_to_500() {
        let err: LedgerError = std::io::Error::other("disk gone").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            LedgerError::RactorError("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
