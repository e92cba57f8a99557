use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::LedgerError;

/// JSON body extractor that reports failures through the ledger envelope.
///
/// A request without a JSON content type is read as an empty object, so
/// `POST` reports the missing fields and `PATCH` keeps every field.
pub struct LedgerJson<T>(pub T);

impl<S, T> FromRequest<S> for LedgerJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = LedgerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(LedgerJson(body)),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(LedgerJson(T::default())),
            Err(rejection) => Err(LedgerError::Validation(rejection.body_text())),
        }
    }
}
