use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// A `Json<T>` wrapper that turns every body rejection into a 400
/// `VALIDATION_ERROR` envelope carrying serde's detail, so a field of the
/// wrong type is reported precisely instead of as a bare status.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected request body");
                let message = match rejection {
                    JsonRejection::MissingJsonContentType(_) => {
                        "Expected a JSON body with Content-Type: application/json".to_string()
                    }
                    JsonRejection::JsonSyntaxError(e) => format!("Malformed JSON: {}", e.body_text()),
                    other => other.body_text(),
                };
                Err(AppError::Validation(message))
            }
        }
    }
}
