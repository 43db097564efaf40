use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::dtos::BillListResponse;

/// JSON body that has been deserialized and validated.
///
/// Any failure (malformed JSON, unknown field, wrong type, rule violation)
/// is answered with HTTP 200 and a `code: 301` envelope carrying the reason.
pub struct ValidatedJson<T>(pub T);

fn rejected(message: String) -> Response {
    tracing::debug!(reason = %message, "Request body rejected");
    Json(BillListResponse::validation_failed(message)).into_response()
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| rejected(e.body_text()))?;

        value.validate().map_err(|e| rejected(e.to_string()))?;

        Ok(ValidatedJson(value))
    }
}
