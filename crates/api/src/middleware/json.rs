//! JSON body extractor whose rejections use the API error shape.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use fundflow_shared::AppError;

use crate::response::ApiError;

/// Like [`Json`], but a malformed or mistyped body is reported as a
/// validation error in the `{success, message, error, error_code}` shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(status = %rejection.status(), "Request body rejected");
                Err(ApiError(AppError::Validation(rejection.body_text())))
            }
        }
    }
}
