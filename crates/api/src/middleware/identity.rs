//! Caller identity taken from gateway-provided headers.
//!
//! Authentication happens upstream; the gateway forwards the verified user
//! id in `x-user-id` and, for admin routes, the admin id in `x-admin-id`.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use fundflow_shared::{AppError, AppResult};
use fundflow_shared::types::UserId;

use crate::response::ApiError;

/// Header carrying the end user's id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the acting admin's id.
pub const ADMIN_ID_HEADER: &str = "x-admin-id";

fn header_id(parts: &Parts, header: &'static str) -> AppResult<UserId> {
    let raw = parts
        .headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized(format!("{header} header is required")))?;
    Uuid::parse_str(raw.trim())
        .map(UserId::from_uuid)
        .map_err(|_| AppError::Unauthorized(format!("{header} must be a UUID")))
}

/// The end user making the request.
#[derive(Debug, Clone, Copy)]
pub struct CallerUser(pub UserId);

impl<S> FromRequestParts<S> for CallerUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_id(parts, USER_ID_HEADER).map(Self).map_err(ApiError)
    }
}

/// The admin acting on a request.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub UserId);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_id(parts, ADMIN_ID_HEADER).map(Self).map_err(ApiError)
    }
}
