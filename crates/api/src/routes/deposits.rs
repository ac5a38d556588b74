//! User-facing deposit routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use fundflow_core::RequestResult;
use fundflow_core::request::NewDeposit;
use fundflow_core::validation::{ValidationOutcome, parse_deposit_method};
use fundflow_shared::types::{AccountId, PageRequest, RequestId, UserId};

use crate::AppState;
use crate::middleware::{ApiJson, CallerUser};
use crate::response::respond;

/// Creates the deposit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deposits", post(submit_deposit).get(list_deposits))
        .route("/deposits/validate", post(validate_deposit))
        .route("/deposits/reference/{reference}", get(get_deposit_by_reference))
        .route("/deposits/{deposit_id}", get(get_deposit))
}

/// Request body for submitting or validating a deposit.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositRequest {
    /// Account to credit.
    pub account_id: AccountId,
    /// Amount to deposit.
    pub amount: Decimal,
    /// Funding method, e.g. `bank_transfer`.
    pub method: String,
    /// Originating bank.
    pub bank_name: Option<String>,
    /// Last four digits of the originating account.
    pub account_number_last4: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Client-chosen key; replays return the first deposit.
    pub idempotency_key: Option<String>,
}

impl DepositRequest {
    fn into_new(self, user_id: UserId) -> RequestResult<NewDeposit> {
        Ok(NewDeposit {
            user_id,
            account_id: self.account_id,
            amount: self.amount,
            method: parse_deposit_method(&self.method)?,
            bank_name: self.bank_name,
            account_number_last4: self.account_number_last4,
            notes: self.notes,
            idempotency_key: self.idempotency_key,
        })
    }
}

/// POST `/deposits` - Submit a deposit for review.
async fn submit_deposit(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    ApiJson(payload): ApiJson<DepositRequest>,
) -> Response {
    let result = match payload.into_new(user_id) {
        Ok(deposit) => state.deposits.submit(deposit).await,
        Err(err) => Err(err),
    };
    let status = match &result {
        Ok(submitted) if submitted.replayed => StatusCode::OK,
        _ => StatusCode::CREATED,
    };
    respond(result, status, "Deposit submitted", "Failed to submit deposit")
}

/// POST `/deposits/validate` - Check a deposit without creating it.
async fn validate_deposit(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    ApiJson(payload): ApiJson<DepositRequest>,
) -> Json<ValidationOutcome> {
    let outcome = match payload.into_new(user_id) {
        Ok(deposit) => state.deposits.validate(&deposit),
        Err(err) => ValidationOutcome {
            valid: false,
            error: Some(err.to_string()),
            error_code: Some(err.error_code()),
        },
    };
    Json(outcome)
}

/// GET `/deposits` - List the caller's deposits, newest first.
async fn list_deposits(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    Query(page): Query<PageRequest>,
) -> Response {
    let result = state.deposits.list_for_user(user_id, page).await;
    respond(result, StatusCode::OK, "Deposits retrieved", "Failed to list deposits")
}

/// GET `/deposits/{deposit_id}` - Read one of the caller's deposits.
async fn get_deposit(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    Path(deposit_id): Path<RequestId>,
) -> Response {
    let result = state.deposits.get(deposit_id, Some(user_id)).await;
    respond(result, StatusCode::OK, "Deposit retrieved", "Failed to read deposit")
}

/// GET `/deposits/reference/{reference}` - Read a deposit by reference number.
async fn get_deposit_by_reference(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    Path(reference): Path<String>,
) -> Response {
    let result = state.deposits.get_by_reference(&reference, Some(user_id)).await;
    respond(result, StatusCode::OK, "Deposit retrieved", "Failed to read deposit")
}
