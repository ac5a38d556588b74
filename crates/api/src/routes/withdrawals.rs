//! User-facing withdrawal routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use fundflow_core::RequestResult;
use fundflow_core::request::{NewWithdrawal, PayoutDetails};
use fundflow_core::validation::parse_withdrawal_method;
use fundflow_shared::types::{AccountId, PageRequest, RequestId, UserId};

use crate::AppState;
use crate::middleware::{ApiJson, CallerUser};
use crate::response::{failure, respond};

/// Creates the withdrawal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/withdrawals", post(submit_withdrawal).get(list_withdrawals))
        .route("/withdrawals/validate", post(validate_withdrawal))
        .route("/withdrawals/reference/{reference}", get(get_withdrawal_by_reference))
        .route("/withdrawals/{withdrawal_id}", get(get_withdrawal))
        .route("/withdrawals/{withdrawal_id}/cancel", post(cancel_withdrawal))
}

/// Request body for submitting or validating a withdrawal.
///
/// Payout fields sit at the top level; which ones are required depends on
/// the method.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalRequest {
    /// Account to debit.
    pub account_id: AccountId,
    /// Amount to withdraw.
    pub amount: Decimal,
    /// Payout method, e.g. `paypal`.
    pub method: String,
    /// Payout destination.
    #[serde(flatten)]
    pub details: PayoutDetails,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Client-chosen key; replays return the first withdrawal.
    pub idempotency_key: Option<String>,
}

impl WithdrawalRequest {
    fn into_new(self, user_id: UserId) -> RequestResult<NewWithdrawal> {
        Ok(NewWithdrawal {
            user_id,
            account_id: self.account_id,
            amount: self.amount,
            method: parse_withdrawal_method(&self.method)?,
            details: self.details,
            notes: self.notes,
            idempotency_key: self.idempotency_key,
        })
    }
}

/// POST `/withdrawals` - Submit a withdrawal for admin review.
async fn submit_withdrawal(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    ApiJson(payload): ApiJson<WithdrawalRequest>,
) -> Response {
    let result = match payload.into_new(user_id) {
        Ok(withdrawal) => state.withdrawals.submit(withdrawal).await,
        Err(err) => Err(err),
    };
    let status = match &result {
        Ok(submitted) if submitted.replayed => StatusCode::OK,
        _ => StatusCode::CREATED,
    };
    respond(
        result,
        status,
        "Withdrawal submitted for review",
        "Failed to submit withdrawal",
    )
}

/// POST `/withdrawals/validate` - Check a withdrawal against the current balance.
async fn validate_withdrawal(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    ApiJson(payload): ApiJson<WithdrawalRequest>,
) -> Response {
    let withdrawal = match payload.into_new(user_id) {
        Ok(withdrawal) => withdrawal,
        Err(err) => return failure("Invalid withdrawal", &err),
    };
    match state.withdrawals.validate(&withdrawal).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => failure("Failed to validate withdrawal", &err),
    }
}

/// GET `/withdrawals` - List the caller's withdrawals, newest first.
async fn list_withdrawals(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    Query(page): Query<PageRequest>,
) -> Response {
    let result = state.withdrawals.list_for_user(user_id, page).await;
    respond(result, StatusCode::OK, "Withdrawals retrieved", "Failed to list withdrawals")
}

/// GET `/withdrawals/{withdrawal_id}` - Read one of the caller's withdrawals.
async fn get_withdrawal(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    Path(withdrawal_id): Path<RequestId>,
) -> Response {
    let result = state.withdrawals.get(withdrawal_id, Some(user_id)).await;
    respond(result, StatusCode::OK, "Withdrawal retrieved", "Failed to read withdrawal")
}

/// GET `/withdrawals/reference/{reference}` - Read a withdrawal by reference number.
async fn get_withdrawal_by_reference(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    Path(reference): Path<String>,
) -> Response {
    let result = state
        .withdrawals
        .get_by_reference(&reference, Some(user_id))
        .await;
    respond(result, StatusCode::OK, "Withdrawal retrieved", "Failed to read withdrawal")
}

/// POST `/withdrawals/{withdrawal_id}/cancel` - Cancel a withdrawal still under review.
async fn cancel_withdrawal(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    Path(withdrawal_id): Path<RequestId>,
) -> Response {
    let result = state.withdrawals.cancel(withdrawal_id, user_id).await;
    respond(result, StatusCode::OK, "Withdrawal cancelled", "Failed to cancel withdrawal")
}
