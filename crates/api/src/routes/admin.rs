//! Admin review routes: queues, decisions and the dashboard.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use fundflow_core::validation::parse_rejection_reason;
use fundflow_shared::types::{PageRequest, RequestId};

use crate::AppState;
use crate::middleware::{AdminUser, ApiJson};
use crate::response::respond;

/// Creates the admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/deposits/pending", get(pending_deposits))
        .route("/admin/deposits/{deposit_id}", get(get_deposit))
        .route("/admin/deposits/{deposit_id}/process", post(start_processing_deposit))
        .route("/admin/deposits/{deposit_id}/approve", post(approve_deposit))
        .route("/admin/deposits/{deposit_id}/reject", post(reject_deposit))
        .route("/admin/withdrawals/pending", get(pending_withdrawals))
        .route("/admin/withdrawals/{withdrawal_id}", get(get_withdrawal))
        .route("/admin/withdrawals/{withdrawal_id}/approve", post(approve_withdrawal))
        .route("/admin/withdrawals/{withdrawal_id}/reject", post(reject_withdrawal))
        .route("/admin/statistics", get(dashboard))
}

/// Request body for approving a deposit.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveDepositRequest {
    /// Optional notes.
    pub admin_notes: Option<String>,
}

/// Request body for rejecting a deposit.
#[derive(Debug, Default, Deserialize)]
pub struct RejectDepositRequest {
    /// Reason shown to the user; blank is refused.
    #[serde(default)]
    pub reason: String,
}

/// Request body for approving a withdrawal.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveWithdrawalRequest {
    /// Notes; required when `modified_amount` is set.
    pub admin_notes: Option<String>,
    /// Reduced amount to pay out instead of the original.
    pub modified_amount: Option<Decimal>,
}

/// Request body for rejecting a withdrawal.
///
/// Both fields are checked by the lifecycle rather than by
/// deserialization, so bad values get their specific error codes.
#[derive(Debug, Default, Deserialize)]
pub struct RejectWithdrawalRequest {
    /// Categorised reason, e.g. `incorrect_details`.
    #[serde(default)]
    pub rejection_reason: String,
    /// Explanation shown to the user; required.
    pub admin_notes: Option<String>,
}

/// GET `/admin/deposits/pending` - Deposits awaiting review, oldest first.
async fn pending_deposits(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(page): Query<PageRequest>,
) -> Response {
    let result = state.deposits.pending_queue(page).await;
    respond(result, StatusCode::OK, "Pending deposits retrieved", "Failed to list pending deposits")
}

/// GET `/admin/deposits/{deposit_id}` - Read any deposit.
async fn get_deposit(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(deposit_id): Path<RequestId>,
) -> Response {
    let result = state.deposits.get(deposit_id, None).await;
    respond(result, StatusCode::OK, "Deposit retrieved", "Failed to read deposit")
}

/// POST `/admin/deposits/{deposit_id}/process` - Claim a pending deposit.
async fn start_processing_deposit(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(deposit_id): Path<RequestId>,
) -> Response {
    let result = state.deposits.start_processing(deposit_id, admin_id).await;
    respond(result, StatusCode::OK, "Deposit processing started", "Failed to start processing deposit")
}

/// POST `/admin/deposits/{deposit_id}/approve` - Approve and credit.
async fn approve_deposit(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(deposit_id): Path<RequestId>,
    ApiJson(payload): ApiJson<ApproveDepositRequest>,
) -> Response {
    let result = state
        .deposits
        .approve(deposit_id, admin_id, payload.admin_notes)
        .await;
    respond(result, StatusCode::OK, "Deposit approved and account credited", "Failed to approve deposit")
}

/// POST `/admin/deposits/{deposit_id}/reject` - Reject with a reason.
async fn reject_deposit(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(deposit_id): Path<RequestId>,
    ApiJson(payload): ApiJson<RejectDepositRequest>,
) -> Response {
    let result = state.deposits.reject(deposit_id, admin_id, payload.reason).await;
    respond(result, StatusCode::OK, "Deposit rejected", "Failed to reject deposit")
}

/// GET `/admin/withdrawals/pending` - Withdrawals awaiting review, oldest first.
async fn pending_withdrawals(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(page): Query<PageRequest>,
) -> Response {
    let result = state.withdrawals.pending_queue(page).await;
    respond(result, StatusCode::OK, "Pending withdrawals retrieved", "Failed to list pending withdrawals")
}

/// GET `/admin/withdrawals/{withdrawal_id}` - Read any withdrawal.
async fn get_withdrawal(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(withdrawal_id): Path<RequestId>,
) -> Response {
    let result = state.withdrawals.get(withdrawal_id, None).await;
    respond(result, StatusCode::OK, "Withdrawal retrieved", "Failed to read withdrawal")
}

/// POST `/admin/withdrawals/{withdrawal_id}/approve` - Approve and debit.
async fn approve_withdrawal(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(withdrawal_id): Path<RequestId>,
    ApiJson(payload): ApiJson<ApproveWithdrawalRequest>,
) -> Response {
    let result = state
        .withdrawals
        .approve(withdrawal_id, admin_id, payload.admin_notes, payload.modified_amount)
        .await;
    respond(result, StatusCode::OK, "Withdrawal approved and account debited", "Failed to approve withdrawal")
}

/// POST `/admin/withdrawals/{withdrawal_id}/reject` - Reject with a reason.
async fn reject_withdrawal(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(withdrawal_id): Path<RequestId>,
    ApiJson(payload): ApiJson<RejectWithdrawalRequest>,
) -> Response {
    let result = match parse_rejection_reason(&payload.rejection_reason) {
        Ok(reason) => {
            state
                .withdrawals
                .reject(withdrawal_id, admin_id, reason, payload.admin_notes.unwrap_or_default())
                .await
        }
        Err(err) => Err(err.into()),
    };
    respond(result, StatusCode::OK, "Withdrawal rejected", "Failed to reject withdrawal")
}

/// GET `/admin/statistics` - Pending totals and today's outcomes.
async fn dashboard(State(state): State<AppState>, _admin: AdminUser) -> Response {
    let result = state.statistics.dashboard(Utc::now()).await;
    respond(result, StatusCode::OK, "Statistics retrieved", "Failed to compute statistics")
}
