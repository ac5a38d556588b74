//! Account routes: open an account and read its balance.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};

use fundflow_shared::types::AccountId;

use crate::AppState;
use crate::middleware::CallerUser;
use crate::response::respond;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(open_account))
        .route("/accounts/{account_id}", get(get_account))
}

/// POST `/accounts` - Open an empty account for the caller.
///
/// Any request body is ignored; balances only grow through approved deposits.
async fn open_account(State(state): State<AppState>, CallerUser(user_id): CallerUser) -> Response {
    let result = state.accounts.open(user_id).await;
    respond(result, StatusCode::CREATED, "Account opened", "Failed to open account")
}

/// GET `/accounts/{account_id}` - Read one of the caller's accounts.
async fn get_account(
    State(state): State<AppState>,
    CallerUser(user_id): CallerUser,
    Path(account_id): Path<AccountId>,
) -> Response {
    let result = state.accounts.get(account_id, user_id).await;
    respond(result, StatusCode::OK, "Account retrieved", "Failed to read account")
}
