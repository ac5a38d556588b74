//! `SeaORM` Entity for withdrawals table.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use fundflow_core::request::types::{AdminApprovalStatus, RejectionReason, WithdrawalMethod};
use fundflow_core::request::{PayoutDetails, Withdrawal};
use fundflow_core::workflow::WithdrawalAction;
use fundflow_shared::types::{AccountId, RequestId, UserId};

use super::{parse_column, to_utc};
use crate::store::StoreError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "withdrawals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub original_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub modified_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub final_amount: Option<Decimal>,
    pub method: String,
    pub status: String,
    #[sea_orm(unique)]
    pub reference_number: String,
    pub bank_name: Option<String>,
    pub account_number_last4: Option<String>,
    pub routing_number: Option<String>,
    pub email: Option<String>,
    pub crypto_address: Option<String>,
    pub crypto_currency: Option<String>,
    pub crypto_network: Option<String>,
    pub card_last4: Option<String>,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub processed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Withdrawal {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let rejection_reason = model
            .rejection_reason
            .as_deref()
            .map(|raw| parse_column("rejection_reason", raw, RejectionReason::parse))
            .transpose()?;

        Ok(Self {
            id: RequestId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            account_id: AccountId::from_uuid(model.account_id),
            original_amount: model.original_amount,
            modified_amount: model.modified_amount,
            final_amount: model.final_amount,
            method: parse_column("method", &model.method, WithdrawalMethod::parse)?,
            status: parse_column("status", &model.status, AdminApprovalStatus::parse)?,
            reference_number: model.reference_number,
            details: PayoutDetails {
                bank_name: model.bank_name,
                account_number_last4: model.account_number_last4,
                routing_number: model.routing_number,
                email: model.email,
                crypto_address: model.crypto_address,
                crypto_currency: model.crypto_currency,
                crypto_network: model.crypto_network,
                card_last4: model.card_last4,
            },
            notes: model.notes,
            admin_notes: model.admin_notes,
            reviewed_by: model.reviewed_by.map(UserId::from_uuid),
            reviewed_at: model.reviewed_at.map(to_utc),
            rejection_reason,
            idempotency_key: model.idempotency_key,
            created_at: to_utc(model.created_at),
            updated_at: to_utc(model.updated_at),
            processed_at: model.processed_at.map(to_utc),
        })
    }
}

/// Builds the insert model for a new withdrawal.
pub fn active_model(withdrawal: &Withdrawal) -> ActiveModel {
    let details = &withdrawal.details;
    ActiveModel {
        id: Set(withdrawal.id.into_inner()),
        user_id: Set(withdrawal.user_id.into_inner()),
        account_id: Set(withdrawal.account_id.into_inner()),
        original_amount: Set(withdrawal.original_amount),
        modified_amount: Set(withdrawal.modified_amount),
        final_amount: Set(withdrawal.final_amount),
        method: Set(withdrawal.method.as_str().to_string()),
        status: Set(withdrawal.status.as_str().to_string()),
        reference_number: Set(withdrawal.reference_number.clone()),
        bank_name: Set(details.bank_name.clone()),
        account_number_last4: Set(details.account_number_last4.clone()),
        routing_number: Set(details.routing_number.clone()),
        email: Set(details.email.clone()),
        crypto_address: Set(details.crypto_address.clone()),
        crypto_currency: Set(details.crypto_currency.clone()),
        crypto_network: Set(details.crypto_network.clone()),
        card_last4: Set(details.card_last4.clone()),
        notes: Set(withdrawal.notes.clone()),
        admin_notes: Set(withdrawal.admin_notes.clone()),
        reviewed_by: Set(withdrawal.reviewed_by.map(UserId::into_inner)),
        reviewed_at: Set(withdrawal.reviewed_at.map(Into::into)),
        rejection_reason: Set(withdrawal.rejection_reason.map(|r| r.as_str().to_string())),
        idempotency_key: Set(withdrawal.idempotency_key.clone()),
        created_at: Set(withdrawal.created_at.into()),
        updated_at: Set(withdrawal.updated_at.into()),
        processed_at: Set(withdrawal.processed_at.map(Into::into)),
    }
}

/// Column assignments that persist a workflow action.
pub fn action_columns(action: &WithdrawalAction) -> Vec<(Column, SimpleExpr)> {
    let status = Expr::value(action.new_status().as_str());
    match action {
        WithdrawalAction::Approve {
            reviewed_by,
            reviewed_at,
            admin_notes,
            modified_amount,
            final_amount,
            ..
        } => vec![
            (Column::Status, status),
            (Column::ReviewedBy, Expr::value(reviewed_by.into_inner())),
            (Column::ReviewedAt, Expr::value(*reviewed_at)),
            (Column::AdminNotes, Expr::value(admin_notes.clone())),
            (Column::ModifiedAmount, Expr::value(*modified_amount)),
            (Column::FinalAmount, Expr::value(*final_amount)),
            (Column::ProcessedAt, Expr::value(*reviewed_at)),
            (Column::UpdatedAt, Expr::value(*reviewed_at)),
        ],
        WithdrawalAction::Reject {
            reviewed_by,
            reviewed_at,
            rejection_reason,
            admin_notes,
            ..
        } => vec![
            (Column::Status, status),
            (Column::ReviewedBy, Expr::value(reviewed_by.into_inner())),
            (Column::ReviewedAt, Expr::value(*reviewed_at)),
            (Column::RejectionReason, Expr::value(rejection_reason.as_str())),
            (Column::AdminNotes, Expr::value(admin_notes.clone())),
            (Column::ProcessedAt, Expr::value(*reviewed_at)),
            (Column::UpdatedAt, Expr::value(*reviewed_at)),
        ],
        WithdrawalAction::Cancel { cancelled_at, .. } => vec![
            (Column::Status, status),
            (Column::ProcessedAt, Expr::value(*cancelled_at)),
            (Column::UpdatedAt, Expr::value(*cancelled_at)),
        ],
    }
}
