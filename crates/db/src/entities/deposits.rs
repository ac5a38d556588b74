//! `SeaORM` Entity for deposits table.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use fundflow_core::request::types::{DepositMethod, TransactionStatus};
use fundflow_core::request::Deposit;
use fundflow_core::workflow::DepositAction;
use fundflow_shared::types::{AccountId, RequestId, UserId};

use super::{parse_column, to_utc};
use crate::store::StoreError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "deposits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    #[sea_orm(unique)]
    pub reference_number: String,
    pub bank_name: Option<String>,
    pub account_number_last4: Option<String>,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub processed_by: Option<Uuid>,
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

impl TryFrom<Model> for Deposit {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RequestId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            account_id: AccountId::from_uuid(model.account_id),
            amount: model.amount,
            method: parse_column("method", &model.method, DepositMethod::parse)?,
            status: parse_column("status", &model.status, TransactionStatus::parse)?,
            reference_number: model.reference_number,
            bank_name: model.bank_name,
            account_number_last4: model.account_number_last4,
            notes: model.notes,
            admin_notes: model.admin_notes,
            processed_by: model.processed_by.map(UserId::from_uuid),
            idempotency_key: model.idempotency_key,
            created_at: to_utc(model.created_at),
            updated_at: to_utc(model.updated_at),
            processed_at: model.processed_at.map(to_utc),
        })
    }
}

/// Builds the insert model for a new deposit.
pub fn active_model(deposit: &Deposit) -> ActiveModel {
    ActiveModel {
        id: Set(deposit.id.into_inner()),
        user_id: Set(deposit.user_id.into_inner()),
        account_id: Set(deposit.account_id.into_inner()),
        amount: Set(deposit.amount),
        method: Set(deposit.method.as_str().to_string()),
        status: Set(deposit.status.as_str().to_string()),
        reference_number: Set(deposit.reference_number.clone()),
        bank_name: Set(deposit.bank_name.clone()),
        account_number_last4: Set(deposit.account_number_last4.clone()),
        notes: Set(deposit.notes.clone()),
        admin_notes: Set(deposit.admin_notes.clone()),
        processed_by: Set(deposit.processed_by.map(UserId::into_inner)),
        idempotency_key: Set(deposit.idempotency_key.clone()),
        created_at: Set(deposit.created_at.into()),
        updated_at: Set(deposit.updated_at.into()),
        processed_at: Set(deposit.processed_at.map(Into::into)),
    }
}

/// Column assignments that persist a workflow action.
pub fn action_columns(action: &DepositAction) -> Vec<(Column, SimpleExpr)> {
    let status = Expr::value(action.new_status().as_str());
    match action {
        DepositAction::StartProcessing {
            started_by,
            started_at,
            ..
        } => vec![
            (Column::Status, status),
            (Column::ProcessedBy, Expr::value(started_by.into_inner())),
            (Column::UpdatedAt, Expr::value(*started_at)),
        ],
        DepositAction::Approve {
            approved_by,
            processed_at,
            admin_notes,
            ..
        } => {
            let mut columns = vec![
                (Column::Status, status),
                (Column::ProcessedBy, Expr::value(approved_by.into_inner())),
                (Column::ProcessedAt, Expr::value(*processed_at)),
                (Column::UpdatedAt, Expr::value(*processed_at)),
            ];
            if let Some(notes) = admin_notes {
                columns.push((Column::AdminNotes, Expr::value(notes.clone())));
            }
            columns
        }
        DepositAction::Reject {
            rejected_by,
            processed_at,
            reason,
            ..
        } => vec![
            (Column::Status, status),
            (Column::ProcessedBy, Expr::value(rejected_by.into_inner())),
            (Column::ProcessedAt, Expr::value(*processed_at)),
            (Column::UpdatedAt, Expr::value(*processed_at)),
            (Column::AdminNotes, Expr::value(reason.clone())),
        ],
    }
}
